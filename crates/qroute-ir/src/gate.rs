//! Two-qubit gates and their identities.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::qubit::LogicalQubit;

/// Stable identity of a gate, defined by its position in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GateId(pub u32);

impl GateId {
    /// Index into dense per-gate tables.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

impl From<u32> for GateId {
    fn from(id: u32) -> Self {
        GateId(id)
    }
}

/// An unordered pair of distinct logical qubits.
///
/// The endpoints are kept in input order so that emitted `CNOT` lines keep
/// the operand order of the circuit, but equality and hashing are on the
/// unordered pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Gate {
    a: LogicalQubit,
    b: LogicalQubit,
}

impl Gate {
    /// Create a gate between two distinct logical qubits.
    pub fn new(a: LogicalQubit, b: LogicalQubit) -> IrResult<Self> {
        if a == b {
            return Err(IrError::DuplicateQubit {
                qubit: a,
                gate: None,
            });
        }
        Ok(Self { a, b })
    }

    /// First endpoint, in input order.
    #[inline]
    pub fn a(&self) -> LogicalQubit {
        self.a
    }

    /// Second endpoint, in input order.
    #[inline]
    pub fn b(&self) -> LogicalQubit {
        self.b
    }

    /// Both endpoints, in input order.
    #[inline]
    pub fn qubits(&self) -> [LogicalQubit; 2] {
        [self.a, self.b]
    }

    /// Normalized `(min, max)` form used for unordered-pair identity.
    #[inline]
    pub fn pair(&self) -> (LogicalQubit, LogicalQubit) {
        normalize(self.a, self.b)
    }

    /// Check whether the gate touches `qubit`.
    #[inline]
    pub fn involves(&self, qubit: LogicalQubit) -> bool {
        self.a == qubit || self.b == qubit
    }
}

impl PartialEq for Gate {
    fn eq(&self, other: &Self) -> bool {
        self.pair() == other.pair()
    }
}

impl Eq for Gate {}

impl std::hash::Hash for Gate {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.pair().hash(state);
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}}}", self.a, self.b)
    }
}

/// Order a pair of logical qubits as `(min, max)`.
#[inline]
pub fn normalize(x: LogicalQubit, y: LogicalQubit) -> (LogicalQubit, LogicalQubit) {
    if x <= y { (x, y) } else { (y, x) }
}
