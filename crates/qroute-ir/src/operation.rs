//! Routed operations emitted by a router and consumed by replay.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::gate::{Gate, normalize};
use crate::qubit::LogicalQubit;

/// The kind of a routed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    /// Execution of a circuit gate.
    Cnot,
    /// Exchange of the physical images of two logical qubits.
    Swap,
}

impl OperationKind {
    /// The tag used in the solution text format.
    pub fn tag(self) -> &'static str {
        match self {
            OperationKind::Cnot => "CNOT",
            OperationKind::Swap => "SWAP",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A single routed operation over logical qubits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// Execute the gate acting on these two logical qubits.
    Cnot(LogicalQubit, LogicalQubit),
    /// Swap the physical positions of these two logical qubits.
    Swap(LogicalQubit, LogicalQubit),
}

impl Operation {
    /// Create the CNOT that executes `gate`, keeping its operand order.
    pub fn cnot(gate: &Gate) -> Self {
        Operation::Cnot(gate.a(), gate.b())
    }

    /// Get the kind of this operation.
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Cnot(..) => OperationKind::Cnot,
            Operation::Swap(..) => OperationKind::Swap,
        }
    }

    /// Operands in emission order.
    pub fn qubits(&self) -> [LogicalQubit; 2] {
        match *self {
            Operation::Cnot(a, b) | Operation::Swap(a, b) => [a, b],
        }
    }

    /// Operands as a normalized unordered pair.
    pub fn pair(&self) -> (LogicalQubit, LogicalQubit) {
        let [a, b] = self.qubits();
        normalize(a, b)
    }

    /// Check if this is a CNOT.
    pub fn is_cnot(&self) -> bool {
        matches!(self, Operation::Cnot(..))
    }

    /// Check if this is a SWAP.
    pub fn is_swap(&self) -> bool {
        matches!(self, Operation::Swap(..))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b] = self.qubits();
        write!(f, "{} {a} {b}", self.kind())
    }
}
