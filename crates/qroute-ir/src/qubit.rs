//! Logical and physical qubit identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A qubit as referenced by the input circuit, independent of placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LogicalQubit(pub u32);

impl LogicalQubit {
    /// Index into dense per-qubit tables.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for LogicalQubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for LogicalQubit {
    fn from(id: u32) -> Self {
        LogicalQubit(id)
    }
}

/// A hardware qubit with a fixed position in the coupling graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PhysicalQubit(pub u32);

impl PhysicalQubit {
    /// Index into dense per-qubit tables.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PhysicalQubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

impl From<u32> for PhysicalQubit {
    fn from(id: u32) -> Self {
        PhysicalQubit(id)
    }
}
