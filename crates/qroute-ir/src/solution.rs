//! Routed solutions: an initial placement plus an operation stream.

use serde::{Deserialize, Serialize};

use crate::operation::Operation;
use crate::qubit::{LogicalQubit, PhysicalQubit};

/// The output artifact of a router.
///
/// `initial_mapping[l]` is the physical qubit that logical qubit `l` occupies
/// before the first operation. No bijection check happens here; replay
/// rejects invalid placements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    /// Physical image of each logical qubit before the first operation.
    pub initial_mapping: Vec<PhysicalQubit>,
    /// Routed operations in execution order.
    pub operations: Vec<Operation>,
}

impl Solution {
    /// Create a solution from its parts.
    pub fn new(initial_mapping: Vec<PhysicalQubit>, operations: Vec<Operation>) -> Self {
        Self {
            initial_mapping,
            operations,
        }
    }

    /// Number of `CNOT` operations.
    pub fn cnot_count(&self) -> usize {
        self.operations.iter().filter(|op| op.is_cnot()).count()
    }

    /// Number of `SWAP` operations.
    pub fn swap_count(&self) -> usize {
        self.operations.iter().filter(|op| op.is_swap()).count()
    }

    /// Iterate over `(logical, physical)` pairs of the initial placement.
    #[allow(clippy::cast_possible_truncation)]
    pub fn placement(&self) -> impl Iterator<Item = (LogicalQubit, PhysicalQubit)> + '_ {
        self.initial_mapping
            .iter()
            .enumerate()
            .map(|(l, &p)| (LogicalQubit(l as u32), p))
    }
}
