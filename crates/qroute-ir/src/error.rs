//! Error types for the IR crate.

use crate::gate::GateId;
use crate::qubit::{LogicalQubit, PhysicalQubit};
use thiserror::Error;

/// Errors that can occur while building or validating routing problems.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IrError {
    /// Both endpoints of a gate are the same logical qubit.
    #[error("Gate acts twice on {qubit}{}", format_gate_context(.gate))]
    DuplicateQubit {
        /// The repeated qubit.
        qubit: LogicalQubit,
        /// Gate context, when known.
        gate: Option<GateId>,
    },

    /// Logical qubit index outside `[0, num_logical)`.
    #[error("Logical qubit {qubit} out of range (num_logical = {num_logical}){}", format_gate_context(.gate))]
    LogicalOutOfRange {
        /// The offending qubit.
        qubit: LogicalQubit,
        /// Number of logical qubits in the instance.
        num_logical: u32,
        /// Gate context, when known.
        gate: Option<GateId>,
    },

    /// Physical qubit index outside `[0, num_physical)`.
    #[error("Physical qubit {qubit} out of range (num_physical = {num_physical})")]
    PhysicalOutOfRange {
        /// The offending qubit.
        qubit: PhysicalQubit,
        /// Number of physical qubits in the instance.
        num_physical: u32,
    },

    /// Dependency edge references a gate that does not exist.
    #[error("Dependency references gate {gate} but only {num_gates} gates exist")]
    GateOutOfRange {
        /// The offending gate.
        gate: GateId,
        /// Number of gates in the instance.
        num_gates: u32,
    },

    /// A gate depends on itself.
    #[error("Gate {0} depends on itself")]
    SelfDependency(GateId),

    /// Coupling link from a physical qubit to itself.
    #[error("Coupling link from {0} to itself")]
    SelfLink(PhysicalQubit),

    /// Logical and physical qubit counts differ.
    #[error("Qubit count mismatch: {logical} logical vs {physical} physical")]
    QubitCountMismatch {
        /// Number of logical qubits.
        logical: u32,
        /// Number of physical qubits.
        physical: u32,
    },
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate: &Option<GateId>) -> String {
    match gate {
        Some(id) => format!(" (gate: {id})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
