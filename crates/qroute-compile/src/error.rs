//! Error types for the routing compiler.

use qroute_ir::{GateId, IrError, LogicalQubit, PhysicalQubit};
use thiserror::Error;

/// Errors that can occur while routing.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// A gate's operands sit in different components of the coupling graph.
    #[error(
        "Gate {gate} on ({a}, {b}) is unreachable: {pa} and {pb} are not connected in the coupling graph"
    )]
    UnreachablePair {
        gate: GateId,
        a: LogicalQubit,
        b: LogicalQubit,
        pa: PhysicalQubit,
        pb: PhysicalQubit,
    },

    /// The dependency graph contains a cycle.
    #[error("Dependency cycle detected involving gate {gate} ({remaining} gates never became ready)")]
    DependencyCycle { gate: GateId, remaining: usize },

    /// No candidate swap had a finite score.
    #[error("Routing heuristic exhausted with {blocked} blocked gates")]
    HeuristicExhausted { blocked: usize },

    /// An initial mapping is not a bijection.
    #[error("Invalid mapping: {0}")]
    InvalidMapping(String),

    /// Routing configuration rejected by validation.
    #[error("Invalid routing configuration: {0}")]
    InvalidConfig(String),

    /// Structural error in the instance.
    #[error("Invalid instance: {0}")]
    Ir(#[from] IrError),
}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;
