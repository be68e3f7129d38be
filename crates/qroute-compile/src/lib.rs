//! qroute Routing Compiler
//!
//! This crate maps a circuit of two-qubit gates onto a device whose qubits
//! only interact along coupling links, inserting `SWAP`s so every `CNOT`
//! runs on adjacent physical qubits, and replays routed streams to check
//! them.
//!
//! # Overview
//!
//! Routing runs in three steps, trial, layout, final:
//! 1. **Trial**: route from the identity mapping
//! 2. **Layout**: derive the final pass's initial mapping from the trial
//!    ([`LayoutStrategy`]; undoing the trial's swaps by default, reverse
//!    traversal on request)
//! 3. **Final**: route again from that mapping; this pass is emitted
//!
//! Each pass is driven by the [`RoutingEngine`], a greedy heuristic that
//! scores candidate swaps by the distance of blocked gates plus a weighted
//! lookahead over their almost-ready successors.
//!
//! # Architecture
//!
//! ```text
//! Instance
//!    │
//!    ├── CouplingGraph ──► DistanceTable
//!    ├── DependencyScheduler
//!    │
//!    ▼
//! ┌────────┐  trial / final   ┌───────────────┐
//! │ Router │ ───────────────► │ RoutingEngine │ ◄── QubitMapping
//! └────────┘                  └───────────────┘
//!    │
//!    ▼
//! RoutingOutcome ──► Solution ──► ReplayVerifier ──► VerificationReport
//! ```
//!
//! # Example
//!
//! ```rust
//! use qroute_compile::{ReplayVerifier, Router};
//! use qroute_ir::{Gate, Instance, LogicalQubit, PhysicalQubit};
//!
//! // One gate between the ends of a 3-qubit line.
//! let mut instance = Instance::new(3);
//! instance.add_gate(Gate::new(LogicalQubit(0), LogicalQubit(2)).unwrap());
//! instance.add_link(PhysicalQubit(0), PhysicalQubit(1));
//! instance.add_link(PhysicalQubit(1), PhysicalQubit(2));
//!
//! let solution = Router::default().route(&instance).unwrap().into_solution();
//!
//! let report = ReplayVerifier::new(&instance).unwrap().verify(&solution);
//! assert!(report.is_valid());
//! assert_eq!(report.swap_count, 1);
//! assert_eq!(report.cnot_count, 1);
//! ```

pub mod config;
pub mod coupling;
pub mod distance;
pub mod error;
pub mod mapping;
pub mod passes;
pub mod router;
pub mod scheduler;

pub use config::{RoutingConfig, WarmStart};
pub use coupling::CouplingGraph;
pub use distance::{DistanceTable, UNREACHABLE};
pub use error::{CompileError, CompileResult};
pub use mapping::QubitMapping;
pub use passes::{
    LayoutStrategy, ReplayVerifier, ReverseTraversalLayout, RoutingEngine, RoutingOutcome,
    TrialFinalLayout, TrivialLayout, UndoSwapsLayout, VerificationReport, Violation, layout_for,
};
pub use router::Router;
pub use scheduler::DependencyScheduler;
