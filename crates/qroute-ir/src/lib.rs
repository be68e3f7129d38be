//! qroute Routing Intermediate Representation
//!
//! This crate provides the data model shared by the router, the replay
//! verifier, the text formats and the benchmark harness.
//!
//! # Overview
//!
//! A routing problem ([`Instance`]) consists of:
//! - a set of **logical qubits** referenced by the circuit ([`LogicalQubit`]),
//! - a list of two-qubit **gates** ([`Gate`]) identified by [`GateId`],
//! - **dependency edges** between gates forming a DAG,
//! - the **coupling links** between **physical qubits** ([`PhysicalQubit`]).
//!
//! A routed result ([`Solution`]) is an initial logical→physical placement
//! followed by a stream of [`Operation`]s (`CNOT` or `SWAP`), always expressed
//! over logical qubits.
//!
//! # Example
//!
//! ```rust
//! use qroute_ir::{Gate, GateId, Instance, LogicalQubit, PhysicalQubit};
//!
//! // Two gates on a 3-qubit line; the second depends on the first.
//! let mut instance = Instance::new(3);
//! let g0 = instance.add_gate(Gate::new(LogicalQubit(0), LogicalQubit(1)).unwrap());
//! let g1 = instance.add_gate(Gate::new(LogicalQubit(1), LogicalQubit(2)).unwrap());
//! instance.add_dependency(g0, g1);
//! instance.add_link(PhysicalQubit(0), PhysicalQubit(1));
//! instance.add_link(PhysicalQubit(1), PhysicalQubit(2));
//!
//! assert!(instance.validate().is_ok());
//! assert_eq!(instance.num_gates(), 2);
//! assert_eq!(g1, GateId(1));
//! ```
//!
//! # Index conventions
//!
//! All identifiers are zero-based in memory. The text formats handled by
//! `qroute-text` are one-based; conversion happens only at that boundary.

pub mod error;
pub mod gate;
pub mod instance;
pub mod operation;
pub mod qubit;
pub mod solution;

pub use error::{IrError, IrResult};
pub use gate::{Gate, GateId};
pub use instance::{DependencyEdge, Instance};
pub use operation::{Operation, OperationKind};
pub use qubit::{LogicalQubit, PhysicalQubit};
pub use solution::Solution;
