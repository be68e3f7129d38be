//! Text formats for qroute.
//!
//! Two whitespace-separated, one-based formats are supported.
//!
//! # Instance format
//!
//! ```text
//! logQubits numGates numDependencies phyQubits numPhyLinks
//! gateId srcLogical dstLogical          (numGates lines)
//! depId producerGateId consumerGateId   (numDependencies lines)
//! linkId srcPhysical dstPhysical        (numPhyLinks lines)
//! ```
//!
//! # Solution stream format
//!
//! ```text
//! logicalId physicalId                  (logQubits lines, initial mapping)
//! CNOT q<a> q<b> | SWAP q<a> q<b>       (one line per operation)
//! ```
//!
//! # Example
//!
//! ```rust
//! use qroute_text::{emit_solution, parse_instance, parse_solution};
//!
//! let instance = parse_instance("3 1 0 3 2\n1 1 3\n1 1 2\n2 2 3\n").unwrap();
//! assert_eq!(instance.num_gates(), 1);
//!
//! let solution = parse_solution("1 1\n2 2\n3 3\nSWAP q1 q2\nCNOT q1 q3\n", 3).unwrap();
//! assert_eq!(solution.swap_count(), 1);
//! assert_eq!(emit_solution(&solution), "1 1\n2 2\n3 3\nSWAP q1 q2\nCNOT q1 q3\n");
//! ```

pub mod emitter;
pub mod error;
pub mod lexer;
pub mod parser;

pub use emitter::{emit_instance, emit_operation, emit_solution};
pub use error::{ParseError, ParseResult};
pub use parser::{parse_instance, parse_solution};
