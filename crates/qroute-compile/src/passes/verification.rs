//! Replay verification of routed operation streams.
//!
//! The verifier replays a solution against its instance with its own
//! scheduler and mapping, and checks that every `CNOT` executes a ready gate
//! on adjacent physical qubits and that every gate is executed. Violations
//! are collected rather than raised, so one bad stream never aborts a batch.

use rustc_hash::FxHashMap;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use qroute_ir::{GateId, Instance, LogicalQubit, Operation, PhysicalQubit, Solution, gate::normalize};
use qroute_text::{ParseError, parse_solution};

use crate::coupling::CouplingGraph;
use crate::error::{CompileError, CompileResult};
use crate::mapping::QubitMapping;
use crate::scheduler::DependencyScheduler;

/// A broken rule found during replay.
///
/// `index` is the zero-based position of the offending operation in the
/// stream.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// The initial mapping is not a bijection over the device.
    #[error("Invalid initial mapping: {reason}")]
    InvalidMapping { reason: String },

    /// An operand is not a logical qubit of the instance.
    #[error("Operation {index}: unknown qubit {qubit}")]
    UnknownQubit { index: usize, qubit: LogicalQubit },

    /// No gate acts on the CNOT's pair.
    #[error("Operation {index}: CNOT {a} {b} matches no gate")]
    UnknownGate {
        index: usize,
        a: LogicalQubit,
        b: LogicalQubit,
    },

    /// Every gate on the CNOT's pair has already executed.
    #[error("Operation {index}: gate {gate} already consumed")]
    AlreadyConsumed { index: usize, gate: GateId },

    /// The matching gate still waits on its producers.
    #[error("Operation {index}: gate {gate} not ready (ready: {})", format_gates(.ready))]
    NotReady {
        index: usize,
        gate: GateId,
        ready: Vec<GateId>,
    },

    /// The CNOT's operands are not adjacent under the current mapping.
    #[error("Operation {index}: gate {gate} executed on non-adjacent {pa} and {pb}")]
    NotAdjacent {
        index: usize,
        gate: GateId,
        pa: PhysicalQubit,
        pb: PhysicalQubit,
    },

    /// Operation tag other than `CNOT` or `SWAP`.
    #[error("Line {line}: unknown operation '{tag}'")]
    UnknownOperation { line: usize, tag: String },

    /// The stream could not be read.
    #[error("Malformed solution: {message}")]
    Malformed { message: String },

    /// The stream ended before every gate executed.
    #[error("{remaining} gates never executed (first: {first})")]
    Incomplete { remaining: usize, first: GateId },
}

fn format_gates(gates: &[GateId]) -> String {
    if gates.is_empty() {
        return "none".into();
    }
    gates
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Outcome of a replay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    /// Number of `CNOT` operations replayed.
    pub cnot_count: usize,
    /// Number of `SWAP` operations replayed.
    pub swap_count: usize,
    /// Physical image of each logical qubit after the last operation.
    pub final_mapping: Vec<PhysicalQubit>,
    /// Every rule broken, in stream order.
    pub violations: Vec<Violation>,
}

impl VerificationReport {
    /// Check if the stream is a correct routing of the instance.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    fn rejected(violation: Violation) -> Self {
        Self {
            violations: vec![violation],
            ..Self::default()
        }
    }
}

/// Replays solutions against one instance.
#[derive(Debug, Clone)]
pub struct ReplayVerifier<'a> {
    instance: &'a Instance,
    graph: CouplingGraph,
    scheduler: DependencyScheduler,
    /// Gates by normalized operand pair, in id order.
    by_pair: FxHashMap<(LogicalQubit, LogicalQubit), Vec<GateId>>,
}

impl<'a> ReplayVerifier<'a> {
    /// Prepare a verifier for an instance.
    pub fn new(instance: &'a Instance) -> CompileResult<Self> {
        instance.validate()?;
        let graph = CouplingGraph::from_instance(instance)?;
        let scheduler = DependencyScheduler::new(instance.num_gates(), instance.dependencies())?;

        let mut by_pair: FxHashMap<_, Vec<GateId>> = FxHashMap::default();
        for (id, gate) in instance.iter_gates() {
            by_pair.entry(gate.pair()).or_default().push(id);
        }

        Ok(Self {
            instance,
            graph,
            scheduler,
            by_pair,
        })
    }

    /// Replay a solution.
    pub fn verify(&self, solution: &Solution) -> VerificationReport {
        let mut mapping = match self.initial_mapping(solution) {
            Ok(mapping) => mapping,
            Err(violation) => return VerificationReport::rejected(violation),
        };
        let mut scheduler = self.scheduler.clone();
        let mut report = VerificationReport::default();
        let num_logical = self.instance.num_logical();

        for (index, op) in solution.operations.iter().enumerate() {
            let [a, b] = op.qubits();
            if let Some(qubit) = [a, b].into_iter().find(|q| q.0 >= num_logical) {
                report
                    .violations
                    .push(Violation::UnknownQubit { index, qubit });
                continue;
            }

            match op {
                Operation::Swap(..) => {
                    mapping.swap(a, b);
                    report.swap_count += 1;
                }
                Operation::Cnot(..) => {
                    report.cnot_count += 1;
                    let gate = match self.match_gate(&scheduler, index, a, b) {
                        Ok(gate) => gate,
                        Err(violation) => {
                            report.violations.push(violation);
                            continue;
                        }
                    };
                    let (pa, pb) = (mapping.physical_of(a), mapping.physical_of(b));
                    if !self.graph.are_adjacent(pa, pb) {
                        report.violations.push(Violation::NotAdjacent {
                            index,
                            gate,
                            pa,
                            pb,
                        });
                    }
                    scheduler.mark_executed(gate);
                }
            }
        }

        if let Err(CompileError::DependencyCycle { gate, remaining }) = scheduler.ensure_drained() {
            report.violations.push(Violation::Incomplete {
                remaining,
                first: gate,
            });
        }

        report.final_mapping = mapping.images().to_vec();
        debug!(
            cnots = report.cnot_count,
            swaps = report.swap_count,
            violations = report.violations.len(),
            "replay complete"
        );
        report
    }

    /// Parse and replay a solution in the text format.
    ///
    /// Text-level errors become violations.
    pub fn verify_text(&self, text: &str) -> VerificationReport {
        match parse_solution(text, self.instance.num_logical()) {
            Ok(solution) => self.verify(&solution),
            Err(ParseError::UnknownOperation { line, tag }) => {
                VerificationReport::rejected(Violation::UnknownOperation { line, tag })
            }
            Err(
                err @ (ParseError::DuplicateMapping { .. } | ParseError::MappingOutOfRange { .. }),
            ) => VerificationReport::rejected(Violation::InvalidMapping {
                reason: err.to_string(),
            }),
            Err(err) => VerificationReport::rejected(Violation::Malformed {
                message: err.to_string(),
            }),
        }
    }

    fn initial_mapping(&self, solution: &Solution) -> Result<QubitMapping, Violation> {
        let expected = self.instance.num_physical() as usize;
        if solution.initial_mapping.len() != expected {
            return Err(Violation::InvalidMapping {
                reason: format!(
                    "{} qubits mapped, expected {expected}",
                    solution.initial_mapping.len()
                ),
            });
        }
        QubitMapping::from_images(solution.initial_mapping.clone()).map_err(|err| {
            Violation::InvalidMapping {
                reason: err.to_string(),
            }
        })
    }

    /// Find the ready gate a CNOT executes.
    fn match_gate(
        &self,
        scheduler: &DependencyScheduler,
        index: usize,
        a: LogicalQubit,
        b: LogicalQubit,
    ) -> Result<GateId, Violation> {
        let Some(gates) = self.by_pair.get(&normalize(a, b)) else {
            return Err(Violation::UnknownGate { index, a, b });
        };
        if let Some(&gate) = gates.iter().find(|&&g| scheduler.is_ready(g)) {
            return Ok(gate);
        }
        match gates.iter().find(|&&g| !scheduler.is_executed(g)) {
            Some(&gate) => Err(Violation::NotReady {
                index,
                gate,
                ready: scheduler.ready_gates(),
            }),
            None => Err(Violation::AlreadyConsumed {
                index,
                gate: gates[gates.len() - 1],
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qroute_ir::Gate;

    fn l(i: u32) -> LogicalQubit {
        LogicalQubit(i)
    }

    fn p(i: u32) -> PhysicalQubit {
        PhysicalQubit(i)
    }

    /// Line 0-1-2 with g0 = {0, 1} -> g1 = {1, 2}.
    fn instance() -> Instance {
        let mut instance = Instance::new(3);
        let g0 = instance.add_gate(Gate::new(l(0), l(1)).unwrap());
        let g1 = instance.add_gate(Gate::new(l(1), l(2)).unwrap());
        instance.add_dependency(g0, g1);
        instance.add_link(p(0), p(1));
        instance.add_link(p(1), p(2));
        instance
    }

    fn identity() -> Vec<PhysicalQubit> {
        vec![p(0), p(1), p(2)]
    }

    #[test]
    fn test_valid_stream() {
        let instance = instance();
        let verifier = ReplayVerifier::new(&instance).unwrap();
        let solution = Solution::new(
            identity(),
            vec![Operation::Cnot(l(1), l(0)), Operation::Cnot(l(1), l(2))],
        );
        let report = verifier.verify(&solution);
        assert!(report.is_valid(), "{:?}", report.violations);
        assert_eq!(report.cnot_count, 2);
        assert_eq!(report.final_mapping, identity());
    }

    #[test]
    fn test_not_ready() {
        let instance = instance();
        let verifier = ReplayVerifier::new(&instance).unwrap();
        let solution = Solution::new(
            identity(),
            vec![Operation::Cnot(l(1), l(2)), Operation::Cnot(l(0), l(1))],
        );
        let report = verifier.verify(&solution);
        assert_eq!(
            report.violations[0],
            Violation::NotReady {
                index: 0,
                gate: GateId(1),
                ready: vec![GateId(0)],
            }
        );
        assert!(matches!(
            report.violations[1],
            Violation::Incomplete { remaining: 1, first: GateId(1) }
        ));
    }

    #[test]
    fn test_not_adjacent_after_swap() {
        let instance = instance();
        let verifier = ReplayVerifier::new(&instance).unwrap();
        // After swapping 1 and 2, logical 0 and 1 sit on p0 and p2.
        let solution = Solution::new(
            identity(),
            vec![Operation::Swap(l(1), l(2)), Operation::Cnot(l(0), l(1))],
        );
        let report = verifier.verify(&solution);
        assert_eq!(report.swap_count, 1);
        assert_eq!(
            report.violations[0],
            Violation::NotAdjacent {
                index: 1,
                gate: GateId(0),
                pa: p(0),
                pb: p(2),
            }
        );
        assert_eq!(report.final_mapping, vec![p(0), p(2), p(1)]);
    }

    #[test]
    fn test_unknown_gate_and_qubit() {
        let instance = instance();
        let verifier = ReplayVerifier::new(&instance).unwrap();
        let solution = Solution::new(
            identity(),
            vec![Operation::Cnot(l(0), l(2)), Operation::Swap(l(0), l(7))],
        );
        let report = verifier.verify(&solution);
        assert!(matches!(report.violations[0], Violation::UnknownGate { index: 0, .. }));
        assert!(matches!(
            report.violations[1],
            Violation::UnknownQubit { index: 1, qubit } if qubit == l(7)
        ));
    }

    #[test]
    fn test_invalid_initial_mapping() {
        let instance = instance();
        let verifier = ReplayVerifier::new(&instance).unwrap();
        let report = verifier.verify(&Solution::new(vec![p(0), p(0), p(2)], vec![]));
        assert!(matches!(report.violations[..], [Violation::InvalidMapping { .. }]));

        let report = verifier.verify(&Solution::new(vec![p(0), p(1)], vec![]));
        assert!(matches!(report.violations[..], [Violation::InvalidMapping { .. }]));
    }

    #[test]
    fn test_verify_text() {
        let instance = instance();
        let verifier = ReplayVerifier::new(&instance).unwrap();

        let report = verifier.verify_text("1 1\n2 2\n3 3\nCNOT q1 q2\nCNOT q2 q3\n");
        assert!(report.is_valid());

        let report = verifier.verify_text("1 1\n2 2\n3 3\nCNOT q1 q2\nTOFFOLI q1 q2\n");
        assert_eq!(
            report.violations,
            vec![Violation::UnknownOperation {
                line: 5,
                tag: "TOFFOLI".into()
            }]
        );

        let report = verifier.verify_text("1 1\n1 2\n3 3\n");
        assert!(matches!(report.violations[..], [Violation::InvalidMapping { .. }]));

        let report = verifier.verify_text("1 1\n2");
        assert!(matches!(report.violations[..], [Violation::Malformed { .. }]));
    }

    #[test]
    fn test_violation_display() {
        let violation = Violation::NotReady {
            index: 3,
            gate: GateId(2),
            ready: vec![GateId(0), GateId(1)],
        };
        assert_eq!(
            violation.to_string(),
            "Operation 3: gate g2 not ready (ready: g0, g1)"
        );
    }
}
