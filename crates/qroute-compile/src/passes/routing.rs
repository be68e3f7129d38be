//! Greedy SWAP insertion with bounded lookahead.
//!
//! The engine keeps two work lists: `check_queue`, the ready gates not yet
//! tested for adjacency, and `blocked`, the ready gates whose operands are
//! not adjacent under the current mapping. Each step drains `check_queue`,
//! then commits the single swap that most reduces the distance of blocked
//! gates (with their almost-ready successors weighted in), and requeues every
//! blocked gate the swap made adjacent.
//!
//! Candidates are scored against an immutable view of the mapping, sorted by
//! normalized logical pair, and the first strictly minimal score wins, so a
//! run is fully deterministic.

use std::collections::VecDeque;

use tracing::{debug, trace};

use qroute_ir::{Gate, GateId, LogicalQubit, Operation, PhysicalQubit, Solution, gate::normalize};

use crate::config::RoutingConfig;
use crate::coupling::CouplingGraph;
use crate::distance::{DistanceTable, UNREACHABLE};
use crate::error::{CompileError, CompileResult};
use crate::mapping::QubitMapping;
use crate::scheduler::DependencyScheduler;

type SwapPair = (LogicalQubit, LogicalQubit);

/// Result of one routing pass.
#[derive(Debug, Clone)]
pub struct RoutingOutcome {
    /// Mapping before the first operation.
    pub initial_mapping: QubitMapping,
    /// Mapping after the last operation.
    pub final_mapping: QubitMapping,
    /// Emitted operations in execution order.
    pub operations: Vec<Operation>,
    /// Number of times the release valve forced a gate through.
    pub forced_releases: usize,
}

impl RoutingOutcome {
    /// Number of emitted swaps.
    pub fn swap_count(&self) -> usize {
        self.operations.iter().filter(|op| op.is_swap()).count()
    }

    /// Number of emitted CNOTs.
    pub fn cnot_count(&self) -> usize {
        self.operations.iter().filter(|op| op.is_cnot()).count()
    }

    /// Convert into the output artifact.
    pub fn into_solution(self) -> Solution {
        Solution::new(self.initial_mapping.images().to_vec(), self.operations)
    }
}

/// The routing heuristic over a fixed device and circuit.
///
/// The engine only borrows its inputs; each [`run`](Self::run) owns its own
/// scheduler and mapping, so one engine can drive several passes.
#[derive(Debug, Clone, Copy)]
pub struct RoutingEngine<'a> {
    graph: &'a CouplingGraph,
    distances: &'a DistanceTable,
    gates: &'a [Gate],
    config: &'a RoutingConfig,
}

/// Mutable state of a single run.
struct RunState {
    scheduler: DependencyScheduler,
    mapping: QubitMapping,
    check_queue: VecDeque<GateId>,
    blocked: Vec<GateId>,
    operations: Vec<Operation>,
    /// Recently committed swaps, newest last.
    recent: VecDeque<SwapPair>,
    /// Swaps committed since a blocked gate last became adjacent.
    speculative: Vec<SwapPair>,
    /// Length of `operations` before the first speculative swap.
    checkpoint: usize,
    forced_releases: usize,
}

impl<'a> RoutingEngine<'a> {
    /// Create an engine.
    pub fn new(
        graph: &'a CouplingGraph,
        distances: &'a DistanceTable,
        gates: &'a [Gate],
        config: &'a RoutingConfig,
    ) -> Self {
        Self {
            graph,
            distances,
            gates,
            config,
        }
    }

    /// The coupling graph being routed on.
    pub fn graph(&self) -> &'a CouplingGraph {
        self.graph
    }

    /// The gates being routed.
    pub fn gates(&self) -> &'a [Gate] {
        self.gates
    }

    /// Route every gate of `scheduler` starting from `initial`.
    pub fn run(
        &self,
        scheduler: DependencyScheduler,
        initial: QubitMapping,
    ) -> CompileResult<RoutingOutcome> {
        if initial.len() != self.graph.num_qubits() as usize {
            return Err(CompileError::InvalidMapping(format!(
                "mapping covers {} qubits but the device has {}",
                initial.len(),
                self.graph.num_qubits()
            )));
        }
        self.check_reachable(&initial)?;

        let mut state = RunState {
            check_queue: scheduler.ready_gates().into(),
            scheduler,
            mapping: initial.clone(),
            blocked: Vec::new(),
            operations: Vec::with_capacity(self.gates.len()),
            recent: VecDeque::new(),
            speculative: Vec::new(),
            checkpoint: 0,
            forced_releases: 0,
        };

        loop {
            self.drain(&mut state);
            if state.blocked.is_empty() {
                break;
            }

            if state.speculative.len() >= self.config.attempt_limit as usize {
                self.release(&mut state)?;
                continue;
            }

            let swap = self.choose_swap(&state)?;
            if state.speculative.is_empty() {
                state.checkpoint = state.operations.len();
            }
            self.commit(&mut state, swap);
            state.speculative.push(swap);

            if self.promote_adjacent(&mut state) {
                state.speculative.clear();
            }
        }

        state.scheduler.ensure_drained()?;

        Ok(RoutingOutcome {
            initial_mapping: initial,
            final_mapping: state.mapping,
            operations: state.operations,
            forced_releases: state.forced_releases,
        })
    }

    /// Fail fast on gates whose operands can never meet.
    ///
    /// Swaps only move qubits along edges, so components never change and
    /// checking the initial mapping covers the whole run.
    #[allow(clippy::cast_possible_truncation)]
    fn check_reachable(&self, mapping: &QubitMapping) -> CompileResult<()> {
        for (i, gate) in self.gates.iter().enumerate() {
            let (pa, pb) = (mapping.physical_of(gate.a()), mapping.physical_of(gate.b()));
            if !self.distances.is_reachable(pa, pb) {
                return Err(CompileError::UnreachablePair {
                    gate: GateId(i as u32),
                    a: gate.a(),
                    b: gate.b(),
                    pa,
                    pb,
                });
            }
        }
        Ok(())
    }

    fn gate(&self, id: GateId) -> &'a Gate {
        &self.gates[id.index()]
    }

    fn is_adjacent(&self, mapping: &QubitMapping, id: GateId) -> bool {
        let gate = self.gate(id);
        self.graph
            .are_adjacent(mapping.physical_of(gate.a()), mapping.physical_of(gate.b()))
    }

    /// Emit every queued gate that is already adjacent; park the rest.
    fn drain(&self, state: &mut RunState) {
        while let Some(id) = state.check_queue.pop_front() {
            if self.is_adjacent(&state.mapping, id) {
                state.operations.push(Operation::cnot(self.gate(id)));
                let ready = state.scheduler.mark_executed(id);
                state.check_queue.extend(ready);
            } else {
                state.blocked.push(id);
            }
        }
    }

    /// Move blocked gates that became adjacent back to the check queue.
    fn promote_adjacent(&self, state: &mut RunState) -> bool {
        let before = state.check_queue.len();
        state.blocked.retain(|&id| {
            if self.is_adjacent(&state.mapping, id) {
                state.check_queue.push_back(id);
                false
            } else {
                true
            }
        });
        state.check_queue.len() > before
    }

    fn commit(&self, state: &mut RunState, (a, b): SwapPair) {
        state.mapping.swap(a, b);
        state.operations.push(Operation::Swap(a, b));
        if self.config.tabu_window > 0 {
            state.recent.push_back((a, b));
            if state.recent.len() > self.config.tabu_window as usize {
                state.recent.pop_front();
            }
        }
    }

    /// Successors of blocked gates that are one executed producer away from
    /// becoming ready.
    fn lookahead(&self, state: &RunState) -> Vec<GateId> {
        let mut gates: Vec<GateId> = state
            .blocked
            .iter()
            .flat_map(|&id| state.scheduler.successors(id))
            .copied()
            .filter(|&next| state.scheduler.in_degree(next) == 1)
            .collect();
        gates.sort_unstable();
        gates.dedup();
        gates
    }

    /// Swaps that move an endpoint of a blocked gate onto a neighbor.
    fn candidates(&self, state: &RunState) -> Vec<SwapPair> {
        let mut swaps = Vec::new();
        for &id in &state.blocked {
            for l in self.gate(id).qubits() {
                let p = state.mapping.physical_of(l);
                for &n in self.graph.neighbors(p) {
                    swaps.push(normalize(l, state.mapping.logical_of(n)));
                }
            }
        }
        swaps.sort_unstable();
        swaps.dedup();
        swaps
    }

    /// Distance between a gate's operands with `swap` applied hypothetically.
    fn swapped_distance(&self, mapping: &QubitMapping, id: GateId, (x, y): SwapPair) -> u32 {
        let image = |l: LogicalQubit| -> PhysicalQubit {
            if l == x {
                mapping.physical_of(y)
            } else if l == y {
                mapping.physical_of(x)
            } else {
                mapping.physical_of(l)
            }
        };
        let gate = self.gate(id);
        self.distances.distance(image(gate.a()), image(gate.b()))
    }

    fn score(&self, state: &RunState, lookahead: &[GateId], swap: SwapPair) -> f64 {
        let total = |gates: &[GateId]| -> f64 {
            let mut sum = 0.0;
            for &id in gates {
                let d = self.swapped_distance(&state.mapping, id, swap);
                if d == UNREACHABLE {
                    return f64::INFINITY;
                }
                sum += f64::from(d);
            }
            sum
        };
        total(&state.blocked) + self.config.lookahead_weight * total(lookahead)
    }

    fn choose_swap(&self, state: &RunState) -> CompileResult<SwapPair> {
        let lookahead = self.lookahead(state);
        let mut candidates = self.candidates(state);
        if !state.recent.is_empty() {
            let allowed: Vec<_> = candidates
                .iter()
                .copied()
                .filter(|swap| !state.recent.contains(swap))
                .collect();
            if !allowed.is_empty() {
                candidates = allowed;
            }
        }

        let mut best: Option<(SwapPair, f64)> = None;
        for swap in candidates {
            let score = self.score(state, &lookahead, swap);
            if best.is_none_or(|(_, min)| score < min) {
                best = Some((swap, score));
            }
        }

        match best {
            Some((swap, score)) if score.is_finite() => {
                trace!(a = %swap.0, b = %swap.1, score, "swap");
                Ok(swap)
            }
            _ => Err(CompileError::HeuristicExhausted {
                blocked: state.blocked.len(),
            }),
        }
    }

    /// Undo the swaps that made no progress and walk the closest blocked
    /// gate together along a shortest path.
    fn release(&self, state: &mut RunState) -> CompileResult<()> {
        let unwound = state.speculative.len();
        while let Some((a, b)) = state.speculative.pop() {
            state.mapping.swap(a, b);
        }
        state.operations.truncate(state.checkpoint);
        state.recent.clear();

        let closest = state
            .blocked
            .iter()
            .enumerate()
            .min_by_key(|&(_, &id)| {
                let gate = self.gate(id);
                self.distances.distance(
                    state.mapping.physical_of(gate.a()),
                    state.mapping.physical_of(gate.b()),
                )
            })
            .map(|(pos, _)| pos);
        let Some(pos) = closest else {
            return Ok(());
        };
        let id = state.blocked.remove(pos);
        let gate = self.gate(id);

        loop {
            let (pa, pb) = (
                state.mapping.physical_of(gate.a()),
                state.mapping.physical_of(gate.b()),
            );
            if self.graph.are_adjacent(pa, pb) {
                break;
            }
            let hop = self
                .distances
                .next_hop(self.graph, pa, pb)
                .ok_or(CompileError::HeuristicExhausted {
                    blocked: state.blocked.len() + 1,
                })?;
            let swap = normalize(gate.a(), state.mapping.logical_of(hop));
            self.commit(state, swap);
        }

        state.check_queue.push_back(id);
        self.promote_adjacent(state);
        state.forced_releases += 1;
        debug!(gate = %id, unwound, "release valve forced a blocked gate through");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qroute_ir::DependencyEdge;

    fn gate(a: u32, b: u32) -> Gate {
        Gate::new(LogicalQubit(a), LogicalQubit(b)).unwrap()
    }

    fn run(
        graph: &CouplingGraph,
        gates: &[Gate],
        edges: &[DependencyEdge],
        config: &RoutingConfig,
    ) -> CompileResult<RoutingOutcome> {
        let distances = DistanceTable::new(graph);
        let engine = RoutingEngine::new(graph, &distances, gates, config);
        let scheduler = DependencyScheduler::new(gates.len(), edges)?;
        engine.run(scheduler, QubitMapping::identity(graph.num_qubits()))
    }

    fn blocked_state(scheduler: DependencyScheduler, n: u32, blocked: Vec<GateId>) -> RunState {
        RunState {
            scheduler,
            mapping: QubitMapping::identity(n),
            check_queue: VecDeque::new(),
            blocked,
            operations: Vec::new(),
            recent: VecDeque::new(),
            speculative: Vec::new(),
            checkpoint: 0,
            forced_releases: 0,
        }
    }

    #[test]
    fn test_lookahead_takes_single_producer_successors() {
        let graph = CouplingGraph::linear(4);
        let distances = DistanceTable::new(&graph);
        let gates = [gate(0, 2), gate(1, 2), gate(2, 3), gate(0, 3)];
        // g1 waits on g0 alone; g2 waits on both g0 and g3.
        let edges = [
            DependencyEdge::new(GateId(0), GateId(1)),
            DependencyEdge::new(GateId(0), GateId(2)),
            DependencyEdge::new(GateId(3), GateId(2)),
        ];
        let config = RoutingConfig::default();
        let engine = RoutingEngine::new(&graph, &distances, &gates, &config);
        let scheduler = DependencyScheduler::new(gates.len(), &edges).unwrap();

        let state = blocked_state(scheduler, 4, vec![GateId(0), GateId(3)]);
        assert_eq!(engine.lookahead(&state), vec![GateId(1)]);
    }

    #[test]
    fn test_lookahead_breaks_tie() {
        // Swapping {0,1} or {1,2} both make g0 adjacent; only {1,2} also
        // makes its successor g1 adjacent.
        let gates = [gate(0, 2), gate(1, 2)];
        let edges = [DependencyEdge::new(GateId(0), GateId(1))];
        let route = |lookahead_weight: f64| {
            let config = RoutingConfig {
                lookahead_weight,
                ..RoutingConfig::default()
            };
            run(&CouplingGraph::linear(3), &gates, &edges, &config).unwrap()
        };

        let blind = route(0.0);
        assert_eq!(
            blind.operations[0],
            Operation::Swap(LogicalQubit(0), LogicalQubit(1))
        );
        assert_eq!(blind.swap_count(), 2);

        let ahead = route(0.5);
        assert_eq!(
            ahead.operations[0],
            Operation::Swap(LogicalQubit(1), LogicalQubit(2))
        );
        assert_eq!(ahead.swap_count(), 1);
        assert_eq!(ahead.cnot_count(), 2);
    }

    #[test]
    fn test_adjacent_gates_need_no_swaps() {
        let outcome = run(
            &CouplingGraph::linear(4),
            &[gate(0, 1), gate(2, 3)],
            &[],
            &RoutingConfig::default(),
        )
        .unwrap();
        assert_eq!(outcome.swap_count(), 0);
        assert_eq!(outcome.cnot_count(), 2);
        assert_eq!(outcome.final_mapping, QubitMapping::identity(4));
    }

    #[test]
    fn test_single_swap_on_line() {
        let outcome = run(
            &CouplingGraph::linear(3),
            &[gate(0, 2)],
            &[],
            &RoutingConfig::default(),
        )
        .unwrap();
        // Both candidates tie; the lower pair wins.
        assert_eq!(
            outcome.operations,
            vec![
                Operation::Swap(LogicalQubit(0), LogicalQubit(1)),
                Operation::Cnot(LogicalQubit(0), LogicalQubit(2)),
            ]
        );
    }

    #[test]
    fn test_dependencies_respected() {
        // g1 waits on g0 even though it is adjacent from the start.
        let outcome = run(
            &CouplingGraph::linear(4),
            &[gate(0, 3), gate(1, 2)],
            &[DependencyEdge::new(GateId(0), GateId(1))],
            &RoutingConfig::default(),
        )
        .unwrap();
        let cnots: Vec<_> = outcome
            .operations
            .iter()
            .filter(|op| op.is_cnot())
            .collect();
        assert_eq!(cnots.len(), 2);
        assert_eq!(cnots[0].pair(), (LogicalQubit(0), LogicalQubit(3)));
    }

    #[test]
    fn test_unreachable_pair_is_fatal() {
        let graph = CouplingGraph::from_edges(
            4,
            [
                (PhysicalQubit(0), PhysicalQubit(1)),
                (PhysicalQubit(2), PhysicalQubit(3)),
            ],
        )
        .unwrap();
        let err = run(&graph, &[gate(0, 3)], &[], &RoutingConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            CompileError::UnreachablePair {
                gate: GateId(0),
                ..
            }
        ));
    }

    #[test]
    fn test_cycle_reported_when_not_drained() {
        let edges = [
            DependencyEdge::new(GateId(0), GateId(1)),
            DependencyEdge::new(GateId(1), GateId(0)),
        ];
        let err = run(
            &CouplingGraph::linear(3),
            &[gate(0, 1), gate(1, 2)],
            &edges,
            &RoutingConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CompileError::DependencyCycle { .. }));
    }

    #[test]
    fn test_release_valve_forces_progress() {
        // With a single attempt, every non-progressing swap is unwound and the
        // gate is walked along the line instead.
        let config = RoutingConfig {
            attempt_limit: 1,
            ..RoutingConfig::default()
        };
        let outcome = run(&CouplingGraph::linear(6), &[gate(0, 5)], &[], &config).unwrap();
        assert_eq!(outcome.cnot_count(), 1);
        assert_eq!(outcome.swap_count(), 4);
        assert_eq!(outcome.forced_releases, 1);
        let last = outcome.operations.last().unwrap();
        assert_eq!(last.pair(), (LogicalQubit(0), LogicalQubit(5)));
    }

    #[test]
    fn test_tabu_window_still_routes() {
        let config = RoutingConfig {
            tabu_window: 2,
            ..RoutingConfig::default()
        };
        let outcome = run(
            &CouplingGraph::ring(6),
            &[gate(0, 3), gate(1, 4), gate(2, 5)],
            &[],
            &config,
        )
        .unwrap();
        assert_eq!(outcome.cnot_count(), 3);
    }

    #[test]
    fn test_mapping_size_mismatch() {
        let graph = CouplingGraph::linear(3);
        let distances = DistanceTable::new(&graph);
        let config = RoutingConfig::default();
        let gates = [gate(0, 1)];
        let engine = RoutingEngine::new(&graph, &distances, &gates, &config);
        let scheduler = DependencyScheduler::new(1, &[]).unwrap();
        assert!(matches!(
            engine.run(scheduler, QubitMapping::identity(2)),
            Err(CompileError::InvalidMapping(_))
        ));
    }
}
