//! Dependency-driven gate scheduling.

use petgraph::algo::toposort;
use petgraph::graph::DiGraph;

use qroute_ir::{DependencyEdge, GateId, IrError};

use crate::error::{CompileError, CompileResult};

/// Tracks which gates may execute next.
///
/// A gate is ready once every producer it depends on has executed. Each gate
/// moves Pending -> Ready -> Executed exactly once.
#[derive(Debug, Clone)]
pub struct DependencyScheduler {
    edges: Vec<DependencyEdge>,
    successors: Vec<Vec<GateId>>,
    in_degree: Vec<u32>,
    executed: Vec<bool>,
    remaining: usize,
}

impl DependencyScheduler {
    /// Build a scheduler over `num_gates` gates.
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(num_gates: usize, edges: &[DependencyEdge]) -> CompileResult<Self> {
        let mut successors = vec![Vec::new(); num_gates];
        let mut in_degree = vec![0; num_gates];

        for edge in edges {
            for gate in [edge.producer, edge.consumer] {
                if gate.index() >= num_gates {
                    return Err(IrError::GateOutOfRange {
                        gate,
                        num_gates: num_gates as u32,
                    }
                    .into());
                }
            }
            if edge.producer == edge.consumer {
                return Err(IrError::SelfDependency(edge.producer).into());
            }
            successors[edge.producer.index()].push(edge.consumer);
            in_degree[edge.consumer.index()] += 1;
        }

        Ok(Self {
            edges: edges.to_vec(),
            successors,
            in_degree,
            executed: vec![false; num_gates],
            remaining: num_gates,
        })
    }

    /// Reject cyclic dependency graphs before any routing starts.
    #[allow(clippy::cast_possible_truncation)]
    pub fn check_acyclic(num_gates: usize, edges: &[DependencyEdge]) -> CompileResult<()> {
        let mut graph: DiGraph<(), ()> = DiGraph::with_capacity(num_gates, edges.len());
        let nodes: Vec<_> = (0..num_gates).map(|_| graph.add_node(())).collect();
        for edge in edges {
            let (Some(&u), Some(&v)) = (
                nodes.get(edge.producer.index()),
                nodes.get(edge.consumer.index()),
            ) else {
                return Err(IrError::GateOutOfRange {
                    gate: edge.producer.max(edge.consumer),
                    num_gates: num_gates as u32,
                }
                .into());
            };
            graph.add_edge(u, v, ());
        }

        toposort(&graph, None)
            .map(|_| ())
            .map_err(|cycle| CompileError::DependencyCycle {
                gate: GateId(cycle.node_id().index() as u32),
                remaining: num_gates,
            })
    }

    /// A fresh scheduler over the same gates with every edge reversed.
    pub fn reversed(&self) -> CompileResult<Self> {
        let edges: Vec<_> = self.edges.iter().map(|e| e.reversed()).collect();
        Self::new(self.executed.len(), &edges)
    }

    /// Gates that are ready and not yet executed, in id order.
    #[allow(clippy::cast_possible_truncation)]
    pub fn ready_gates(&self) -> Vec<GateId> {
        (0..self.executed.len())
            .filter(|&i| !self.executed[i] && self.in_degree[i] == 0)
            .map(|i| GateId(i as u32))
            .collect()
    }

    /// Mark a ready gate executed and return the gates that just became ready.
    ///
    /// Marking a gate twice is a no-op.
    pub fn mark_executed(&mut self, gate: GateId) -> Vec<GateId> {
        let idx = gate.index();
        debug_assert!(self.in_degree[idx] == 0, "{gate} executed before its producers");
        if self.executed[idx] {
            return Vec::new();
        }
        self.executed[idx] = true;
        self.remaining -= 1;

        let mut newly_ready = Vec::new();
        for &next in &self.successors[idx] {
            let degree = &mut self.in_degree[next.index()];
            *degree -= 1;
            if *degree == 0 {
                newly_ready.push(next);
            }
        }
        newly_ready
    }

    /// Number of unexecuted producers a gate is still waiting on.
    #[inline]
    pub fn in_degree(&self, gate: GateId) -> u32 {
        self.in_degree[gate.index()]
    }

    /// Gates that depend directly on `gate`.
    #[inline]
    pub fn successors(&self, gate: GateId) -> &[GateId] {
        &self.successors[gate.index()]
    }

    /// Check if a gate has executed.
    #[inline]
    pub fn is_executed(&self, gate: GateId) -> bool {
        self.executed[gate.index()]
    }

    /// Check if a gate may execute now.
    #[inline]
    pub fn is_ready(&self, gate: GateId) -> bool {
        !self.is_executed(gate) && self.in_degree(gate) == 0
    }

    /// Number of gates not yet executed.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Number of gates tracked.
    pub fn num_gates(&self) -> usize {
        self.executed.len()
    }

    /// Fail if any gate was never executed.
    ///
    /// Once the ready queue is empty, a leftover gate can only be waiting on
    /// a cycle.
    #[allow(clippy::cast_possible_truncation)]
    pub fn ensure_drained(&self) -> CompileResult<()> {
        match self.executed.iter().position(|&done| !done) {
            None => Ok(()),
            Some(idx) => Err(CompileError::DependencyCycle {
                gate: GateId(idx as u32),
                remaining: self.remaining,
            }),
        }
    }
}
