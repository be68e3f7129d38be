//! All-pairs distance oracle over a coupling graph.

use std::collections::VecDeque;

use qroute_ir::PhysicalQubit;

use crate::coupling::CouplingGraph;

/// Sentinel for pairs with no connecting path.
pub const UNREACHABLE: u32 = u32::MAX;

/// Precomputed shortest-path distances between physical qubits.
///
/// Built by BFS from every qubit, O(V·(V+E)). The flat `n×n` layout makes
/// every lookup a single index. Paths are not stored; [`next_hop`] recovers
/// them one step at a time from the distances and the graph.
///
/// [`next_hop`]: Self::next_hop
#[derive(Debug, Clone)]
pub struct DistanceTable {
    n: usize,
    /// `dist[from * n + to]`.
    dist: Vec<u32>,
}

impl DistanceTable {
    /// Build the table for a coupling graph.
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(graph: &CouplingGraph) -> Self {
        let n = graph.num_qubits() as usize;
        let mut dist = vec![UNREACHABLE; n * n];
        let mut queue = VecDeque::new();

        for src in 0..n {
            let row = src * n;
            dist[row + src] = 0;
            queue.push_back(src);

            while let Some(current) = queue.pop_front() {
                for neighbor in graph.neighbors(PhysicalQubit(current as u32)) {
                    let nb = neighbor.index();
                    if dist[row + nb] == UNREACHABLE {
                        dist[row + nb] = dist[row + current] + 1;
                        queue.push_back(nb);
                    }
                }
            }
        }

        Self { n, dist }
    }

    /// Number of physical qubits covered.
    pub fn num_qubits(&self) -> usize {
        self.n
    }

    /// Shortest-path distance, or [`UNREACHABLE`].
    #[inline]
    pub fn distance(&self, p: PhysicalQubit, q: PhysicalQubit) -> u32 {
        let (p, q) = (p.index(), q.index());
        if p >= self.n || q >= self.n {
            return UNREACHABLE;
        }
        self.dist[p * self.n + q]
    }

    /// Check if a path exists between two qubits.
    #[inline]
    pub fn is_reachable(&self, p: PhysicalQubit, q: PhysicalQubit) -> bool {
        self.distance(p, q) != UNREACHABLE
    }

    /// Check if every pair of qubits is reachable.
    pub fn is_connected(&self) -> bool {
        !self.dist.contains(&UNREACHABLE)
    }

    /// A neighbor of `p` that is one step closer to `q`.
    ///
    /// `graph` must be the graph the table was built from. Returns `None`
    /// when `p == q` or no path exists; ties go to the lowest-indexed neighbor.
    pub fn next_hop(
        &self,
        graph: &CouplingGraph,
        p: PhysicalQubit,
        q: PhysicalQubit,
    ) -> Option<PhysicalQubit> {
        let d = self.distance(p, q);
        if p == q || d == UNREACHABLE {
            return None;
        }
        graph
            .neighbors(p)
            .iter()
            .copied()
            .find(|&n| self.distance(n, q) == d - 1)
    }
}
