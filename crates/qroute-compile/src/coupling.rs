//! Device coupling graph.

use qroute_ir::{Instance, IrError, PhysicalQubit};

use crate::error::CompileResult;

/// Undirected coupling graph over physical qubits.
///
/// Adjacency is dense, indexed by physical qubit, and kept in insertion
/// order. Duplicate edges (including reversed pairs) and self-loops are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CouplingGraph {
    /// Neighbors of each physical qubit.
    adjacency: Vec<Vec<PhysicalQubit>>,
    /// Distinct edges in insertion order.
    edges: Vec<(PhysicalQubit, PhysicalQubit)>,
}

impl CouplingGraph {
    /// Create a graph with `num_qubits` isolated qubits.
    pub fn new(num_qubits: u32) -> Self {
        Self {
            adjacency: vec![Vec::new(); num_qubits as usize],
            edges: Vec::new(),
        }
    }

    /// Build a graph from an explicit edge list.
    pub fn from_edges(
        num_qubits: u32,
        edges: impl IntoIterator<Item = (PhysicalQubit, PhysicalQubit)>,
    ) -> CompileResult<Self> {
        let mut graph = Self::new(num_qubits);
        for (p, q) in edges {
            graph.add_edge(p, q)?;
        }
        Ok(graph)
    }

    /// Build the coupling graph of an instance.
    pub fn from_instance(instance: &Instance) -> CompileResult<Self> {
        Self::from_edges(instance.num_physical(), instance.links().iter().copied())
    }

    /// Add an undirected edge.
    ///
    /// Returns an error if either endpoint is out of range.
    pub fn add_edge(&mut self, p: PhysicalQubit, q: PhysicalQubit) -> CompileResult<()> {
        for qubit in [p, q] {
            if qubit.index() >= self.adjacency.len() {
                return Err(IrError::PhysicalOutOfRange {
                    qubit,
                    num_physical: self.num_qubits(),
                }
                .into());
            }
        }
        self.insert(p, q);
        Ok(())
    }

    fn insert(&mut self, p: PhysicalQubit, q: PhysicalQubit) {
        if p == q || self.adjacency[p.index()].contains(&q) {
            return;
        }
        self.adjacency[p.index()].push(q);
        self.adjacency[q.index()].push(p);
        self.edges.push((p, q));
    }

    /// Number of physical qubits.
    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub fn num_qubits(&self) -> u32 {
        self.adjacency.len() as u32
    }

    /// Distinct edges in insertion order.
    pub fn edges(&self) -> &[(PhysicalQubit, PhysicalQubit)] {
        &self.edges
    }

    /// Neighbors of a physical qubit.
    #[inline]
    pub fn neighbors(&self, p: PhysicalQubit) -> &[PhysicalQubit] {
        self.adjacency.get(p.index()).map_or(&[], Vec::as_slice)
    }

    /// Check if two physical qubits share an edge.
    #[inline]
    pub fn are_adjacent(&self, p: PhysicalQubit, q: PhysicalQubit) -> bool {
        self.neighbors(p).contains(&q)
    }

    /// Create a linear coupling graph (0-1-2-3-...).
    pub fn linear(n: u32) -> Self {
        let mut graph = Self::new(n);
        for i in 0..n.saturating_sub(1) {
            graph.insert(PhysicalQubit(i), PhysicalQubit(i + 1));
        }
        graph
    }

    /// Create a ring (a line closed back onto qubit 0).
    pub fn ring(n: u32) -> Self {
        let mut graph = Self::linear(n);
        if n > 2 {
            graph.insert(PhysicalQubit(n - 1), PhysicalQubit(0));
        }
        graph
    }

    /// Create a star topology (qubit 0 connected to all others).
    pub fn star(n: u32) -> Self {
        let mut graph = Self::new(n);
        for i in 1..n {
            graph.insert(PhysicalQubit(0), PhysicalQubit(i));
        }
        graph
    }

    /// Create a fully connected coupling graph.
    pub fn full(n: u32) -> Self {
        let mut graph = Self::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                graph.insert(PhysicalQubit(i), PhysicalQubit(j));
            }
        }
        graph
    }
}
