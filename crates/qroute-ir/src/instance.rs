//! Routing problem instances.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, GateId};
use crate::qubit::{LogicalQubit, PhysicalQubit};

/// A dependency edge: `consumer` may only execute after `producer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// Gate that must execute first.
    pub producer: GateId,
    /// Gate that waits on the producer.
    pub consumer: GateId,
}

impl DependencyEdge {
    /// Create a new dependency edge.
    pub fn new(producer: GateId, consumer: GateId) -> Self {
        Self { producer, consumer }
    }

    /// The same edge pointing the other way.
    #[must_use]
    pub fn reversed(self) -> Self {
        Self {
            producer: self.consumer,
            consumer: self.producer,
        }
    }
}

/// A complete routing problem: circuit gates, their dependencies and the
/// device coupling links.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    num_logical: u32,
    num_physical: u32,
    gates: Vec<Gate>,
    dependencies: Vec<DependencyEdge>,
    links: Vec<(PhysicalQubit, PhysicalQubit)>,
}

impl Instance {
    /// Create an empty instance with `num_qubits` logical and physical qubits.
    pub fn new(num_qubits: u32) -> Self {
        Self::with_sizes(num_qubits, num_qubits)
    }

    /// Create an empty instance with explicit logical and physical sizes.
    ///
    /// Routing requires the two to match; see [`Instance::validate`].
    pub fn with_sizes(num_logical: u32, num_physical: u32) -> Self {
        Self {
            num_logical,
            num_physical,
            ..Self::default()
        }
    }

    /// Append a gate; its identity is its position.
    #[allow(clippy::cast_possible_truncation)]
    pub fn add_gate(&mut self, gate: Gate) -> GateId {
        let id = GateId(self.gates.len() as u32);
        self.gates.push(gate);
        id
    }

    /// Add a dependency edge `producer -> consumer`.
    pub fn add_dependency(&mut self, producer: GateId, consumer: GateId) {
        self.dependencies
            .push(DependencyEdge::new(producer, consumer));
    }

    /// Add an undirected coupling link.
    pub fn add_link(&mut self, p: PhysicalQubit, q: PhysicalQubit) {
        self.links.push((p, q));
    }

    /// Number of logical qubits.
    #[inline]
    pub fn num_logical(&self) -> u32 {
        self.num_logical
    }

    /// Number of physical qubits.
    #[inline]
    pub fn num_physical(&self) -> u32 {
        self.num_physical
    }

    /// Number of gates.
    #[inline]
    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }

    /// All gates, indexed by [`GateId`].
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Look up a gate.
    pub fn gate(&self, id: GateId) -> Option<&Gate> {
        self.gates.get(id.index())
    }

    /// All dependency edges.
    pub fn dependencies(&self) -> &[DependencyEdge] {
        &self.dependencies
    }

    /// All coupling links, as given.
    pub fn links(&self) -> &[(PhysicalQubit, PhysicalQubit)] {
        &self.links
    }

    /// Iterate over `(id, gate)` pairs.
    #[allow(clippy::cast_possible_truncation)]
    pub fn iter_gates(&self) -> impl Iterator<Item = (GateId, &Gate)> + '_ {
        self.gates
            .iter()
            .enumerate()
            .map(|(i, g)| (GateId(i as u32), g))
    }

    /// Check structural well-formedness.
    ///
    /// Checks that:
    /// - logical and physical qubit counts match
    /// - every gate acts on two distinct, in-range logical qubits
    /// - every dependency references existing gates and is not a self edge
    /// - every coupling link joins two distinct, in-range physical qubits
    ///
    /// Acyclicity and connectivity are properties of the routing target and
    /// are checked by the compiler.
    #[allow(clippy::cast_possible_truncation)]
    pub fn validate(&self) -> IrResult<()> {
        if self.num_logical != self.num_physical {
            return Err(IrError::QubitCountMismatch {
                logical: self.num_logical,
                physical: self.num_physical,
            });
        }

        for (id, gate) in self.iter_gates() {
            for qubit in gate.qubits() {
                if qubit.0 >= self.num_logical {
                    return Err(IrError::LogicalOutOfRange {
                        qubit,
                        num_logical: self.num_logical,
                        gate: Some(id),
                    });
                }
            }
            if gate.a() == gate.b() {
                return Err(IrError::DuplicateQubit {
                    qubit: gate.a(),
                    gate: Some(id),
                });
            }
        }

        let num_gates = self.gates.len() as u32;
        for edge in &self.dependencies {
            for gate in [edge.producer, edge.consumer] {
                if gate.0 >= num_gates {
                    return Err(IrError::GateOutOfRange { gate, num_gates });
                }
            }
            if edge.producer == edge.consumer {
                return Err(IrError::SelfDependency(edge.producer));
            }
        }

        for &(p, q) in &self.links {
            for qubit in [p, q] {
                if qubit.0 >= self.num_physical {
                    return Err(IrError::PhysicalOutOfRange {
                        qubit,
                        num_physical: self.num_physical,
                    });
                }
            }
            if p == q {
                return Err(IrError::SelfLink(p));
            }
        }

        Ok(())
    }

    /// Logical qubits that appear in at least one gate.
    pub fn active_qubits(&self) -> FxHashSet<LogicalQubit> {
        self.gates.iter().flat_map(Gate::qubits).collect()
    }
}
