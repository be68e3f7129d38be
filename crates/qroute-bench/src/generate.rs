//! Random routing instance generation.
//!
//! Devices are a ring with random chords; circuits are uniformly random
//! gate pairs where each gate depends on the last gate that touched either
//! of its qubits.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use qroute_compile::CouplingGraph;
use qroute_ir::{Gate, GateId, Instance, LogicalQubit, PhysicalQubit};
use rand::rngs::SmallRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};

use crate::error::BenchError;

/// Size class of generated instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    Tiny,
    Xsmall,
    Small,
    Medium,
    Large,
}

impl Preset {
    /// All presets, smallest first.
    pub const ALL: [Preset; 5] = [
        Preset::Tiny,
        Preset::Xsmall,
        Preset::Small,
        Preset::Medium,
        Preset::Large,
    ];

    /// Range of qubit counts.
    pub fn qubits(self) -> RangeInclusive<u32> {
        match self {
            Preset::Tiny => 4..=10,
            Preset::Xsmall => 100..=300,
            Preset::Small => 100..=500,
            Preset::Medium => 1000..=2000,
            Preset::Large => 5000..=7000,
        }
    }

    /// Range of gate counts.
    pub fn gates(self) -> RangeInclusive<usize> {
        match self {
            Preset::Tiny => 8..=16,
            Preset::Xsmall => 250..=600,
            Preset::Small => 1000..=2000,
            Preset::Medium => 2000..=4000,
            Preset::Large => 8000..=10000,
        }
    }

    /// The lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Preset::Tiny => "tiny",
            Preset::Xsmall => "xsmall",
            Preset::Small => "small",
            Preset::Medium => "medium",
            Preset::Large => "large",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| BenchError::UnknownPreset(s.to_string()))
    }
}

/// Generate an instance of the given size class.
///
/// The same preset and seed always produce the same instance.
pub fn generate(preset: Preset, seed: u64) -> Instance {
    let mut rng = SmallRng::seed_from_u64(seed);
    let num_qubits = rng.gen_range(preset.qubits());
    let num_gates = rng.gen_range(preset.gates());
    random_instance(&mut rng, num_qubits, num_gates)
}

/// Generate an instance with exact sizes.
///
/// The device is a ring plus random chords, up to `3n - 1` links and never
/// more than the complete graph.
pub fn random_instance<R: Rng>(rng: &mut R, num_qubits: u32, num_gates: usize) -> Instance {
    let n = num_qubits;
    let mut instance = Instance::new(n);
    if n < 2 {
        return instance;
    }

    let max_links = u64::from(n) * u64::from(n - 1) / 2;
    let target = (u64::from(n - 1) + rng.gen_range(0..=2 * u64::from(n))).min(max_links);

    let mut graph = CouplingGraph::ring(n);
    while u64::try_from(graph.edges().len()).unwrap_or(u64::MAX) < target {
        let (p, q) = random_pair(rng, n);
        // Both endpoints are below `n`, so the insert cannot fail.
        let _ = graph.add_edge(PhysicalQubit(p), PhysicalQubit(q));
    }
    for &(p, q) in graph.edges() {
        instance.add_link(p, q);
    }

    let mut last: Vec<Option<GateId>> = vec![None; n as usize];
    for _ in 0..num_gates {
        let (a, b) = random_pair(rng, n);
        let Ok(gate) = Gate::new(LogicalQubit(a.min(b)), LogicalQubit(a.max(b))) else {
            continue;
        };
        let id = instance.add_gate(gate);
        let (la, lb) = (last[a as usize], last[b as usize]);
        if let Some(producer) = la {
            instance.add_dependency(producer, id);
        }
        if let Some(producer) = lb.filter(|&p| la != Some(p)) {
            instance.add_dependency(producer, id);
        }
        last[a as usize] = Some(id);
        last[b as usize] = Some(id);
    }

    instance
}

/// Two distinct values below `n`.
#[allow(clippy::cast_possible_truncation)]
fn random_pair<R: Rng>(rng: &mut R, n: u32) -> (u32, u32) {
    let picked = sample(rng, n as usize, 2);
    (picked.index(0) as u32, picked.index(1) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qroute_compile::{DistanceTable, ReplayVerifier, Router};

    #[test]
    fn test_same_seed_same_instance() {
        assert_eq!(generate(Preset::Tiny, 7), generate(Preset::Tiny, 7));
    }

    #[test]
    fn test_sizes_within_preset() {
        for seed in 1..=20 {
            let instance = generate(Preset::Tiny, seed);
            assert!(Preset::Tiny.qubits().contains(&instance.num_logical()));
            assert!(Preset::Tiny.gates().contains(&instance.num_gates()));
            assert!(instance.validate().is_ok());
        }
    }

    #[test]
    fn test_device_is_connected() {
        let instance = generate(Preset::Xsmall, 3);
        let graph = CouplingGraph::from_instance(&instance).unwrap();
        assert!(DistanceTable::new(&graph).is_connected());
        assert!(graph.edges().len() >= instance.num_physical() as usize);
    }

    #[test]
    fn test_dependencies_follow_qubit_order() {
        let instance = generate(Preset::Tiny, 11);
        for edge in instance.dependencies() {
            assert!(edge.producer < edge.consumer);
            let (p, c) = (
                instance.gate(edge.producer).unwrap(),
                instance.gate(edge.consumer).unwrap(),
            );
            assert!(p.qubits().iter().any(|&q| c.involves(q)));
        }
    }

    #[test]
    fn test_generated_instances_route() {
        for seed in 1..=10 {
            let instance = generate(Preset::Tiny, seed);
            let solution = Router::default().route(&instance).unwrap().into_solution();
            let report = ReplayVerifier::new(&instance).unwrap().verify(&solution);
            assert!(report.is_valid(), "seed {seed}: {:?}", report.violations);
        }
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("medium".parse::<Preset>().unwrap(), Preset::Medium);
        assert!(matches!(
            "huge".parse::<Preset>(),
            Err(BenchError::UnknownPreset(_))
        ));
    }
}
