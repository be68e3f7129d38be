//! Benchmarks for the routing engine
//!
//! Run with: cargo bench -p qroute-compile

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qroute_compile::{CouplingGraph, DistanceTable, ReplayVerifier, Router, RoutingConfig, WarmStart};
use qroute_ir::{Gate, Instance, LogicalQubit};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Random circuit on a ring with chords, dependencies from the last gate on
/// each qubit.
fn random_instance(num_qubits: u32, num_gates: usize, seed: u64) -> Instance {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut instance = Instance::new(num_qubits);
    for (p, q) in CouplingGraph::ring(num_qubits).edges() {
        instance.add_link(*p, *q);
    }
    for _ in 0..num_qubits / 4 {
        let p = rng.gen_range(0..num_qubits);
        let q = rng.gen_range(0..num_qubits);
        if p != q {
            instance.add_link(p.into(), q.into());
        }
    }

    let mut last = vec![None; num_qubits as usize];
    while instance.num_gates() < num_gates {
        let a = rng.gen_range(0..num_qubits);
        let b = rng.gen_range(0..num_qubits);
        let Ok(gate) = Gate::new(LogicalQubit(a), LogicalQubit(b)) else {
            continue;
        };
        let id = instance.add_gate(gate);
        for producer in [last[a as usize], last[b as usize]].into_iter().flatten() {
            instance.add_dependency(producer, id);
        }
        last[a as usize] = Some(id);
        last[b as usize] = Some(id);
    }
    instance
}

/// Benchmark distance table construction
fn bench_distance_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("distance_table");

    for n in &[16_u32, 64, 256] {
        let graph = CouplingGraph::ring(*n);
        group.bench_with_input(BenchmarkId::new("ring", n), &graph, |b, graph| {
            b.iter(|| DistanceTable::new(black_box(graph)));
        });
    }

    group.finish();
}

/// Benchmark full two-pass routing
fn bench_routing(c: &mut Criterion) {
    let mut group = c.benchmark_group("routing");

    for &(n, gates) in &[(8_u32, 100_usize), (32, 500), (64, 2000)] {
        let instance = random_instance(n, gates, 42);

        for warm_start in [WarmStart::Off, WarmStart::ReverseTraversal] {
            let router = Router::new(RoutingConfig {
                warm_start,
                ..RoutingConfig::default()
            })
            .unwrap();
            group.bench_with_input(
                BenchmarkId::new(warm_start.as_str(), format!("{n}q_{gates}g")),
                &instance,
                |b, instance| {
                    b.iter(|| router.route(black_box(instance)).unwrap());
                },
            );
        }
    }

    group.finish();
}

/// Benchmark replay verification
fn bench_verification(c: &mut Criterion) {
    let instance = random_instance(32, 500, 7);
    let solution = Router::default().route(&instance).unwrap().into_solution();
    let verifier = ReplayVerifier::new(&instance).unwrap();

    c.bench_function("verify_32q_500g", |b| {
        b.iter(|| verifier.verify(black_box(&solution)));
    });
}

criterion_group!(benches, bench_distance_table, bench_routing, bench_verification);
criterion_main!(benches);
