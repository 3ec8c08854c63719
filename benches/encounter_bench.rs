//! Benchmarks for single combats and bulk runs on the demo roster
//!
//! Run with: cargo bench --bench encounter_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use encounter_sim::core::SimulationConfig;
use encounter_sim::encounter::run_combat;
use encounter_sim::roster::demo_roster;
use encounter_sim::simulation::run_bulk;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn benchmark_single_combat(c: &mut Criterion) {
    let config = SimulationConfig::default();
    let roster = demo_roster(&config).expect("demo roster loads");

    c.bench_function("single_combat", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed = seed.wrapping_add(1);
            let mut entities = roster.clone();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let stats = run_combat(&mut entities, &mut rng, black_box(&config));
            black_box(stats.expect("valid roster"))
        });
    });
}

fn benchmark_bulk(c: &mut Criterion) {
    let config = SimulationConfig::default();
    let roster = demo_roster(&config).expect("demo roster loads");

    let mut group = c.benchmark_group("bulk_runs");
    for runs in [100u32, 1_000] {
        group.throughput(Throughput::Elements(u64::from(runs)));
        group.bench_with_input(BenchmarkId::from_parameter(runs), &runs, |b, &runs| {
            b.iter(|| {
                black_box(run_bulk(&roster, runs, black_box(42), &config).expect("valid roster"))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_single_combat, benchmark_bulk);
criterion_main!(benches);
