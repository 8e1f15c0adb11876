//! Criterion benchmarks for full CDEEPSO runs.
//!
//! Fixed seeds keep every measured run on the same trajectory.

use cdeepso::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn config(dims: usize, strategy: DeStrategy) -> OptimizerConfig {
    OptimizerConfig::new()
        .with_dims(dims)
        .with_population_size(20)
        .with_strategy(strategy)
        .with_candidate_source(CandidateSource::PosMem)
        .with_max_generations(100)
        .with_log_every(0)
        .with_seed(42)
}

fn bench_objective(c: &mut Criterion, name: &str, objective: Objective) {
    let mut group = c.benchmark_group(name);

    for strategy in [DeStrategy::Rand, DeStrategy::Best] {
        for dims in [2, 10, 30] {
            let id = BenchmarkId::new(strategy.as_str(), dims);
            group.bench_with_input(id, &dims, |b, &dims| {
                b.iter(|| {
                    let mut optimizer =
                        Cdeepso::new(config(dims, strategy)).expect("valid config");
                    let mut evaluator = objective;
                    optimizer.optimize(black_box(&mut evaluator), None)
                });
            });
        }
    }

    group.finish();
}

fn bench_sphere(c: &mut Criterion) {
    bench_objective(c, "Sphere", Objective::Sphere);
}

fn bench_rastrigin(c: &mut Criterion) {
    bench_objective(c, "Rastrigin", Objective::Rastrigin);
}

fn bench_parallel_trials(c: &mut Criterion) {
    let mut group = c.benchmark_group("Trials");
    group.sample_size(10);

    for threads in [1, 0] {
        group.bench_with_input(BenchmarkId::new("threads", threads), &threads, |b, &threads| {
            b.iter(|| {
                run_trials(&config(10, DeStrategy::Best), Objective::Rastrigin, 8, threads)
                    .expect("valid config")
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sphere, bench_rastrigin, bench_parallel_trials);
criterion_main!(benches);
