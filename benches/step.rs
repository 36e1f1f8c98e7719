//! Benchmarks for Game of Life stepping.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use npy_life::{
    compute::{LifePropagator, step},
    schema::{ParallelConfig, Pattern, Seed, SimulationConfig},
};

fn random_seed() -> Seed {
    Seed {
        pattern: Pattern::Random {
            density: 0.3,
            seed: 42,
        },
    }
}

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("step");

    for size in [64, 256, 1024] {
        let grid = random_seed().generate(size, size).expect("grid fits");

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", size, size)),
            &size,
            |b, _| {
                b.iter(|| step(black_box(&grid)));
            },
        );
    }

    group.finish();
}

fn bench_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_16_steps");

    for parallel in [false, true] {
        let config = SimulationConfig {
            parallel: ParallelConfig {
                enabled: parallel,
                threads: None,
                min_cells: 1,
            },
            ..Default::default()
        };
        let propagator = LifePropagator::new(&config).expect("valid config");
        let grid = random_seed().generate(512, 512).expect("grid fits");

        group.bench_with_input(
            BenchmarkId::from_parameter(if parallel { "parallel" } else { "sequential" }),
            &parallel,
            |b, _| {
                b.iter(|| propagator.run(black_box(&grid), 16).expect("run"));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_step, bench_run);
criterion_main!(benches);
