//! Benchmark confidence evaluation and safe-set closure.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kshetra::{
    ConfidenceOracle, ElevationGrid, GaussianProcess, GridConfig, GridGraph, KernelConfig,
    SafeSetPropagator, SafetyMatrix, SeedSet, Surrogate, TrueField,
};

/// Rolling terrain with one ridge.
fn terrain(config: &GridConfig) -> ElevationGrid {
    ElevationGrid::from_fn(config, |c| {
        0.4 * (0.2 * c.x).sin() + 0.3 * (0.15 * c.y).cos() - 0.02 * (c.x - c.y).abs()
    })
    .unwrap()
}

/// GP conditioned on a regular subsample of the field.
fn fitted_gp(graph: &GridGraph, field: &ElevationGrid, stride: usize) -> GaussianProcess {
    let coords: Vec<_> = (0..graph.state_count())
        .step_by(stride)
        .map(|s| graph.coord(s))
        .collect();
    let values: Vec<_> = coords.iter().map(|&c| field.elevation_at(c)).collect();
    let mut gp = GaussianProcess::new(KernelConfig::new(5.0, 30.0, 0.01)).unwrap();
    gp.update(&coords, &values).unwrap();
    gp
}

fn bench_closure(c: &mut Criterion) {
    let mut group = c.benchmark_group("closure");

    for &(rows, cols) in &[(20, 20), (60, 42), (100, 100)] {
        let config = GridConfig::new(rows, cols);
        let graph = GridGraph::new(&config).unwrap();
        let field = terrain(&config);
        let truth = kshetra::evaluation::true_safe_set(&graph, &field, -0.3);
        let seed = SeedSet::around(&graph, &field, graph.state_count() / 2, 1, -0.3).unwrap();
        let propagator = SafeSetPropagator::new();

        group.bench_with_input(
            BenchmarkId::new("compute", format!("{}x{}", rows, cols)),
            &truth,
            |b, safe: &SafetyMatrix| {
                b.iter(|| black_box(propagator.compute(&graph, safe, &seed).unwrap()))
            },
        );
    }

    group.finish();
}

fn bench_confidence(c: &mut Criterion) {
    let mut group = c.benchmark_group("confidence");
    let config = GridConfig::new(60, 42);
    let graph = GridGraph::new(&config).unwrap();
    let field = terrain(&config);
    let oracle = ConfidenceOracle::new(3.0, 0.0, -0.47).unwrap();
    let state_safe = vec![true; graph.state_count()];

    for &stride in &[200usize, 50, 25] {
        let gp = fitted_gp(&graph, &field, stride);
        group.bench_with_input(
            BenchmarkId::new("observations", gp.observation_count()),
            &gp,
            |b, gp| b.iter(|| black_box(oracle.compute(&graph, gp, &state_safe).unwrap())),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_closure, bench_confidence);
criterion_main!(benches);
