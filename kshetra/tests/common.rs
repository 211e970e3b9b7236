//! Shared builders for integration tests.
//!
//! Synthetic fields, seeds and explorers on small grids.

#![allow(dead_code)]

use kshetra::{
    Action, Coord2D, ElevationGrid, ExplorerConfig, GaussianProcess, GridConfig, GridGraph,
    KernelConfig, SafeExplorer, SeedSet,
};

pub type TestExplorer = SafeExplorer<GaussianProcess, ElevationGrid>;

/// Initialise logging once; later calls are no-ops.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn grid(rows: usize, cols: usize) -> (GridConfig, GridGraph) {
    let config = GridConfig::new(rows, cols);
    let graph = GridGraph::new(&config).expect("valid grid");
    (config, graph)
}

/// Field that is zero everywhere.
pub fn flat_field(config: &GridConfig) -> ElevationGrid {
    ElevationGrid::flat(config, 0.0).expect("valid field")
}

/// Paraboloid `curvature * |x - center|^2`, lowest at `center`.
pub fn bowl_field(config: &GridConfig, center: Coord2D, curvature: f64) -> ElevationGrid {
    ElevationGrid::from_fn(config, |c| curvature * c.distance_squared(&center)).expect("valid field")
}

/// Plateau at 0 for columns `< edge_col`, `depth` below it from there on.
pub fn cliff_field(config: &GridConfig, edge_col: usize, depth: f64) -> ElevationGrid {
    let values = (0..config.state_count())
        .map(|s| if s % config.cols < edge_col { 0.0 } else { -depth })
        .collect();
    ElevationGrid::new(config, values).expect("valid field")
}

/// Smooth rolling terrain.
pub fn rolling_field(config: &GridConfig, amplitude: f64) -> ElevationGrid {
    ElevationGrid::from_fn(config, |c| {
        amplitude * ((0.4 * c.x).sin() + (0.3 * c.y).cos())
    })
    .expect("valid field")
}

pub fn gp(lengthscale: f64, variance: f64, noise_std: f64) -> GaussianProcess {
    GaussianProcess::new(KernelConfig::new(lengthscale, variance, noise_std)).expect("valid kernel")
}

pub fn explorer_config(beta: f64, threshold: f64) -> ExplorerConfig {
    // Flat test terrain makes every move safe
    ExplorerConfig {
        beta,
        threshold,
        allow_degenerate_threshold: true,
        ..ExplorerConfig::default()
    }
}

/// Center state with every available action trusted.
pub fn center_seed(graph: &GridGraph) -> SeedSet {
    let center = graph
        .index_of(graph.rows() / 2, graph.cols() / 2)
        .expect("center in grid");
    let actions: Vec<Action> = Action::ALL
        .into_iter()
        .filter(|&a| graph.target(center, a).is_some())
        .collect();
    SeedSet::single_state(graph, center, &actions).expect("valid seed")
}

/// Explorer over `field` with a seed grown `radius` steps around the center.
pub fn explorer_around_center(
    graph: GridGraph,
    field: ElevationGrid,
    surrogate: GaussianProcess,
    config: &ExplorerConfig,
    radius: usize,
) -> TestExplorer {
    let center = graph
        .index_of(graph.rows() / 2, graph.cols() / 2)
        .expect("center in grid");
    let seed = SeedSet::around(&graph, &field, center, radius, config.threshold).expect("valid seed");
    SafeExplorer::new(config, graph, surrogate, field, seed).expect("valid explorer")
}
