//! # Kshetra: Safe Exploration of Unknown Terrain
//!
//! An agent on a grid learns an unknown elevation field while only ever
//! committing to moves it can statistically certify as survivable, and only
//! to states from which a certified path leads back to where it started.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kshetra::{
//!     Action, ElevationGrid, ExplorerConfig, GaussianProcess, GridConfig, GridGraph,
//!     KernelConfig, SafeExplorer, SeedSet,
//! };
//!
//! let grid = GridConfig::new(20, 20);
//! let graph = GridGraph::new(&grid).unwrap();
//! let field = ElevationGrid::from_fn(&grid, |c| if c.x > 15.0 { 2.0 } else { 0.05 * c.x }).unwrap();
//! let seed = SeedSet::around(&graph, &field, 210, 1, -0.5).unwrap();
//! let gp = GaussianProcess::new(KernelConfig::new(3.0, 1.0, 0.01)).unwrap();
//!
//! let config = ExplorerConfig { threshold: -0.5, ..Default::default() };
//! let mut explorer = SafeExplorer::new(&config, graph, gp, field, seed).unwrap();
//! for _ in 0..10 {
//!     let report = explorer.step().unwrap();
//!     println!("iter {}: |S_hat| = {}", report.iteration, report.s_hat_count);
//! }
//! assert!(explorer.s_hat().get(210, Action::Stay));
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: actions and coordinates
//! - [`grid`]: state/action topology
//! - [`field`]: true elevation (sensor and evaluation only)
//! - [`surrogate`]: regression boundary and a reference GP
//! - [`safety`]: confidence flags, seed, reachability/returnability closure
//! - [`sampling`]: maximum-variance measurement selection
//! - [`explorer`]: the iteration loop
//! - [`evaluation`]: ground truth, coverage and false-safe metrics
//! - [`config`]: YAML configuration
//!
//! ## Data Flow
//!
//! ```text
//!        ┌──────────────┐
//!        │  Surrogate   │◄──────────────────────────┐
//!        └──────┬───────┘                           │ update(x, y)
//!               │ predict                           │
//!               ▼                                   │
//!        ┌──────────────┐   S (optimistic)   ┌──────┴───────┐
//!        │  Confidence  │───────────────────►│  TrueField   │
//!        │    Oracle    │                    │  (measure)   │
//!        └──────┬───────┘                    └──────▲───────┘
//!               │ pessimistic                       │
//!               ▼                                   │
//!        ┌──────────────┐       S_hat        ┌──────┴───────┐
//!        │  Propagator  │───────────────────►│   Sampling   │
//!        │ (R ∩ Ret)    │                    │ (max var)    │
//!        └──────────────┘                    └──────────────┘
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod evaluation;
pub mod explorer;
pub mod field;
pub mod grid;
pub mod safety;
pub mod sampling;
pub mod surrogate;

pub use config::{ConfigLoadError, KshetraConfig};
pub use core::{ACTION_COUNT, Action, Coord2D};
pub use error::{ConfigError, ExploreError, Result, SurrogateError};
pub use evaluation::{CoverageTrace, EvaluationReport, GroundTruth};
pub use explorer::{ExplorerConfig, IterationReport, SafeExplorer};
pub use field::{ElevationGrid, TrueField};
pub use grid::{GridConfig, GridGraph};
pub use safety::{
    ConfidenceOracle, EdgeBounds, SafeSetPropagator, SafetyMatrix, SeedConfig, SeedSet,
    threshold_from_slope,
};
pub use sampling::{SampleTarget, SamplingPolicy, TieBreak};
pub use surrogate::{GaussianProcess, KernelConfig, Prediction, Surrogate};
