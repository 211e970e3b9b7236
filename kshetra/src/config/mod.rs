//! YAML configuration for exploration experiments.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use kshetra::config::KshetraConfig;
//!
//! // configs/kshetra.yaml, or built-in defaults if absent
//! let config = KshetraConfig::load_default()?;
//!
//! let grid = GridGraph::new(&config.to_grid_config())?;
//! let gp = GaussianProcess::new(config.to_kernel_config())?;
//! let explorer_config = config.to_explorer_config();
//! ```
//!
//! ## Sections
//!
//! | Section | Description |
//! |---------|-------------|
//! | [`GridSection`] | Shape and step size |
//! | [`SafetySection`] | β, L, slope limit / threshold |
//! | [`SurrogateSection`] | RBF kernel of the reference GP |
//! | [`SeedSection`] | Seed center and radius |
//! | [`SamplingSection`] | Tie-break, iterations, warm-up |
//!
//! ## Example YAML
//!
//! ```yaml
//! grid:
//!   rows: 60
//!   cols: 42
//! safety:
//!   beta: 3.0
//!   max_slope_degrees: 25.0
//! surrogate:
//!   lengthscale: 5.0
//!   variance: 30.0
//!   noise_std: 0.001
//! seed:
//!   center: 77
//!   radius: 1
//! ```

mod defaults;
mod error;
mod kshetra;
mod sections;

pub use error::ConfigLoadError;
pub use kshetra::KshetraConfig;
pub use sections::{GridSection, SafetySection, SamplingSection, SeedSection, SurrogateSection};
