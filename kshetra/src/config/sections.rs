//! Configuration sections.

use serde::{Deserialize, Serialize};

use crate::grid::GridConfig;
use crate::safety::{SeedConfig, threshold_from_slope};
use crate::sampling::TieBreak;
use crate::surrogate::KernelConfig;

use super::defaults;

/// Grid shape and spacing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridSection {
    #[serde(default = "defaults::rows")]
    pub rows: usize,

    #[serde(default = "defaults::cols")]
    pub cols: usize,

    /// Spacing between rows (world units)
    #[serde(default = "defaults::step")]
    pub step_x: f64,

    /// Spacing between columns (world units)
    #[serde(default = "defaults::step")]
    pub step_y: f64,
}

impl Default for GridSection {
    fn default() -> Self {
        Self {
            rows: defaults::rows(),
            cols: defaults::cols(),
            step_x: defaults::step(),
            step_y: defaults::step(),
        }
    }
}

impl GridSection {
    pub fn to_grid_config(&self) -> GridConfig {
        GridConfig::new(self.rows, self.cols).with_step(self.step_x, self.step_y)
    }
}

/// Confidence and threshold settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SafetySection {
    /// Confidence scale on the predictive standard deviation
    #[serde(default = "defaults::beta")]
    pub beta: f64,

    /// Lipschitz constant of the field (0 = trust the kernel)
    #[serde(default)]
    pub lipschitz: f64,

    /// Steepest admissible descent, in degrees
    #[serde(default = "defaults::max_slope_degrees")]
    pub max_slope_degrees: f64,

    /// Explicit threshold h, overrides `max_slope_degrees`
    #[serde(default)]
    pub threshold: Option<f64>,

    /// Closure expansion cap per pass (default: number of states)
    #[serde(default)]
    pub closure_iteration_cap: Option<usize>,

    /// Accept a threshold that certifies no move or every move of the field
    #[serde(default)]
    pub allow_degenerate_threshold: bool,
}

impl Default for SafetySection {
    fn default() -> Self {
        Self {
            beta: defaults::beta(),
            lipschitz: 0.0,
            max_slope_degrees: defaults::max_slope_degrees(),
            threshold: None,
            closure_iteration_cap: None,
            allow_degenerate_threshold: false,
        }
    }
}

impl SafetySection {
    /// Threshold h for moves of length `step`.
    pub fn threshold(&self, step: f64) -> f64 {
        self.threshold
            .unwrap_or_else(|| threshold_from_slope(self.max_slope_degrees.to_radians(), step))
    }
}

/// Reference GP surrogate settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurrogateSection {
    #[serde(default = "defaults::lengthscale")]
    pub lengthscale: f64,

    /// Signal variance
    #[serde(default = "defaults::kernel_variance")]
    pub variance: f64,

    /// Observation noise standard deviation (also the coverage margin ε)
    #[serde(default = "defaults::noise_std")]
    pub noise_std: f64,
}

impl Default for SurrogateSection {
    fn default() -> Self {
        Self {
            lengthscale: defaults::lengthscale(),
            variance: defaults::kernel_variance(),
            noise_std: defaults::noise_std(),
        }
    }
}

impl SurrogateSection {
    pub fn to_kernel_config(&self) -> KernelConfig {
        KernelConfig::new(self.lengthscale, self.variance, self.noise_std)
    }
}

/// Seed neighbourhood heuristic.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeedSection {
    /// Center state; omit for a random admissible state
    #[serde(default = "defaults::seed_center")]
    pub center: Option<usize>,

    #[serde(default = "defaults::seed_radius")]
    pub radius: usize,
}

impl Default for SeedSection {
    fn default() -> Self {
        Self {
            center: defaults::seed_center(),
            radius: defaults::seed_radius(),
        }
    }
}

impl SeedSection {
    pub fn to_seed_config(&self) -> SeedConfig {
        SeedConfig {
            center: self.center,
            radius: self.radius,
        }
    }
}

/// Loop driving settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SamplingSection {
    #[serde(default)]
    pub tie_break: TieBreak,

    /// Exploration iterations per run
    #[serde(default = "defaults::iterations")]
    pub iterations: usize,

    /// Measurements of each seed move before exploring
    #[serde(default = "defaults::warm_up_repeats")]
    pub warm_up_repeats: usize,
}

impl Default for SamplingSection {
    fn default() -> Self {
        Self {
            tie_break: TieBreak::default(),
            iterations: defaults::iterations(),
            warm_up_repeats: defaults::warm_up_repeats(),
        }
    }
}
