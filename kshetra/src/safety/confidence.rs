//! Per-edge confidence bounds on elevation change.
//!
//! For an edge `s --a--> t` the safety feature is the elevation change
//! `Δ = f(t) - f(s)`. With posterior means `μ` and variances `σ²` from the
//! surrogate:
//!
//! ```text
//! Δ̂     = μ(t) - μ(s)
//! width = β · sqrt(σ²(s) + σ²(t)) + L · |step(a)|
//! l, u  = Δ̂ - width, Δ̂ + width
//!
//! optimistic  ⇔ u ≥ h
//! pessimistic ⇔ l ≥ h
//! ```
//!
//! `h < 0` is the steepest admissible descent per step. The variance of the
//! difference ignores the (positive) covariance between endpoints, which
//! only widens the interval.

use log::trace;

use crate::core::{ACTION_COUNT, Action};
use crate::error::{ConfigError, SurrogateError};
use crate::grid::GridGraph;
use crate::surrogate::Surrogate;

use super::SafetyMatrix;

/// Output of one confidence evaluation.
#[derive(Clone, Debug)]
pub struct EdgeBounds {
    /// Lower bound on `Δ` per (state, action). `NaN` where the move is unavailable.
    pub lower: Vec<[f64; ACTION_COUNT]>,
    /// Upper bound on `Δ` per (state, action). `NaN` where the move is unavailable.
    pub upper: Vec<[f64; ACTION_COUNT]>,
    /// Posterior mean per state.
    pub state_mean: Vec<f64>,
    /// Posterior variance per state.
    pub state_variance: Vec<f64>,
    /// Upper bound passes the threshold (column 0 = state-level flag).
    pub optimistic: SafetyMatrix,
    /// Lower bound passes the threshold (column 0 = state-level flag).
    pub pessimistic: SafetyMatrix,
}

impl EdgeBounds {
    /// Width of the interval for (state, action), if the move exists.
    pub fn width(&self, state: usize, action: Action) -> Option<f64> {
        let w = self.upper[state][action.index()] - self.lower[state][action.index()];
        w.is_finite().then_some(w)
    }
}

/// Turns surrogate predictions into per-edge safety flags.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfidenceOracle {
    beta: f64,
    lipschitz: f64,
    threshold: f64,
}

impl ConfidenceOracle {
    /// Create an oracle.
    ///
    /// * `beta` - confidence scale on the predictive standard deviation
    /// * `lipschitz` - bound on field variation per unit distance
    /// * `threshold` - safety threshold `h` (negative)
    pub fn new(beta: f64, lipschitz: f64, threshold: f64) -> Result<Self, ConfigError> {
        if !(beta.is_finite() && beta >= 0.0) {
            return Err(ConfigError::InvalidConfidenceScale(beta));
        }
        if !(lipschitz.is_finite() && lipschitz >= 0.0) {
            return Err(ConfigError::InvalidLipschitz(lipschitz));
        }
        if !(threshold.is_finite() && threshold < 0.0) {
            return Err(ConfigError::InvalidThreshold(threshold));
        }
        Ok(Self {
            beta,
            lipschitz,
            threshold,
        })
    }

    /// Confidence scale β.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Lipschitz constant L.
    pub fn lipschitz(&self) -> f64 {
        self.lipschitz
    }

    /// Safety threshold h.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Evaluate bounds for every edge of `graph`.
    ///
    /// `state_safe` supplies the static state-level flag written to column 0
    /// of both flag matrices.
    pub fn compute(
        &self,
        graph: &GridGraph,
        surrogate: &dyn Surrogate,
        state_safe: &[bool],
    ) -> Result<EdgeBounds, SurrogateError> {
        let n = graph.state_count();
        let prediction = surrogate.predict(graph.coords())?;
        prediction.validate(n)?;

        let mut lower = vec![[f64::NAN; ACTION_COUNT]; n];
        let mut upper = vec![[f64::NAN; ACTION_COUNT]; n];
        let mut optimistic = SafetyMatrix::from_state_flags(state_safe);
        let mut pessimistic = SafetyMatrix::from_state_flags(state_safe);

        for (l, u) in lower.iter_mut().zip(upper.iter_mut()) {
            l[0] = 0.0;
            u[0] = 0.0;
        }

        for (s, action, t) in graph.edges() {
            let mean = prediction.means[t] - prediction.means[s];
            let std = (prediction.variances[s] + prediction.variances[t]).sqrt();
            let width = self.beta * std + self.lipschitz * graph.step_length(action);

            let l = mean - width;
            let u = mean + width;
            lower[s][action.index()] = l;
            upper[s][action.index()] = u;
            optimistic.set(s, action, u >= self.threshold);
            pessimistic.set(s, action, l >= self.threshold);
        }

        trace!(
            "[Confidence] beta={:.2} L={:.3} h={:.3}: {} optimistic, {} pessimistic",
            self.beta,
            self.lipschitz,
            self.threshold,
            optimistic.count(),
            pessimistic.count()
        );

        Ok(EdgeBounds {
            lower,
            upper,
            state_mean: prediction.means,
            state_variance: prediction.variances,
            optimistic,
            pessimistic,
        })
    }
}

/// Convert a maximum slope angle into a per-step threshold: `h = -tan(angle) · step`.
pub fn threshold_from_slope(angle_rad: f64, step: f64) -> f64 {
    -angle_rad.tan() * step
}
