//! Safe exploration loop.
//!
//! [`SafeExplorer`] owns one experiment: the grid, the surrogate, the true
//! field (as a sensor) and the seed. Each iteration recomputes confidence
//! bounds, S and S_hat from scratch, proposes a measurement and ingests it.
//!
//! ```text
//! ┌────────────┐  predict   ┌────────────┐  pessimistic  ┌────────────┐
//! │ Surrogate  │──────────►│ Confidence │──────────────►│ Propagator │
//! └────────────┘            └────────────┘               └─────┬──────┘
//!       ▲ update                                               │ S_hat
//!       │                   ┌────────────┐               ┌─────▼──────┐
//!       └───────────────────│ TrueField  │◄──────────────│  Sampling  │
//!                           └────────────┘   measure     └────────────┘
//! ```

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::core::{Action, Coord2D};
use crate::error::{ConfigError, ExploreError, Result};
use crate::evaluation::check_threshold;
use crate::field::TrueField;
use crate::grid::GridGraph;
use crate::safety::{
    ConfidenceOracle, EdgeBounds, SafeSetPropagator, SafetyMatrix, SeedSet, threshold_from_slope,
};
use crate::sampling::{SampleTarget, SamplingPolicy, TieBreak};
use crate::surrogate::{GaussianProcess, Surrogate};

/// Runtime parameters of the exploration loop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// Confidence scale β.
    pub beta: f64,
    /// Lipschitz constant L.
    pub lipschitz: f64,
    /// Safety threshold h (negative elevation change per step).
    pub threshold: f64,
    /// Tie-break between equally uncertain measurements.
    #[serde(default)]
    pub tie_break: TieBreak,
    /// Worklist expansion cap per closure pass. `None` = number of states.
    #[serde(default)]
    pub closure_iteration_cap: Option<usize>,
    /// Accept a threshold under which the true field makes no move safe,
    /// or every move safe.
    #[serde(default)]
    pub allow_degenerate_threshold: bool,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            beta: 3.0,
            lipschitz: 0.0,
            // 25 degrees at unit step
            threshold: threshold_from_slope(25f64.to_radians(), 1.0),
            tie_break: TieBreak::First,
            closure_iteration_cap: None,
            allow_degenerate_threshold: false,
        }
    }
}

impl ExplorerConfig {
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        ConfidenceOracle::new(self.beta, self.lipschitz, self.threshold).map(|_| ())
    }
}

/// Summary of one [`SafeExplorer::step`].
#[derive(Clone, Debug, PartialEq)]
pub struct IterationReport {
    /// 1-based iteration number.
    pub iteration: usize,
    /// Measurement taken this iteration.
    pub sample: SampleTarget,
    /// Value returned by the true field.
    pub observed: f64,
    /// Entries of S after the update.
    pub s_count: usize,
    /// Entries of S_hat after the update.
    pub s_hat_count: usize,
}

/// One safe-exploration experiment.
pub struct SafeExplorer<S: Surrogate, F: TrueField> {
    graph: GridGraph,
    surrogate: S,
    field: F,
    seed: SeedSet,
    oracle: ConfidenceOracle,
    propagator: SafeSetPropagator,
    policy: SamplingPolicy,
    state_safe: Vec<bool>,

    s: SafetyMatrix,
    s_hat: SafetyMatrix,
    bounds: Option<EdgeBounds>,
    iteration: usize,
}

impl<S: Surrogate, F: TrueField> SafeExplorer<S, F> {
    /// Assemble an explorer. Every state starts out state-level safe.
    ///
    /// Fails with [`ConfigError::DegenerateThreshold`] when the threshold
    /// leaves no move or every move of `field` safe, unless
    /// `allow_degenerate_threshold` is set.
    ///
    /// S and S_hat start as the seed until [`update_sets`](Self::update_sets)
    /// runs.
    pub fn new(
        config: &ExplorerConfig,
        graph: GridGraph,
        surrogate: S,
        field: F,
        seed: SeedSet,
    ) -> std::result::Result<Self, ConfigError> {
        let oracle = ConfidenceOracle::new(config.beta, config.lipschitz, config.threshold)?;
        if seed.state_count() != graph.state_count() {
            return Err(ConfigError::SeedShapeMismatch {
                expected: graph.state_count(),
                actual: seed.state_count(),
            });
        }
        if !config.allow_degenerate_threshold {
            check_threshold(&graph, &field, config.threshold)?;
        }
        let propagator = match config.closure_iteration_cap {
            Some(cap) => SafeSetPropagator::with_iteration_cap(cap),
            None => SafeSetPropagator::new(),
        };

        info!(
            "[Explorer] {}x{} grid, {} seed entries, beta={} L={} h={:.4}",
            graph.rows(),
            graph.cols(),
            seed.len(),
            config.beta,
            config.lipschitz,
            config.threshold
        );

        Ok(Self {
            state_safe: vec![true; graph.state_count()],
            s: seed.matrix().clone(),
            s_hat: seed.matrix().clone(),
            graph,
            surrogate,
            field,
            seed,
            oracle,
            propagator,
            policy: SamplingPolicy::new(config.tie_break),
            bounds: None,
            iteration: 0,
        })
    }

    /// Replace the static state-level safety flags.
    pub fn with_state_safety(mut self, flags: Vec<bool>) -> std::result::Result<Self, ConfigError> {
        if flags.len() != self.graph.state_count() {
            return Err(ConfigError::StateSafetyMismatch {
                expected: self.graph.state_count(),
                actual: flags.len(),
            });
        }
        self.state_safe = flags;
        Ok(self)
    }

    /// Recompute confidence bounds, S and S_hat from the current surrogate.
    pub fn update_sets(&mut self) -> Result<()> {
        let bounds = self
            .oracle
            .compute(&self.graph, &self.surrogate, &self.state_safe)?;

        let mut s = bounds.optimistic.clone();
        s.union_with(self.seed.matrix());
        let s_hat = self
            .propagator
            .compute(&self.graph, &bounds.pessimistic, &self.seed)?;

        debug!(
            "[Explorer] update: |S|={} |S_hat|={} observations={}",
            s.count(),
            s_hat.count(),
            self.surrogate.observation_count()
        );

        self.s = s;
        self.s_hat = s_hat;
        self.bounds = Some(bounds);
        Ok(())
    }

    /// Propose the next measurement. Runs [`update_sets`](Self::update_sets)
    /// first if it never ran.
    pub fn target_sample(&mut self) -> Result<SampleTarget> {
        if self.bounds.is_none() {
            self.update_sets()?;
        }
        let Some(bounds) = &self.bounds else {
            return Err(ExploreError::SamplingExhausted);
        };
        self.policy.select(&self.graph, &self.s_hat, bounds)
    }

    /// Measure the true field at the target of (state, action) and feed it
    /// to the surrogate. Returns the measured value.
    ///
    /// No safety check is made here.
    pub fn add_observation(&mut self, state: usize, action: Action) -> Result<f64> {
        let coord = self.measurement_coord(state, action)?;
        let value = self.field.elevation_at(coord);
        self.surrogate.update(&[coord], &[value])?;
        Ok(value)
    }

    /// Coordinate measured by [`add_observation`](Self::add_observation).
    pub fn measurement_coord(&self, state: usize, action: Action) -> Result<Coord2D> {
        if !self.graph.contains(state) {
            return Err(ExploreError::InvalidState {
                state,
                states: self.graph.state_count(),
            });
        }
        let target = self
            .graph
            .target(state, action)
            .ok_or(ExploreError::InvalidAction {
                state,
                action: action.index(),
            })?;
        Ok(self.graph.coord(target))
    }

    /// Measure every available move of `state`, `repeats` times.
    ///
    /// Returns the number of observations added.
    pub fn warm_up(&mut self, state: usize, repeats: usize) -> Result<usize> {
        let mut added = 0;
        for _ in 0..repeats {
            for action in Action::MOVES {
                if self.graph.target(state, action).is_some() {
                    self.add_observation(state, action)?;
                    added += 1;
                }
            }
        }
        debug!("[Explorer] warm-up at state {}: {} observations", state, added);
        Ok(added)
    }

    /// States whose every available move is in S_hat.
    pub fn fully_safe_states(&self) -> Vec<usize> {
        (0..self.graph.state_count())
            .filter(|&s| {
                let mut moves = Action::MOVES
                    .iter()
                    .filter(|&&a| self.graph.target(s, a).is_some())
                    .peekable();
                moves.peek().is_some() && moves.all(|&a| self.s_hat.get(s, a))
            })
            .collect()
    }

    /// One iteration: update sets, select, measure.
    pub fn step(&mut self) -> Result<IterationReport> {
        self.update_sets()?;
        let sample = self.target_sample()?;
        let observed = self.add_observation(sample.state, sample.action)?;
        self.iteration += 1;

        info!(
            "[Explorer] iter {}: measured state {} via {} (var {:.4}), |S_hat|={}",
            self.iteration,
            sample.target_state,
            sample.action,
            sample.variance,
            self.s_hat.count()
        );

        Ok(IterationReport {
            iteration: self.iteration,
            sample,
            observed,
            s_count: self.s.count(),
            s_hat_count: self.s_hat.count(),
        })
    }

    /// Optimistic set S (per-edge upper-bound test, seed included).
    pub fn s(&self) -> &SafetyMatrix {
        &self.s
    }

    /// Certified set S_hat.
    pub fn s_hat(&self) -> &SafetyMatrix {
        &self.s_hat
    }

    /// Bounds from the last [`update_sets`](Self::update_sets).
    pub fn bounds(&self) -> Option<&EdgeBounds> {
        self.bounds.as_ref()
    }

    /// Trusted seed S_hat0.
    pub fn seed(&self) -> &SeedSet {
        &self.seed
    }

    /// Grid topology.
    pub fn graph(&self) -> &GridGraph {
        &self.graph
    }

    /// True field used as the sensor.
    pub fn field(&self) -> &F {
        &self.field
    }

    /// Regression model.
    pub fn surrogate(&self) -> &S {
        &self.surrogate
    }

    /// Mutable regression model. Sets are stale until the next
    /// [`update_sets`](Self::update_sets).
    pub fn surrogate_mut(&mut self) -> &mut S {
        &mut self.surrogate
    }

    /// Confidence oracle built from the config.
    pub fn oracle(&self) -> &ConfidenceOracle {
        &self.oracle
    }

    /// Observations held by the surrogate.
    pub fn observation_count(&self) -> usize {
        self.surrogate.observation_count()
    }

    /// Completed [`step`](Self::step) calls.
    pub fn iteration(&self) -> usize {
        self.iteration
    }
}

impl<F: TrueField> SafeExplorer<GaussianProcess, F> {
    /// Drop all but the `keep_last` most recent observations.
    ///
    /// Used to discard the samples the GP was initialised with once the
    /// seed has been measured.
    pub fn clear_observations(&mut self, keep_last: usize) -> Result<()> {
        let drop = self.surrogate.observation_count().saturating_sub(keep_last);
        self.surrogate.drop_first(drop)?;
        self.bounds = None;
        Ok(())
    }
}
