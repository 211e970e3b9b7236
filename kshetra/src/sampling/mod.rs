//! Measurement selection.
//!
//! The policy only measures from states that S_hat lets the agent stand on.
//! A state is *visitable* when it holds at least one S_hat entry (stay flag
//! or a certified outgoing move). Being the target of a certified move is
//! not enough: such a state may have no certified way back. From every
//! visitable state each available action is a candidate; the candidate whose
//! target has the largest posterior variance wins.
//!
//! The chosen action need not be in S_hat: only its target point is
//! measured, the move itself is never executed.

use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::core::{Action, Coord2D};
use crate::error::{ExploreError, Result};
use crate::grid::GridGraph;
use crate::safety::{EdgeBounds, SafetyMatrix};

/// Tolerance for treating two variances as equal: relative above 1,
/// absolute below.
const TIE_TOLERANCE: f64 = 1e-12;

/// How to choose among equally uncertain candidates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TieBreak {
    /// Lowest state index, then lowest action index.
    #[default]
    First,
    /// Uniform among tied candidates, from a seeded generator.
    Random { seed: u64 },
}

/// Chosen measurement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleTarget {
    /// State the agent stands on.
    pub state: usize,
    /// Action whose target point is measured.
    pub action: Action,
    /// State whose coordinate is measured.
    pub target_state: usize,
    /// Posterior variance at the target.
    pub variance: f64,
    /// Measurement coordinate.
    pub coord: Coord2D,
}

/// Maximum-variance sampling policy.
#[derive(Clone, Debug)]
pub struct SamplingPolicy {
    tie_break: TieBreak,
    rng: Option<StdRng>,
}

impl SamplingPolicy {
    pub fn new(tie_break: TieBreak) -> Self {
        let rng = match tie_break {
            TieBreak::First => None,
            TieBreak::Random { seed } => Some(StdRng::seed_from_u64(seed)),
        };
        Self { tie_break, rng }
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// States the agent may stand on under `s_hat`.
    pub fn visitable_states(graph: &GridGraph, s_hat: &SafetyMatrix) -> Vec<bool> {
        (0..graph.state_count()).map(|s| s_hat.any(s)).collect()
    }

    /// Pick the next measurement.
    ///
    /// Fails with [`ExploreError::SamplingExhausted`] when no state is
    /// visitable.
    pub fn select(
        &mut self,
        graph: &GridGraph,
        s_hat: &SafetyMatrix,
        bounds: &EdgeBounds,
    ) -> Result<SampleTarget> {
        let visitable = Self::visitable_states(graph, s_hat);

        let mut best = 0.0;
        let mut tied: Vec<(usize, Action, usize)> = Vec::new();

        for s in (0..graph.state_count()).filter(|&s| visitable[s]) {
            for action in Action::ALL {
                let Some(t) = graph.target(s, action) else {
                    continue;
                };
                let variance = bounds.state_variance[t];
                let tolerance = TIE_TOLERANCE * variance.abs().max(1.0);

                if tied.is_empty() || variance > best + tolerance {
                    best = variance;
                    tied.clear();
                    tied.push((s, action, t));
                } else if (variance - best).abs() <= tolerance {
                    tied.push((s, action, t));
                }
            }
        }

        let chosen = match (&mut self.rng, tied.as_slice()) {
            (_, []) => None,
            (Some(rng), candidates) => candidates.choose(rng).copied(),
            (None, [first, ..]) => Some(*first),
        };
        let Some((state, action, target_state)) = chosen else {
            return Err(ExploreError::SamplingExhausted);
        };

        debug!(
            "[Sampling] state={} action={} target={} variance={:.4} ({} tied)",
            state,
            action,
            target_state,
            bounds.state_variance[target_state],
            tied.len()
        );

        Ok(SampleTarget {
            state,
            action,
            target_state,
            variance: bounds.state_variance[target_state],
            coord: graph.coord(target_state),
        })
    }
}

impl Default for SamplingPolicy {
    fn default() -> Self {
        Self::new(TieBreak::First)
    }
}
