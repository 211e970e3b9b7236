//! Error types for Kshetra.
//!
//! Errors are split by when they can occur:
//!
//! - [`ConfigError`]: raised while constructing a grid, seed, surrogate or
//!   explorer. Construction never partially succeeds.
//! - [`SurrogateError`]: the regression collaborator produced unusable output.
//! - [`ExploreError`]: raised while iterating (update, sample, ingest). Wraps
//!   the other two so callers can match on a single type.

use thiserror::Error;

/// Construction-time configuration failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid grid shape {rows}x{cols}: both dimensions must be positive")]
    InvalidShape { rows: usize, cols: usize },

    #[error("Invalid step size ({x}, {y}): both components must be positive and finite")]
    InvalidStepSize { x: f64, y: f64 },

    #[error("Invalid safety threshold h={0}: must be finite and negative")]
    InvalidThreshold(f64),

    #[error("Invalid confidence scale beta={0}: must be finite and non-negative")]
    InvalidConfidenceScale(f64),

    #[error("Invalid Lipschitz constant L={0}: must be finite and non-negative")]
    InvalidLipschitz(f64),

    #[error(
        "Threshold h={threshold} is degenerate for this field: {safe_moves} of {total_moves} moves are safe"
    )]
    DegenerateThreshold {
        threshold: f64,
        safe_moves: usize,
        total_moves: usize,
    },

    #[error("Seed entry (state {state}, action {action}) is not part of the grid")]
    SeedOutOfGrid { state: usize, action: usize },

    #[error("Seed safe set is empty")]
    EmptySeed,

    #[error("Seed covers {actual} states but the grid has {expected}")]
    SeedShapeMismatch { expected: usize, actual: usize },

    #[error("Field has {actual} values but the grid has {expected} states")]
    FieldShapeMismatch { expected: usize, actual: usize },

    #[error("State safety flags cover {actual} states but the grid has {expected}")]
    StateSafetyMismatch { expected: usize, actual: usize },

    #[error("Invalid kernel configuration: {0}")]
    InvalidKernel(String),
}

/// Failures reported by (or detected in the output of) a surrogate model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurrogateError {
    #[error("Surrogate returned invalid variance {value} at query {index}")]
    InvalidVariance { index: usize, value: f64 },

    #[error("Surrogate returned non-finite mean {value} at query {index}")]
    NonFiniteMean { index: usize, value: f64 },

    #[error("Surrogate returned {actual} predictions for {expected} queries")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Kernel matrix decomposition failed with {observations} observations")]
    DecompositionFailed { observations: usize },

    #[error("Observation value {value} at index {index} is not finite")]
    NonFiniteObservation { index: usize, value: f64 },
}

/// Runtime errors raised while driving the exploration loop.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExploreError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Surrogate error: {0}")]
    Surrogate(#[from] SurrogateError),

    #[error("Sampling exhausted: no state is visitable under the pessimistic safe set")]
    SamplingExhausted,

    #[error("Safe-set closure did not converge: {iterations} expansions exceeded cap {cap}")]
    ClosureDidNotConverge { iterations: usize, cap: usize },

    #[error("State {state} is outside the grid ({states} states)")]
    InvalidState { state: usize, states: usize },

    #[error("Action {action} is not available at state {state}")]
    InvalidAction { state: usize, action: usize },
}

impl ExploreError {
    /// Short error code for logging.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Surrogate(_) => "SURROGATE",
            Self::SamplingExhausted => "SAMPLING_EXHAUSTED",
            Self::ClosureDidNotConverge { .. } => "CLOSURE_CAP",
            Self::InvalidState { .. } => "INVALID_STATE",
            Self::InvalidAction { .. } => "INVALID_ACTION",
        }
    }

    /// True for errors that stem from construction-time configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// True when the loop has nowhere left to go (terminal, not a bug).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::SamplingExhausted)
    }
}

/// Crate result type.
pub type Result<T> = std::result::Result<T, ExploreError>;
