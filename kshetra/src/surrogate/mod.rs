//! Surrogate regression boundary.
//!
//! The safe-set engine only needs two capabilities from a regression model:
//! posterior prediction and online update. Any model satisfying
//! [`Surrogate`] can be substituted without touching the core; a reference
//! exact Gaussian process is provided in [`GaussianProcess`].

mod gp;
mod kernel;

pub use gp::GaussianProcess;
pub use kernel::KernelConfig;

use crate::core::Coord2D;
use crate::error::SurrogateError;

/// Posterior predictions at a batch of query coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Prediction {
    /// Posterior means, one per query.
    pub means: Vec<f64>,
    /// Posterior (latent) variances, one per query.
    pub variances: Vec<f64>,
}

impl Prediction {
    /// Check that the prediction matches `expected` queries and is numerically usable.
    pub fn validate(&self, expected: usize) -> Result<(), SurrogateError> {
        if self.means.len() != expected || self.variances.len() != expected {
            let actual = if self.means.len() != expected {
                self.means.len()
            } else {
                self.variances.len()
            };
            return Err(SurrogateError::DimensionMismatch { expected, actual });
        }
        if let Some((index, &value)) = self.means.iter().enumerate().find(|(_, m)| !m.is_finite())
        {
            return Err(SurrogateError::NonFiniteMean { index, value });
        }
        if let Some((index, &value)) = self
            .variances
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(SurrogateError::InvalidVariance { index, value });
        }
        Ok(())
    }
}

/// Probabilistic regression model of the unknown field.
pub trait Surrogate {
    /// Posterior mean and variance at each coordinate.
    fn predict(&self, coords: &[Coord2D]) -> Result<Prediction, SurrogateError>;

    /// Append observations and refresh the posterior.
    fn update(&mut self, coords: &[Coord2D], values: &[f64]) -> Result<(), SurrogateError>;

    /// Number of observations held.
    fn observation_count(&self) -> usize;
}
