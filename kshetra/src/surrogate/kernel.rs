//! Squared-exponential kernel configuration.

use serde::{Deserialize, Serialize};

use crate::core::Coord2D;
use crate::error::ConfigError;

/// RBF kernel and Gaussian likelihood parameters.
///
/// `k(a, b) = variance * exp(-|a - b|² / (2 * lengthscale²))`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KernelConfig {
    /// Spatial correlation length (world units).
    pub lengthscale: f64,

    /// Prior signal variance.
    pub variance: f64,

    /// Observation noise variance.
    pub noise_variance: f64,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            lengthscale: 5.0,
            variance: 30.0,
            noise_variance: 0.001 * 0.001,
        }
    }
}

impl KernelConfig {
    /// Create a kernel with the given lengthscale, signal variance and noise standard deviation.
    pub fn new(lengthscale: f64, variance: f64, noise_std: f64) -> Self {
        Self {
            lengthscale,
            variance,
            noise_variance: noise_std * noise_std,
        }
    }

    /// Observation noise standard deviation.
    pub fn noise_std(&self) -> f64 {
        self.noise_variance.sqrt()
    }

    /// Kernel value between two coordinates.
    #[inline]
    pub fn eval(&self, a: &Coord2D, b: &Coord2D) -> f64 {
        let r2 = a.distance_squared(b);
        self.variance * (-0.5 * r2 / (self.lengthscale * self.lengthscale)).exp()
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.lengthscale.is_finite() && self.lengthscale > 0.0) {
            return Err(ConfigError::InvalidKernel(format!(
                "lengthscale must be positive, got {}",
                self.lengthscale
            )));
        }
        if !(self.variance.is_finite() && self.variance > 0.0) {
            return Err(ConfigError::InvalidKernel(format!(
                "variance must be positive, got {}",
                self.variance
            )));
        }
        if !(self.noise_variance.is_finite() && self.noise_variance >= 0.0) {
            return Err(ConfigError::InvalidKernel(format!(
                "noise variance must be non-negative, got {}",
                self.noise_variance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_eval() {
        let k = KernelConfig::new(2.0, 4.0, 0.1);
        let a = Coord2D::new(0.0, 0.0);
        assert!((k.eval(&a, &a) - 4.0).abs() < 1e-12);
        let b = Coord2D::new(2.0, 0.0);
        assert!((k.eval(&a, &b) - 4.0 * (-0.5f64).exp()).abs() < 1e-12);
        assert!((k.noise_std() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_kernel_validate() {
        assert!(KernelConfig::default().validate().is_ok());
        assert!(KernelConfig::new(0.0, 1.0, 0.1).validate().is_err());
        assert!(KernelConfig::new(1.0, -1.0, 0.1).validate().is_err());
    }
}
