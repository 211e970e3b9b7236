//! Exact Gaussian-process regression with an RBF kernel.

use log::trace;
use nalgebra::{Cholesky, DMatrix, DVector, Dyn};

use crate::core::Coord2D;
use crate::error::{ConfigError, SurrogateError};

use super::{KernelConfig, Prediction, Surrogate};

/// Relative diagonal jitter keeping the Gram matrix positive definite
/// when observations repeat and noise is zero.
const JITTER: f64 = 1e-10;

/// Zero-mean Gaussian process over 2-D coordinates.
///
/// The posterior is recomputed from scratch (Cholesky of `K + σ²I`) after
/// every change to the observation set. Predictions report the latent
/// variance, i.e. without the likelihood noise.
#[derive(Clone, Debug)]
pub struct GaussianProcess {
    kernel: KernelConfig,
    inputs: Vec<Coord2D>,
    targets: Vec<f64>,
    factor: Option<Cholesky<f64, Dyn>>,
    alpha: DVector<f64>,
}

impl GaussianProcess {
    /// Create a GP with no observations.
    pub fn new(kernel: KernelConfig) -> Result<Self, ConfigError> {
        kernel.validate()?;
        Ok(Self {
            kernel,
            inputs: Vec::new(),
            targets: Vec::new(),
            factor: None,
            alpha: DVector::zeros(0),
        })
    }

    /// Create a GP conditioned on initial observations.
    pub fn with_data(
        kernel: KernelConfig,
        coords: &[Coord2D],
        values: &[f64],
    ) -> crate::Result<Self> {
        let mut gp = Self::new(kernel)?;
        gp.update(coords, values)?;
        Ok(gp)
    }

    /// Kernel configuration.
    pub fn kernel(&self) -> &KernelConfig {
        &self.kernel
    }

    /// Observed coordinates, oldest first.
    pub fn inputs(&self) -> &[Coord2D] {
        &self.inputs
    }

    /// Observed values, oldest first.
    pub fn targets(&self) -> &[f64] {
        &self.targets
    }

    /// Replace the whole observation set. On failure the previous set is
    /// kept.
    pub fn set_data(&mut self, coords: &[Coord2D], values: &[f64]) -> Result<(), SurrogateError> {
        check_batch(coords, values)?;
        let inputs = std::mem::replace(&mut self.inputs, coords.to_vec());
        let targets = std::mem::replace(&mut self.targets, values.to_vec());

        if let Err(e) = self.refit() {
            self.inputs = inputs;
            self.targets = targets;
            self.refit().ok();
            return Err(e);
        }
        Ok(())
    }

    /// Discard the `n` oldest observations.
    ///
    /// Used to drop initialisation samples once the seed has been measured.
    pub fn drop_first(&mut self, n: usize) -> Result<(), SurrogateError> {
        let n = n.min(self.inputs.len());
        self.inputs.drain(..n);
        self.targets.drain(..n);
        self.refit()
    }

    fn refit(&mut self) -> Result<(), SurrogateError> {
        let n = self.inputs.len();
        if n == 0 {
            self.factor = None;
            self.alpha = DVector::zeros(0);
            return Ok(());
        }

        let diagonal = self.kernel.noise_variance + JITTER * self.kernel.variance;
        let gram = DMatrix::from_fn(n, n, |i, j| {
            let k = self.kernel.eval(&self.inputs[i], &self.inputs[j]);
            if i == j { k + diagonal } else { k }
        });

        let factor =
            Cholesky::new(gram).ok_or(SurrogateError::DecompositionFailed { observations: n })?;
        let y = DVector::from_column_slice(&self.targets);
        self.alpha = factor.solve(&y);
        self.factor = Some(factor);

        trace!("[GP] refit with {} observations", n);
        Ok(())
    }
}

impl Surrogate for GaussianProcess {
    fn predict(&self, coords: &[Coord2D]) -> Result<Prediction, SurrogateError> {
        let Some(factor) = &self.factor else {
            return Ok(Prediction {
                means: vec![0.0; coords.len()],
                variances: vec![self.kernel.variance; coords.len()],
            });
        };

        let n = self.inputs.len();
        let m = coords.len();
        let cross = DMatrix::from_fn(n, m, |i, j| self.kernel.eval(&self.inputs[i], &coords[j]));

        let means = cross.tr_mul(&self.alpha);
        let v = factor
            .l()
            .solve_lower_triangular(&cross)
            .ok_or(SurrogateError::DecompositionFailed { observations: n })?;

        // Round-off can push a variance a hair below zero; anything larger
        // is a genuine failure.
        let tolerance = 1e-9 * self.kernel.variance;
        let mut variances = Vec::with_capacity(m);
        for (index, column) in v.column_iter().enumerate() {
            let var = self.kernel.variance - column.norm_squared();
            if var < -tolerance || !var.is_finite() {
                return Err(SurrogateError::InvalidVariance { index, value: var });
            }
            variances.push(var.max(0.0));
        }

        Ok(Prediction {
            means: means.iter().copied().collect(),
            variances,
        })
    }

    fn update(&mut self, coords: &[Coord2D], values: &[f64]) -> Result<(), SurrogateError> {
        check_batch(coords, values)?;
        let previous = self.inputs.len();
        self.inputs.extend_from_slice(coords);
        self.targets.extend_from_slice(values);

        if let Err(e) = self.refit() {
            self.inputs.truncate(previous);
            self.targets.truncate(previous);
            // The previous set factorised before, so this cannot fail.
            self.refit().ok();
            return Err(e);
        }
        Ok(())
    }

    fn observation_count(&self) -> usize {
        self.inputs.len()
    }
}

fn check_batch(coords: &[Coord2D], values: &[f64]) -> Result<(), SurrogateError> {
    if coords.len() != values.len() {
        return Err(SurrogateError::DimensionMismatch {
            expected: coords.len(),
            actual: values.len(),
        });
    }
    if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(SurrogateError::NonFiniteObservation { index, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kernel() -> KernelConfig {
        KernelConfig::new(1.5, 2.0, 0.01)
    }

    #[test]
    fn test_prior_prediction() {
        let gp = GaussianProcess::new(kernel()).unwrap();
        let p = gp.predict(&[Coord2D::ZERO, Coord2D::new(3.0, 1.0)]).unwrap();
        assert_eq!(p.means, vec![0.0, 0.0]);
        assert_eq!(p.variances, vec![2.0, 2.0]);
    }

    #[test]
    fn test_interpolates_observation() {
        let x = Coord2D::new(1.0, 2.0);
        let gp = GaussianProcess::with_data(kernel(), &[x], &[0.7]).unwrap();
        let p = gp.predict(&[x]).unwrap();
        assert!((p.means[0] - 0.7).abs() < 1e-3);
        assert!(p.variances[0] < 1e-3);
    }

    #[test]
    fn test_variance_grows_with_distance() {
        let gp = GaussianProcess::with_data(kernel(), &[Coord2D::ZERO], &[0.0]).unwrap();
        let p = gp
            .predict(&[
                Coord2D::new(1.0, 0.0),
                Coord2D::new(2.0, 0.0),
                Coord2D::new(4.0, 0.0),
            ])
            .unwrap();
        assert!(p.variances[0] < p.variances[1]);
        assert!(p.variances[1] < p.variances[2]);
        assert!(p.variances[2] <= 2.0);
    }

    #[test]
    fn test_zero_observations_give_zero_mean() {
        let coords = [Coord2D::ZERO, Coord2D::new(1.0, 0.0), Coord2D::new(0.0, 1.0)];
        let gp = GaussianProcess::with_data(kernel(), &coords, &[0.0; 3]).unwrap();
        let p = gp.predict(&[Coord2D::new(2.0, 2.0)]).unwrap();
        assert_eq!(p.means[0], 0.0);
    }

    #[test]
    fn test_repeated_observations_factorise() {
        let x = Coord2D::new(0.5, 0.5);
        let noiseless = KernelConfig::new(1.0, 1.0, 0.0);
        let gp = GaussianProcess::with_data(noiseless, &[x, x, x], &[1.0, 1.0, 1.0]).unwrap();
        assert_eq!(gp.observation_count(), 3);
        let p = gp.predict(&[x]).unwrap();
        assert!((p.means[0] - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_drop_first() {
        let coords = [Coord2D::ZERO, Coord2D::new(5.0, 0.0)];
        let mut gp = GaussianProcess::with_data(kernel(), &coords, &[3.0, -1.0]).unwrap();
        gp.drop_first(1).unwrap();
        assert_eq!(gp.observation_count(), 1);
        assert_eq!(gp.targets(), &[-1.0]);
        assert_eq!(gp.inputs(), &[Coord2D::new(5.0, 0.0)]);
    }

    #[test]
    fn test_failed_set_data_keeps_previous_fit() {
        let x = Coord2D::new(1.0, 0.0);
        let mut gp = GaussianProcess::with_data(kernel(), &[x], &[0.5]).unwrap();

        // A NaN coordinate poisons the Gram matrix
        let err = gp
            .set_data(&[Coord2D::new(f64::NAN, 0.0), Coord2D::new(1.0, 1.0)], &[1.0, 1.0])
            .unwrap_err();
        assert_eq!(err, SurrogateError::DecompositionFailed { observations: 2 });
        assert_eq!(gp.observation_count(), 1);
        assert_eq!(gp.inputs(), &[x]);

        let p = gp.predict(&[x, Coord2D::new(2.0, 2.0)]).unwrap();
        assert!((p.means[0] - 0.5).abs() < 1e-2);
        assert_eq!(p.variances.len(), 2);
    }

    #[test]
    fn test_set_data_replaces_observations() {
        let mut gp = GaussianProcess::with_data(kernel(), &[Coord2D::ZERO], &[3.0]).unwrap();
        let y = Coord2D::new(4.0, 4.0);
        gp.set_data(&[y], &[-2.0]).unwrap();
        assert_eq!(gp.inputs(), &[y]);
        let p = gp.predict(&[y]).unwrap();
        assert!((p.means[0] + 2.0).abs() < 1e-2);
    }

    #[test]
    fn test_rejects_mismatched_batch() {
        let mut gp = GaussianProcess::new(kernel()).unwrap();
        let err = gp.update(&[Coord2D::ZERO], &[]).unwrap_err();
        assert!(matches!(err, SurrogateError::DimensionMismatch { .. }));
        let err = gp.update(&[Coord2D::ZERO], &[f64::NAN]).unwrap_err();
        assert!(matches!(err, SurrogateError::NonFiniteObservation { .. }));
        assert_eq!(gp.observation_count(), 0);
    }
}
