//! Ground-truth elevation fields.
//!
//! The online algorithm never reads the true field directly. It is consulted
//! only when a measurement is ingested (the "sensor") and by the evaluation
//! oracle.

use crate::core::Coord2D;
use crate::error::ConfigError;
use crate::grid::{GridConfig, GridGraph};

/// Read-only access to the true scalar field.
pub trait TrueField {
    /// True elevation at a coordinate.
    fn elevation_at(&self, coord: Coord2D) -> f64;
}

impl<F: TrueField + ?Sized> TrueField for &F {
    fn elevation_at(&self, coord: Coord2D) -> f64 {
        (**self).elevation_at(coord)
    }
}

/// Elevation raster aligned with a [`GridGraph`].
///
/// Queries between cells snap to the nearest cell; queries outside the
/// raster clamp to the border.
#[derive(Clone, Debug)]
pub struct ElevationGrid {
    rows: usize,
    cols: usize,
    step_x: f64,
    step_y: f64,
    values: Vec<f64>,
}

impl ElevationGrid {
    /// Wrap a row-major elevation array.
    pub fn new(config: &GridConfig, values: Vec<f64>) -> Result<Self, ConfigError> {
        config.validate()?;
        if values.len() != config.state_count() {
            return Err(ConfigError::FieldShapeMismatch {
                expected: config.state_count(),
                actual: values.len(),
            });
        }
        Ok(Self {
            rows: config.rows,
            cols: config.cols,
            step_x: config.step_x,
            step_y: config.step_y,
            values,
        })
    }

    /// Sample a function of world coordinates at every state.
    pub fn from_fn(
        config: &GridConfig,
        f: impl Fn(Coord2D) -> f64,
    ) -> Result<Self, ConfigError> {
        let graph = GridGraph::new(config)?;
        let values = graph.coords().iter().map(|&c| f(c)).collect();
        Self::new(config, values)
    }

    /// Flat field (constant elevation).
    pub fn flat(config: &GridConfig, elevation: f64) -> Result<Self, ConfigError> {
        Self::new(config, vec![elevation; config.state_count()])
    }

    /// Shift elevations so the mid-range sits at zero.
    ///
    /// The zero-mean surrogate prior is much better calibrated on a field
    /// centred this way.
    pub fn centered(mut self) -> Self {
        let (min, max) = self.range();
        let mid = (min + max) / 2.0;
        for v in &mut self.values {
            *v -= mid;
        }
        self
    }

    /// (min, max) elevation.
    pub fn range(&self) -> (f64, f64) {
        self.values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Elevation of a state index.
    #[inline]
    pub fn value(&self, state: usize) -> f64 {
        self.values[state]
    }

    /// All elevations, row-major.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the raster is empty (never true for a validated grid).
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn nearest_index(&self, coord: Coord2D) -> usize {
        let snap = |v: f64, step: f64, n: usize| -> usize {
            let i = (v / step).round();
            if i <= 0.0 {
                0
            } else {
                (i as usize).min(n - 1)
            }
        };
        let row = snap(coord.x, self.step_x, self.rows);
        let col = snap(coord.y, self.step_y, self.cols);
        row * self.cols + col
    }
}

impl TrueField for ElevationGrid {
    fn elevation_at(&self, coord: Coord2D) -> f64 {
        self.values[self.nearest_index(coord)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch() {
        let config = GridConfig::new(2, 3);
        let err = ElevationGrid::new(&config, vec![0.0; 5]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::FieldShapeMismatch {
                expected: 6,
                actual: 5
            }
        );
    }

    #[test]
    fn test_elevation_lookup() {
        let config = GridConfig::new(3, 3).with_step(2.0, 1.0);
        let field = ElevationGrid::from_fn(&config, |c| c.x * 10.0 + c.y).unwrap();
        assert_eq!(field.elevation_at(Coord2D::new(2.0, 1.0)), 21.0);
        // Snaps to nearest cell
        assert_eq!(field.elevation_at(Coord2D::new(2.2, 0.9)), 21.0);
        // Clamps outside
        assert_eq!(field.elevation_at(Coord2D::new(-5.0, 10.0)), 2.0);
    }

    #[test]
    fn test_centered() {
        let config = GridConfig::new(1, 3);
        let field = ElevationGrid::new(&config, vec![10.0, 14.0, 12.0])
            .unwrap()
            .centered();
        assert_eq!(field.values(), &[-2.0, 2.0, 0.0]);
        assert_eq!(field.range(), (-2.0, 2.0));
    }
}
