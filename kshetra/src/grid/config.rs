//! Grid shape configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Grid configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Number of rows (first axis)
    pub rows: usize,

    /// Number of columns (second axis)
    pub cols: usize,

    /// Physical distance between adjacent rows
    pub step_x: f64,

    /// Physical distance between adjacent columns
    pub step_y: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 60,
            cols: 42,
            step_x: 1.0,
            step_y: 1.0,
        }
    }
}

impl GridConfig {
    /// Create a configuration with unit steps.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            step_x: 1.0,
            step_y: 1.0,
        }
    }

    /// Set per-axis step size.
    pub fn with_step(mut self, step_x: f64, step_y: f64) -> Self {
        self.step_x = step_x;
        self.step_y = step_y;
        self
    }

    /// Total number of states.
    pub fn state_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Check shape and step sizes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::InvalidShape {
                rows: self.rows,
                cols: self.cols,
            });
        }
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.step_x) || !positive(self.step_y) {
            return Err(ConfigError::InvalidStepSize {
                x: self.step_x,
                y: self.step_y,
            });
        }
        Ok(())
    }
}
