//! Continuous coordinates for grid states.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Position in continuous (world) space.
///
/// `x` follows the grid row axis and `y` the column axis, so state
/// `(row, col)` sits at `(row * step_x, col * step_y)`.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Coord2D {
    /// Position along the row axis.
    pub x: f64,
    /// Position along the column axis.
    pub y: f64,
}

impl Coord2D {
    /// Create a new coordinate.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Origin.
    pub const ZERO: Coord2D = Coord2D { x: 0.0, y: 0.0 };

    /// Euclidean distance to another coordinate.
    #[inline]
    pub fn distance(&self, other: &Coord2D) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Squared distance (avoids sqrt).
    #[inline]
    pub fn distance_squared(&self, other: &Coord2D) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Euclidean norm.
    #[inline]
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl Add for Coord2D {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Coord2D::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Coord2D {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Coord2D::new(self.x - other.x, self.y - other.y)
    }
}
