//! Fundamental types: actions and coordinates.

mod action;
mod point;

pub use action::{ACTION_COUNT, Action};
pub use point::Coord2D;
