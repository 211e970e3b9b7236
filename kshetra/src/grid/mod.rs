//! Grid graph over which exploration happens.
//!
//! ```text
//!   col →   0     1     2
//! row 0   [ 0 ]─[ 1 ]─[ 2 ]
//!           │     │     │
//! row 1   [ 3 ]─[ 4 ]─[ 5 ]
//!           │     │     │
//! row 2   [ 6 ]─[ 7 ]─[ 8 ]
//! ```
//!
//! Every state carries a coordinate (`row * step_x`, `col * step_y`) and a
//! slot per [`Action`](crate::core::Action). Slots for moves leaving the grid
//! are permanently empty.

mod config;
mod graph;

pub use config::GridConfig;
pub use graph::GridGraph;
