//! Fixed topology of the exploration grid.

use crate::core::{ACTION_COUNT, Action, Coord2D};
use crate::error::ConfigError;

use super::GridConfig;

/// States, 4-connected transitions and coordinates of a rectangular grid.
///
/// States are indexed row-major: `index = row * cols + col`. The transition
/// table is built once and never changes; moves that would leave the grid
/// are stored as `None` and stay unavailable forever.
#[derive(Clone, Debug)]
pub struct GridGraph {
    rows: usize,
    cols: usize,
    step_x: f64,
    step_y: f64,
    coords: Vec<Coord2D>,
    /// `targets[s][a]`: state reached from `s` via action `a`.
    targets: Vec<[Option<usize>; ACTION_COUNT]>,
}

impl GridGraph {
    /// Build the graph for a validated grid configuration.
    pub fn new(config: &GridConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let rows = config.rows;
        let cols = config.cols;
        let mut coords = Vec::with_capacity(rows * cols);
        let mut targets = Vec::with_capacity(rows * cols);

        for row in 0..rows {
            for col in 0..cols {
                coords.push(Coord2D::new(
                    row as f64 * config.step_x,
                    col as f64 * config.step_y,
                ));

                let mut slots = [None; ACTION_COUNT];
                for action in Action::ALL {
                    let (dr, dc) = action.offset();
                    let r = row as isize + dr;
                    let c = col as isize + dc;
                    if r >= 0 && c >= 0 && (r as usize) < rows && (c as usize) < cols {
                        slots[action.index()] = Some(r as usize * cols + c as usize);
                    }
                }
                targets.push(slots);
            }
        }

        Ok(Self {
            rows,
            cols,
            step_x: config.step_x,
            step_y: config.step_y,
            coords,
            targets,
        })
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// (row, col) step sizes.
    #[inline]
    pub fn step(&self) -> (f64, f64) {
        (self.step_x, self.step_y)
    }

    /// Total number of states.
    #[inline]
    pub fn state_count(&self) -> usize {
        self.coords.len()
    }

    /// Whether `state` is a valid index.
    #[inline]
    pub fn contains(&self, state: usize) -> bool {
        state < self.coords.len()
    }

    /// Flattened index of `(row, col)`, if inside the grid.
    pub fn index_of(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }

    /// `(row, col)` of a state.
    #[inline]
    pub fn row_col(&self, state: usize) -> (usize, usize) {
        (state / self.cols, state % self.cols)
    }

    /// Coordinate of a state.
    #[inline]
    pub fn coord(&self, state: usize) -> Coord2D {
        self.coords[state]
    }

    /// All state coordinates in index order.
    pub fn coords(&self) -> &[Coord2D] {
        &self.coords
    }

    /// Target of `action` from `state`, or `None` if the move exits the grid.
    #[inline]
    pub fn target(&self, state: usize, action: Action) -> Option<usize> {
        self.targets.get(state).and_then(|t| t[action.index()])
    }

    /// Physical displacement of an action.
    pub fn displacement(&self, action: Action) -> Coord2D {
        let (dr, dc) = action.offset();
        Coord2D::new(dr as f64 * self.step_x, dc as f64 * self.step_y)
    }

    /// Length of the displacement of an action (slope scale factor).
    #[inline]
    pub fn step_length(&self, action: Action) -> f64 {
        self.displacement(action).length()
    }

    /// Grid (Manhattan) distance between two states.
    pub fn manhattan_distance(&self, a: usize, b: usize) -> usize {
        let (ra, ca) = self.row_col(a);
        let (rb, cb) = self.row_col(b);
        ra.abs_diff(rb) + ca.abs_diff(cb)
    }

    /// Iterate all available moves as `(source, action, target)`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, Action, usize)> + '_ {
        self.targets.iter().enumerate().flat_map(|(s, slots)| {
            Action::MOVES
                .iter()
                .filter_map(move |&a| slots[a.index()].map(|t| (s, a, t)))
        })
    }

    /// Number of available moves.
    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }

    /// States `p` with a move `p --a--> state`, paired with that action.
    pub fn predecessors(&self, state: usize) -> impl Iterator<Item = (usize, Action)> + '_ {
        Action::MOVES.iter().filter_map(move |&a| {
            self.target(state, a.reverse()).map(|p| (p, a))
        })
    }
}
