//! Initial trusted safe set.

use std::collections::VecDeque;

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::Action;
use crate::error::ConfigError;
use crate::field::TrueField;
use crate::grid::GridGraph;

use super::SafetyMatrix;

/// How to build the seed from the true field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Center state. `None` picks a random admissible state.
    #[serde(default)]
    pub center: Option<usize>,

    /// Grid radius (Manhattan) of the seed neighbourhood.
    #[serde(default = "default_radius")]
    pub radius: usize,
}

fn default_radius() -> usize {
    1
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            center: None,
            radius: default_radius(),
        }
    }
}

/// Trusted (state, action) pairs. Never retracted during exploration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedSet {
    matrix: SafetyMatrix,
}

impl SeedSet {
    /// Build a seed from explicit entries. Moves must exist in `graph`.
    pub fn from_entries(graph: &GridGraph, entries: &[(usize, Action)]) -> Result<Self, ConfigError> {
        let mut matrix = SafetyMatrix::new(graph.state_count());
        for &(state, action) in entries {
            if graph.target(state, action).is_none() {
                return Err(ConfigError::SeedOutOfGrid {
                    state,
                    action: action.index(),
                });
            }
            matrix.set(state, action, true);
        }
        Self::from_matrix(graph, matrix)
    }

    /// Wrap an existing matrix, checking shape, membership and non-emptiness.
    pub fn from_matrix(graph: &GridGraph, matrix: SafetyMatrix) -> Result<Self, ConfigError> {
        if matrix.state_count() != graph.state_count() {
            return Err(ConfigError::SeedShapeMismatch {
                expected: graph.state_count(),
                actual: matrix.state_count(),
            });
        }
        if let Some((state, action)) = matrix
            .iter_set()
            .find(|&(s, a)| graph.target(s, a).is_none())
        {
            return Err(ConfigError::SeedOutOfGrid {
                state,
                action: action.index(),
            });
        }
        if matrix.is_empty() {
            return Err(ConfigError::EmptySeed);
        }
        Ok(Self { matrix })
    }

    /// Seed consisting of the given actions at a single state.
    pub fn single_state(
        graph: &GridGraph,
        state: usize,
        actions: &[Action],
    ) -> Result<Self, ConfigError> {
        let entries: Vec<_> = actions.iter().map(|&a| (state, a)).collect();
        Self::from_entries(graph, &entries)
    }

    /// Seed grown from `center` over moves that are safe in both directions
    /// under the true field, up to `radius` grid steps away.
    ///
    /// Every visited state gets its stay flag; every traversed edge is added
    /// together with its reverse.
    pub fn around(
        graph: &GridGraph,
        field: &dyn TrueField,
        center: usize,
        radius: usize,
        threshold: f64,
    ) -> Result<Self, ConfigError> {
        if !graph.contains(center) {
            return Err(ConfigError::SeedOutOfGrid {
                state: center,
                action: Action::Stay.index(),
            });
        }

        let elevation: Vec<f64> = graph
            .coords()
            .iter()
            .map(|&c| field.elevation_at(c))
            .collect();

        let mut matrix = SafetyMatrix::new(graph.state_count());
        let mut depth = vec![usize::MAX; graph.state_count()];
        let mut queue = VecDeque::new();

        depth[center] = 0;
        matrix.set(center, Action::Stay, true);
        queue.push_back(center);

        while let Some(s) = queue.pop_front() {
            if depth[s] >= radius {
                continue;
            }
            for action in Action::MOVES {
                let Some(t) = graph.target(s, action) else {
                    continue;
                };
                let forward = elevation[t] - elevation[s];
                if forward < threshold || -forward < threshold {
                    continue;
                }
                matrix.set(s, action, true);
                matrix.set(t, action.reverse(), true);
                if depth[t] == usize::MAX {
                    depth[t] = depth[s] + 1;
                    matrix.set(t, Action::Stay, true);
                    queue.push_back(t);
                }
            }
        }

        debug!(
            "[Seed] center={} radius={}: {} entries",
            center,
            radius,
            matrix.count()
        );
        Self::from_matrix(graph, matrix)
    }

    /// [`SeedSet::around`] at a random state that has at least one move safe
    /// in both directions. Falls back to a stay-only seed when none exists.
    pub fn random_center<R: Rng + ?Sized>(
        graph: &GridGraph,
        field: &dyn TrueField,
        radius: usize,
        threshold: f64,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        let admissible: Vec<usize> = (0..graph.state_count())
            .filter(|&s| has_two_way_move(graph, field, s, threshold))
            .collect();

        let center = if admissible.is_empty() {
            rng.gen_range(0..graph.state_count())
        } else {
            admissible[rng.gen_range(0..admissible.len())]
        };
        Self::around(graph, field, center, radius, threshold)
    }

    /// Build from a [`SeedConfig`], drawing the center from `rng` if unset.
    pub fn from_config<R: Rng + ?Sized>(
        graph: &GridGraph,
        field: &dyn TrueField,
        config: &SeedConfig,
        threshold: f64,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        match config.center {
            Some(center) => Self::around(graph, field, center, config.radius, threshold),
            None => Self::random_center(graph, field, config.radius, threshold, rng),
        }
    }

    #[inline]
    pub fn contains(&self, state: usize, action: Action) -> bool {
        self.matrix.get(state, action)
    }

    /// States with at least one seed entry, ascending.
    pub fn states(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.matrix.state_count()).filter(|&s| self.matrix.any(s))
    }

    pub fn matrix(&self) -> &SafetyMatrix {
        &self.matrix
    }

    /// Number of (state, action) entries.
    pub fn len(&self) -> usize {
        self.matrix.count()
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.is_empty()
    }

    pub fn state_count(&self) -> usize {
        self.matrix.state_count()
    }
}

fn has_two_way_move(graph: &GridGraph, field: &dyn TrueField, s: usize, threshold: f64) -> bool {
    let here = field.elevation_at(graph.coord(s));
    Action::MOVES.iter().any(|&a| {
        graph.target(s, a).is_some_and(|t| {
            let d = field.elevation_at(graph.coord(t)) - here;
            d >= threshold && -d >= threshold
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::ElevationGrid;
    use crate::grid::GridConfig;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn graph(rows: usize, cols: usize) -> GridGraph {
        GridGraph::new(&GridConfig::new(rows, cols)).unwrap()
    }

    #[test]
    fn test_from_entries_validation() {
        let g = graph(2, 2);
        assert_eq!(
            SeedSet::from_entries(&g, &[]),
            Err(ConfigError::EmptySeed)
        );
        assert_eq!(
            SeedSet::from_entries(&g, &[(0, Action::Up)]),
            Err(ConfigError::SeedOutOfGrid { state: 0, action: 4 })
        );
        assert_eq!(
            SeedSet::from_entries(&g, &[(9, Action::Stay)]),
            Err(ConfigError::SeedOutOfGrid { state: 9, action: 0 })
        );
        let seed = SeedSet::from_entries(&g, &[(0, Action::Stay), (0, Action::Right)]).unwrap();
        assert_eq!(seed.len(), 2);
        assert_eq!(seed.states().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_from_matrix_shape() {
        let g = graph(2, 2);
        let err = SeedSet::from_matrix(&g, SafetyMatrix::new(3)).unwrap_err();
        assert_eq!(err, ConfigError::SeedShapeMismatch { expected: 4, actual: 3 });
    }

    #[test]
    fn test_around_flat_field() {
        let config = GridConfig::new(5, 5);
        let g = GridGraph::new(&config).unwrap();
        let field = ElevationGrid::flat(&config, 0.0).unwrap();
        let seed = SeedSet::around(&g, &field, 12, 1, -0.5).unwrap();

        // Center plus four neighbours
        assert_eq!(seed.states().count(), 5);
        assert!(seed.contains(12, Action::Stay));
        assert!(seed.contains(12, Action::Up));
        assert!(seed.contains(7, Action::Down));
        assert!(seed.contains(7, Action::Stay));
        // Radius 1: neighbours do not expand further
        assert!(!seed.contains(7, Action::Up));
    }

    #[test]
    fn test_around_skips_steep_edges() {
        let config = GridConfig::new(1, 3);
        let g = GridGraph::new(&config).unwrap();
        // 0 -> 1 drops by 2; not safe in the reverse direction either way
        let field = ElevationGrid::new(&config, vec![0.0, -2.0, -2.0]).unwrap();
        let seed = SeedSet::around(&g, &field, 0, 2, -0.5).unwrap();
        assert_eq!(seed.len(), 1);
        assert!(seed.contains(0, Action::Stay));
    }

    #[test]
    fn test_random_center_deterministic() {
        let config = GridConfig::new(4, 4);
        let g = GridGraph::new(&config).unwrap();
        let field = ElevationGrid::flat(&config, 1.0).unwrap();
        let a = SeedSet::random_center(&g, &field, 1, -0.5, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = SeedSet::random_center(&g, &field, 1, -0.5, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
        assert!(a.len() > 1);
    }
}
