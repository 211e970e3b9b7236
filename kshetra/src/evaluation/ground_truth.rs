//! True safe sets from the real elevation field.

use log::debug;

use crate::core::Action;
use crate::error::{ConfigError, Result};
use crate::field::TrueField;
use crate::grid::GridGraph;
use crate::safety::{SafeSetPropagator, SafetyMatrix, SeedSet};

use super::metrics::{EvaluationReport, coverage_percent, false_safe_count};

/// True safe set: every state is state-level safe, and a move is safe when
/// the exact elevation change passes `threshold`.
pub fn true_safe_set(graph: &GridGraph, field: &dyn TrueField, threshold: f64) -> SafetyMatrix {
    let elevation: Vec<f64> = graph
        .coords()
        .iter()
        .map(|&c| field.elevation_at(c))
        .collect();

    let mut safe = SafetyMatrix::from_state_flags(&vec![true; graph.state_count()]);
    for (s, action, t) in graph.edges() {
        safe.set(s, action, elevation[t] - elevation[s] >= threshold);
    }
    safe
}

/// Reject a threshold under which the field makes no move safe, or every
/// move safe.
pub fn check_threshold(
    graph: &GridGraph,
    field: &dyn TrueField,
    threshold: f64,
) -> std::result::Result<(), ConfigError> {
    let safe = true_safe_set(graph, field, threshold);
    let total_moves = graph.edge_count();
    let safe_moves = graph.edges().filter(|&(s, a, _)| safe.get(s, a)).count();

    if total_moves > 0 && (safe_moves == 0 || safe_moves == total_moves) {
        return Err(ConfigError::DegenerateThreshold {
            threshold,
            safe_moves,
            total_moves,
        });
    }
    Ok(())
}

/// Reachable-and-returnable closure of `true_safe` from the seed.
pub fn true_s_hat(graph: &GridGraph, true_safe: &SafetyMatrix, seed: &SeedSet) -> Result<SafetyMatrix> {
    SafeSetPropagator::new().compute(graph, true_safe, seed)
}

/// Ground truth for one experiment.
#[derive(Clone, Debug)]
pub struct GroundTruth {
    /// Safety threshold h.
    pub threshold: f64,
    /// Noise margin ε used for coverage.
    pub epsilon: f64,
    /// True safe set at `h`.
    pub safe: SafetyMatrix,
    /// True S_hat at `h` (false-safe reference).
    pub s_hat: SafetyMatrix,
    /// True S_hat at `h + ε` (coverage reference).
    pub s_hat_epsilon: SafetyMatrix,
}

impl GroundTruth {
    /// Compute the true sets at `h` and `h + ε`.
    pub fn compute(
        graph: &GridGraph,
        field: &dyn TrueField,
        threshold: f64,
        epsilon: f64,
        seed: &SeedSet,
    ) -> Result<Self> {
        let safe = true_safe_set(graph, field, threshold);
        let s_hat = true_s_hat(graph, &safe, seed)?;
        let safe_epsilon = true_safe_set(graph, field, threshold + epsilon);
        let s_hat_epsilon = true_s_hat(graph, &safe_epsilon, seed)?;

        debug!(
            "[GroundTruth] h={:.4} eps={:.4}: |S|={} |S_hat|={} |S_hat_eps|={}",
            threshold,
            epsilon,
            safe.count(),
            s_hat.count(),
            s_hat_epsilon.count()
        );

        Ok(Self {
            threshold,
            epsilon,
            safe,
            s_hat,
            s_hat_epsilon,
        })
    }

    /// Score an online S_hat.
    pub fn evaluate(&self, s_hat: &SafetyMatrix) -> EvaluationReport {
        EvaluationReport {
            coverage: coverage_percent(s_hat, &self.s_hat_epsilon),
            false_safe: false_safe_count(s_hat, &self.s_hat),
            s_hat_size: s_hat.count(),
            reference_size: self.s_hat_epsilon.count(),
        }
    }

    /// Entries of the true S_hat that are moves (not stay flags).
    pub fn certified_moves(&self) -> usize {
        self.s_hat
            .iter_set()
            .filter(|&(_, a)| a != Action::Stay)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::ElevationGrid;
    use crate::grid::GridConfig;

    #[test]
    fn test_true_safe_set_slope_test() {
        let config = GridConfig::new(1, 3);
        let graph = GridGraph::new(&config).unwrap();
        let field = ElevationGrid::new(&config, vec![0.0, -0.4, -1.0]).unwrap();
        let safe = true_safe_set(&graph, &field, -0.5);

        assert!(safe.get(0, Action::Stay) && safe.get(2, Action::Stay));
        // Descending 0.4 is fine, 0.6 is not; climbing is always fine
        assert!(safe.get(0, Action::Right));
        assert!(!safe.get(1, Action::Right));
        assert!(safe.get(2, Action::Left));
        assert!(safe.get(1, Action::Left));
    }

    #[test]
    fn test_degenerate_threshold() {
        let config = GridConfig::new(1, 3);
        let graph = GridGraph::new(&config).unwrap();

        let flat = ElevationGrid::flat(&config, 0.0).unwrap();
        assert_eq!(
            check_threshold(&graph, &flat, -0.5),
            Err(ConfigError::DegenerateThreshold {
                threshold: -0.5,
                safe_moves: 4,
                total_moves: 4,
            })
        );

        // Zig-zag: every move drops or climbs by 2
        let jagged = ElevationGrid::new(&config, vec![0.0, 2.0, 0.0]).unwrap();
        assert!(check_threshold(&graph, &jagged, -0.5).is_ok());
        // A lenient enough h lets every drop through
        assert!(matches!(
            check_threshold(&graph, &jagged, -3.0),
            Err(ConfigError::DegenerateThreshold { safe_moves: 4, .. })
        ));
    }

    #[test]
    fn test_epsilon_is_stricter() {
        let config = GridConfig::new(3, 3);
        let graph = GridGraph::new(&config).unwrap();
        let field = ElevationGrid::from_fn(&config, |c| -0.3 * c.y).unwrap();
        let seed = SeedSet::single_state(&graph, 0, &[Action::Stay]).unwrap();

        let truth = GroundTruth::compute(&graph, &field, -0.5, 0.25, &seed).unwrap();
        assert!(truth.s_hat_epsilon.is_subset_of(&truth.s_hat));
        assert!(truth.s_hat_epsilon.count() < truth.s_hat.count());
        assert_eq!(truth.evaluate(&truth.s_hat).false_safe, 0);
    }

    #[test]
    fn test_one_way_slope_not_in_s_hat() {
        // Drop of 1 between columns: can go back up, not down
        let config = GridConfig::new(1, 2);
        let graph = GridGraph::new(&config).unwrap();
        let field = ElevationGrid::new(&config, vec![0.0, -1.0]).unwrap();
        let seed = SeedSet::single_state(&graph, 0, &[Action::Stay]).unwrap();
        let truth = GroundTruth::compute(&graph, &field, -0.5, 0.0, &seed).unwrap();

        assert!(truth.safe.get(1, Action::Left));
        assert!(!truth.s_hat.get(1, Action::Stay));
        assert!(!truth.s_hat.get(1, Action::Left));
        assert_eq!(truth.certified_moves(), 0);
    }
}
