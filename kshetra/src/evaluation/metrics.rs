//! Coverage and false-safe metrics.

use serde::{Deserialize, Serialize};

use crate::safety::SafetyMatrix;

/// Percentage of `reference` entries also present in `s_hat`.
///
/// An empty reference counts as fully covered.
pub fn coverage_percent(s_hat: &SafetyMatrix, reference: &SafetyMatrix) -> f64 {
    let total = reference.count();
    if total == 0 {
        return 100.0;
    }
    100.0 * s_hat.count_and(reference) as f64 / total as f64
}

/// Entries of `s_hat` missing from `true_s_hat`.
pub fn false_safe_count(s_hat: &SafetyMatrix, true_s_hat: &SafetyMatrix) -> usize {
    s_hat.count_and_not(true_s_hat)
}

/// Score of one S_hat against the ground truth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Coverage of the ε-widened true S_hat, in percent.
    pub coverage: f64,
    /// Entries certified online that are not truly safe.
    pub false_safe: usize,
    /// Entries in the online S_hat.
    pub s_hat_size: usize,
    /// Entries in the ε-widened true S_hat.
    pub reference_size: usize,
}

impl EvaluationReport {
    pub fn print(&self) {
        println!(
            "Coverage {:.2}% ({} / {} reference), false safe {}",
            self.coverage, self.s_hat_size, self.reference_size, self.false_safe
        );
    }
}

/// Coverage values over successive iterations.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageTrace {
    values: Vec<f64>,
}

impl CoverageTrace {
    pub fn push(&mut self, coverage: f64) {
        self.values.push(coverage);
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Index of the first drop larger than `tolerance`, if any.
    pub fn first_decrease(&self, tolerance: f64) -> Option<usize> {
        self.values
            .windows(2)
            .position(|w| w[1] < w[0] - tolerance)
            .map(|i| i + 1)
    }

    /// Coverage never dropped by more than `tolerance`.
    pub fn is_monotonic(&self, tolerance: f64) -> bool {
        self.first_decrease(tolerance).is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Action;

    #[test]
    fn test_coverage_and_false_safe() {
        let mut truth = SafetyMatrix::new(2);
        truth.set(0, Action::Stay, true);
        truth.set(0, Action::Right, true);
        truth.set(1, Action::Stay, true);
        truth.set(1, Action::Left, true);

        let mut s_hat = SafetyMatrix::new(2);
        s_hat.set(0, Action::Stay, true);
        s_hat.set(0, Action::Down, true);

        assert!((coverage_percent(&s_hat, &truth) - 25.0).abs() < 1e-12);
        assert_eq!(false_safe_count(&s_hat, &truth), 1);
        assert_eq!(coverage_percent(&s_hat, &SafetyMatrix::new(2)), 100.0);
    }

    #[test]
    fn test_trace_monotonic() {
        let mut trace = CoverageTrace::default();
        for v in [10.0, 10.0, 25.0, 24.0, 30.0] {
            trace.push(v);
        }
        assert_eq!(trace.first_decrease(0.0), Some(3));
        assert!(!trace.is_monotonic(0.5));
        assert!(trace.is_monotonic(1.0));
        assert_eq!(trace.last(), Some(30.0));
    }
}
