//! Offline scoring against the true field.
//!
//! Nothing here is consulted by the online loop. The ground truth uses the
//! same closure as [`SafeSetPropagator`](crate::safety::SafeSetPropagator),
//! fed with exact elevation changes instead of confidence bounds.
//!
//! ## Metrics
//!
//! - **Coverage**: `|S_hat ∩ true_S_hat_ε| / |true_S_hat_ε| · 100`, where the
//!   ε-variant uses the stricter threshold `h + ε` so that edges closer to
//!   the limit than the measurement noise are not demanded.
//! - **False safe**: `|S_hat \ true_S_hat|`, entries certified online that
//!   are not actually reachable-and-returnable.
//!
//! ## Example
//!
//! ```rust,ignore
//! let truth = GroundTruth::compute(&graph, &field, h, noise_std, &seed)?;
//! let mut trace = CoverageTrace::default();
//! for _ in 0..steps {
//!     explorer.step()?;
//!     let report = truth.evaluate(explorer.s_hat());
//!     trace.push(report.coverage);
//! }
//! assert!(trace.is_monotonic(1e-9));
//! ```

mod ground_truth;
mod metrics;

pub use ground_truth::{GroundTruth, check_threshold, true_s_hat, true_safe_set};
pub use metrics::{CoverageTrace, EvaluationReport, coverage_percent, false_safe_count};
