//! Safety bookkeeping: per-edge confidence flags, the seed, and the
//! reachability/returnability closure that turns them into S_hat.

mod confidence;
mod matrix;
mod propagator;
mod seed;

pub use confidence::{ConfidenceOracle, EdgeBounds, threshold_from_slope};
pub use matrix::SafetyMatrix;
pub use propagator::SafeSetPropagator;
pub use seed::{SeedConfig, SeedSet};
