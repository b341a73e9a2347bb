//! Windowed incremental algorithms — O(1) amortized per step, memory bounded
//! by the window size.
//!
//! Shared edge-case policy: before the window is fully populated the
//! indicator is `!is_stable` and values the observations seen so far; it
//! never panics on short history. NaN observations are excluded from
//! selection and statistics, and a rewind clears accumulated state.

pub mod correlation;
pub mod extremum;
pub mod sum;
pub mod variance;

pub use correlation::{MovingCorrelation, MovingCovariance, MovingRegression, RegressionLine};
pub use extremum::Extremum;
pub use sum::RunningTotal;
pub use variance::{MovingStdDev, MovingVariance};
