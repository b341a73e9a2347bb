//! Analysis criteria — pure scoring functions over positions and records.
//!
//! A criterion is stateless and side-effect-free. The record form is
//! criterion-specific, not "sum over positions" in general: total return is
//! a product, drawdown needs the whole valuation path. `better_than` encodes
//! the ranking direction and must be used instead of raw comparison when
//! ranking strategies.

pub mod drawdown;
pub mod returns;
pub mod stats;

pub use drawdown::MaximumDrawdown;
pub use returns::{NumberOfPositions, ProfitLoss, TotalReturn};
pub use stats::{AverageCriterion, StandardErrorCriterion, VarianceCriterion};

use siglab_core::domain::{BarSeries, Position, TradingRecord};
use siglab_core::num::Num;

pub trait AnalysisCriterion {
    /// Score a single position.
    fn calculate_position(&self, series: &BarSeries, position: &Position) -> Num;

    /// Score a whole trading record.
    fn calculate(&self, series: &BarSeries, record: &TradingRecord) -> Num;

    /// True when `a` ranks strictly better than `b` under this criterion.
    fn better_than(&self, a: Num, b: Num) -> bool;
}
