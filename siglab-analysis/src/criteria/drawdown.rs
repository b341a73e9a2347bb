//! Maximum drawdown over the mark-to-market valuation path.

use serde::{Deserialize, Serialize};

use siglab_core::domain::{BarSeries, Position, TradingRecord};
use siglab_core::num::{Num, NumFactory};

use super::AnalysisCriterion;
use crate::cashflow::CashFlow;

/// Worst peak-to-trough drop of the cash-flow path, as a positive fraction
/// (0.15 = 15% drawdown). Zero for a path that never declines. Lower is
/// better.
///
/// This is a whole-path criterion: the record form walks the mark-to-market
/// series and cannot be assembled from per-position values.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MaximumDrawdown;

impl MaximumDrawdown {
    fn over_flow(flow: &CashFlow, factory: &NumFactory) -> Num {
        let mut peak = factory.one();
        let mut worst = factory.zero();
        for (_, value) in flow.points() {
            if value.is_nan() {
                continue;
            }
            if value.is_greater_than(peak) {
                peak = value;
            } else {
                let drawdown = (peak - value) / peak;
                worst = worst.max(drawdown);
            }
        }
        worst
    }
}

impl AnalysisCriterion for MaximumDrawdown {
    fn calculate_position(&self, series: &BarSeries, position: &Position) -> Num {
        let flow = CashFlow::from_position(series, position);
        Self::over_flow(&flow, series.factory())
    }

    fn calculate(&self, series: &BarSeries, record: &TradingRecord) -> Num {
        let flow = CashFlow::from_record(series, record);
        Self::over_flow(&flow, series.factory())
    }

    fn better_than(&self, a: Num, b: Num) -> bool {
        a.is_less_than(b)
    }
}
