//! Return- and count-based criteria.

use serde::{Deserialize, Serialize};

use siglab_core::domain::{BarSeries, Position, TradingRecord};
use siglab_core::num::Num;

use super::AnalysisCriterion;

/// Total return: the product of per-position valuation ratios, cost-adjusted.
/// A never-closed position contributes a neutral 1. Higher is better.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TotalReturn;

impl AnalysisCriterion for TotalReturn {
    fn calculate_position(&self, _series: &BarSeries, position: &Position) -> Num {
        match position.exit_trade() {
            Some(exit) => position.ratio_at(exit.net_price(), exit.executed_at()),
            None => position.factory().one(),
        }
    }

    fn calculate(&self, series: &BarSeries, record: &TradingRecord) -> Num {
        record
            .positions()
            .iter()
            .fold(record.factory().one(), |acc, position| {
                acc * self.calculate_position(series, position)
            })
    }

    fn better_than(&self, a: Num, b: Num) -> bool {
        a.is_greater_than(b)
    }
}

/// Net profit and loss summed across closed positions. Higher is better.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ProfitLoss;

impl AnalysisCriterion for ProfitLoss {
    fn calculate_position(&self, _series: &BarSeries, position: &Position) -> Num {
        position.profit()
    }

    fn calculate(&self, series: &BarSeries, record: &TradingRecord) -> Num {
        record
            .positions()
            .iter()
            .fold(record.factory().zero(), |acc, position| {
                acc + self.calculate_position(series, position)
            })
    }

    fn better_than(&self, a: Num, b: Num) -> bool {
        a.is_greater_than(b)
    }
}

/// Number of closed positions. Fewer trades rank better at equal fitness,
/// so lower is better.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct NumberOfPositions;

impl AnalysisCriterion for NumberOfPositions {
    fn calculate_position(&self, _series: &BarSeries, position: &Position) -> Num {
        let factory = position.factory();
        if position.is_new() {
            factory.zero()
        } else {
            factory.one()
        }
    }

    fn calculate(&self, _series: &BarSeries, record: &TradingRecord) -> Num {
        record.factory().num_i64(record.position_count() as i64)
    }

    fn better_than(&self, a: Num, b: Num) -> bool {
        a.is_less_than(b)
    }
}
