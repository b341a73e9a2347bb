//! Statistical wrappers composing any criterion over a record's positions.
//!
//! Each wrapper carries its own `less_is_better` flag feeding its own
//! `better_than`, independent of the wrapped criterion's convention: a low
//! variance of returns is good, a low variance of losses is not.

use serde::{Deserialize, Serialize};

use siglab_core::domain::{BarSeries, Position, TradingRecord};
use siglab_core::num::Num;

use super::AnalysisCriterion;

fn ranked(less_is_better: bool, a: Num, b: Num) -> bool {
    if less_is_better {
        a.is_less_than(b)
    } else {
        a.is_greater_than(b)
    }
}

/// Criterion total divided by position count; zero for an empty record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AverageCriterion<C> {
    criterion: C,
    less_is_better: bool,
}

impl<C: AnalysisCriterion> AverageCriterion<C> {
    pub fn new(criterion: C, less_is_better: bool) -> Self {
        Self {
            criterion,
            less_is_better,
        }
    }
}

impl<C: AnalysisCriterion> AnalysisCriterion for AverageCriterion<C> {
    fn calculate_position(&self, series: &BarSeries, position: &Position) -> Num {
        self.criterion.calculate_position(series, position)
    }

    fn calculate(&self, series: &BarSeries, record: &TradingRecord) -> Num {
        let factory = record.factory();
        let count = record.position_count();
        if count == 0 {
            return factory.zero();
        }
        self.criterion.calculate(series, record) / factory.num_i64(count as i64)
    }

    fn better_than(&self, a: Num, b: Num) -> bool {
        ranked(self.less_is_better, a, b)
    }
}

/// Population variance of per-position criterion values around their mean.
/// Zero for an empty record and for a single position.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VarianceCriterion<C> {
    criterion: C,
    less_is_better: bool,
}

impl<C: AnalysisCriterion> VarianceCriterion<C> {
    pub fn new(criterion: C, less_is_better: bool) -> Self {
        Self {
            criterion,
            less_is_better,
        }
    }
}

impl<C: AnalysisCriterion> AnalysisCriterion for VarianceCriterion<C> {
    fn calculate_position(&self, _series: &BarSeries, position: &Position) -> Num {
        // A single value has no spread around its own mean.
        position.factory().zero()
    }

    fn calculate(&self, series: &BarSeries, record: &TradingRecord) -> Num {
        let factory = record.factory();
        let count = record.position_count();
        if count == 0 {
            return factory.zero();
        }
        let n = factory.num_i64(count as i64);
        let mean = self.criterion.calculate(series, record) / n;
        let sum_sq = record
            .positions()
            .iter()
            .fold(factory.zero(), |acc, position| {
                let deviation = self.criterion.calculate_position(series, position) - mean;
                acc + deviation * deviation
            });
        sum_sq / n
    }

    fn better_than(&self, a: Num, b: Num) -> bool {
        ranked(self.less_is_better, a, b)
    }
}

/// Standard error of the per-position criterion values: `stddev / sqrt(n)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StandardErrorCriterion<C> {
    variance: VarianceCriterion<C>,
    less_is_better: bool,
}

impl<C: AnalysisCriterion> StandardErrorCriterion<C> {
    pub fn new(criterion: C, less_is_better: bool) -> Self {
        Self {
            variance: VarianceCriterion::new(criterion, less_is_better),
            less_is_better,
        }
    }
}

impl<C: AnalysisCriterion> AnalysisCriterion for StandardErrorCriterion<C> {
    fn calculate_position(&self, series: &BarSeries, position: &Position) -> Num {
        self.variance.calculate_position(series, position)
    }

    fn calculate(&self, series: &BarSeries, record: &TradingRecord) -> Num {
        let factory = record.factory();
        let count = record.position_count();
        if count == 0 {
            return factory.zero();
        }
        let n = factory.num_i64(count as i64);
        // stddev / sqrt(n), folded into one square root.
        (self.variance.calculate(series, record) / n).sqrt()
    }

    fn better_than(&self, a: Num, b: Num) -> bool {
        ranked(self.less_is_better, a, b)
    }
}
