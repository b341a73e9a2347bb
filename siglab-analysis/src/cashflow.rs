//! CashFlow — mark-to-market valuation series over a trade history.
//!
//! A sorted timestamp-to-value map normalized to a basis of 1 before the
//! first known point. While a position is open, every bar close contributes
//! a point, so intra-trade drawdowns stay visible even when the round trip
//! ends profitable. Contributions coinciding on one timestamp are summed.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use siglab_core::domain::{BarSeries, Position, TradingRecord};
use siglab_core::num::{Num, NumFactory};

#[derive(Debug, Clone)]
pub struct CashFlow {
    values: BTreeMap<DateTime<Utc>, Num>,
    factory: NumFactory,
}

impl CashFlow {
    /// Value the whole record: closed positions in order, then the still-open
    /// current position if any.
    pub fn from_record(series: &BarSeries, record: &TradingRecord) -> Self {
        let mut flow = Self {
            values: BTreeMap::new(),
            factory: *series.factory(),
        };
        let mut accrued = flow.factory.one();
        for position in record.positions() {
            accrued = flow.record_position(series, position, accrued);
        }
        if record.current().is_opened() {
            flow.record_position(series, record.current(), accrued);
        }
        flow
    }

    /// Value a single position against the series.
    pub fn from_position(series: &BarSeries, position: &Position) -> Self {
        let mut flow = Self {
            values: BTreeMap::new(),
            factory: *series.factory(),
        };
        let basis = flow.factory.one();
        flow.record_position(series, position, basis);
        flow
    }

    /// Record one position's path starting from `base`; returns the accrued
    /// value after it (unchanged for a never-entered position).
    fn record_position(&mut self, series: &BarSeries, position: &Position, base: Num) -> Num {
        let entry_time = match position.entry() {
            Some(entry) => entry.executed_at(),
            None => return base,
        };
        let exit = position.exit_trade();

        for bar in series.iter() {
            let t = bar.end_time;
            if t <= entry_time {
                continue;
            }
            if let Some(exit) = exit {
                if t >= exit.executed_at() {
                    break;
                }
            }
            let marked = base * position.ratio_at(bar.close, t);
            self.record_value(t, base, marked);
        }

        match exit {
            Some(exit) => {
                let t = exit.executed_at();
                let settled = base * position.ratio_at(exit.net_price(), t);
                self.record_value(t, base, settled);
                settled
            }
            None => base,
        }
    }

    /// Merge a contribution: a timestamp that already carries a value gains
    /// this position's delta over its base, so coincident contributions sum.
    fn record_value(&mut self, t: DateTime<Utc>, base: Num, value: Num) {
        self.values
            .entry(t)
            .and_modify(|existing| *existing = *existing + (value - base))
            .or_insert(value);
    }

    /// Valuation at `t`: the latest point at-or-before `t`, or the basis (1)
    /// when `t` precedes every known point.
    pub fn value_at(&self, t: DateTime<Utc>) -> Num {
        self.values
            .range(..=t)
            .next_back()
            .map(|(_, &v)| v)
            .unwrap_or_else(|| self.factory.one())
    }

    /// Known points in time order.
    pub fn points(&self) -> impl Iterator<Item = (DateTime<Utc>, Num)> + '_ {
        self.values.iter().map(|(&t, &v)| (t, v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use siglab_core::domain::Bar;

    fn t(hours: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap() + chrono::Duration::hours(hours)
    }

    fn series(factory: NumFactory, closes: &[f64]) -> BarSeries {
        let mut s = BarSeries::new(factory);
        for (i, &close) in closes.iter().enumerate() {
            s.push(Bar {
                begin_time: t(i as i64),
                end_time: t(i as i64 + 1),
                open: factory.num(close),
                high: factory.num(close + 1.0),
                low: factory.num(close - 1.0),
                close: factory.num(close),
                volume: factory.num(1000.0),
            })
            .unwrap();
        }
        s
    }

    #[test]
    fn marks_every_bar_while_open() {
        let f = NumFactory::double();
        // Bars end at t1..t5 with closes 100, 80, 120, 110, 105.
        let s = series(f, &[100.0, 80.0, 120.0, 110.0, 105.0]);
        let mut record = TradingRecord::new(f);
        record.enter(t(1), f.hundred(), f.one()).unwrap();
        record.exit(t(5), f.num(105.0)).unwrap();

        let flow = CashFlow::from_record(&s, &record);
        // Intra-trade swing to 0.8 is visible even though the trade won.
        assert_eq!(flow.value_at(t(2)), f.num(0.8));
        assert_eq!(flow.value_at(t(3)), f.num(1.2));
        assert_eq!(flow.value_at(t(5)), f.num(1.05));
    }

    #[test]
    fn basis_before_any_point() {
        let f = NumFactory::double();
        let s = series(f, &[100.0, 110.0]);
        let mut record = TradingRecord::new(f);
        record.enter(t(1), f.hundred(), f.one()).unwrap();
        record.exit(t(2), f.num(110.0)).unwrap();

        let flow = CashFlow::from_record(&s, &record);
        assert_eq!(flow.value_at(t(0)), f.one());
    }

    #[test]
    fn sequential_positions_chain_multiplicatively() {
        let f = NumFactory::double();
        let s = series(f, &[100.0, 110.0, 110.0, 121.0]);
        let mut record = TradingRecord::new(f);
        record.enter(t(1), f.hundred(), f.one()).unwrap();
        record.exit(t(2), f.num(110.0)).unwrap();
        record.enter(t(3), f.num(110.0), f.one()).unwrap();
        record.exit(t(4), f.num(121.0)).unwrap();

        let flow = CashFlow::from_record(&s, &record);
        assert_eq!(flow.value_at(t(2)), f.num(1.1));
        assert!((flow.value_at(t(4)).to_f64() - 1.21).abs() < 1e-12);
    }

    #[test]
    fn open_position_is_marked_to_latest_bars() {
        let f = NumFactory::double();
        let s = series(f, &[100.0, 104.0, 108.0]);
        let mut record = TradingRecord::new(f);
        record.enter(t(1), f.hundred(), f.one()).unwrap();

        let flow = CashFlow::from_record(&s, &record);
        assert_eq!(flow.value_at(t(2)), f.num(1.04));
        assert_eq!(flow.value_at(t(3)), f.num(1.08));
        // Nearest-known-value resolution past the last bar.
        assert_eq!(flow.value_at(t(10)), f.num(1.08));
    }

    #[test]
    fn short_position_marks_inverted() {
        let f = NumFactory::double();
        let s = series(f, &[100.0, 90.0, 70.0]);
        let mut record = TradingRecord::with_costs(
            siglab_core::domain::TradeSide::Sell,
            std::sync::Arc::new(siglab_core::domain::ZeroTransactionCost),
            std::sync::Arc::new(siglab_core::domain::ZeroHoldingCost),
            f,
        );
        record.enter(t(1), f.hundred(), f.one()).unwrap();
        record.exit(t(3), f.num(70.0)).unwrap();

        let flow = CashFlow::from_record(&s, &record);
        assert_eq!(flow.value_at(t(2)), f.num(1.1));
        assert_eq!(flow.value_at(t(3)), f.num(1.3));
    }

    #[test]
    fn empty_record_has_no_points() {
        let f = NumFactory::double();
        let s = series(f, &[100.0, 101.0]);
        let record = TradingRecord::new(f);
        let flow = CashFlow::from_record(&s, &record);
        assert!(flow.is_empty());
        assert_eq!(flow.value_at(t(5)), f.one());
    }
}
