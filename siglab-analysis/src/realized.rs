//! RealizedCashFlow — valuation known only at trade instants, with
//! wall-clock interpolation in between.
//!
//! Points exist at each entry and exit, plus one point at the latest bar for
//! a still-open position. Queries between two known points interpolate
//! linearly over elapsed wall-clock time, not bar count, because bar spacing
//! may be irregular. Before the first point the basis (1) is returned; after
//! the last point the last value is returned unchanged.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use siglab_core::domain::{BarSeries, TradingRecord};
use siglab_core::num::{Num, NumFactory};

#[derive(Debug, Clone)]
pub struct RealizedCashFlow {
    values: BTreeMap<DateTime<Utc>, Num>,
    factory: NumFactory,
}

impl RealizedCashFlow {
    pub fn from_record(series: &BarSeries, record: &TradingRecord) -> Self {
        let factory = *series.factory();
        let mut values = BTreeMap::new();
        let mut accrued = factory.one();

        for position in record.positions() {
            let (entry, exit) = match (position.entry(), position.exit_trade()) {
                (Some(entry), Some(exit)) => (entry, exit),
                _ => continue,
            };
            values.insert(entry.executed_at(), accrued);
            let settled =
                accrued * position.ratio_at(exit.net_price(), exit.executed_at());
            values.insert(exit.executed_at(), settled);
            accrued = settled;
        }

        // One unrealized point for an open position, at the latest known
        // price adjusted for holding cost.
        let current = record.current();
        if let Some(entry) = current.entry() {
            if current.is_opened() {
                values.insert(entry.executed_at(), accrued);
                if let Some(last) = series.last() {
                    let t = last.end_time;
                    if t > entry.executed_at() {
                        let marked = accrued * current.ratio_at(last.close, t);
                        values.insert(t, marked);
                    }
                }
            }
        }

        Self { values, factory }
    }

    /// Valuation at `t`, resolved by linear interpolation over elapsed
    /// wall-clock time between the surrounding known points.
    pub fn value_at(&self, t: DateTime<Utc>) -> Num {
        let before = self.values.range(..=t).next_back();
        let after = self.values.range(t..).next();

        match (before, after) {
            // Before every known point: the basis.
            (None, _) => self.factory.one(),
            // After every known point: the last value, no extrapolation.
            (Some((_, &value)), None) => value,
            (Some((&t_prev, &v_prev)), Some((&t_next, &v_next))) => {
                if t_prev == t_next {
                    return v_prev;
                }
                let elapsed = (t - t_prev).num_milliseconds() as f64;
                let span = (t_next - t_prev).num_milliseconds() as f64;
                let fraction = self.factory.num(elapsed / span);
                v_prev + (v_next - v_prev) * fraction
            }
        }
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
