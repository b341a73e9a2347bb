//! Indicator contract: one value per time step, updated at most once per
//! distinct timestamp.
//!
//! An indicator is created once per (signal, parameters) pair and mutated
//! only by its own `on_bar`. Composite indicators own their inputs and drive
//! them explicitly before reading their values, so a whole graph is advanced
//! by calling `on_bar` on its roots in dependency order. Repeated calls for
//! the same timestamp are no-ops; this makes it safe for several consumers
//! to redundantly drive one shared node.
//!
//! Single-writer discipline: nothing here is synchronized. Concurrent
//! `on_bar` calls against one indicator from different threads are outside
//! the contract and must be serialized by the caller. Independent graphs
//! (separate indicator instances, separate series) are free to run in
//! parallel.

pub mod operators;
pub mod source;
pub mod window;

pub use operators::{
    BinaryOp, BinaryOperation, CombineIndicator, ComparisonOp, ComparisonOperation, UnaryOp,
    UnaryOperation,
};
pub use source::{Constant, PriceField, PriceIndicator};
pub use window::{
    Extremum, MovingCorrelation, MovingCovariance, MovingRegression, MovingStdDev,
    MovingVariance, RegressionLine, RunningTotal,
};

use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::rc::Rc;

use crate::domain::Bar;

/// Produces a value of type `Output` for the current time step.
pub trait Indicator {
    type Output: Clone;

    /// Advance to the bar's time step, recomputing state at most once per
    /// distinct timestamp. Composites drive their inputs first.
    fn on_bar(&mut self, bar: &Bar);

    /// The last computed result.
    fn value(&self) -> Self::Output;

    /// True once enough history has been consumed to trust `value`.
    fn is_stable(&self) -> bool;

    /// Number of steps before this indicator can become stable. Composites
    /// advertise the max over their inputs plus their own window.
    fn lag(&self) -> usize;
}

/// What an incoming timestamp means for indicator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAdmission {
    /// Strictly later than the last seen step: recompute.
    Advance,
    /// Same as the last seen step: keep the cached value.
    Replay,
    /// Strictly earlier: the series rewound. The previous value is invalid;
    /// accumulated state must be discarded and the bar treated as the first
    /// observation of a fresh stream.
    Rewind,
}

/// Per-indicator admission guard keyed on bar end time.
#[derive(Debug, Clone, Default)]
pub struct StepGuard {
    last_seen: Option<DateTime<Utc>>,
}

impl StepGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn admit(&mut self, end_time: DateTime<Utc>) -> StepAdmission {
        match self.last_seen {
            Some(last) if end_time == last => StepAdmission::Replay,
            Some(last) if end_time < last => {
                self.last_seen = Some(end_time);
                StepAdmission::Rewind
            }
            _ => {
                self.last_seen = Some(end_time);
                StepAdmission::Advance
            }
        }
    }

    pub fn last_seen(&self) -> Option<DateTime<Utc>> {
        self.last_seen
    }
}

impl<I: Indicator + ?Sized> Indicator for Box<I> {
    type Output = I::Output;

    fn on_bar(&mut self, bar: &Bar) {
        (**self).on_bar(bar);
    }

    fn value(&self) -> Self::Output {
        (**self).value()
    }

    fn is_stable(&self) -> bool {
        (**self).is_stable()
    }

    fn lag(&self) -> usize {
        (**self).lag()
    }
}

/// Shared node in an indicator graph. Several owners may drive the same
/// underlying indicator; the step guard makes the redundant drives no-ops.
/// The graph must stay acyclic, or the inner borrow panics.
impl<I: Indicator> Indicator for Rc<RefCell<I>> {
    type Output = I::Output;

    fn on_bar(&mut self, bar: &Bar) {
        self.borrow_mut().on_bar(bar);
    }

    fn value(&self) -> Self::Output {
        self.borrow().value()
    }

    fn is_stable(&self) -> bool {
        self.borrow().is_stable()
    }

    fn lag(&self) -> usize {
        self.borrow().lag()
    }
}

/// Create synthetic bars from close prices for testing.
///
/// One-minute bars with plausible OHLV around each close.
#[cfg(test)]
pub fn make_bars(factory: &crate::num::NumFactory, closes: &[f64]) -> Vec<Bar> {
    use chrono::TimeZone;
    let base = Utc.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let begin = base + chrono::Duration::minutes(i as i64);
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                begin_time: begin,
                end_time: begin + chrono::Duration::minutes(1),
                open: factory.num(open),
                high: factory.num(open.max(close) + 1.0),
                low: factory.num(open.min(close) - 1.0),
                close: factory.num(close),
                volume: factory.num(1000.0),
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(minute: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap() + chrono::Duration::minutes(minute)
    }

    #[test]
    fn guard_advances_on_strictly_later() {
        let mut guard = StepGuard::new();
        assert_eq!(guard.admit(ts(0)), StepAdmission::Advance);
        assert_eq!(guard.admit(ts(1)), StepAdmission::Advance);
        assert_eq!(guard.last_seen(), Some(ts(1)));
    }

    #[test]
    fn guard_replays_same_timestamp() {
        let mut guard = StepGuard::new();
        guard.admit(ts(3));
        assert_eq!(guard.admit(ts(3)), StepAdmission::Replay);
        assert_eq!(guard.admit(ts(3)), StepAdmission::Replay);
    }

    #[test]
    fn guard_reports_rewind_and_restarts() {
        let mut guard = StepGuard::new();
        guard.admit(ts(10));
        assert_eq!(guard.admit(ts(5)), StepAdmission::Rewind);
        // The rewound step becomes the new reference point.
        assert_eq!(guard.admit(ts(5)), StepAdmission::Replay);
        assert_eq!(guard.admit(ts(6)), StepAdmission::Advance);
    }
}
