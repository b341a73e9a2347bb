//! Running total over the last N valid observations.

use std::collections::VecDeque;

use crate::domain::Bar;
use crate::indicators::{Indicator, StepAdmission, StepGuard};
use crate::num::{Num, NumFactory};

/// Windowed sum via the add/evict pattern. The building block for
/// volume-weighted indicators.
///
/// NaN observations are skipped: they neither enter the queue nor poison the
/// running sum.
#[derive(Debug, Clone)]
pub struct RunningTotal<I> {
    input: I,
    window: usize,
    values: VecDeque<Num>,
    sum: Num,
    valid_seen: usize,
    guard: StepGuard,
    factory: NumFactory,
}

impl<I: Indicator<Output = Num>> RunningTotal<I> {
    pub fn new(input: I, window: usize, factory: NumFactory) -> Self {
        assert!(window >= 1, "running total window must be >= 1");
        Self {
            input,
            window,
            values: VecDeque::with_capacity(window),
            sum: factory.zero(),
            valid_seen: 0,
            guard: StepGuard::new(),
            factory,
        }
    }

    fn reset(&mut self) {
        self.values.clear();
        self.sum = self.factory.zero();
        self.valid_seen = 0;
    }

    fn apply(&mut self) {
        let incoming = self.input.value();
        if incoming.is_nan() {
            return;
        }
        if self.values.len() == self.window {
            let oldest = self.values.pop_front().expect("window is non-empty");
            self.sum = self.sum - oldest;
        }
        self.values.push_back(incoming);
        self.sum = self.sum + incoming;
        self.valid_seen += 1;
    }
}

impl<I: Indicator<Output = Num>> Indicator for RunningTotal<I> {
    type Output = Num;

    fn on_bar(&mut self, bar: &Bar) {
        self.input.on_bar(bar);
        match self.guard.admit(bar.end_time) {
            StepAdmission::Replay => {}
            StepAdmission::Rewind => {
                self.reset();
                self.apply();
            }
            StepAdmission::Advance => self.apply(),
        }
    }

    fn value(&self) -> Num {
        self.sum
    }

    fn is_stable(&self) -> bool {
        self.input.is_stable() && self.valid_seen >= self.window
    }

    fn lag(&self) -> usize {
        self.input.lag() + self.window - 1
    }
}
