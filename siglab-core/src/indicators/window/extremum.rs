//! Rolling extremum over the last N steps via a monotonic deque.
//!
//! The deque holds (step index, value) pairs in dominance order: for a
//! highest-indicator the values decrease from front to back, so the front is
//! always the current window maximum. Each observation is pushed and popped
//! at most once, which makes the per-step cost O(1) amortized.

use std::collections::VecDeque;

use crate::domain::Bar;
use crate::indicators::{Indicator, StepAdmission, StepGuard};
use crate::num::Num;

/// Which end of the ordering the indicator tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExtremumKind {
    Highest,
    Lowest,
}

/// Highest or lowest input value over the last `window` steps.
///
/// NaN observations never enter the deque; the step index still advances, so
/// values older than the window age out even across NaN stretches. An empty
/// window (nothing but NaN so far) values as NaN.
#[derive(Debug, Clone)]
pub struct Extremum<I> {
    input: I,
    window: usize,
    kind: ExtremumKind,
    deque: VecDeque<(u64, Num)>,
    step: u64,
    valid_seen: usize,
    guard: StepGuard,
}

impl<I: Indicator<Output = Num>> Extremum<I> {
    fn new(kind: ExtremumKind, input: I, window: usize) -> Self {
        assert!(window >= 1, "extremum window must be >= 1");
        Self {
            input,
            window,
            kind,
            deque: VecDeque::with_capacity(window),
            step: 0,
            valid_seen: 0,
            guard: StepGuard::new(),
        }
    }

    /// Rolling maximum of `input` over `window` steps.
    pub fn highest(input: I, window: usize) -> Self {
        Self::new(ExtremumKind::Highest, input, window)
    }

    /// Rolling minimum of `input` over `window` steps.
    pub fn lowest(input: I, window: usize) -> Self {
        Self::new(ExtremumKind::Lowest, input, window)
    }

    fn reset(&mut self) {
        self.deque.clear();
        self.step = 0;
        self.valid_seen = 0;
    }

    /// True when `candidate` makes `back` redundant for this kind.
    fn dominates(&self, candidate: Num, back: Num) -> bool {
        match self.kind {
            ExtremumKind::Highest => candidate.is_greater_than_or_equal(back),
            ExtremumKind::Lowest => candidate.is_less_than_or_equal(back),
        }
    }

    fn apply(&mut self) {
        let incoming = self.input.value();
        self.step += 1;

        if !incoming.is_nan() {
            while let Some(&(_, back)) = self.deque.back() {
                if self.dominates(incoming, back) {
                    self.deque.pop_back();
                } else {
                    break;
                }
            }
            self.deque.push_back((self.step, incoming));
            self.valid_seen += 1;
        }

        while let Some(&(index, _)) = self.deque.front() {
            if index + self.window as u64 <= self.step {
                self.deque.pop_front();
            } else {
                break;
            }
        }
    }
}

impl<I: Indicator<Output = Num>> Indicator for Extremum<I> {
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
        self.deque.front().map(|&(_, v)| v).unwrap_or(Num::NaN)
    }

    fn is_stable(&self) -> bool {
        self.input.is_stable() && self.valid_seen >= self.window
    }

    fn lag(&self) -> usize {
        self.input.lag() + self.window - 1
    }
}
