//! Rolling covariance, correlation, and linear regression over running sums.
//!
//! One bounded queue of (x, y) pairs backs all three indicators: insertion
//! adds to `Σx Σy Σxy Σx² Σy²`, eviction of the oldest pair subtracts, so
//! every statistic reads off the sums in O(1).

use std::collections::VecDeque;

use crate::domain::Bar;
use crate::indicators::{Indicator, StepAdmission, StepGuard};
use crate::num::{Num, NumFactory};

/// Running sums over a bounded window of (x, y) pairs. A pair with a NaN
/// on either side is skipped entirely.
#[derive(Debug, Clone)]
struct PairWindow {
    window: usize,
    pairs: VecDeque<(Num, Num)>,
    sx: Num,
    sy: Num,
    sxy: Num,
    sxx: Num,
    syy: Num,
    valid_seen: usize,
}

impl PairWindow {
    fn new(window: usize, factory: &NumFactory) -> Self {
        assert!(window >= 2, "pair window must be >= 2");
        let zero = factory.zero();
        Self {
            window,
            pairs: VecDeque::with_capacity(window),
            sx: zero,
            sy: zero,
            sxy: zero,
            sxx: zero,
            syy: zero,
            valid_seen: 0,
        }
    }

    fn reset(&mut self, factory: &NumFactory) {
        self.pairs.clear();
        let zero = factory.zero();
        self.sx = zero;
        self.sy = zero;
        self.sxy = zero;
        self.sxx = zero;
        self.syy = zero;
        self.valid_seen = 0;
    }

    fn push(&mut self, x: Num, y: Num) {
        if x.is_nan() || y.is_nan() {
            return;
        }
        if self.pairs.len() == self.window {
            let (ox, oy) = self.pairs.pop_front().expect("window is non-empty");
            self.sx = self.sx - ox;
            self.sy = self.sy - oy;
            self.sxy = self.sxy - ox * oy;
            self.sxx = self.sxx - ox * ox;
            self.syy = self.syy - oy * oy;
        }
        self.pairs.push_back((x, y));
        self.sx = self.sx + x;
        self.sy = self.sy + y;
        self.sxy = self.sxy + x * y;
        self.sxx = self.sxx + x * x;
        self.syy = self.syy + y * y;
        self.valid_seen += 1;
    }

    fn n(&self, factory: &NumFactory) -> Num {
        factory.num_i64(self.pairs.len() as i64)
    }

    /// Sample covariance; zero while fewer than two pairs are held.
    fn covariance(&self, factory: &NumFactory) -> Num {
        if self.pairs.len() <= 1 {
            return factory.zero();
        }
        let n = self.n(factory);
        let n1 = factory.num_i64(self.pairs.len() as i64 - 1);
        (self.sxy - self.sx * self.sy / n) / n1
    }

    /// Pearson correlation; a non-positive radicand resolves to NaN.
    fn correlation(&self, factory: &NumFactory) -> Num {
        let n = self.n(factory);
        let numerator = n * self.sxy - self.sx * self.sy;
        let radicand = (n * self.sxx - self.sx * self.sx) * (n * self.syy - self.sy * self.sy);
        if !radicand.is_positive() {
            return factory.nan();
        }
        numerator / radicand.sqrt()
    }

    /// Least-squares line through the held pairs; a degenerate x-spread
    /// yields NaN slope and intercept through the divide-by-zero rule.
    fn regression(&self, factory: &NumFactory) -> RegressionLine {
        let n = self.n(factory);
        let denominator = n * self.sxx - self.sx * self.sx;
        let slope = (n * self.sxy - self.sx * self.sy) / denominator;
        let intercept = (self.sy - slope * self.sx) / n;
        RegressionLine { slope, intercept }
    }
}

/// Slope and intercept of a least-squares fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionLine {
    pub slope: Num,
    pub intercept: Num,
}

macro_rules! pair_indicator {
    ($(#[$doc:meta])* $name:ident, $output:ty, $compute:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name<X, Y> {
            x_input: X,
            y_input: Y,
            sums: PairWindow,
            guard: StepGuard,
            factory: NumFactory,
        }

        impl<X, Y> $name<X, Y>
        where
            X: Indicator<Output = Num>,
            Y: Indicator<Output = Num>,
        {
            pub fn new(x_input: X, y_input: Y, window: usize, factory: NumFactory) -> Self {
                Self {
                    x_input,
                    y_input,
                    sums: PairWindow::new(window, &factory),
                    guard: StepGuard::new(),
                    factory,
                }
            }
        }

        impl<X, Y> Indicator for $name<X, Y>
        where
            X: Indicator<Output = Num>,
            Y: Indicator<Output = Num>,
        {
            type Output = $output;

            fn on_bar(&mut self, bar: &Bar) {
                self.x_input.on_bar(bar);
                self.y_input.on_bar(bar);
                match self.guard.admit(bar.end_time) {
                    StepAdmission::Replay => {}
                    StepAdmission::Rewind => {
                        self.sums.reset(&self.factory);
                        self.sums.push(self.x_input.value(), self.y_input.value());
                    }
                    StepAdmission::Advance => {
                        self.sums.push(self.x_input.value(), self.y_input.value());
                    }
                }
            }

            fn value(&self) -> $output {
                self.sums.$compute(&self.factory)
            }

            fn is_stable(&self) -> bool {
                self.x_input.is_stable()
                    && self.y_input.is_stable()
                    && self.sums.valid_seen >= self.sums.window
            }

            fn lag(&self) -> usize {
                self.x_input.lag().max(self.y_input.lag()) + self.sums.window - 1
            }
        }
    };
}

pair_indicator!(
    /// Sample covariance of two inputs over the last `window` steps.
    MovingCovariance,
    Num,
    covariance
);

pair_indicator!(
    /// Pearson correlation of two inputs over the last `window` steps.
    MovingCorrelation,
    Num,
    correlation
);

pair_indicator!(
    /// Rolling least-squares regression of y on x over the last `window` steps.
    MovingRegression,
    RegressionLine,
    regression
);
