//! Rolling variance via Welford's online algorithm with sliding-window
//! removal.
//!
//! Insertion updates the running mean and M2 (sum of squared deviations) in
//! O(1); evicting the oldest value reverses the update algebraically:
//!
//! ```text
//! mean' = (n * mean - x) / (n - 1)
//! M2'   = M2 - (x - mean) * (x - mean')
//! ```

use std::collections::VecDeque;

use crate::domain::Bar;
use crate::indicators::{Indicator, StepAdmission, StepGuard};
use crate::num::{Num, NumFactory};

/// Sample variance of the last `window` valid observations.
///
/// While fewer than two observations are held the variance is zero, matching
/// the degenerate-statistics convention of the scoring layer. NaN
/// observations are excluded entirely.
#[derive(Debug, Clone)]
pub struct MovingVariance<I> {
    input: I,
    window: usize,
    values: VecDeque<Num>,
    mean: Num,
    m2: Num,
    valid_seen: usize,
    guard: StepGuard,
    factory: NumFactory,
}

impl<I: Indicator<Output = Num>> MovingVariance<I> {
    pub fn new(input: I, window: usize, factory: NumFactory) -> Self {
        assert!(window >= 2, "variance window must be >= 2");
        Self {
            input,
            window,
            values: VecDeque::with_capacity(window),
            mean: factory.zero(),
            m2: factory.zero(),
            valid_seen: 0,
            guard: StepGuard::new(),
            factory,
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    fn reset(&mut self) {
        self.values.clear();
        self.mean = self.factory.zero();
        self.m2 = self.factory.zero();
        self.valid_seen = 0;
    }

    fn evict_oldest(&mut self) {
        let oldest = self.values.pop_front().expect("window is non-empty");
        let n = self.factory.num_i64(self.values.len() as i64 + 1);
        let remaining = self.factory.num_i64(self.values.len() as i64);
        let mean_without = (n * self.mean - oldest) / remaining;
        self.m2 = self.m2 - (oldest - self.mean) * (oldest - mean_without);
        self.mean = mean_without;
    }

    fn insert(&mut self, value: Num) {
        self.values.push_back(value);
        let n = self.factory.num_i64(self.values.len() as i64);
        let delta = value - self.mean;
        self.mean = self.mean + delta / n;
        self.m2 = self.m2 + delta * (value - self.mean);
    }

    fn apply(&mut self) {
        let incoming = self.input.value();
        if incoming.is_nan() {
            return;
        }
        if self.values.len() == self.window {
            self.evict_oldest();
        }
        self.insert(incoming);
        self.valid_seen += 1;
    }

    /// Running mean of the held observations.
    pub fn mean(&self) -> Num {
        if self.values.is_empty() {
            self.factory.zero()
        } else {
            self.mean
        }
    }
}

impl<I: Indicator<Output = Num>> Indicator for MovingVariance<I> {
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
        if self.values.len() <= 1 {
            return self.factory.zero();
        }
        let n1 = self.factory.num_i64(self.values.len() as i64 - 1);
        let variance = self.m2 / n1;
        // Eviction algebra can push M2 a hair below zero in the f64 backend.
        if variance.is_negative() {
            self.factory.zero()
        } else {
            variance
        }
    }

    fn is_stable(&self) -> bool {
        self.input.is_stable() && self.valid_seen >= self.window
    }

    fn lag(&self) -> usize {
        self.input.lag() + self.window - 1
    }
}

/// Sample standard deviation: the square root of `MovingVariance`.
#[derive(Debug, Clone)]
pub struct MovingStdDev<I> {
    variance: MovingVariance<I>,
}

impl<I: Indicator<Output = Num>> MovingStdDev<I> {
    pub fn new(input: I, window: usize, factory: NumFactory) -> Self {
        Self {
            variance: MovingVariance::new(input, window, factory),
        }
    }
}

impl<I: Indicator<Output = Num>> Indicator for MovingStdDev<I> {
    type Output = Num;

    fn on_bar(&mut self, bar: &Bar) {
        self.variance.on_bar(bar);
    }

    fn value(&self) -> Num {
        self.variance.value().sqrt()
    }

    fn is_stable(&self) -> bool {
        self.variance.is_stable()
    }

    fn lag(&self) -> usize {
        self.variance.lag()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::source::PriceIndicator;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    /// Two-pass sample variance, the batch reference.
    fn batch_variance(data: &[f64]) -> f64 {
        let n = data.len() as f64;
        let mean = data.iter().sum::<f64>() / n;
        data.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)
    }

    #[test]
    fn matches_batch_formula_once_stable() {
        let f = NumFactory::double();
        let closes = [4.0, 7.0, 13.0, 16.0, 10.0, 8.0];
        let bars = make_bars(&f, &closes);
        let mut variance = MovingVariance::new(PriceIndicator::close(), 4, f);

        for (i, bar) in bars.iter().enumerate() {
            variance.on_bar(bar);
            if i + 1 >= 4 {
                let window = &closes[i + 1 - 4..=i];
                assert_approx(variance.value().to_f64(), batch_variance(window), 1e-9);
            }
        }
    }

    #[test]
    fn zero_while_underpopulated() {
        let f = NumFactory::double();
        let bars = make_bars(&f, &[5.0]);
        let mut variance = MovingVariance::new(PriceIndicator::close(), 3, f);
        assert!(variance.value().is_zero());
        variance.on_bar(&bars[0]);
        assert!(variance.value().is_zero());
        assert!(!variance.is_stable());
    }

    #[test]
    fn stddev_is_sqrt_of_variance() {
        let f = NumFactory::double();
        let bars = make_bars(&f, &[2.0, 4.0, 6.0, 8.0]);
        let mut variance = MovingVariance::new(PriceIndicator::close(), 4, f);
        let mut stddev = MovingStdDev::new(PriceIndicator::close(), 4, f);
        for bar in &bars {
            variance.on_bar(bar);
            stddev.on_bar(bar);
        }
        assert_approx(
            stddev.value().to_f64(),
            variance.value().to_f64().sqrt(),
            DEFAULT_EPSILON,
        );
    }

    #[test]
    fn nan_observations_do_not_count() {
        let f = NumFactory::double();
        let mut bars = make_bars(&f, &[2.0, 100.0, 4.0, 6.0]);
        bars[1].close = Num::NaN;
        let mut variance = MovingVariance::new(PriceIndicator::close(), 3, f);
        for bar in &bars {
            variance.on_bar(bar);
        }
        // Held observations are 2, 4, 6.
        assert_approx(
            variance.value().to_f64(),
            batch_variance(&[2.0, 4.0, 6.0]),
            DEFAULT_EPSILON,
        );
        assert!(variance.is_stable());
    }

    #[test]
    fn mean_tracks_window() {
        let f = NumFactory::double();
        let bars = make_bars(&f, &[1.0, 2.0, 3.0, 4.0]);
        let mut variance = MovingVariance::new(PriceIndicator::close(), 3, f);
        for bar in &bars {
            variance.on_bar(bar);
        }
        assert_approx(variance.mean().to_f64(), 3.0, DEFAULT_EPSILON);
    }

    #[test]
    fn stability_monotonic_over_nan_gaps() {
        let f = NumFactory::double();
        let mut bars = make_bars(&f, &[1.0, 2.0, 3.0, 4.0, 5.0]);
        bars[3].close = Num::NaN;
        let mut variance = MovingVariance::new(PriceIndicator::close(), 3, f);
        let mut was_stable = false;
        for bar in &bars {
            variance.on_bar(bar);
            if was_stable {
                assert!(variance.is_stable(), "stability must not revert");
            }
            was_stable = variance.is_stable();
        }
        assert!(was_stable);
    }

    #[test]
    #[should_panic(expected = "window must be >= 2")]
    fn window_of_one_rejected() {
        let f = NumFactory::double();
        let _ = MovingVariance::new(PriceIndicator::close(), 1, f);
    }
}
