//! Property tests for the windowed incremental algorithms.
//!
//! Uses proptest to verify:
//! 1. Deque-based rolling extremum equals the brute-force window scan
//! 2. Incremental Welford variance matches the two-pass batch formula
//! 3. Running total equals the brute-force window sum
//! 4. Replaying a timestamp never changes a value
//! 5. Stability is monotone in the number of valid observations

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use siglab_core::domain::Bar;
use siglab_core::indicators::{
    Extremum, Indicator, MovingVariance, PriceIndicator, RunningTotal,
};
use siglab_core::num::NumFactory;

fn make_bars(factory: &NumFactory, closes: &[f64]) -> Vec<Bar> {
    let base = Utc.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let begin = base + chrono::Duration::minutes(i as i64);
            Bar {
                begin_time: begin,
                end_time: begin + chrono::Duration::minutes(1),
                open: factory.num(close),
                high: factory.num(close + 1.0),
                low: factory.num(close - 1.0),
                close: factory.num(close),
                volume: factory.num(1000.0),
            }
        })
        .collect()
}

fn brute_force_min(data: &[f64], i: usize, window: usize) -> f64 {
    let start = (i + 1).saturating_sub(window);
    data[start..=i].iter().copied().fold(f64::INFINITY, f64::min)
}

fn brute_force_max(data: &[f64], i: usize, window: usize) -> f64 {
    let start = (i + 1).saturating_sub(window);
    data[start..=i]
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max)
}

fn batch_variance(data: &[f64]) -> f64 {
    let n = data.len() as f64;
    let mean = data.iter().sum::<f64>() / n;
    data.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)
}

fn arb_closes() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(10.0..500.0_f64, 1..60)
}

fn arb_window() -> impl Strategy<Value = usize> {
    1..12_usize
}

proptest! {
    /// Once past warmup, the deque extremum equals min/max over the last N.
    #[test]
    fn extremum_matches_brute_force(closes in arb_closes(), window in arb_window()) {
        let f = NumFactory::double();
        let bars = make_bars(&f, &closes);
        let mut lowest = Extremum::lowest(PriceIndicator::close(), window);
        let mut highest = Extremum::highest(PriceIndicator::close(), window);

        for (i, bar) in bars.iter().enumerate() {
            lowest.on_bar(bar);
            highest.on_bar(bar);
            prop_assert_eq!(lowest.value().to_f64(), brute_force_min(&closes, i, window));
            prop_assert_eq!(highest.value().to_f64(), brute_force_max(&closes, i, window));
        }
    }

    /// Incremental variance tracks the two-pass batch result within a
    /// floating tolerance, for window sizes >= 2.
    #[test]
    fn variance_matches_two_pass(closes in arb_closes(), window in 2..10_usize) {
        let f = NumFactory::double();
        let bars = make_bars(&f, &closes);
        let mut variance = MovingVariance::new(PriceIndicator::close(), window, f);

        for (i, bar) in bars.iter().enumerate() {
            variance.on_bar(bar);
            if i + 1 >= window {
                let expected = batch_variance(&closes[i + 1 - window..=i]);
                let actual = variance.value().to_f64();
                prop_assert!(
                    (actual - expected).abs() < 1e-6 * expected.max(1.0),
                    "window ending at {}: incremental {} vs batch {}",
                    i,
                    actual,
                    expected
                );
            }
        }
    }

    /// Running total equals the brute-force sum over the last N values.
    #[test]
    fn running_total_matches_brute_force(closes in arb_closes(), window in arb_window()) {
        let f = NumFactory::double();
        let bars = make_bars(&f, &closes);
        let mut total = RunningTotal::new(PriceIndicator::close(), window, f);

        for (i, bar) in bars.iter().enumerate() {
            total.on_bar(bar);
            let start = (i + 1).saturating_sub(window);
            let expected: f64 = closes[start..=i].iter().sum();
            prop_assert!((total.value().to_f64() - expected).abs() < 1e-6);
        }
    }

    /// Driving the same bar twice leaves every value unchanged.
    #[test]
    fn replay_is_idempotent(closes in arb_closes(), window in arb_window()) {
        let f = NumFactory::double();
        let bars = make_bars(&f, &closes);
        let mut lowest = Extremum::lowest(PriceIndicator::close(), window);
        let mut total = RunningTotal::new(PriceIndicator::close(), window, f);

        for bar in &bars {
            lowest.on_bar(bar);
            total.on_bar(bar);
            let (low_before, total_before) = (lowest.value(), total.value());
            lowest.on_bar(bar);
            total.on_bar(bar);
            prop_assert_eq!(lowest.value(), low_before);
            prop_assert_eq!(total.value(), total_before);
        }
    }

    /// Unstable below N valid observations, stable at N, and never reverting
    /// afterwards (absent a rewind).
    #[test]
    fn stability_is_monotonic(closes in arb_closes(), window in arb_window()) {
        let f = NumFactory::double();
        let bars = make_bars(&f, &closes);
        let mut highest = Extremum::highest(PriceIndicator::close(), window);

        for (i, bar) in bars.iter().enumerate() {
            highest.on_bar(bar);
            let fed = i + 1;
            if fed < window {
                prop_assert!(!highest.is_stable());
            } else {
                prop_assert!(highest.is_stable());
            }
        }
    }
}
