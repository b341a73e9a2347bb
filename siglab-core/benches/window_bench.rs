//! Criterion benchmarks for the windowed hot paths.
//!
//! Benchmarks:
//! 1. Rolling extremum (monotonic deque) across window sizes
//! 2. Rolling variance (Welford add/evict)
//! 3. Rolling correlation (running pair sums)
//! 4. A small composed graph driven bar by bar

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use chrono::{TimeZone, Utc};
use siglab_core::domain::Bar;
use siglab_core::indicators::{
    BinaryOperation, Extremum, Indicator, MovingCorrelation, MovingVariance, PriceIndicator,
};
use siglab_core::num::NumFactory;

fn make_bars(factory: &NumFactory, n: usize) -> Vec<Bar> {
    let base = Utc.with_ymd_and_hms(2020, 1, 2, 9, 30, 0).unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            let begin = base + chrono::Duration::minutes(i as i64);
            Bar {
                begin_time: begin,
                end_time: begin + chrono::Duration::minutes(1),
                open: factory.num(close - 0.3),
                high: factory.num(close + 1.5),
                low: factory.num(close - 1.5),
                close: factory.num(close),
                volume: factory.num(1_000_000.0),
            }
        })
        .collect()
}

fn bench_extremum(c: &mut Criterion) {
    let factory = NumFactory::double();
    let bars = make_bars(&factory, 10_000);
    let mut group = c.benchmark_group("extremum");
    for window in [14, 50, 250] {
        group.bench_with_input(BenchmarkId::from_parameter(window), &window, |b, &w| {
            b.iter(|| {
                let mut highest = Extremum::highest(PriceIndicator::high(), w);
                for bar in &bars {
                    highest.on_bar(bar);
                }
                black_box(highest.value())
            })
        });
    }
    group.finish();
}

fn bench_variance(c: &mut Criterion) {
    let factory = NumFactory::double();
    let bars = make_bars(&factory, 10_000);
    c.bench_function("variance_20", |b| {
        b.iter(|| {
            let mut variance = MovingVariance::new(PriceIndicator::close(), 20, factory);
            for bar in &bars {
                variance.on_bar(bar);
            }
            black_box(variance.value())
        })
    });
}

fn bench_correlation(c: &mut Criterion) {
    let factory = NumFactory::double();
    let bars = make_bars(&factory, 10_000);
    c.bench_function("correlation_20", |b| {
        b.iter(|| {
            let mut correlation = MovingCorrelation::new(
                PriceIndicator::close(),
                PriceIndicator::volume(),
                20,
                factory,
            );
            for bar in &bars {
                correlation.on_bar(bar);
            }
            black_box(correlation.value())
        })
    });
}

fn bench_composed_graph(c: &mut Criterion) {
    let factory = NumFactory::double();
    let bars = make_bars(&factory, 10_000);
    c.bench_function("channel_graph", |b| {
        b.iter(|| {
            let mut channel = BinaryOperation::difference(
                Extremum::highest(PriceIndicator::high(), 20),
                Extremum::lowest(PriceIndicator::low(), 20),
            );
            for bar in &bars {
                channel.on_bar(bar);
            }
            black_box(channel.value())
        })
    });
}

criterion_group!(
    benches,
    bench_extremum,
    bench_variance,
    bench_correlation,
    bench_composed_graph
);
criterion_main!(benches);
