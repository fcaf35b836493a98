//! Criterion benchmarks for the indicator pass.
//!
//! Benchmarks:
//! 1. Individual indicators over a year-plus of daily bars
//! 2. The full snapshot (every indicator and signal) at several history lengths

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use kairos_core::domain::Bar;
use kairos_core::engine::compute_snapshot;
use kairos_core::indicators::{Alligator, Bollinger, Indicator, Macd, Rsi, Sma};

fn make_bars(n: usize) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            let open = close - 0.3;
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: close + 1.5,
                low: close - 1.5,
                close,
                volume: 1_000_000 + (i as u64 % 500_000),
            }
        })
        .collect()
}

fn bench_indicators(c: &mut Criterion) {
    let bars = make_bars(400);
    let mut group = c.benchmark_group("indicators");

    group.bench_function("sma_200", |b| {
        let sma = Sma::new(200);
        b.iter(|| sma.compute(black_box(&bars)))
    });
    group.bench_function("rsi_14", |b| {
        let rsi = Rsi::new(14);
        b.iter(|| rsi.compute(black_box(&bars)))
    });
    group.bench_function("macd_12_26_9", |b| {
        let macd = Macd::default();
        b.iter(|| macd.compute(black_box(&bars)))
    });
    group.bench_function("bollinger_20_2", |b| {
        b.iter(|| Bollinger::latest_default(black_box(&bars)))
    });
    group.bench_function("alligator", |b| {
        let alligator = Alligator::default();
        b.iter(|| alligator.state(black_box(&bars)))
    });

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot");
    for n in [60, 280, 1000] {
        let bars = make_bars(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &bars, |b, bars| {
            b.iter(|| compute_snapshot(black_box(bars)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_indicators, bench_snapshot);
criterion_main!(benches);
