//! Criterion benchmarks for the feature pipeline hot paths.
//!
//! Benchmarks:
//! 1. Indicator computation (each raw indicator over a long series)
//! 2. Full feature assembly at several series lengths
//! 3. Labelling an assembled table

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use tradecast_core::domain::{Bar, OhlcvSeries};
use tradecast_core::features::{standard_indicators, FeatureAssembler};
use tradecast_core::labeling::Labeler;

fn make_series(n: usize) -> OhlcvSeries {
    let base = Utc.with_ymd_and_hms(2020, 1, 2, 14, 30, 0).unwrap();
    let bars = (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            Bar {
                timestamp: base + Duration::minutes(5 * i as i64),
                open: close - 0.3,
                high: close + 1.5,
                low: close - 1.5,
                close,
                volume: 1_000_000.0 + (i % 500) as f64 * 1000.0,
            }
        })
        .collect();
    OhlcvSeries::new("BENCH", bars).unwrap()
}

fn bench_indicators(c: &mut Criterion) {
    let series = make_series(5_000);
    let mut group = c.benchmark_group("indicators");
    for indicator in standard_indicators() {
        group.bench_function(indicator.name().to_string(), |b| {
            b.iter(|| indicator.compute(black_box(series.bars())))
        });
    }
    group.finish();
}

fn bench_assembly(c: &mut Criterion) {
    let assembler = FeatureAssembler::default();
    let mut group = c.benchmark_group("assemble");
    for n in [500, 2_000, 10_000] {
        let series = make_series(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &series, |b, s| {
            b.iter(|| assembler.assemble(black_box(s)))
        });
    }
    group.finish();
}

fn bench_labeling(c: &mut Criterion) {
    let table = FeatureAssembler::default().assemble(&make_series(10_000));
    let labeler = Labeler::new(-3, 0.002);
    c.bench_function("label_table_10k", |b| {
        b.iter(|| labeler.label_table(black_box(&table)))
    });
}

criterion_group!(benches, bench_indicators, bench_assembly, bench_labeling);
criterion_main!(benches);
