//! Aggregation throughput benchmarks.
//!
//! Run with: `cargo bench --package candlewick-bench`

use candlewick_bench::{TickStreamConfig, synthetic_ticks};
use candlewick_lib::prelude::*;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::runtime::Runtime;

const TIMEFRAMES: &[Timeframe] = &[Timeframe::Second1, Timeframe::Minute1, Timeframe::Hour1];

fn apply_tick_benchmark(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let ticks = synthetic_ticks(&TickStreamConfig::default());

    let mut group = c.benchmark_group("apply_tick");
    group.throughput(Throughput::Elements(ticks.len() as u64));

    for timeframe in [Timeframe::Second1, Timeframe::Minute1] {
        group.bench_with_input(
            BenchmarkId::new("memory", timeframe),
            &timeframe,
            |b, &timeframe| {
                b.to_async(&rt).iter(|| async {
                    let aggregator = CandleAggregator::new(MemoryStore::new(), &[timeframe]);
                    for tick in &ticks {
                        aggregator.apply_tick(tick, timeframe).await.unwrap();
                    }
                });
            },
        );
    }

    group.finish();
}

fn fanout_benchmark(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let ticks = synthetic_ticks(&TickStreamConfig::default());

    let mut group = c.benchmark_group("fanout");
    group.throughput(Throughput::Elements(ticks.len() as u64));

    group.bench_function("memory", |b| {
        b.to_async(&rt).iter(|| async {
            let aggregator = Arc::new(CandleAggregator::new(MemoryStore::new(), TIMEFRAMES));
            let fanout = DurationFanout::start(aggregator);
            for tick in &ticks {
                fanout.on_tick(tick.clone());
            }
            fanout.shutdown().await
        });
    });

    let sqlite_ticks = synthetic_ticks(&TickStreamConfig {
        count: 1_000,
        ..TickStreamConfig::default()
    });
    group.throughput(Throughput::Elements(sqlite_ticks.len() as u64));
    group.sample_size(10);

    group.bench_function("sqlite", |b| {
        b.to_async(&rt).iter(|| async {
            let dir = TempDir::new().unwrap();
            let config = SqliteConfig::new(dir.path().join("candles.db"));
            let store = SqliteStore::open(&config, TIMEFRAMES).unwrap();
            let aggregator = Arc::new(CandleAggregator::new(store, TIMEFRAMES));
            let fanout = DurationFanout::start(aggregator);
            for tick in &sqlite_ticks {
                fanout.on_tick(tick.clone());
            }
            fanout.shutdown().await
        });
    });

    group.finish();
}

criterion_group!(benches, apply_tick_benchmark, fanout_benchmark);
criterion_main!(benches);
