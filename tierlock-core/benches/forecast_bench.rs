//! Criterion benchmarks for the engine's per-request paths.
//!
//! Benchmarks:
//! 1. Tier resolution across the standard schedule
//! 2. Full tier price table for an item with overrides
//! 3. Next-tier forecast over histories of increasing length

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tierlock_core::{
    all_tier_prices, forecast_next_tier_at, resolve_tier, CatalogItem, ForecastConfig,
    ProgressionEvent, TierTable,
};

// ── Helpers ──────────────────────────────────────────────────────────

/// Random but reproducible lock history with `n` events.
fn make_history(table: &TierTable, n: usize, seed: u64) -> Vec<ProgressionEvent> {
    let mut rng = StdRng::seed_from_u64(seed);
    let origin = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
    let mut at = origin;
    let mut amount = 0.0;

    (0..n)
        .map(|_| {
            at += Duration::hours(rng.gen_range(12..24 * 60));
            amount += rng.gen_range(50.0..2_500.0);
            let tier = resolve_tier(table, amount);
            ProgressionEvent::new(at, tier.level, tier.name.clone(), amount, None)
        })
        .collect()
}

// ── Benchmarks ───────────────────────────────────────────────────────

fn bench_resolve(c: &mut Criterion) {
    let table = TierTable::standard();
    c.bench_function("resolve_tier", |b| {
        b.iter(|| {
            for amount in [0.0, 999.0, 4_200.0, 25_000.0, 75_000.0] {
                black_box(resolve_tier(&table, black_box(amount)));
            }
        })
    });
}

fn bench_price_table(c: &mut Criterion) {
    let table = TierTable::standard();
    let item = CatalogItem::new(1_200)
        .with_override("gold", 900)
        .with_override("platinum", 600)
        .with_override("diamond", 0)
        .with_minimum_tier("silver");
    c.bench_function("all_tier_prices", |b| {
        b.iter(|| black_box(all_tier_prices(&table, black_box(&item))))
    });
}

fn bench_forecast(c: &mut Criterion) {
    let table = TierTable::standard();
    let config = ForecastConfig::default();
    let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();

    let mut group = c.benchmark_group("forecast_next_tier");
    for n in [2usize, 10, 100, 1_000] {
        let events = make_history(&table, n, 42);
        group.bench_with_input(BenchmarkId::from_parameter(n), &events, |b, events| {
            b.iter(|| black_box(forecast_next_tier_at(events, &table, &config, today)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_resolve, bench_price_table, bench_forecast);
criterion_main!(benches);
