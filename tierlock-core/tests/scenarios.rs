//! End-to-end scenarios for the membership engine.
//!
//! Covers:
//! 1. Three-tier resolution fixture (level, progress, remaining amount).
//! 2. Gold-free pricing and the full tier price table.
//! 3. Claim gating precedence over affordability.
//! 4. Forecasts over evenly spaced and bursty histories, plus the top tier.
//! 5. Upgrade detection feeding back into the forecaster.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use tierlock_core::{
    all_tier_prices, amount_to_next_tier, can_claim, compute_statistics, detect_upgrade,
    forecast_next_tier, forecast_next_tier_at, price_for_tier, progress_percent, resolve_tier,
    CatalogItem, Confidence, EngineConfig, ForecastConfig, IneligibleReason, ProgressionEvent,
    TierDefinition, TierTable,
};

// ── Helpers ──────────────────────────────────────────────────────────

fn three_tier_table() -> TierTable {
    TierTable::new(vec![
        TierDefinition::new(0, "bronze", 0.0),
        TierDefinition::new(1, "silver", 1_000.0),
        TierDefinition::new(2, "gold", 5_000.0),
    ])
    .unwrap()
}

fn origin() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()
}

fn lock_history(table: &TierTable, points: &[(i64, f64)]) -> Vec<ProgressionEvent> {
    points
        .iter()
        .map(|&(day, amount)| {
            let tier = resolve_tier(table, amount);
            ProgressionEvent::new(
                origin() + Duration::days(day),
                tier.level,
                tier.name.clone(),
                amount,
                None,
            )
        })
        .collect()
}

// ── 1. Tier resolution ───────────────────────────────────────────────

#[test]
fn resolve_scenario_1500() {
    let table = three_tier_table();
    assert_eq!(resolve_tier(&table, 1_500.0).level, 1);
    assert_eq!(progress_percent(&table, 1_500.0), 12.5);
    assert_eq!(amount_to_next_tier(&table, 1_500.0), 3_500.0);
}

// ── 2. Pricing ───────────────────────────────────────────────────────

#[test]
fn gold_free_item_pricing() {
    let item = CatalogItem::new(100).with_override("gold", 0);

    let gold = price_for_tier(&item, "gold");
    assert_eq!((gold.price, gold.is_free, gold.discount_percent), (0, true, 100));

    let bronze = price_for_tier(&item, "bronze");
    assert_eq!((bronze.price, bronze.is_free, bronze.discount_percent), (100, false, 0));

    let rows = all_tier_prices(&three_tier_table(), &item);
    assert_eq!(rows.len(), 3);
    assert_eq!(
        rows.iter().map(|r| (r.tier.as_str(), r.price)).collect::<Vec<_>>(),
        vec![("bronze", 100), ("silver", 100), ("gold", 0)]
    );
}

// ── 3. Claim gating ──────────────────────────────────────────────────

#[test]
fn tier_gate_precedes_affordability() {
    let table = three_tier_table();
    let item = CatalogItem::new(50).with_minimum_tier("gold");

    for balance in [0, 49, 50, u64::MAX] {
        let result = can_claim(&table, &item, "silver", balance);
        assert!(!result.eligible);
        assert_eq!(
            result.reason,
            Some(IneligibleReason::TierLocked {
                required_tier: "gold".into()
            })
        );
    }
}

#[test]
fn json_catalog_item_claim() {
    let item: CatalogItem = serde_json::from_str(
        r#"{
            "base_cost": 400,
            "per_tier_override": {"silver": 300, "gold": 150},
            "minimum_tier": "silver",
            "active": true,
            "stock_remaining": 3
        }"#,
    )
    .unwrap();
    let table = three_tier_table();

    assert_eq!(
        can_claim(&table, &item, "silver", 100).reason,
        Some(IneligibleReason::InsufficientBalance { shortfall: 200 })
    );
    assert!(can_claim(&table, &item, "gold", 150).eligible);
    assert_eq!(price_for_tier(&item, "silver").discount_percent, 25);
}

// ── 4. Forecasting ───────────────────────────────────────────────────

#[test]
fn evenly_spaced_history_forecast() {
    let table = three_tier_table();
    let events = lock_history(&table, &[(0, 1_000.0), (30, 2_000.0), (60, 3_500.0)]);

    let result = forecast_next_tier_at(&events, &table, &ForecastConfig::default(), today());
    assert!(result.daily_rate > 0.0);
    let days = result.days_remaining.expect("finite estimate");
    assert!(days > 0);
    assert_eq!(result.estimated_arrival_date, Some(today() + Duration::days(days as i64)));
    assert!(result.confidence >= Confidence::Medium);
}

#[test]
fn regular_long_history_grades_high() {
    let table = TierTable::standard();
    let points: Vec<(i64, f64)> = (0..6).map(|i| (i * 14, 500.0 + 700.0 * i as f64)).collect();
    let events = lock_history(&table, &points);

    let result = forecast_next_tier_at(&events, &table, &ForecastConfig::default(), today());
    assert_eq!(result.confidence, Confidence::High);
    assert!(result.estimated_arrival_date.is_some());
}

#[test]
fn bursty_history_grades_low_despite_volume() {
    let table = TierTable::standard();
    let events = lock_history(
        &table,
        &[
            (0, 100.0),
            (1, 1_100.0),
            (2, 1_300.0),
            (150, 5_200.0),
            (151, 5_400.0),
            (152, 5_500.0),
            (400, 6_000.0),
        ],
    );

    let result = forecast_next_tier_at(&events, &table, &ForecastConfig::default(), today());
    assert_eq!(result.confidence, Confidence::Low);
    assert!(result.estimated_arrival_date.is_some());
}

#[test]
fn single_event_forecast_is_low_and_undated() {
    let table = three_tier_table();
    let events = lock_history(&table, &[(0, 1_000.0)]);
    let result = forecast_next_tier(&events, &table);
    assert_eq!(result.confidence, Confidence::Low);
    assert!(result.estimated_arrival_date.is_none());
}

#[test]
fn top_tier_forecast_is_definite() {
    let table = three_tier_table();
    let events = lock_history(&table, &[(0, 1_000.0), (20, 9_000.0)]);
    let result = forecast_next_tier(&events, &table);
    assert!(result.next_tier.is_none());
    assert_eq!(result.confidence, Confidence::High);
}

#[test]
fn custom_config_changes_blend() {
    let config = EngineConfig::from_toml(
        r#"
[forecast]
recent_weight = 1.0
all_time_weight = 0.0
recent_window = 1

[[tiers]]
level = 0
name = "bronze"
requirement = 0

[[tiers]]
level = 1
name = "silver"
requirement = 10000
"#,
    )
    .unwrap();
    let events = lock_history(&config.tiers, &[(0, 0.0), (10, 100.0), (20, 1_100.0)]);

    let result = forecast_next_tier_at(&events, &config.tiers, &config.forecast, today());
    // Only the latest delta counts: 1000 over 10 days.
    assert_eq!(result.daily_rate, 100.0);
    assert_eq!(result.days_remaining, Some(89));
}

// ── 5. Upgrade detection round trip ──────────────────────────────────

#[test]
fn detected_upgrades_extend_history() {
    let table = three_tier_table();
    let mut events = lock_history(&table, &[(0, 200.0)]);
    let mut balance = 200.0;

    for (day, lock) in [(10, 500.0), (20, 600.0), (40, 2_000.0), (60, 2_500.0)] {
        let before = balance;
        balance += lock;
        if let Some(event) = detect_upgrade(&table, before, balance, origin() + Duration::days(day)) {
            events.push(event);
        }
    }

    let levels: Vec<u32> = events.iter().map(|e| e.tier_level).collect();
    assert_eq!(levels, vec![0, 1, 2]);

    let stats = compute_statistics(&events);
    assert_eq!(stats.event_count, 3);
    assert_eq!(stats.total_locked, 5_800.0);
    assert_eq!(stats.average_tier_dwell_days, 30.0);
}
