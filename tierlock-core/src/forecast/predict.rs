//! Next-tier arrival forecast.
//!
//! Blends a recency-weighted locking rate with the all-time rate, projects
//! the remaining amount forward, and grades the estimate by cadence
//! regularity. Every degenerate input yields a low-confidence result with no
//! date rather than an error.

use chrono::{Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::confidence::{classify_confidence, Confidence};
use super::statistics::interval_days;
use crate::config::ForecastConfig;
use crate::domain::{chronological, ProgressionEvent, TierDefinition, TierTable};
use crate::stats::days_between;
use crate::tiers::{clamp_amount, resolve_rank};

/// Derived next-tier prediction. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub current_tier: TierDefinition,
    /// `None` when already at the top tier.
    pub next_tier: Option<TierDefinition>,
    /// `None` when there is not enough signal to project.
    pub estimated_arrival_date: Option<NaiveDate>,
    pub days_remaining: Option<u64>,
    pub amount_remaining: f64,
    pub confidence: Confidence,
    /// Predicted locked amount per day behind the estimate. 0 without one.
    pub daily_rate: f64,
}

/// Forecast with default parameters, counting days from today (UTC).
pub fn forecast_next_tier(events: &[ProgressionEvent], table: &TierTable) -> ForecastResult {
    forecast_next_tier_at(
        events,
        table,
        &ForecastConfig::default(),
        Utc::now().date_naive(),
    )
}

pub fn forecast_next_tier_at(
    events: &[ProgressionEvent],
    table: &TierTable,
    config: &ForecastConfig,
    today: NaiveDate,
) -> ForecastResult {
    let events = chronological(events);

    let rank = events
        .last()
        .map(|last| current_rank(table, last))
        .unwrap_or(0);
    let current_tier = table.tiers()[rank].clone();
    let next_tier = table.get(rank + 1).cloned();
    let last_amount = events
        .last()
        .map(|e| clamp_amount(e.locked_amount))
        .unwrap_or(0.0);
    let amount_remaining = next_tier
        .as_ref()
        .map(|next| (next.requirement - last_amount).max(0.0))
        .unwrap_or(0.0);

    let undated = |confidence: Confidence| ForecastResult {
        current_tier: current_tier.clone(),
        next_tier: next_tier.clone(),
        estimated_arrival_date: None,
        days_remaining: None,
        amount_remaining,
        confidence,
        daily_rate: 0.0,
    };

    if events.len() < 2 {
        debug!(events = events.len(), "not enough history to forecast");
        return undated(Confidence::Low);
    }

    if next_tier.is_none() {
        // Definite state, not a prediction.
        return undated(Confidence::High);
    }

    let daily_rate = predicted_daily_rate(&events, config);
    if !(daily_rate.is_finite() && daily_rate > 0.0) {
        debug!(daily_rate, "no forward locking progress detected");
        return undated(Confidence::Low);
    }

    let days = (amount_remaining / daily_rate).ceil();
    let Some(estimated_arrival_date) = project(today, days) else {
        debug!(days, "projected arrival out of calendar range");
        return undated(Confidence::Low);
    };

    let confidence = classify_confidence(&interval_days(&events), events.len(), config);

    ForecastResult {
        current_tier,
        next_tier,
        estimated_arrival_date: Some(estimated_arrival_date),
        days_remaining: Some(days as u64),
        amount_remaining,
        confidence,
        daily_rate,
    }
}

/// Tier held at the latest event: by recorded level, else by locked amount.
fn current_rank(table: &TierTable, last: &ProgressionEvent) -> usize {
    table
        .rank_of_level(last.tier_level)
        .unwrap_or_else(|| resolve_rank(table, last.locked_amount))
}

/// Blend of the recent and all-time locking rates. Expects chronological input
/// with at least two events.
pub(crate) fn predicted_daily_rate(events: &[ProgressionEvent], config: &ForecastConfig) -> f64 {
    let (Some(first), Some(last)) = (events.first(), events.last()) else {
        return 0.0;
    };

    let span = days_between(first.timestamp, last.timestamp).max(1.0);
    let all_time = (clamp_amount(last.locked_amount) - clamp_amount(first.locked_amount)) / span;

    // Rates between consecutive events; the first event alone is the initial
    // lock and carries no rate.
    let rates: Vec<f64> = events
        .windows(2)
        .map(|w| {
            let gained = clamp_amount(w[1].locked_amount) - clamp_amount(w[0].locked_amount);
            gained / days_between(w[0].timestamp, w[1].timestamp).max(1.0)
        })
        .collect();
    let recent = recency_weighted(&rates, config.recent_window);

    config.recent_weight * recent + config.all_time_weight * all_time
}

/// Weighted mean of the last `window` rates, weights 1..=k oldest to newest.
fn recency_weighted(rates: &[f64], window: usize) -> f64 {
    let start = rates.len().saturating_sub(window.max(1));
    let recent = &rates[start..];
    if recent.is_empty() {
        return 0.0;
    }

    let (weighted, weights) = recent
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(sum, total), (i, rate)| {
            let weight = (i + 1) as f64;
            (sum + weight * rate, total + weight)
        });
    weighted / weights
}

fn project(today: NaiveDate, days: f64) -> Option<NaiveDate> {
    if !(0.0..=u32::MAX as f64).contains(&days) {
        return None;
    }
    today.checked_add_days(Days::new(days as u64))
}
