//! Tier resolution: locked balance in, tier and progress out.
//!
//! All functions take the tier table explicitly and never fail: negative or
//! NaN balances are treated as zero and land in the lowest tier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ProgressionEvent, TierDefinition, TierTable};

/// Display-ready snapshot of where a balance sits in the tier schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierStatus {
    /// Balance after clamping.
    pub locked_amount: f64,
    pub current: TierDefinition,
    pub next: Option<TierDefinition>,
    pub progress_percent: f64,
    pub amount_to_next_tier: f64,
}

/// Negative and NaN balances count as zero.
pub fn clamp_amount(locked_amount: f64) -> f64 {
    if locked_amount.is_nan() || locked_amount < 0.0 {
        0.0
    } else {
        locked_amount
    }
}

/// Table position of the tier a balance belongs to.
pub fn resolve_rank(table: &TierTable, locked_amount: f64) -> usize {
    let amount = clamp_amount(locked_amount);
    table
        .iter()
        .rposition(|tier| tier.requirement <= amount)
        .unwrap_or(0)
}

/// Highest tier whose requirement the balance meets.
pub fn resolve_tier(table: &TierTable, locked_amount: f64) -> &TierDefinition {
    &table.tiers()[resolve_rank(table, locked_amount)]
}

/// Tier immediately above the resolved one, or `None` at the top.
pub fn next_tier(table: &TierTable, locked_amount: f64) -> Option<&TierDefinition> {
    table.get(resolve_rank(table, locked_amount) + 1)
}

/// Progress through the current tier band, in [0, 100]. 100 at the top tier.
pub fn progress_percent(table: &TierTable, locked_amount: f64) -> f64 {
    let amount = clamp_amount(locked_amount);
    let rank = resolve_rank(table, amount);
    let Some(next) = table.get(rank + 1) else {
        return 100.0;
    };
    let current = &table.tiers()[rank];

    let band = next.requirement - current.requirement;
    if band <= 0.0 {
        return 100.0;
    }
    ((amount - current.requirement) / band * 100.0).clamp(0.0, 100.0)
}

/// Balance still missing to reach the next tier. 0 at the top tier.
pub fn amount_to_next_tier(table: &TierTable, locked_amount: f64) -> f64 {
    let amount = clamp_amount(locked_amount);
    match next_tier(table, amount) {
        Some(next) => (next.requirement - amount).max(0.0),
        None => 0.0,
    }
}

pub fn tier_status(table: &TierTable, locked_amount: f64) -> TierStatus {
    let amount = clamp_amount(locked_amount);
    TierStatus {
        locked_amount: amount,
        current: resolve_tier(table, amount).clone(),
        next: next_tier(table, amount).cloned(),
        progress_percent: progress_percent(table, amount),
        amount_to_next_tier: amount_to_next_tier(table, amount),
    }
}

/// Event to append when a balance change moves the user into a higher tier.
///
/// Returns `None` when the tier is unchanged or drops. Persisting the event is
/// the caller's job.
pub fn detect_upgrade(
    table: &TierTable,
    previous_amount: f64,
    new_amount: f64,
    at: DateTime<Utc>,
) -> Option<ProgressionEvent> {
    let before = resolve_rank(table, previous_amount);
    let after = resolve_rank(table, new_amount);
    if after <= before {
        return None;
    }

    let previous = &table.tiers()[before];
    let reached = &table.tiers()[after];
    tracing::debug!(from = %previous.name, to = %reached.name, "tier upgrade detected");

    Some(ProgressionEvent::new(
        at,
        reached.level,
        reached.name.clone(),
        clamp_amount(new_amount),
        Some(previous.level),
    ))
}

/// Points earned on `base_points` after the tier's earning multiplier, rounded down.
pub fn earned_points(table: &TierTable, locked_amount: f64, base_points: u64) -> u64 {
    let multiplier = resolve_tier(table, locked_amount).multiplier;
    (base_points as f64 * multiplier).floor() as u64
}
