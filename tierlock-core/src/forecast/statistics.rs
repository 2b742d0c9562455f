//! Aggregate statistics over a user's progression history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{chronological, ProgressionEvent};
use crate::stats::{days_between, mean_f64};
use crate::tiers::clamp_amount;

/// Days per month for velocity figures.
pub const DAYS_PER_MONTH: f64 = 30.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionStatistics {
    /// Locked balance at the latest event.
    pub total_locked: f64,
    /// Mean days between consecutive events. 0 with fewer than 2 events.
    pub average_tier_dwell_days: f64,
    /// Events per month over the history span. 0 when the span is under a day.
    pub upgrade_velocity_per_month: f64,
    pub event_count: usize,
    pub first_event_at: Option<DateTime<Utc>>,
    pub last_event_at: Option<DateTime<Utc>>,
}

/// Day gaps between consecutive events. Expects chronological input.
pub(crate) fn interval_days(events: &[ProgressionEvent]) -> Vec<f64> {
    events
        .windows(2)
        .map(|w| days_between(w[0].timestamp, w[1].timestamp))
        .collect()
}

pub fn compute_statistics(events: &[ProgressionEvent]) -> ProgressionStatistics {
    let events = chronological(events);
    let (Some(first), Some(last)) = (events.first(), events.last()) else {
        return ProgressionStatistics {
            total_locked: 0.0,
            average_tier_dwell_days: 0.0,
            upgrade_velocity_per_month: 0.0,
            event_count: 0,
            first_event_at: None,
            last_event_at: None,
        };
    };

    let average_tier_dwell_days = mean_f64(&interval_days(&events));

    let span_days = days_between(first.timestamp, last.timestamp);
    let upgrade_velocity_per_month = if span_days < 1.0 {
        0.0
    } else {
        events.len() as f64 / (span_days / DAYS_PER_MONTH)
    };

    ProgressionStatistics {
        total_locked: clamp_amount(last.locked_amount),
        average_tier_dwell_days,
        upgrade_velocity_per_month,
        event_count: events.len(),
        first_event_at: Some(first.timestamp),
        last_event_at: Some(last.timestamp),
    }
}
