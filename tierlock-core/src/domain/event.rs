use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable record of a user crossing into a higher tier.
///
/// One event is appended per upgrade; the first event in a history is the
/// user's initial lock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionEvent {
    pub timestamp: DateTime<Utc>,
    pub tier_level: u32,
    pub tier_name: String,
    /// Cumulative locked balance at the time of the event.
    pub locked_amount: f64,
    #[serde(default)]
    pub previous_tier_level: Option<u32>,
}

impl ProgressionEvent {
    pub fn new(
        timestamp: DateTime<Utc>,
        tier_level: u32,
        tier_name: impl Into<String>,
        locked_amount: f64,
        previous_tier_level: Option<u32>,
    ) -> Self {
        Self {
            timestamp,
            tier_level,
            tier_name: tier_name.into(),
            locked_amount,
            previous_tier_level,
        }
    }
}

/// Copy of `events` in chronological order.
///
/// Histories are expected to arrive sorted; the copy keeps the caller's
/// slice untouched either way.
pub fn chronological(events: &[ProgressionEvent]) -> Vec<ProgressionEvent> {
    let mut sorted = events.to_vec();
    if !sorted.windows(2).all(|w| w[0].timestamp <= w[1].timestamp) {
        tracing::debug!(count = sorted.len(), "progression events out of order, sorting");
        sorted.sort_by_key(|e| e.timestamp);
    }
    sorted
}
