//! Memoized forecasts for a single member's history.

use chrono::{DateTime, NaiveDate, Utc};

use super::predict::{forecast_next_tier_at, ForecastResult};
use crate::config::ForecastConfig;
use crate::domain::{ProgressionEvent, TierTable};

/// Cache key: histories are append-only, so length plus latest timestamp
/// identifies a version of one member's log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct MemoKey {
    event_count: usize,
    last_timestamp: Option<DateTime<Utc>>,
    today: NaiveDate,
}

/// Forecast cache bound to one tier table and config.
///
/// Keys carry no member identity: use one memo per member history. Only the
/// latest key is kept, so an appended event or a new day replaces the entry.
#[derive(Debug, Clone)]
pub struct ForecastMemo {
    table: TierTable,
    config: ForecastConfig,
    latest: Option<(MemoKey, ForecastResult)>,
    hits: u64,
}

impl ForecastMemo {
    pub fn new(table: TierTable, config: ForecastConfig) -> Self {
        Self {
            table,
            config,
            latest: None,
            hits: 0,
        }
    }

    pub fn forecast(&mut self, events: &[ProgressionEvent], today: NaiveDate) -> ForecastResult {
        let key = MemoKey {
            event_count: events.len(),
            last_timestamp: events.iter().map(|e| e.timestamp).max(),
            today,
        };

        if let Some((cached_key, cached)) = &self.latest {
            if *cached_key == key {
                self.hits += 1;
                return cached.clone();
            }
        }

        let result = forecast_next_tier_at(events, &self.table, &self.config, today);
        self.latest = Some((key, result.clone()));
        result
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn len(&self) -> usize {
        usize::from(self.latest.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_none()
    }

    pub fn clear(&mut self) {
        self.latest = None;
    }
}
