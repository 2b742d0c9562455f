//! Engine configuration: tier schedule and forecast parameters, loaded from TOML.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::TierTable;

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("serialize config TOML: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid forecast parameter {field}: {reason}")]
    InvalidForecast { field: &'static str, reason: String },
}

/// Tuning for the next-tier forecaster.
///
/// The 0.7 / 0.3 blend and 3-delta recency window are heuristics kept as
/// defaults; they are not derived from data.
///
/// Confidence thresholds count events, not intervals: `n` events give `n - 1`
/// intervals, so `medium_min_events = 3` accepts a history with two intervals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Weight of the recent locking rate in the blended daily rate.
    pub recent_weight: f64,
    /// Weight of the all-time locking rate in the blended daily rate.
    pub all_time_weight: f64,
    /// How many of the latest deltas feed the recent rate.
    pub recent_window: usize,
    /// Minimum events (intervals + 1) for `high` confidence.
    pub high_min_events: usize,
    /// Coefficient of variation must be below this for `high`.
    pub high_max_cv: f64,
    /// Minimum events (intervals + 1) for `medium` confidence.
    pub medium_min_events: usize,
    /// Coefficient of variation must be below this for `medium`.
    pub medium_max_cv: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            recent_weight: 0.7,
            all_time_weight: 0.3,
            recent_window: 3,
            high_min_events: 5,
            high_max_cv: 0.5,
            medium_min_events: 3,
            medium_max_cv: 1.0,
        }
    }
}

impl ForecastConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("recent_weight", self.recent_weight),
            ("all_time_weight", self.all_time_weight),
            ("high_max_cv", self.high_max_cv),
            ("medium_max_cv", self.medium_max_cv),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidForecast {
                    field,
                    reason: format!("must be a non-negative number, got {value}"),
                });
            }
        }
        if self.recent_weight + self.all_time_weight <= 0.0 {
            return Err(ConfigError::InvalidForecast {
                field: "recent_weight",
                reason: "recent and all-time weights cannot both be zero".into(),
            });
        }
        if self.recent_window == 0 {
            return Err(ConfigError::InvalidForecast {
                field: "recent_window",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}

/// Everything the engine needs besides per-user inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "TierTable::standard")]
    pub tiers: TierTable,
    #[serde(default)]
    pub forecast: ForecastConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tiers: TierTable::standard(),
            forecast: ForecastConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.forecast.validate()?;
        tracing::debug!(tiers = config.tiers.len(), "engine config loaded");
        Ok(config)
    }

    /// Load from `path` when given, else the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
