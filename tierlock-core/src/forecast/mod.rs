//! Progression forecasting: history statistics and next-tier prediction.

pub mod confidence;
pub mod memo;
pub mod predict;
pub mod statistics;

pub use confidence::{classify_confidence, Confidence};
pub use memo::ForecastMemo;
pub use predict::{forecast_next_tier, forecast_next_tier_at, ForecastResult};
pub use statistics::{compute_statistics, ProgressionStatistics, DAYS_PER_MONTH};
