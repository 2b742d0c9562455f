//! Tierlock Core: membership progression and forecasting engine.
//!
//! Pure, synchronous functions over caller-supplied state:
//! - Tier table (validated, injected, never global)
//! - Tier resolution: balance to tier, progress, remaining amount
//! - Tier pricing: effective claim price, discount, claim eligibility
//! - Progression forecasting: history statistics and next-tier arrival

pub mod config;
pub mod domain;
pub mod forecast;
pub mod pricing;
pub mod stats;
pub mod tiers;

pub use config::{ConfigError, EngineConfig, ForecastConfig};
pub use domain::{CatalogItem, ProgressionEvent, TierDefinition, TierTable, TierTableError};
pub use forecast::{
    compute_statistics, forecast_next_tier, forecast_next_tier_at, Confidence, ForecastMemo,
    ForecastResult, ProgressionStatistics,
};
pub use pricing::{
    all_tier_prices, can_claim, price_for_tier, Eligibility, IneligibleReason, PriceResult,
    TierPrice,
};
pub use tiers::{
    amount_to_next_tier, detect_upgrade, earned_points, next_tier, progress_percent,
    resolve_tier, tier_status, TierStatus,
};
