use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Marketplace item as supplied by the catalog store. Read-only to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Default price in claim units.
    pub base_cost: u64,
    /// Explicit prices keyed by tier name. Tiers without an entry pay `base_cost`.
    #[serde(default)]
    pub per_tier_override: Option<BTreeMap<String, u64>>,
    /// Lowest tier allowed to claim. `None` opens the item to every tier.
    #[serde(default)]
    pub minimum_tier: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub stock_remaining: Option<i64>,
}

fn default_active() -> bool {
    true
}

impl CatalogItem {
    pub fn new(base_cost: u64) -> Self {
        Self {
            base_cost,
            per_tier_override: None,
            minimum_tier: None,
            active: true,
            stock_remaining: None,
        }
    }

    pub fn with_override(mut self, tier: impl Into<String>, price: u64) -> Self {
        self.per_tier_override
            .get_or_insert_with(BTreeMap::new)
            .insert(tier.into(), price);
        self
    }

    pub fn with_minimum_tier(mut self, tier: impl Into<String>) -> Self {
        self.minimum_tier = Some(tier.into());
        self
    }

    pub fn with_stock(mut self, remaining: i64) -> Self {
        self.stock_remaining = Some(remaining);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Override price for `tier_name`, matching keys case-insensitively.
    pub fn override_for(&self, tier_name: &str) -> Option<u64> {
        let overrides = self.per_tier_override.as_ref()?;
        let key = tier_name.trim();
        overrides.get(key).copied().or_else(|| {
            overrides
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, price)| *price)
        })
    }
}
