//! Tier pricing: effective claim price and claim eligibility per tier.
//!
//! Tier gating always goes through the tier table's rank order. Tier names
//! are never compared as strings for ordering.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::{CatalogItem, TierTable};

/// Effective price of an item for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceResult {
    pub price: u64,
    pub original_price: u64,
    /// Savings against the base cost, in [0, 100].
    pub discount_percent: u8,
    pub is_free: bool,
}

/// Why a claim was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum IneligibleReason {
    Inactive,
    OutOfStock,
    TierLocked { required_tier: String },
    InsufficientBalance { shortfall: u64 },
}

impl IneligibleReason {
    pub fn code(&self) -> &'static str {
        match self {
            IneligibleReason::Inactive => "inactive",
            IneligibleReason::OutOfStock => "out_of_stock",
            IneligibleReason::TierLocked { .. } => "tier_locked",
            IneligibleReason::InsufficientBalance { .. } => "insufficient_balance",
        }
    }
}

impl fmt::Display for IneligibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IneligibleReason::Inactive => write!(f, "item is not active"),
            IneligibleReason::OutOfStock => write!(f, "item is out of stock"),
            IneligibleReason::TierLocked { required_tier } => {
                write!(f, "requires {required_tier} tier or above")
            }
            IneligibleReason::InsufficientBalance { shortfall } => {
                write!(f, "short {shortfall} points")
            }
        }
    }
}

/// Outcome of a claim check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eligibility {
    pub eligible: bool,
    pub reason: Option<IneligibleReason>,
}

impl Eligibility {
    pub fn allowed() -> Self {
        Self {
            eligible: true,
            reason: None,
        }
    }

    pub fn denied(reason: IneligibleReason) -> Self {
        Self {
            eligible: false,
            reason: Some(reason),
        }
    }
}

/// One row of a tier price comparison table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierPrice {
    pub tier: String,
    pub level: u32,
    pub price: u64,
    pub is_free: bool,
    /// Tier ranks below the item's minimum tier.
    pub locked: bool,
}

pub fn price_for_tier(item: &CatalogItem, tier_name: &str) -> PriceResult {
    let original_price = item.base_cost;
    let price = item.override_for(tier_name).unwrap_or(original_price);

    // Free base cost means free for everyone, whatever the overrides say.
    let price = if original_price == 0 { 0 } else { price };

    PriceResult {
        price,
        original_price,
        discount_percent: discount_percent(price, original_price),
        is_free: price == 0,
    }
}

fn discount_percent(price: u64, original_price: u64) -> u8 {
    if original_price == 0 {
        return 0;
    }
    let saved = (1.0 - price as f64 / original_price as f64) * 100.0;
    saved.round().clamp(0.0, 100.0) as u8
}

/// Check whether a user on `tier_name` with `claim_balance` points may claim `item`.
///
/// Checks run in a fixed order: active flag, stock, tier gate, then
/// affordability, so a tier-locked item reports `TierLocked` whatever the balance.
pub fn can_claim(
    table: &TierTable,
    item: &CatalogItem,
    tier_name: &str,
    claim_balance: u64,
) -> Eligibility {
    if !item.active {
        return Eligibility::denied(IneligibleReason::Inactive);
    }

    if matches!(item.stock_remaining, Some(remaining) if remaining <= 0) {
        return Eligibility::denied(IneligibleReason::OutOfStock);
    }

    if let Some(minimum) = item.minimum_tier.as_deref() {
        if !table.meets_minimum(tier_name, minimum) {
            let required_tier = table
                .by_name(minimum)
                .map(|t| t.name.clone())
                .unwrap_or_else(|| minimum.to_string());
            return Eligibility::denied(IneligibleReason::TierLocked { required_tier });
        }
    }

    let price = price_for_tier(item, tier_name).price;
    if claim_balance < price {
        return Eligibility::denied(IneligibleReason::InsufficientBalance {
            shortfall: price - claim_balance,
        });
    }

    Eligibility::allowed()
}

/// Price of `item` for every tier, in table order.
pub fn all_tier_prices(table: &TierTable, item: &CatalogItem) -> Vec<TierPrice> {
    let minimum_rank = item.minimum_tier.as_deref().map(|m| table.rank_of(m));

    table
        .iter()
        .enumerate()
        .map(|(rank, tier)| {
            let result = price_for_tier(item, &tier.name);
            let locked = match minimum_rank {
                None => false,
                Some(Some(required)) => rank < required,
                Some(None) => true,
            };
            TierPrice {
                tier: tier.name.clone(),
                level: tier.level,
                price: result.price,
                is_free: result.is_free,
                locked,
            }
        })
        .collect()
}
