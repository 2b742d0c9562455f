use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// A single membership tier: a named rank unlocked at a locked-balance threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierDefinition {
    /// Integer rank, strictly increasing through the table.
    pub level: u32,
    /// Display label. Also the key used by per-tier price overrides.
    pub name: String,
    /// Minimum locked balance (inclusive) to hold this tier.
    pub requirement: f64,
    /// Earning multiplier, always >= 1.0.
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    /// Partner discount, 0-100.
    #[serde(default)]
    pub discount_percent: u8,
    /// Human-readable perks. Opaque to the engine.
    #[serde(default)]
    pub benefits: Vec<String>,
}

fn default_multiplier() -> f64 {
    1.0
}

impl TierDefinition {
    pub fn new(level: u32, name: impl Into<String>, requirement: f64) -> Self {
        Self {
            level,
            name: name.into(),
            requirement,
            multiplier: 1.0,
            discount_percent: 0,
            benefits: Vec::new(),
        }
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn with_discount(mut self, discount_percent: u8) -> Self {
        self.discount_percent = discount_percent;
        self
    }

    pub fn with_benefits<I, S>(mut self, benefits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.benefits = benefits.into_iter().map(Into::into).collect();
        self
    }

    /// Case-insensitive name match.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }
}

/// Errors from building a tier table.
#[derive(Debug, Error, PartialEq)]
pub enum TierTableError {
    #[error("tier table is empty")]
    Empty,
    #[error("duplicate tier name: {0}")]
    DuplicateName(String),
    #[error("tiers {first} and {second} share requirement {requirement}")]
    DuplicateRequirement {
        first: String,
        second: String,
        requirement: f64,
    },
    #[error("tier {second} (level {second_level}) must have a higher level than {first} (level {first_level})")]
    NonIncreasingLevel {
        first: String,
        first_level: u32,
        second: String,
        second_level: u32,
    },
    #[error("tier {name}: requirement must be a finite number, got {requirement}")]
    InvalidRequirement { name: String, requirement: f64 },
    #[error("tier {name}: multiplier {multiplier} is below 1.0")]
    InvalidMultiplier { name: String, multiplier: f64 },
    #[error("tier {name}: discount {discount_percent}% exceeds 100")]
    InvalidDiscount { name: String, discount_percent: u8 },
}

/// Ordered, immutable tier schedule.
///
/// Every entry point of the engine takes a `&TierTable` explicitly. The table
/// is normalized on construction: sorted by requirement, with the lowest
/// requirement clamped to zero so the bottom tier is always attainable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TierTable {
    tiers: Vec<TierDefinition>,
}

impl TierTable {
    pub fn new(mut tiers: Vec<TierDefinition>) -> Result<Self, TierTableError> {
        if tiers.is_empty() {
            return Err(TierTableError::Empty);
        }

        for tier in &tiers {
            if !tier.requirement.is_finite() {
                return Err(TierTableError::InvalidRequirement {
                    name: tier.name.clone(),
                    requirement: tier.requirement,
                });
            }
            if tier.multiplier.is_nan() || tier.multiplier < 1.0 {
                return Err(TierTableError::InvalidMultiplier {
                    name: tier.name.clone(),
                    multiplier: tier.multiplier,
                });
            }
            if tier.discount_percent > 100 {
                return Err(TierTableError::InvalidDiscount {
                    name: tier.name.clone(),
                    discount_percent: tier.discount_percent,
                });
            }
        }

        for (i, tier) in tiers.iter().enumerate() {
            if let Some(dup) = tiers[i + 1..].iter().find(|t| t.is_named(&tier.name)) {
                return Err(TierTableError::DuplicateName(dup.name.clone()));
            }
        }

        let was_sorted = tiers
            .windows(2)
            .all(|w| w[0].requirement <= w[1].requirement);
        if !was_sorted {
            debug!("tier table not ordered by requirement, sorting");
            tiers.sort_by(|a, b| a.requirement.total_cmp(&b.requirement));
        }

        if let Some(w) = tiers
            .windows(2)
            .find(|w| w[0].requirement == w[1].requirement)
        {
            return Err(TierTableError::DuplicateRequirement {
                first: w[0].name.clone(),
                second: w[1].name.clone(),
                requirement: w[0].requirement,
            });
        }

        // Ordered by requirement, levels must climb too.
        if let Some(w) = tiers.windows(2).find(|w| w[0].level >= w[1].level) {
            return Err(TierTableError::NonIncreasingLevel {
                first: w[0].name.clone(),
                first_level: w[0].level,
                second: w[1].name.clone(),
                second_level: w[1].level,
            });
        }

        if tiers[0].requirement != 0.0 {
            debug!(
                tier = %tiers[0].name,
                requirement = tiers[0].requirement,
                "clamping lowest tier requirement to zero"
            );
            tiers[0].requirement = 0.0;
        }

        Ok(Self { tiers })
    }

    /// Five-tier schedule used when no configuration is supplied.
    pub fn standard() -> Self {
        let tiers = vec![
            TierDefinition::new(0, "bronze", 0.0)
                .with_benefits(["Marketplace access"]),
            TierDefinition::new(1, "silver", 1_000.0)
                .with_multiplier(1.1)
                .with_discount(5)
                .with_benefits(["Marketplace access", "5% partner discount"]),
            TierDefinition::new(2, "gold", 5_000.0)
                .with_multiplier(1.25)
                .with_discount(10)
                .with_benefits([
                    "Marketplace access",
                    "10% partner discount",
                    "Gold-only claims",
                ]),
            TierDefinition::new(3, "platinum", 20_000.0)
                .with_multiplier(1.5)
                .with_discount(15)
                .with_benefits([
                    "Marketplace access",
                    "15% partner discount",
                    "Gold-only claims",
                    "Early drops",
                ]),
            TierDefinition::new(4, "diamond", 50_000.0)
                .with_multiplier(2.0)
                .with_discount(25)
                .with_benefits([
                    "Marketplace access",
                    "25% partner discount",
                    "All exclusive claims",
                    "Early drops",
                    "Concierge support",
                ]),
        ];
        Self { tiers }
    }

    pub fn tiers(&self) -> &[TierDefinition] {
        &self.tiers
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Always false: construction rejects empty tables.
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TierDefinition> {
        self.tiers.iter()
    }

    pub fn lowest(&self) -> &TierDefinition {
        &self.tiers[0]
    }

    pub fn highest(&self) -> &TierDefinition {
        &self.tiers[self.tiers.len() - 1]
    }

    pub fn get(&self, rank: usize) -> Option<&TierDefinition> {
        self.tiers.get(rank)
    }

    /// Position of the named tier in table order. Names match case-insensitively.
    pub fn rank_of(&self, name: &str) -> Option<usize> {
        self.tiers.iter().position(|t| t.is_named(name))
    }

    /// Position of the tier with the given level.
    pub fn rank_of_level(&self, level: u32) -> Option<usize> {
        self.tiers.iter().position(|t| t.level == level)
    }

    pub fn by_name(&self, name: &str) -> Option<&TierDefinition> {
        self.rank_of(name).map(|rank| &self.tiers[rank])
    }

    /// True when `tier_name` ranks at or above `minimum` in table order.
    ///
    /// Unknown names never satisfy a minimum, and an unknown minimum is never met.
    pub fn meets_minimum(&self, tier_name: &str, minimum: &str) -> bool {
        match (self.rank_of(tier_name), self.rank_of(minimum)) {
            (Some(rank), Some(required)) => rank >= required,
            _ => false,
        }
    }
}

impl<'a> IntoIterator for &'a TierTable {
    type Item = &'a TierDefinition;
    type IntoIter = std::slice::Iter<'a, TierDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiers.iter()
    }
}

impl<'de> Deserialize<'de> for TierTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let tiers = Vec::<TierDefinition>::deserialize(deserializer)?;
        TierTable::new(tiers).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_tiers() -> Vec<TierDefinition> {
        vec![
            TierDefinition::new(0, "bronze", 0.0),
            TierDefinition::new(1, "silver", 1_000.0),
            TierDefinition::new(2, "gold", 5_000.0),
        ]
    }

    #[test]
    fn standard_table_is_valid() {
        let standard = TierTable::standard();
        let rebuilt = TierTable::new(standard.tiers().to_vec()).unwrap();
        assert_eq!(standard, rebuilt);
        assert_eq!(standard.lowest().requirement, 0.0);
    }

    #[test]
    fn empty_table_rejected() {
        assert_eq!(TierTable::new(vec![]), Err(TierTableError::Empty));
    }

    #[test]
    fn unordered_table_is_sorted() {
        let mut tiers = three_tiers();
        tiers.reverse();
        let table = TierTable::new(tiers).unwrap();
        let names: Vec<&str> = table.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["bronze", "silver", "gold"]);
    }

    #[test]
    fn lowest_requirement_clamped_to_zero() {
        let mut tiers = three_tiers();
        tiers[0].requirement = 250.0;
        let table = TierTable::new(tiers).unwrap();
        assert_eq!(table.lowest().requirement, 0.0);
    }

    #[test]
    fn duplicate_names_rejected_case_insensitively() {
        let mut tiers = three_tiers();
        tiers[2].name = "Silver".into();
        assert!(matches!(
            TierTable::new(tiers),
            Err(TierTableError::DuplicateName(_))
        ));
    }

    #[test]
    fn duplicate_requirements_rejected() {
        let mut tiers = three_tiers();
        tiers[2].requirement = 1_000.0;
        assert!(matches!(
            TierTable::new(tiers),
            Err(TierTableError::DuplicateRequirement { .. })
        ));
    }

    #[test]
    fn shared_or_descending_levels_rejected() {
        let mut tiers = three_tiers();
        tiers[2].level = 1;
        assert_eq!(
            TierTable::new(tiers),
            Err(TierTableError::NonIncreasingLevel {
                first: "silver".into(),
                first_level: 1,
                second: "gold".into(),
                second_level: 1,
            })
        );

        // Sorted by requirement, gold would sit above silver with a lower level.
        let mut tiers = three_tiers();
        tiers[1].level = 2;
        tiers[2].level = 1;
        assert!(matches!(
            TierTable::new(tiers),
            Err(TierTableError::NonIncreasingLevel { .. })
        ));
    }

    #[test]
    fn level_gaps_are_allowed() {
        let mut tiers = three_tiers();
        tiers[1].level = 10;
        tiers[2].level = 20;
        let table = TierTable::new(tiers).unwrap();
        assert_eq!(table.rank_of_level(20), Some(2));
    }

    #[test]
    fn bad_multiplier_and_discount_rejected() {
        let mut tiers = three_tiers();
        tiers[1].multiplier = 0.5;
        assert!(matches!(
            TierTable::new(tiers),
            Err(TierTableError::InvalidMultiplier { .. })
        ));

        let mut tiers = three_tiers();
        tiers[1].discount_percent = 101;
        assert!(matches!(
            TierTable::new(tiers),
            Err(TierTableError::InvalidDiscount { .. })
        ));
    }

    #[test]
    fn rank_uses_table_order_not_alphabetic() {
        let table = TierTable::standard();
        // "bronze" < "gold" < "platinum" < "silver" alphabetically.
        assert!(table.rank_of("silver").unwrap() < table.rank_of("gold").unwrap());
        assert!(table.meets_minimum("platinum", "silver"));
        assert!(!table.meets_minimum("silver", "gold"));
        assert!(table.meets_minimum("GOLD", "gold"));
        assert!(!table.meets_minimum("unknown", "bronze"));
        assert!(!table.meets_minimum("diamond", "unknown"));
    }

    #[test]
    fn deserializing_validates() {
        let json = r#"[
            {"level": 1, "name": "gold", "requirement": 5000.0},
            {"level": 0, "name": "bronze", "requirement": 0.0}
        ]"#;
        let table: TierTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.lowest().name, "bronze");
        assert_eq!(table.highest().multiplier, 1.0);

        let bad: Result<TierTable, _> = serde_json::from_str("[]");
        assert!(bad.is_err());
    }
}
