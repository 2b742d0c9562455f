use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ForecastConfig;
use crate::stats::coefficient_of_variation;

/// How much to trust a forecast. Ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        };
        f.write_str(label)
    }
}

/// Grade locking cadence by its regularity.
///
/// `event_count` is the number of events behind `intervals`, one more than
/// `intervals.len()`. The minimums in `config` compare against it. Bursty
/// histories (high coefficient of variation) grade low however many events
/// they hold.
pub fn classify_confidence(
    intervals: &[f64],
    event_count: usize,
    config: &ForecastConfig,
) -> Confidence {
    let Some(cv) = coefficient_of_variation(intervals) else {
        return Confidence::Low;
    };

    if event_count >= config.high_min_events && cv < config.high_max_cv {
        Confidence::High
    } else if event_count >= config.medium_min_events && cv < config.medium_max_cv {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_cadence_grades_high() {
        let config = ForecastConfig::default();
        let intervals = [30.0, 28.0, 31.0, 30.0, 29.0];
        assert_eq!(classify_confidence(&intervals, 6, &config), Confidence::High);
    }

    #[test]
    fn few_events_cap_at_medium() {
        let config = ForecastConfig::default();
        assert_eq!(classify_confidence(&[30.0, 30.0], 3, &config), Confidence::Medium);
        assert_eq!(classify_confidence(&[30.0], 2, &config), Confidence::Low);
    }

    #[test]
    fn minimums_count_events_not_intervals() {
        let config = ForecastConfig::default();
        // Five events, four intervals: meets high_min_events = 5.
        let intervals = [30.0, 30.0, 30.0, 30.0];
        assert_eq!(classify_confidence(&intervals, 5, &config), Confidence::High);
        assert_eq!(
            classify_confidence(&intervals[..3], 4, &config),
            Confidence::Medium
        );
    }

    #[test]
    fn bursty_cadence_grades_low() {
        let config = ForecastConfig::default();
        let intervals = [1.0, 1.0, 1.0, 120.0, 1.0, 1.0, 200.0];
        assert_eq!(classify_confidence(&intervals, 8, &config), Confidence::Low);
    }

    #[test]
    fn moderate_spread_grades_medium() {
        let config = ForecastConfig::default();
        // cv ~0.63
        let intervals = [10.0, 30.0, 10.0, 30.0, 5.0];
        assert_eq!(classify_confidence(&intervals, 6, &config), Confidence::Medium);
    }

    #[test]
    fn ordering_and_labels() {
        assert!(Confidence::High > Confidence::Medium);
        assert!(Confidence::Medium > Confidence::Low);
        assert_eq!(Confidence::Medium.to_string(), "medium");
        assert_eq!(serde_json::to_string(&Confidence::High).unwrap(), "\"high\"");
    }
}
