//! Small numeric helpers shared by the forecaster.

use chrono::{DateTime, Utc};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Fractional days from `from` to `to`. Negative when `to` precedes `from`.
pub fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_seconds() as f64 / SECONDS_PER_DAY
}

pub(crate) fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
pub(crate) fn population_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(values);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// `std / mean`, or `None` when the mean is not positive.
pub(crate) fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    let mean = mean_f64(values);
    if values.is_empty() || mean <= 0.0 || !mean.is_finite() {
        return None;
    }
    Some(population_std_dev(values) / mean)
}
