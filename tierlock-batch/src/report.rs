//! Per-member evaluation against the engine.

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tierlock_core::forecast::{compute_statistics, forecast_next_tier_at};
use tierlock_core::tiers::resolve_rank;
use tierlock_core::{
    tier_status, Confidence, EngineConfig, ForecastResult, ProgressionStatistics, TierStatus,
};

use crate::snapshot::MemberSnapshot;

/// Engine output for one member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberReport {
    pub member_id: String,
    pub claim_balance: u64,
    pub status: TierStatus,
    pub statistics: ProgressionStatistics,
    pub forecast: ForecastResult,
}

pub fn evaluate_member(
    snapshot: &MemberSnapshot,
    config: &EngineConfig,
    today: NaiveDate,
) -> MemberReport {
    MemberReport {
        member_id: snapshot.member_id.clone(),
        claim_balance: snapshot.claim_balance,
        status: tier_status(&config.tiers, snapshot.locked_amount),
        statistics: compute_statistics(&snapshot.events),
        forecast: forecast_next_tier_at(&snapshot.events, &config.tiers, &config.forecast, today),
    }
}

/// Evaluates many members against one configuration.
///
/// Members are independent, so evaluation fans out across the rayon pool.
/// Reports come back in input order either way.
#[derive(Debug, Clone)]
pub struct BatchEvaluator {
    config: EngineConfig,
    parallel: bool,
}

impl BatchEvaluator {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            parallel: true,
        }
    }

    /// Enables or disables parallel execution.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn evaluate(&self, snapshots: &[MemberSnapshot], today: NaiveDate) -> Vec<MemberReport> {
        self.evaluate_with_progress(snapshots, today, |_, _, _| {})
    }

    /// Evaluate with a callback after each member: (index, total, report).
    pub fn evaluate_with_progress<F>(
        &self,
        snapshots: &[MemberSnapshot],
        today: NaiveDate,
        progress_callback: F,
    ) -> Vec<MemberReport>
    where
        F: Fn(usize, usize, &MemberReport) + Send + Sync,
    {
        let total = snapshots.len();
        tracing::info!(members = total, parallel = self.parallel, "evaluating members");

        let run = |(idx, snapshot): (usize, &MemberSnapshot)| {
            let report = evaluate_member(snapshot, &self.config, today);
            progress_callback(idx, total, &report);
            report
        };

        if self.parallel {
            snapshots.par_iter().enumerate().map(run).collect()
        } else {
            snapshots.iter().enumerate().map(run).collect()
        }
    }
}

/// Member count for one tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCount {
    pub tier: String,
    pub members: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Population-level rollup of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub members: usize,
    /// Every tier in table order, including empty ones.
    pub tiers: Vec<TierCount>,
    pub confidence: ConfidenceCounts,
    /// Members with a projected arrival date.
    pub dated_forecasts: usize,
    pub at_top_tier: usize,
    /// Mean days to next tier over dated forecasts.
    pub mean_days_remaining: Option<f64>,
}

pub fn summarize(reports: &[MemberReport], config: &EngineConfig) -> BatchSummary {
    // Bucket by table position so every member lands in exactly one tier.
    let mut per_rank = vec![0usize; config.tiers.len()];
    for report in reports {
        per_rank[resolve_rank(&config.tiers, report.status.locked_amount)] += 1;
    }
    let tiers = config
        .tiers
        .iter()
        .zip(per_rank)
        .map(|(tier, members)| TierCount {
            tier: tier.name.clone(),
            members,
        })
        .collect();

    let mut confidence = ConfidenceCounts::default();
    for report in reports {
        match report.forecast.confidence {
            Confidence::High => confidence.high += 1,
            Confidence::Medium => confidence.medium += 1,
            Confidence::Low => confidence.low += 1,
        }
    }

    let days: Vec<u64> = reports
        .iter()
        .filter_map(|r| r.forecast.days_remaining)
        .collect();
    let mean_days_remaining = if days.is_empty() {
        None
    } else {
        Some(days.iter().sum::<u64>() as f64 / days.len() as f64)
    };

    BatchSummary {
        members: reports.len(),
        tiers,
        confidence,
        dated_forecasts: days.len(),
        at_top_tier: reports.iter().filter(|r| r.status.next.is_none()).count(),
        mean_days_remaining,
    }
}
