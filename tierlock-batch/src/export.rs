//! Report export: JSON and CSV artifacts for downstream dashboards.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::BatchError;
use crate::report::{BatchSummary, MemberReport};

pub const REPORTS_STEM: &str = "member_reports";
pub const SUMMARY_FILE: &str = "batch_summary.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Csv,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            other => Err(format!("unknown report format '{other}' (expected json or csv)")),
        }
    }
}

/// Pretty JSON array of full reports.
pub fn export_reports_json(reports: &[MemberReport]) -> Result<String, BatchError> {
    Ok(serde_json::to_string_pretty(reports)?)
}

/// Flat CSV, one row per member.
///
/// Columns: member_id, locked_amount, tier, next_tier, progress_percent,
/// amount_to_next_tier, claim_balance, event_count, average_tier_dwell_days,
/// upgrade_velocity_per_month, estimated_arrival_date, days_remaining,
/// confidence, daily_rate
pub fn export_reports_csv(reports: &[MemberReport]) -> Result<String, BatchError> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "member_id",
        "locked_amount",
        "tier",
        "next_tier",
        "progress_percent",
        "amount_to_next_tier",
        "claim_balance",
        "event_count",
        "average_tier_dwell_days",
        "upgrade_velocity_per_month",
        "estimated_arrival_date",
        "days_remaining",
        "confidence",
        "daily_rate",
    ])?;

    for r in reports {
        wtr.write_record([
            r.member_id.clone(),
            format!("{:.2}", r.status.locked_amount),
            r.status.current.name.clone(),
            r.status.next.as_ref().map(|t| t.name.clone()).unwrap_or_default(),
            format!("{:.2}", r.status.progress_percent),
            format!("{:.2}", r.status.amount_to_next_tier),
            r.claim_balance.to_string(),
            r.statistics.event_count.to_string(),
            format!("{:.2}", r.statistics.average_tier_dwell_days),
            format!("{:.4}", r.statistics.upgrade_velocity_per_month),
            r.forecast
                .estimated_arrival_date
                .map(|d| d.to_string())
                .unwrap_or_default(),
            r.forecast
                .days_remaining
                .map(|d| d.to_string())
                .unwrap_or_default(),
            r.forecast.confidence.to_string(),
            format!("{:.4}", r.forecast.daily_rate),
        ])?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| BatchError::CsvBuffer(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| BatchError::CsvBuffer(e.to_string()))
}

/// Write reports into `dir` as `member_reports.<ext>`. Returns the file path.
pub fn write_reports(
    dir: &Path,
    reports: &[MemberReport],
    format: ReportFormat,
) -> Result<PathBuf, BatchError> {
    let body = match format {
        ReportFormat::Json => export_reports_json(reports)?,
        ReportFormat::Csv => export_reports_csv(reports)?,
    };
    let path = dir.join(format!("{REPORTS_STEM}.{}", format.extension()));
    write_file(dir, &path, &body)?;
    Ok(path)
}

/// Write the batch rollup as `batch_summary.json` in `dir`.
pub fn write_summary(dir: &Path, summary: &BatchSummary) -> Result<PathBuf, BatchError> {
    let body = serde_json::to_string_pretty(summary)?;
    let path = dir.join(SUMMARY_FILE);
    write_file(dir, &path, &body)?;
    Ok(path)
}

fn write_file(dir: &Path, path: &Path, body: &str) -> Result<(), BatchError> {
    std::fs::create_dir_all(dir).map_err(|source| BatchError::Write {
        path: dir.to_path_buf(),
        source,
    })?;
    std::fs::write(path, body).map_err(|source| BatchError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "wrote report");
    Ok(())
}
