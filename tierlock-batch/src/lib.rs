//! Tierlock Batch: evaluate many members at once.
//!
//! This crate builds on `tierlock-core` to provide:
//! - JSONL member snapshot loading
//! - Parallel per-member evaluation against one engine config
//! - Population rollups (tier distribution, forecast confidence)
//! - JSON and CSV report export

pub mod error;
pub mod export;
pub mod report;
pub mod snapshot;

pub use error::BatchError;
pub use export::{
    export_reports_csv, export_reports_json, write_reports, write_summary, ReportFormat,
};
pub use report::{
    evaluate_member, summarize, BatchEvaluator, BatchSummary, ConfidenceCounts, MemberReport,
    TierCount,
};
pub use snapshot::{load_snapshots, parse_snapshots, MemberSnapshot};
