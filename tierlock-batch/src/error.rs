use std::path::PathBuf;

use thiserror::Error;

/// Errors from batch input and report export.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: invalid member snapshot: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("duplicate member id {member_id} on line {line}")]
    DuplicateMember { member_id: String, line: usize },
    #[error("serialize reports: {0}")]
    Json(#[from] serde_json::Error),
    #[error("write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV buffer: {0}")]
    CsvBuffer(String),
}
