//! Member snapshots: one JSON object per line, as exported by the member store.

use std::collections::HashSet;
use std::io::BufRead;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tierlock_core::ProgressionEvent;

use crate::error::BatchError;

/// Everything the engine needs about one member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberSnapshot {
    pub member_id: String,
    pub locked_amount: f64,
    /// Spendable claim points.
    #[serde(default)]
    pub claim_balance: u64,
    #[serde(default)]
    pub events: Vec<ProgressionEvent>,
}

/// Read snapshots from a JSONL file.
pub fn load_snapshots(path: &Path) -> Result<Vec<MemberSnapshot>, BatchError> {
    let file = std::fs::File::open(path).map_err(|source| BatchError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_snapshots(std::io::BufReader::new(file))
}

/// Parse JSONL snapshots. Blank lines are skipped; member ids must be unique.
pub fn parse_snapshots<R: BufRead>(reader: R) -> Result<Vec<MemberSnapshot>, BatchError> {
    let mut snapshots = Vec::new();
    let mut seen = HashSet::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let snapshot: MemberSnapshot = serde_json::from_str(trimmed).map_err(|source| {
            BatchError::Parse {
                line: line_no,
                source,
            }
        })?;
        if !seen.insert(snapshot.member_id.clone()) {
            return Err(BatchError::DuplicateMember {
                member_id: snapshot.member_id,
                line: line_no,
            });
        }
        snapshots.push(snapshot);
    }

    tracing::debug!(members = snapshots.len(), "parsed member snapshots");
    Ok(snapshots)
}
