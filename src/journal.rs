//! Append-only run journal.
//!
//! Stored at `/var/lib/hardening/runs.jsonl` by default. Every real
//! (non dry-run) hardening run and every rollback attempt appends one line.
//!
//! # Format
//!
//! One JSON object per line (JSONL):
//!
//! | Field | Description |
//! |-------|-------------|
//! | `ts` | RFC 3339 timestamp |
//! | `action` | `harden` or `rollback` |
//! | `mode` | `workstation` / `server` (harden only) |
//! | `snapshot` | Snapshot taken before hardening, or rolled back to |
//! | `steps` | Per-step outcome (harden only) |
//! | `detail` | Free-form note, e.g. why a rollback failed |

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::mode::HardeningMode;
use crate::paths::ensure_parent;
use crate::steps::StepReport;

/// What a journal entry records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JournalAction {
    Harden,
    Rollback,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JournalEntry {
    pub ts: String,
    pub action: JournalAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<HardeningMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<StepReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl JournalEntry {
    pub fn harden(
        mode: HardeningMode,
        snapshot: Option<PathBuf>,
        steps: Vec<StepReport>,
    ) -> Self {
        Self {
            ts: chrono::Utc::now().to_rfc3339(),
            action: JournalAction::Harden,
            mode: Some(mode),
            snapshot,
            steps,
            detail: None,
        }
    }

    pub fn rollback(snapshot: PathBuf, completed: bool) -> Self {
        Self {
            ts: chrono::Utc::now().to_rfc3339(),
            action: JournalAction::Rollback,
            mode: None,
            snapshot: Some(snapshot),
            steps: Vec::new(),
            detail: Some(if completed { "completed" } else { "failed" }.to_string()),
        }
    }
}

/// Append `entry` as one JSON line, creating the file and its directory.
pub fn append_entry(path: &Path, entry: &JournalEntry) -> Result<()> {
    ensure_parent(path)?;
    let json = serde_json::to_string(entry).context("Failed to serialize journal entry")?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open run journal: {}", path.display()))?;
    writeln!(file, "{}", json)
        .with_context(|| format!("Failed to write run journal: {}", path.display()))?;
    Ok(())
}

/// Read every entry; lines that fail to parse are skipped.
#[cfg(test)]
pub fn read_entries(path: &Path) -> Result<Vec<JournalEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read run journal: {}", path.display()))?;
    Ok(content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(|l| serde_json::from_str(l).ok())
        .collect())
}
