//! Top-level hardening and rollback sequences.
//!
//! The two paths are mutually exclusive. Hardening: optional snapshot, then
//! the seven steps in order, then the summary and journal. Rollback: read the
//! recorded snapshot and promote it.

use std::path::PathBuf;

use tracing::{error, info, warn};

use crate::config::Config;
use crate::exec::CommandRunner;
use crate::journal::{self, JournalEntry};
use crate::mode::HardeningMode;
use crate::snapshot::{SnapshotManager, SnapshotRecord};
use crate::steps::{self, RunSummary, StepContext};

/// What a hardening run did.
#[derive(Debug, Clone)]
pub struct HardenReport {
    /// Snapshot taken before the first step, if any.
    pub snapshot: Option<PathBuf>,
    pub summary: RunSummary,
}

/// How a rollback request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollbackOutcome {
    /// No snapshot has been recorded (or the record is unreadable).
    NoRecord,
    /// The snapshot is now the default subvolume; a reboot completes it.
    Completed(PathBuf),
    /// The recorded snapshot could not be promoted.
    Failed(PathBuf),
}

/// Drives a run against one command runner and configuration.
pub struct Orchestrator<'a> {
    runner: &'a dyn CommandRunner,
    config: &'a Config,
}

impl<'a> Orchestrator<'a> {
    pub fn new(runner: &'a dyn CommandRunner, config: &'a Config) -> Self {
        Self { runner, config }
    }

    fn snapshots(&self) -> SnapshotManager<'a> {
        SnapshotManager::new(self.runner, self.config.snapshot_dir())
    }

    fn record(&self) -> SnapshotRecord {
        SnapshotRecord::new(self.config.snapshot_record_file())
    }

    /// Harden the host for `mode`.
    ///
    /// Under dry-run no snapshot is taken, no journal entry is written and no
    /// mutating command is issued.
    pub fn harden(&self, mode: HardeningMode, dry_run: bool) -> HardenReport {
        if dry_run {
            info!("Hardening {} host (dry-run)", mode);
        } else {
            info!("Hardening {} host", mode);
        }

        let snapshot = if !dry_run && self.config.snapshot.enabled {
            self.take_snapshot()
        } else {
            None
        };

        let ctx = StepContext::new(self.runner, self.config, mode, dry_run);
        let summary = steps::run_all(&ctx);
        summary.log();

        if !dry_run {
            let entry = JournalEntry::harden(mode, snapshot.clone(), summary.steps.clone());
            if let Err(e) = journal::append_entry(&self.config.journal_file(), &entry) {
                warn!("Could not update run journal: {:#}", e);
            }
        }

        HardenReport { snapshot, summary }
    }

    fn take_snapshot(&self) -> Option<PathBuf> {
        let snapshots = self.snapshots();
        if !snapshots.is_capable() {
            info!("Root filesystem is not Btrfs; no snapshot taken.");
            return None;
        }
        let path = snapshots.snapshot_root()?;

        let record = self.record();
        match record.save(&path) {
            Ok(()) => info!(
                "Recorded snapshot for rollback in {}",
                record.file().display()
            ),
            Err(e) => error!("{:#}", e),
        }
        Some(path)
    }

    /// Promote the most recently recorded snapshot. Never reboots.
    pub fn rollback(&self) -> RollbackOutcome {
        let snapshot = match self.record().load() {
            Ok(Some(path)) => path,
            Ok(None) => {
                error!("No snapshot information found.");
                return RollbackOutcome::NoRecord;
            }
            Err(e) => {
                error!("No snapshot information found: {:#}", e);
                return RollbackOutcome::NoRecord;
            }
        };

        info!("Rolling back to {}", snapshot.display());
        let completed = self.snapshots().rollback(&snapshot);

        let entry = JournalEntry::rollback(snapshot.clone(), completed);
        if let Err(e) = journal::append_entry(&self.config.journal_file(), &entry) {
            warn!("Could not update run journal: {:#}", e);
        }

        if completed {
            RollbackOutcome::Completed(snapshot)
        } else {
            RollbackOutcome::Failed(snapshot)
        }
    }
}
