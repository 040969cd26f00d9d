use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use super::detect::is_snapshot_capable_root;
use crate::exec::{CommandOutput, CommandRunner, SystemCommand};

/// strftime pattern for snapshot names.
pub const SNAPSHOT_LABEL_FORMAT: &str = "hardening-pre-%Y%m%d%H%M%S";

/// Identifier extracted from `btrfs subvolume show` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubvolumeId {
    Found(String),
    NotFound,
}

/// Extract the subvolume ID from `btrfs subvolume show` output.
///
/// Tied to btrfs-progs' text output. Two layouts are recognised:
/// a line starting with `ID <n>` (the `subvolume list` style row), and the
/// `Subvolume ID:  <n>` field printed by current `subvolume show`. The first
/// matching line wins.
pub fn parse_subvolume_id(output: &str) -> SubvolumeId {
    for line in output.lines() {
        let line = line.trim_start();

        if line.starts_with("ID ")
            && let Some(id) = line.split_whitespace().nth(1)
        {
            return SubvolumeId::Found(id.to_string());
        }

        if let Some(rest) = line.strip_prefix("Subvolume ID:")
            && let Some(id) = rest.split_whitespace().next()
        {
            return SubvolumeId::Found(id.to_string());
        }
    }
    SubvolumeId::NotFound
}

/// Creates pre-hardening snapshots of `/` and promotes them back on rollback.
pub struct SnapshotManager<'a> {
    runner: &'a dyn CommandRunner,
    directory: PathBuf,
}

impl<'a> SnapshotManager<'a> {
    pub fn new(runner: &'a dyn CommandRunner, directory: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            directory: directory.into(),
        }
    }

    /// Whether `/` is a Btrfs volume.
    pub fn is_capable(&self) -> bool {
        is_snapshot_capable_root(self.runner)
    }

    /// Take a read-only, timestamp-labelled snapshot of `/`.
    ///
    /// Returns `None` (and leaves the filesystem untouched) when the root is
    /// not Btrfs, and `None` with an error log when the snapshot fails.
    pub fn create(&self) -> Option<PathBuf> {
        if !self.is_capable() {
            warn!("Root filesystem is not Btrfs; skipping snapshot.");
            return None;
        }
        self.snapshot_root()
    }

    /// Snapshot `/` without probing the filesystem first.
    ///
    /// For callers that already know the root is Btrfs.
    pub fn snapshot_root(&self) -> Option<PathBuf> {
        if let Err(e) = fs::create_dir_all(&self.directory) {
            error!(
                "Failed to create snapshot directory {}: {}",
                self.directory.display(),
                e
            );
            return None;
        }

        let label = chrono::Local::now()
            .format(SNAPSHOT_LABEL_FORMAT)
            .to_string();
        let snapshot_path = self.directory.join(label);

        let command = SystemCommand::mutate("btrfs", ["subvolume", "snapshot", "-r", "/"])
            .arg(snapshot_path.to_string_lossy());

        match self.runner.run(&command) {
            Ok(output) if output.success() => {
                info!("Created Btrfs snapshot at {}", snapshot_path.display());
                Some(snapshot_path)
            }
            Ok(output) => {
                error!("Failed to create Btrfs snapshot.");
                log_stderr(&output);
                None
            }
            Err(e) => {
                error!("Failed to create Btrfs snapshot: {}", e);
                None
            }
        }
    }

    /// Make `snapshot` the default subvolume so the next boot uses it.
    ///
    /// Does not reboot. Returns `false` without issuing `set-default` when the
    /// root is not Btrfs or the snapshot path is gone.
    pub fn rollback(&self, snapshot: &Path) -> bool {
        if !self.is_capable() || !snapshot.exists() {
            error!("Cannot rollback. Either filesystem is not Btrfs or snapshot does not exist.");
            return false;
        }

        let show = SystemCommand::query("btrfs", ["subvolume", "show"])
            .arg(snapshot.to_string_lossy());
        let output = match self.runner.run(&show) {
            Ok(output) if output.success() => output,
            Ok(output) => {
                log_stderr(&output);
                error!("Rollback failed.");
                return false;
            }
            Err(e) => {
                error!("Rollback failed: {}", e);
                return false;
            }
        };

        let id = match parse_subvolume_id(&output.stdout) {
            SubvolumeId::Found(id) => id,
            SubvolumeId::NotFound => {
                error!(
                    "Rollback failed: no subvolume ID in `{}` output.",
                    show
                );
                return false;
            }
        };

        let set_default = SystemCommand::mutate("btrfs", ["subvolume", "set-default"])
            .arg(id)
            .arg("/");
        match self.runner.run(&set_default) {
            Ok(output) if output.success() => {
                info!("Rollback completed. Reboot to apply changes.");
                true
            }
            Ok(output) => {
                log_stderr(&output);
                error!("Rollback failed.");
                false
            }
            Err(e) => {
                error!("Rollback failed: {}", e);
                false
            }
        }
    }
}

fn log_stderr(output: &CommandOutput) {
    let stderr = output.stderr.trim();
    if !stderr.is_empty() {
        warn!("{}", stderr);
    }
}
