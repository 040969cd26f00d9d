use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths::ensure_parent;

/// Plain-text file holding the path of the most recent pre-hardening snapshot.
///
/// Written once per successful snapshot, read once per rollback. There is no
/// locking or versioning; the last writer wins.
#[derive(Debug, Clone)]
pub struct SnapshotRecord {
    file: PathBuf,
}

impl SnapshotRecord {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self { file: file.into() }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Read the recorded snapshot path.
    ///
    /// Returns `None` if the file is absent or holds only whitespace.
    pub fn load(&self) -> Result<Option<PathBuf>> {
        if !self.file.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.file).with_context(|| {
            format!("Failed to read snapshot record: {}", self.file.display())
        })?;
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        Ok(Some(PathBuf::from(trimmed)))
    }

    /// Persist `snapshot` as the rollback target, creating the parent directory.
    pub fn save(&self, snapshot: &Path) -> Result<()> {
        ensure_parent(&self.file)?;
        fs::write(&self.file, snapshot.as_os_str().as_encoded_bytes()).with_context(|| {
            format!("Failed to write snapshot record: {}", self.file.display())
        })?;
        Ok(())
    }
}
