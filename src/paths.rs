//! System path resolution.
//!
//! hostharden runs as root and keeps its files in system locations. Each
//! directory goes through a two-level fallback:
//! 1. hostharden-specific env var (HOSTHARDEN_CONFIG_DIR, HOSTHARDEN_STATE_DIR)
//! 2. Fixed system default (/etc/hostharden, /var/lib/hardening)
//!
//! All paths are absolute. Relative paths from env vars are ignored.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_DIR: &str = "/etc/hostharden";
const DEFAULT_STATE_DIR: &str = "/var/lib/hardening";

/// Resolved directory paths for the whole tool.
///
/// Created once at startup, threaded through Config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// Config directory: config.toml lives here
    pub config_dir: PathBuf,

    /// State directory: last snapshot record, run journal
    pub state_dir: PathBuf,
}

impl Paths {
    /// Resolve all paths using real environment variables.
    pub fn resolve() -> Self {
        Self::resolve_with_env(|key| std::env::var(key))
    }

    /// Resolve paths with a custom env var lookup (for testing).
    pub fn resolve_with_env<F>(env_fn: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<String, std::env::VarError>,
    {
        let config_dir = env_or(&env_fn, "HOSTHARDEN_CONFIG_DIR", || {
            PathBuf::from(DEFAULT_CONFIG_DIR)
        });
        let state_dir = env_or(&env_fn, "HOSTHARDEN_STATE_DIR", || {
            PathBuf::from(DEFAULT_STATE_DIR)
        });

        Self {
            config_dir,
            state_dir,
        }
    }

    /// Config file: config_dir/config.toml
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Most recent snapshot path: state_dir/last_snapshot
    pub fn snapshot_record(&self) -> PathBuf {
        self.state_dir.join("last_snapshot")
    }

    /// Run journal: state_dir/runs.jsonl
    pub fn run_journal(&self) -> PathBuf {
        self.state_dir.join("runs.jsonl")
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::resolve()
    }
}

/// Resolve an env var with fallback. Ignores empty and relative paths.
fn env_or<F>(env_fn: &F, var: &str, default: impl FnOnce() -> PathBuf) -> PathBuf
where
    F: Fn(&str) -> std::result::Result<String, std::env::VarError>,
{
    env_fn(var)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .filter(|p| p.is_absolute())
        .unwrap_or_else(default)
}

/// Create the parent directory of `path` if it has one.
pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}
