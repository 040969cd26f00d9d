use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths::Paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Resolved system paths (not serialized)
    #[serde(skip)]
    pub paths: Paths,

    #[serde(default)]
    pub snapshot: SnapshotConfig,

    #[serde(default)]
    pub ssh: SshConfig,

    #[serde(default)]
    pub firewall: FirewallConfig,

    #[serde(default)]
    pub sysctl: SysctlConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Take a Btrfs snapshot of / before hardening (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Directory that receives the read-only snapshots
    #[serde(default = "default_snapshot_dir")]
    pub directory: String,

    /// File holding the most recent snapshot path.
    /// Default: state_dir/last_snapshot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SshConfig {
    #[serde(default = "default_sshd_config")]
    pub config_path: String,

    /// Port sshd is moved to
    #[serde(default = "default_ssh_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirewallConfig {
    /// firewalld service opened for inbound traffic
    #[serde(default = "default_allowed_service")]
    pub allowed_service: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SysctlConfig {
    /// Drop-in file that is overwritten with the hardening parameters
    #[serde(default = "default_sysctl_conf")]
    pub config_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// "text" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Run journal (JSONL). Default: state_dir/runs.jsonl
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
}

// Default value functions
fn default_true() -> bool {
    true
}
fn default_snapshot_dir() -> String {
    "/.snapshots".to_string()
}
fn default_sshd_config() -> String {
    "/etc/ssh/sshd_config".to_string()
}
fn default_ssh_port() -> u16 {
    2022
}
fn default_allowed_service() -> String {
    "ssh".to_string()
}
fn default_sysctl_conf() -> String {
    "/etc/sysctl.d/99-hardening.conf".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "text".to_string()
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            directory: default_snapshot_dir(),
            record_file: None,
        }
    }
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            config_path: default_sshd_config(),
            port: default_ssh_port(),
        }
    }
}

impl Default for FirewallConfig {
    fn default() -> Self {
        Self {
            allowed_service: default_allowed_service(),
        }
    }
}

impl Default for SysctlConfig {
    fn default() -> Self {
        Self {
            config_path: default_sysctl_conf(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            journal: None,
        }
    }
}

impl Config {
    /// Load the config file, falling back to defaults when it does not exist.
    ///
    /// An explicit `path` (from `--config` or `HOSTHARDEN_CONFIG`) must exist.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let paths = Paths::resolve();

        let file = match path {
            Some(explicit) => {
                let file = expand_path(explicit);
                if !file.exists() {
                    anyhow::bail!("Config file not found: {}", file.display());
                }
                file
            }
            None => paths.config_file(),
        };

        if !file.exists() {
            return Ok(Config {
                paths,
                ..Config::default()
            });
        }

        let mut config = Self::load_from(&file)?;
        config.paths = paths;
        Ok(config)
    }

    /// Parse a config file without touching `paths`.
    pub fn load_from(file: &Path) -> Result<Self> {
        let content = fs::read_to_string(file)
            .with_context(|| format!("Failed to read config file: {}", file.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", file.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self
            .logging
            .level
            .parse::<tracing::level_filters::LevelFilter>()
            .is_err()
        {
            anyhow::bail!(
                "Unknown logging.level '{}' (expected off, error, warn, info, debug or trace)",
                self.logging.level
            );
        }
        match self.logging.format.as_str() {
            "text" | "json" => {}
            other => anyhow::bail!(
                "Unknown logging.format '{}' (expected 'text' or 'json')",
                other
            ),
        }
        if self.ssh.port == 0 {
            anyhow::bail!("ssh.port must be between 1 and 65535");
        }
        if self.firewall.allowed_service.trim().is_empty() {
            anyhow::bail!("firewall.allowed_service must not be empty");
        }
        Ok(())
    }

    pub fn config_path(path: Option<&str>) -> PathBuf {
        match path {
            Some(explicit) => expand_path(explicit),
            None => Paths::resolve().config_file(),
        }
    }

    pub fn snapshot_dir(&self) -> PathBuf {
        expand_path(&self.snapshot.directory)
    }

    pub fn snapshot_record_file(&self) -> PathBuf {
        self.snapshot
            .record_file
            .as_deref()
            .map(expand_path)
            .unwrap_or_else(|| self.paths.snapshot_record())
    }

    pub fn sshd_config(&self) -> PathBuf {
        expand_path(&self.ssh.config_path)
    }

    pub fn sysctl_conf(&self) -> PathBuf {
        expand_path(&self.sysctl.config_path)
    }

    pub fn journal_file(&self) -> PathBuf {
        self.logging
            .journal
            .as_deref()
            .map(expand_path)
            .unwrap_or_else(|| self.paths.run_journal())
    }
}

fn expand_path(s: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(s).into_owned())
}

/// Default config template with comments (used by `config init`)
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# hostharden configuration
# Every key is optional; the values below are the built-in defaults.

[snapshot]
# Take a read-only Btrfs snapshot of / before hardening (skipped on other filesystems)
enabled = true
directory = "/.snapshots"
# record_file = "/var/lib/hardening/last_snapshot"

[ssh]
config_path = "/etc/ssh/sshd_config"
port = 2022

[firewall]
# firewalld service permitted inbound
allowed_service = "ssh"

[sysctl]
config_path = "/etc/sysctl.d/99-hardening.conf"

[logging]
level = "info"
format = "text"                 # text | json
# journal = "/var/lib/hardening/runs.jsonl"
"#;
