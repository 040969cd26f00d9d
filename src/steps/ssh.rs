use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use super::{Attempts, StepContext, StepOutcome};
use crate::error::HardenError;
use crate::exec::SystemCommand;

/// Directives appended to sshd_config.
///
/// sshd uses the first value it sees for most keywords, so appending only
/// wins for keywords not already set earlier in the file.
pub fn hardening_directives(port: u16) -> String {
    format!(
        "\nPort {}\nPermitRootLogin no\nPasswordAuthentication no\n",
        port
    )
}

/// Backup written next to the config before it is modified.
pub fn backup_path(config: &Path) -> PathBuf {
    let mut name = config.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

/// Back up sshd_config, move sshd to the configured port, disable root and
/// password logins, then restart sshd.
pub fn harden_ssh(ctx: &StepContext<'_>) -> StepOutcome {
    let sshd_config = ctx.config().sshd_config();
    let port = ctx.config().ssh.port;

    if ctx.dry_run() {
        info!(
            "Dry-run: Would set SSH Port to {}, disable root login and password auth.",
            port
        );
        return StepOutcome::Planned;
    }

    let mut attempts = Attempts::new(ctx);

    let backup = backup_path(&sshd_config);
    if let Err(source) = fs::copy(&sshd_config, &backup) {
        attempts.fail(HardenError::File {
            action: "back up",
            path: sshd_config.clone(),
            source,
        });
    }

    if let Err(source) = append(&sshd_config, &hardening_directives(port)) {
        attempts.fail(HardenError::File {
            action: "append to",
            path: sshd_config.clone(),
            source,
        });
    }

    attempts.run(SystemCommand::mutate("systemctl", ["restart", "sshd"]));
    info!("SSH hardened.");
    attempts.outcome()
}

fn append(path: &Path, text: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(text.as_bytes())
}
