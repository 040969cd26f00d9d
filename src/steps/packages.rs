//! Package-manager driven steps: system update and fail2ban.

use tracing::info;

use super::{Attempts, StepContext, StepOutcome};
use crate::exec::SystemCommand;

/// `dnf check-update` exits 100 when updates are available.
const DNF_UPDATES_AVAILABLE: i32 = 100;

/// Refresh metadata and upgrade every installed package.
///
/// Dry-run still queries the repositories with the read-only
/// `dnf check-update` so the operator sees what would change.
pub fn update_system(ctx: &StepContext<'_>) -> StepOutcome {
    let mut attempts = Attempts::new(ctx);

    if ctx.dry_run() {
        let check = SystemCommand::query("dnf", ["check-update"])
            .accept_codes(&[0, DNF_UPDATES_AVAILABLE])
            .streamed();
        attempts.run(check);
        info!("Dry-run: Checked for updates.");
        return StepOutcome::Planned;
    }

    attempts.run(SystemCommand::mutate("dnf", ["-y", "upgrade", "--refresh"]).streamed());
    info!("System updated.");
    attempts.outcome()
}

/// Install fail2ban and start it at boot.
pub fn install_fail2ban(ctx: &StepContext<'_>) -> StepOutcome {
    if ctx.dry_run() {
        info!("Dry-run: Would install and configure fail2ban.");
        return StepOutcome::Planned;
    }

    let mut attempts = Attempts::new(ctx);
    attempts.run(SystemCommand::mutate("dnf", ["-y", "install", "fail2ban"]).streamed());
    attempts.run(SystemCommand::mutate(
        "systemctl",
        ["enable", "--now", "fail2ban"],
    ));
    info!("fail2ban installed and running.");
    attempts.outcome()
}
