use tracing::info;

use super::{Attempts, StepContext, StepOutcome};
use crate::exec::SystemCommand;

/// Install and start firewalld, permit the configured inbound service and
/// reload the rules.
pub fn configure_firewall(ctx: &StepContext<'_>) -> StepOutcome {
    let service = &ctx.config().firewall.allowed_service;

    if ctx.dry_run() {
        info!("Dry-run: Would configure firewalld.");
        return StepOutcome::Planned;
    }

    let mut attempts = Attempts::new(ctx);
    attempts.run(SystemCommand::mutate("dnf", ["-y", "install", "firewalld"]).streamed());
    attempts.run(SystemCommand::mutate(
        "systemctl",
        ["enable", "--now", "firewalld"],
    ));
    attempts.run(
        SystemCommand::mutate("firewall-cmd", ["--permanent"])
            .arg(format!("--add-service={}", service)),
    );
    attempts.run(SystemCommand::mutate("firewall-cmd", ["--reload"]));
    info!("Firewalld configured.");
    attempts.outcome()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::exec::CommandOutput;
    use crate::exec::fake::RecordingRunner;
    use crate::mode::HardeningMode;

    #[test]
    fn test_firewall_command_sequence() {
        let runner = RecordingRunner::new();
        let config = Config::default();
        let ctx = StepContext::new(&runner, &config, HardeningMode::Server, false);

        assert_eq!(configure_firewall(&ctx), StepOutcome::Succeeded);
        assert_eq!(
            runner.command_lines(),
            vec![
                "dnf -y install firewalld",
                "systemctl enable --now firewalld",
                "firewall-cmd --permanent --add-service=ssh",
                "firewall-cmd --reload",
            ]
        );
    }

    #[test]
    fn test_allowed_service_comes_from_config() {
        let runner = RecordingRunner::new();
        let mut config = Config::default();
        config.firewall.allowed_service = "https".to_string();
        let ctx = StepContext::new(&runner, &config, HardeningMode::Server, false);

        configure_firewall(&ctx);
        assert!(
            runner
                .command_lines()
                .contains(&"firewall-cmd --permanent --add-service=https".to_string())
        );
    }

    #[test]
    fn test_reload_runs_even_if_install_fails() {
        let runner = RecordingRunner::new().respond("dnf", CommandOutput::exited(1, ""));
        let config = Config::default();
        let ctx = StepContext::new(&runner, &config, HardeningMode::Server, false);

        assert!(configure_firewall(&ctx).is_failed());
        assert_eq!(
            runner.command_lines().last().map(String::as_str),
            Some("firewall-cmd --reload")
        );
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let runner = RecordingRunner::new();
        let config = Config::default();
        let ctx = StepContext::new(&runner, &config, HardeningMode::Workstation, true);

        assert_eq!(configure_firewall(&ctx), StepOutcome::Planned);
        assert!(runner.calls().is_empty());
    }
}
