use tracing::info;

use super::{Attempts, StepContext, StepOutcome};
use crate::exec::SystemCommand;

/// Stop and disable every service in the mode's list.
///
/// Services are not checked for existence first; a unit that is not installed
/// shows up as a failure in the outcome and the loop moves on.
pub fn disable_services(ctx: &StepContext<'_>) -> StepOutcome {
    let services = ctx.mode().services();

    if ctx.dry_run() {
        for svc in &services {
            info!("Dry-run: Would disable {}", svc);
        }
        return StepOutcome::Planned;
    }

    let mut attempts = Attempts::new(ctx);
    for svc in &services {
        if attempts
            .run(SystemCommand::mutate("systemctl", ["disable", "--now"]).arg(*svc))
            .is_some()
        {
            info!("Disabled {}", svc);
        }
    }
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
    fn test_disables_every_server_service_in_order() {
        let runner = RecordingRunner::new();
        let config = Config::default();
        let ctx = StepContext::new(&runner, &config, HardeningMode::Server, false);

        assert_eq!(disable_services(&ctx), StepOutcome::Succeeded);
        let expected: Vec<String> = HardeningMode::Server
            .services()
            .iter()
            .map(|s| format!("systemctl disable --now {}", s))
            .collect();
        assert_eq!(runner.command_lines(), expected);
    }

    #[test]
    fn test_missing_unit_does_not_stop_the_loop() {
        let runner = RecordingRunner::new().respond(
            "systemctl disable --now vsftpd",
            CommandOutput {
                code: Some(1),
                stdout: String::new(),
                stderr: "Failed to disable unit: Unit file vsftpd.service does not exist.\n"
                    .to_string(),
            },
        );
        let config = Config::default();
        let ctx = StepContext::new(&runner, &config, HardeningMode::Workstation, false);

        let outcome = disable_services(&ctx);
        assert_eq!(
            runner.calls().len(),
            HardeningMode::Workstation.services().len()
        );
        match outcome {
            StepOutcome::Failed(reason) => assert!(reason.contains("vsftpd")),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_dry_run_disables_nothing() {
        let runner = RecordingRunner::new();
        let config = Config::default();
        let ctx = StepContext::new(&runner, &config, HardeningMode::Workstation, true);

        assert_eq!(disable_services(&ctx), StepOutcome::Planned);
        assert!(runner.calls().is_empty());
    }
}
