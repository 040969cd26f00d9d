use tracing::info;

use super::{Attempts, StepContext, StepOutcome};
use crate::exec::SystemCommand;

/// Switch SELinux to enforcing for the running system.
pub fn enforce_selinux(ctx: &StepContext<'_>) -> StepOutcome {
    if ctx.dry_run() {
        info!("Dry-run: Would enforce SELinux.");
        return StepOutcome::Planned;
    }

    let mut attempts = Attempts::new(ctx);
    attempts.run(SystemCommand::mutate("setenforce", ["1"]));
    info!("SELinux enforced.");
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
    fn test_setenforce() {
        let runner = RecordingRunner::new();
        let config = Config::default();
        let ctx = StepContext::new(&runner, &config, HardeningMode::Server, false);

        assert_eq!(enforce_selinux(&ctx), StepOutcome::Succeeded);
        assert_eq!(runner.command_lines(), vec!["setenforce 1"]);
    }

    #[test]
    fn test_selinux_disabled_host_reports_failure() {
        let runner = RecordingRunner::new().respond(
            "setenforce",
            CommandOutput {
                code: Some(1),
                stdout: String::new(),
                stderr: "setenforce: SELinux is disabled\n".to_string(),
            },
        );
        let config = Config::default();
        let ctx = StepContext::new(&runner, &config, HardeningMode::Server, false);

        match enforce_selinux(&ctx) {
            StepOutcome::Failed(reason) => assert!(reason.contains("SELinux is disabled")),
            other => panic!("expected failure, got {:?}", other),
        }
    }
}
