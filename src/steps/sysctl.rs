use std::fs;

use tracing::info;

use super::{Attempts, StepContext, StepOutcome};
use crate::error::HardenError;
use crate::exec::SystemCommand;

/// Kernel parameters written to the sysctl drop-in, in file order.
pub const HARDENING_PARAMETERS: &[(&str, i64)] = &[
    ("net.ipv4.ip_forward", 0),
    ("kernel.randomize_va_space", 2),
    ("fs.suid_dumpable", 0),
];

/// Render the drop-in file body, one `key = value` line per parameter.
pub fn render_parameters(params: &[(&str, i64)]) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{} = {}\n", key, value))
        .collect()
}

/// Overwrite the sysctl drop-in and reload all sysctl configuration.
pub fn harden_sysctl(ctx: &StepContext<'_>) -> StepOutcome {
    if ctx.dry_run() {
        info!("Dry-run: Would apply sysctl hardening parameters.");
        return StepOutcome::Planned;
    }

    let path = ctx.config().sysctl_conf();
    let mut attempts = Attempts::new(ctx);

    // Nothing new to load if the drop-in could not be written
    if let Err(source) = fs::write(&path, render_parameters(HARDENING_PARAMETERS)) {
        attempts.fail(HardenError::File {
            action: "write",
            path,
            source,
        });
        return attempts.outcome();
    }

    attempts.run(SystemCommand::mutate("sysctl", ["--system"]));
    info!("Sysctl parameters applied.");
    attempts.outcome()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::exec::fake::RecordingRunner;
    use crate::mode::HardeningMode;

    #[test]
    fn test_render_fixed_parameter_set() {
        assert_eq!(
            render_parameters(HARDENING_PARAMETERS),
            "net.ipv4.ip_forward = 0\nkernel.randomize_va_space = 2\nfs.suid_dumpable = 0\n"
        );
    }

    #[test]
    fn test_overwrites_drop_in_and_reloads() {
        let tmp = tempfile::tempdir().unwrap();
        let conf = tmp.path().join("99-hardening.conf");
        fs::write(&conf, "vm.swappiness = 10\n").unwrap();

        let runner = RecordingRunner::new();
        let mut config = Config::default();
        config.sysctl.config_path = conf.to_string_lossy().into_owned();
        let ctx = StepContext::new(&runner, &config, HardeningMode::Server, false);

        assert_eq!(harden_sysctl(&ctx), StepOutcome::Succeeded);
        assert_eq!(
            fs::read_to_string(&conf).unwrap(),
            render_parameters(HARDENING_PARAMETERS)
        );
        assert_eq!(runner.command_lines(), vec!["sysctl --system"]);
    }

    #[test]
    fn test_unwritable_drop_in_skips_reload() {
        let tmp = tempfile::tempdir().unwrap();
        let conf = tmp.path().join("missing-dir").join("99-hardening.conf");

        let runner = RecordingRunner::new();
        let mut config = Config::default();
        config.sysctl.config_path = conf.to_string_lossy().into_owned();
        let ctx = StepContext::new(&runner, &config, HardeningMode::Server, false);

        assert!(harden_sysctl(&ctx).is_failed());
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let conf = tmp.path().join("99-hardening.conf");

        let runner = RecordingRunner::new();
        let mut config = Config::default();
        config.sysctl.config_path = conf.to_string_lossy().into_owned();
        let ctx = StepContext::new(&runner, &config, HardeningMode::Server, true);

        assert_eq!(harden_sysctl(&ctx), StepOutcome::Planned);
        assert!(!conf.exists());
        assert!(runner.calls().is_empty());
    }
}
