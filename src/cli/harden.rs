use anyhow::Result;
use std::process::ExitCode;
use tracing::error;

use hostharden::config::Config;
use hostharden::error::HardenError;
use hostharden::exec::CommandRunner;
use hostharden::mode::HardeningMode;
use hostharden::sequence::Orchestrator;

/// Hardening path. Exits 1 only when no mode was given.
///
/// Step failures are reported in the summary but still exit 0.
pub fn run(
    mode: Option<HardeningMode>,
    dry_run: bool,
    config: &Config,
    runner: &dyn CommandRunner,
) -> Result<ExitCode> {
    let Some(mode) = mode else {
        error!("{}", HardenError::MissingMode);
        return Ok(ExitCode::from(1));
    };

    Orchestrator::new(runner, config).harden(mode, dry_run);
    Ok(ExitCode::SUCCESS)
}
