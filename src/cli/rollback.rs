use anyhow::Result;
use std::process::ExitCode;

use hostharden::config::Config;
use hostharden::exec::CommandRunner;
use hostharden::sequence::Orchestrator;

/// Rollback path. Always exits 0; a missing record or a failed promotion is
/// only logged.
pub fn run(config: &Config, runner: &dyn CommandRunner) -> Result<ExitCode> {
    Orchestrator::new(runner, config).rollback();
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::MockRunner;

    #[test]
    fn test_no_record_still_exits_zero() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.paths.state_dir = tmp.path().to_path_buf();

        let mut runner = MockRunner::new();
        runner.expect_run().times(0);

        assert_eq!(run(&config, &runner).unwrap(), ExitCode::SUCCESS);
    }
}
