use tracing::debug;

use crate::exec::{CommandRunner, SystemCommand};

/// The only copy-on-write filesystem snapshots are taken on.
pub const SUPPORTED_FSTYPE: &str = "btrfs";

/// `findmnt` query for the filesystem type mounted at `/`.
pub fn root_fstype_query() -> SystemCommand {
    SystemCommand::query("findmnt", ["-n", "-o", "FSTYPE", "/"])
}

/// Probe the filesystem type of `/`, lower-cased.
///
/// Returns `None` when `findmnt` is missing or fails.
pub fn root_filesystem_type(runner: &dyn CommandRunner) -> Option<String> {
    match runner.run(&root_fstype_query()) {
        Ok(output) if output.success() => Some(output.stdout.trim().to_lowercase()),
        Ok(output) => {
            debug!("findmnt exited with {:?}", output.code);
            None
        }
        Err(e) => {
            debug!("findmnt unavailable: {}", e);
            None
        }
    }
}

/// Whether `/` supports read-only snapshots.
///
/// Any probe failure counts as "not capable" so the run skips the snapshot
/// rather than aborting.
pub fn is_snapshot_capable_root(runner: &dyn CommandRunner) -> bool {
    root_filesystem_type(runner).as_deref() == Some(SUPPORTED_FSTYPE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::{CommandOutput, MockCommandRunner};

    fn runner_answering(result: std::io::Result<CommandOutput>) -> MockCommandRunner {
        let mut runner = MockCommandRunner::new();
        let mut result = Some(result);
        runner
            .expect_run()
            .withf(|cmd| cmd.to_string() == "findmnt -n -o FSTYPE /")
            .times(1)
            .returning(move |_| result.take().unwrap());
        runner
    }

    #[test]
    fn test_btrfs_root_is_capable() {
        let runner = runner_answering(Ok(CommandOutput::exited(0, "btrfs\n")));
        assert!(is_snapshot_capable_root(&runner));
    }

    #[test]
    fn test_uppercase_output_is_normalised() {
        let runner = runner_answering(Ok(CommandOutput::exited(0, "  BTRFS \n")));
        assert_eq!(root_filesystem_type(&runner).as_deref(), Some("btrfs"));
    }

    #[test]
    fn test_other_filesystems_are_not_capable() {
        let runner = runner_answering(Ok(CommandOutput::exited(0, "ext4\n")));
        assert!(!is_snapshot_capable_root(&runner));
    }

    #[test]
    fn test_failed_probe_fails_open() {
        let runner = runner_answering(Ok(CommandOutput::exited(1, "btrfs\n")));
        assert!(!is_snapshot_capable_root(&runner));
    }

    #[test]
    fn test_missing_findmnt_fails_open() {
        let runner = runner_answering(Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "findmnt not found",
        )));
        assert!(!is_snapshot_capable_root(&runner));
    }

    #[test]
    fn test_probe_is_read_only() {
        assert!(!root_fstype_query().is_mutating());
    }
}
