use std::process::{Command, Stdio};

use tracing::debug;

use super::command::{CommandOutput, OutputMode, SystemCommand};

/// Seam through which every external tool is invoked.
///
/// The production implementation is [`SystemRunner`]; tests substitute a mock
/// or a recording fake to observe exactly which commands a run issues.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner {
    /// Run `command` to completion.
    ///
    /// An `Err` means the program could not be started at all. A non-zero
    /// exit is reported through [`CommandOutput::code`], not as an error.
    fn run(&self, command: &SystemCommand) -> std::io::Result<CommandOutput>;
}

/// Runs commands on the local host with `std::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &SystemCommand) -> std::io::Result<CommandOutput> {
        debug!("Running: {}", command);

        let mut child = Command::new(command.program());
        child.args(command.args()).stdin(Stdio::null());

        match command.output_mode() {
            OutputMode::Capture => {
                let output = child.output()?;
                Ok(CommandOutput {
                    code: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                })
            }
            OutputMode::Inherit => {
                let status = child.status()?;
                Ok(CommandOutput {
                    code: status.code(),
                    ..CommandOutput::default()
                })
            }
        }
    }
}
