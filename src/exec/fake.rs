//! Test doubles: a recording command runner and log capture.

use std::cell::RefCell;
use std::io;
use std::sync::{Arc, Mutex};

use super::command::{CommandOutput, SystemCommand};
use super::runner::CommandRunner;

/// Records every command it is asked to run and answers from a script.
///
/// Responses are matched by command-line prefix (`"findmnt"`,
/// `"btrfs subvolume show"`, ...); the first matching entry wins and
/// unmatched commands exit 0 with empty output.
#[derive(Default)]
pub struct RecordingRunner {
    responses: Vec<(String, CommandOutput)>,
    calls: RefCell<Vec<SystemCommand>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, prefix: &str, output: CommandOutput) -> Self {
        self.responses.push((prefix.to_string(), output));
        self
    }

    pub fn calls(&self) -> Vec<SystemCommand> {
        self.calls.borrow().clone()
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.to_string()).collect()
    }

    pub fn mutating_calls(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.is_mutating())
            .map(|c| c.to_string())
            .collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, command: &SystemCommand) -> std::io::Result<CommandOutput> {
        self.calls.borrow_mut().push(command.clone());
        let line = command.to_string();
        let output = self
            .responses
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or_else(|| CommandOutput::exited(0, ""));
        Ok(output)
    }
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a subscriber that writes into a buffer; return its logs.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .without_time()
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&buffer.0.lock().unwrap()).into_owned();
    (result, logs)
}
