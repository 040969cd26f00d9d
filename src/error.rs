use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by hardening operations.
///
/// Only [`HardenError::NotRoot`] and [`HardenError::MissingMode`] are fatal to
/// a run; everything else is recorded against the step that produced it and
/// the sequence carries on.
#[derive(Debug, Error)]
pub enum HardenError {
    #[error("This program must be run with sudo or as root.")]
    NotRoot { euid: u32 },

    #[error("Specify --mode as 'workstation' or 'server'.")]
    MissingMode,

    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {}{}", format_code(.code), format_stderr(.stderr))]
    ExitStatus {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("refusing to run mutating command `{command}` in dry-run mode")]
    DryRunViolation { command: String },

    #[error("{action} {}: {source}", .path.display())]
    File {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn format_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}

fn format_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        // Last line is usually the one that says what went wrong
        let last = trimmed.lines().last().unwrap_or(trimmed);
        format!(": {}", last)
    }
}

pub type Result<T> = std::result::Result<T, HardenError>;
