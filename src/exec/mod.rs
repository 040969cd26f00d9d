//! External command execution.
//!
//! Every tool the hardening run touches (dnf, systemctl, firewall-cmd,
//! setenforce, sysctl, btrfs, findmnt) goes through [`CommandRunner`]. Each
//! [`SystemCommand`] carries an [`Effect`] so dry-run gating can be enforced
//! in one place instead of trusting every call site.

pub mod command;
#[cfg(test)]
pub mod fake;
pub mod runner;

pub use command::{CommandOutput, Effect, OutputMode, SystemCommand};
#[cfg(test)]
pub use runner::MockCommandRunner;
pub use runner::{CommandRunner, SystemRunner};
