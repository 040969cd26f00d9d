//! hostharden - sequential hardening for Fedora-family hosts
//!
//! This crate provides:
//! - Privilege guard
//! - Btrfs snapshot before hardening, rollback to it afterwards
//! - Seven hardening steps (updates, services, firewalld, SELinux, sshd,
//!   sysctl, fail2ban) behind a dry-run aware command runner
//! - Run journal of what each real run did

pub mod config;
pub mod error;
pub mod exec;
pub mod journal;
pub mod mode;
pub mod paths;
pub mod privilege;
pub mod sequence;
pub mod snapshot;
pub mod steps;

pub use config::Config;
pub use error::HardenError;
pub use mode::HardeningMode;
