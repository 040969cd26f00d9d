pub mod config;
pub mod harden;
pub mod rollback;

use clap::{Parser, Subcommand};

use hostharden::mode::HardeningMode;

#[derive(Parser)]
#[command(name = "hostharden")]
#[command(author, version, about = "Harden a Fedora host, with Btrfs snapshot rollback")]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Host profile to harden for (required unless --rollback)
    #[arg(long, value_enum)]
    pub mode: Option<HardeningMode>,

    /// Log what would be done without changing the system
    #[arg(long)]
    pub dry_run: bool,

    /// Make the last pre-hardening snapshot the default subvolume (takes priority over --mode)
    #[arg(long)]
    pub rollback: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file
    #[arg(short, long, global = true, env = "HOSTHARDEN_CONFIG")]
    pub config: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Configuration management
    Config(config::ConfigArgs),
}

#[cfg(test)]
mockall::mock! {
    pub Runner {}

    impl hostharden::exec::CommandRunner for Runner {
        fn run(
            &self,
            command: &hostharden::exec::SystemCommand,
        ) -> std::io::Result<hostharden::exec::CommandOutput>;
    }
}
