use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

mod cli;

use cli::{Cli, Commands};
use hostharden::config::{Config, LoggingConfig};
use hostharden::exec::SystemRunner;
use hostharden::privilege;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Nothing else runs unprivileged; --help and --version are handled by clap above.
    if let Err(e) = privilege::require_root() {
        eprintln!("{}", e);
        return Ok(ExitCode::from(1));
    }

    if let Some(Commands::Config(args)) = cli.command {
        cli::config::run(args, cli.config.as_deref())?;
        return Ok(ExitCode::SUCCESS);
    }

    let config = Config::load(cli.config.as_deref())?;
    init_logging(cli.verbose, &config.logging);

    let runner = SystemRunner;
    if cli.rollback {
        cli::rollback::run(&config, &runner)
    } else {
        cli::harden::run(cli.mode, cli.dry_run, &config, &runner)
    }
}

fn init_logging(verbose: bool, logging: &LoggingConfig) {
    let log_level = if verbose { "debug" } else { logging.level.as_str() };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}
