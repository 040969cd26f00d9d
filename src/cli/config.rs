use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::Path;

use hostharden::config::{Config, DEFAULT_CONFIG_TEMPLATE};
use hostharden::paths::ensure_parent;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show {
        /// Output format: toml (default) or json
        #[arg(short, long, default_value = "toml")]
        format: String,
    },

    /// Show config file path
    Path,

    /// Write the default config file
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

pub fn run(args: ConfigArgs, config_override: Option<&str>) -> Result<()> {
    match args.command {
        ConfigCommands::Show { format } => show_config(config_override, &format),
        ConfigCommands::Path => show_path(config_override),
        ConfigCommands::Init { force } => init_config(&Config::config_path(config_override), force),
    }
}

fn show_config(config_override: Option<&str>, format: &str) -> Result<()> {
    let config = Config::load(config_override)?;
    println!("{}", render_config(&config, format)?);
    Ok(())
}

fn render_config(config: &Config, format: &str) -> Result<String> {
    match format {
        "json" => Ok(serde_json::to_string_pretty(config)?),
        "toml" => Ok(toml::to_string_pretty(config)?),
        other => anyhow::bail!("Unknown format '{}' (expected toml or json)", other),
    }
}

fn show_path(config_override: Option<&str>) -> Result<()> {
    println!("{}", Config::config_path(config_override).display());
    Ok(())
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    ensure_parent(path)?;
    std::fs::write(path, DEFAULT_CONFIG_TEMPLATE)?;

    println!("Created config file at {}", path.display());
    Ok(())
}
