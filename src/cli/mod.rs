//! Command-line interface for employee-rs
//!
//! - Argument parsing with clap
//! - Configuration merging (CLI args + config files)
//! - Command execution for serve and migrate

pub mod config_merger;
pub mod executor;
pub mod handlers;
pub mod parser;
pub mod validation;

pub use config_merger::ConfigurationMerger;
pub use executor::{Outcome, execute_command};
pub use parser::{Cli, Commands, Environment, LogLevel, Storage};

use anyhow::Context;

use crate::config::Settings;
use crate::logger::{LogLevelHandle, init_logger};

/// Loads configuration files and applies CLI overrides on top.
pub fn load_and_merge_config(cli: &Cli) -> anyhow::Result<Settings> {
    let merger =
        ConfigurationMerger::from_config_path(cli.config.as_deref(), cli.env.map(Into::into))
            .context("Failed to load configuration")?;

    merger
        .merge_cli_args(cli)
        .context("Invalid configuration after applying command-line overrides")
}

/// Installs the global logger described by `settings.logger`.
pub fn init_logger_from_settings(settings: &Settings) -> anyhow::Result<LogLevelHandle> {
    let logger_config = settings
        .logger
        .clone()
        .into_logger_config()
        .context("Invalid logger configuration")?;

    init_logger(logger_config).context("Failed to initialize logger")
}
