//! Merges CLI overrides into file-based configuration.
//!
//! Precedence, lowest to highest: config files, `EMPLOYEE_*` environment
//! variables, global flags (`--verbose`/`--quiet`), subcommand flags.

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, Environment, Settings};
use std::path::Path;

pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Loads the base configuration.
    ///
    /// With `config_path` only that file is read; otherwise the layered
    /// files under the config directory are used. `environment` replaces
    /// the one detected from `EMPLOYEE_APP_ENV`.
    pub fn from_config_path(
        config_path: Option<&Path>,
        environment: Option<Environment>,
    ) -> Result<Self, ConfigError> {
        let loader = match config_path {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::file_not_found(path.display().to_string()));
                }
                ConfigLoader::from_file(path)
            }
            None => ConfigLoader::new()?,
        };

        let loader = match environment {
            Some(environment) => loader.with_environment(environment),
            None => loader,
        };

        Ok(Self::new(loader.load()?))
    }

    /// Applies CLI overrides to a copy of the base configuration and
    /// validates the result.
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        Self::apply_global_overrides(&mut config, cli);
        if let Some(ref command) = cli.command {
            Self::apply_command_overrides(&mut config, command);
        }

        config.validate()?;
        Ok(config)
    }

    fn apply_global_overrides(config: &mut Settings, cli: &Cli) {
        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }
    }

    fn apply_command_overrides(config: &mut Settings, command: &Commands) {
        match command {
            Commands::Serve {
                host,
                port,
                storage,
                log_level,
                dry_run: _,
            } => {
                if let Some(host) = host {
                    config.server.host = host.clone();
                }
                if let Some(port) = port {
                    config.server.port = *port;
                }
                if let Some(storage) = storage {
                    config.database.backend = (*storage).into();
                }
                // Subcommand level wins over --verbose/--quiet
                if let Some(level) = log_level {
                    config.logger.level = (*level).into();
                }
            }
            Commands::Migrate { .. } => {}
        }
    }

    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageBackend;
    use clap::Parser;

    fn create_valid_base_config() -> Settings {
        let mut config = Settings::default();
        config.database.url = "postgres://localhost/employees".to_string();
        config
    }

    fn merge(args: &[&str]) -> Result<Settings, ConfigError> {
        let cli = Cli::try_parse_from(args).unwrap();
        ConfigurationMerger::new(create_valid_base_config()).merge_cli_args(&cli)
    }

    #[test]
    fn test_configuration_merger_new() {
        let base_config = Settings::default();
        let merger = ConfigurationMerger::new(base_config.clone());
        assert_eq!(merger.config(), &base_config);
    }

    #[test]
    fn test_verbose_flag() {
        assert_eq!(merge(&["employee-rs", "--verbose"]).unwrap().logger.level, "debug");
    }

    #[test]
    fn test_quiet_flag() {
        assert_eq!(merge(&["employee-rs", "--quiet"]).unwrap().logger.level, "error");
    }

    #[test]
    fn test_serve_host_and_port() {
        let merged = merge(&["employee-rs", "serve", "--host", "0.0.0.0", "--port", "9090"]).unwrap();
        assert_eq!(merged.server.host, "0.0.0.0");
        assert_eq!(merged.server.port, 9090);
    }

    #[test]
    fn test_serve_storage_override() {
        let merged = merge(&["employee-rs", "serve", "--storage", "memory"]).unwrap();
        assert_eq!(merged.database.backend, StorageBackend::Memory);
    }

    #[test]
    fn test_memory_storage_needs_no_database_url() {
        let cli = Cli::try_parse_from(["employee-rs", "serve", "--storage", "memory"]).unwrap();
        let merged = ConfigurationMerger::new(Settings {
            database: crate::config::DatabaseConfig {
                url: String::new(),
                ..Default::default()
            },
            ..Default::default()
        })
        .merge_cli_args(&cli);

        assert!(merged.is_ok());
    }

    #[test]
    fn test_command_log_level_overrides_global() {
        let merged = merge(&["employee-rs", "--verbose", "serve", "--log-level", "warn"]).unwrap();
        assert_eq!(merged.logger.level, "warn");
    }

    #[test]
    fn test_from_missing_config_path() {
        let result = ConfigurationMerger::from_config_path(
            Some(Path::new("/definitely/missing.toml")),
            None,
        );
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_from_single_config_file() {
        let _lock = crate::config::ENV_TEST_MUTEX
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[server]\nport = 9500\n\n[database]\nbackend = \"memory\"\n",
        )
        .unwrap();

        let merger = ConfigurationMerger::from_config_path(Some(&path), Some(Environment::Test))
            .unwrap();

        assert_eq!(merger.config().server.port, 9500);
        assert_eq!(merger.config().database.backend, StorageBackend::Memory);
    }
}
