//! Command executor for dispatching CLI commands

use super::handlers::{MigrateCommandHandler, ServeCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::Settings;
use crate::error::AppResult;

/// What `main` should do once a command has been executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Start the HTTP server
    StartServer,
    /// The command ran to completion
    Done,
}

/// Runs the parsed command against the merged settings.
///
/// `serve` without `--dry-run` (and a missing subcommand) only reports
/// [`Outcome::StartServer`]; the server itself is started by `main`.
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<Outcome> {
    match &cli.command {
        Some(Commands::Serve { dry_run: true, .. }) => {
            ServeCommandHandler::new(settings).execute(true).await?;
            Ok(Outcome::Done)
        }
        Some(Commands::Serve { .. }) | None => Ok(Outcome::StartServer),
        Some(Commands::Migrate { dry_run, rollback }) => {
            if let Some(steps) = rollback
                && *steps > 50
            {
                tracing::warn!(steps, "Rolling back a large number of migrations");
            }
            MigrateCommandHandler::new(settings)
                .execute(*dry_run, *rollback)
                .await?;
            Ok(Outcome::Done)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn create_valid_config() -> Settings {
        let mut config = Settings::default();
        config.database.url = "postgres://localhost/employees".to_string();
        config
    }

    #[tokio::test]
    async fn test_execute_serve_dry_run() {
        let cli = Cli::try_parse_from(["employee-rs", "serve", "--dry-run"]).unwrap();
        let outcome = execute_command(&cli, create_valid_config()).await.unwrap();
        assert_eq!(outcome, Outcome::Done);
    }

    #[tokio::test]
    async fn test_execute_serve_starts_server() {
        let cli = Cli::try_parse_from(["employee-rs", "serve"]).unwrap();
        let outcome = execute_command(&cli, create_valid_config()).await.unwrap();
        assert_eq!(outcome, Outcome::StartServer);
    }

    #[tokio::test]
    async fn test_no_subcommand_starts_server() {
        let cli = Cli::try_parse_from(["employee-rs"]).unwrap();
        let outcome = execute_command(&cli, create_valid_config()).await.unwrap();
        assert_eq!(outcome, Outcome::StartServer);
    }

    #[tokio::test]
    async fn test_migrate_errors_propagate() {
        let cli = Cli::try_parse_from(["employee-rs", "migrate"]).unwrap();
        assert!(execute_command(&cli, Settings::default()).await.is_err());
    }
}
