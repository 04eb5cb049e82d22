//! Serve command handler

use crate::config::{Settings, StorageBackend};
use crate::error::AppResult;

/// Handler for `serve --dry-run`; a real start is driven by `main`.
pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    pub async fn execute(&self, dry_run: bool) -> AppResult<()> {
        if dry_run {
            self.validate_only().await
        } else {
            Ok(())
        }
    }

    /// Validates the configuration and prints what the server would do.
    pub async fn validate_only(&self) -> AppResult<()> {
        self.config.validate()?;

        println!("✓ Configuration is valid");
        println!("✓ Server would bind to: {}", self.config.server.address());
        match self.config.database.backend {
            StorageBackend::Postgres => {
                println!(
                    "✓ Storage: postgres (pool {}-{} connections, auto-migrate {})",
                    self.config.database.min_connections,
                    self.config.database.max_connections,
                    self.config.database.auto_migrate
                );
            }
            StorageBackend::Memory => {
                println!("✓ Storage: memory (records are lost on shutdown)");
            }
        }
        println!("✓ Logger level: {}", self.config.logger.level);
        println!("Dry run completed successfully");

        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
