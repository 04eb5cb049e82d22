//! Migrate command handler

use crate::config::{Settings, StorageBackend};
use crate::db;
use crate::error::{AppError, AppResult};

/// Handler for the migrate command
pub struct MigrateCommandHandler {
    config: Settings,
}

impl MigrateCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Applies pending migrations, lists them (`dry_run`), or reverts the
    /// last `rollback` migrations.
    ///
    /// # Errors
    /// - Validation errors when the backend is not Postgres or the step
    ///   count is out of range
    /// - Database errors from connecting or migrating
    pub async fn execute(&self, dry_run: bool, rollback: Option<u32>) -> AppResult<()> {
        if self.config.database.backend != StorageBackend::Postgres {
            return Err(AppError::Validation {
                field: "database.backend".to_string(),
                reason: format!(
                    "migrations need the postgres backend, configured backend is '{}'",
                    self.config.database.backend
                ),
            });
        }
        self.config.database.validate()?;

        let url = &self.config.database.url;
        if dry_run {
            let pending = db::pending_migrations(url).await?;
            if pending.is_empty() {
                println!("✓ No pending migrations - database is up to date");
            } else {
                println!("Found {} pending migration(s):", pending.len());
                for name in &pending {
                    println!("  - {}", name);
                }
                println!("\nRun without --dry-run to apply these migrations");
            }
            return Ok(());
        }

        match rollback {
            Some(steps) => {
                println!("Rolling back {} migration(s)...", steps);
                let reverted = db::revert_migrations(url, steps).await?;
                println!("✓ Rolled back {} migration(s):", reverted.len());
                for version in &reverted {
                    println!("  - {}", version);
                }
            }
            None => {
                println!("Running database migrations...");
                let applied = db::run_pending_migrations(url).await?;
                if applied.is_empty() {
                    println!("✓ No migrations to apply - database is already up to date");
                } else {
                    println!("✓ Applied {} migration(s):", applied.len());
                    for version in &applied {
                        println!("  - {}", version);
                    }
                }
            }
        }

        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
