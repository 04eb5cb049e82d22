//! HTTP server lifecycle: storage setup, startup, log level reload on
//! SIGHUP, graceful shutdown.

use tokio::net::TcpListener;
use tokio::signal;

use crate::api::routes::create_router;
use crate::config::{Settings, StorageBackend};
use crate::db::{establish_async_connection_pool, run_pending_migrations};
use crate::logger::LogLevelHandle;
use crate::state::AppState;

/// Produces the `logger.level` to apply when a reload is requested.
pub type LevelSource = Box<dyn Fn() -> anyhow::Result<String> + Send + Sync>;

struct LogReload {
    handle: LogLevelHandle,
    source: LevelSource,
}

/// HTTP server manager
pub struct Server {
    settings: Settings,
    log_reload: Option<LogReload>,
}

impl Server {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            log_reload: None,
        }
    }

    /// Re-reads the log level from `source` and applies it through `handle`
    /// whenever the process receives SIGHUP.
    pub fn with_log_reload<F>(mut self, handle: LogLevelHandle, source: F) -> Self
    where
        F: Fn() -> anyhow::Result<String> + Send + Sync + 'static,
    {
        self.log_reload = Some(LogReload {
            handle,
            source: Box::new(source),
        });
        self
    }

    /// Builds the storage backend and serves requests until a shutdown
    /// signal arrives.
    ///
    /// # Errors
    /// - Migration or connection pool errors (postgres backend)
    /// - Address binding errors
    /// - Server runtime errors
    pub async fn run(mut self) -> anyhow::Result<()> {
        tracing::info!(
            app_name = %self.settings.application.name,
            app_version = %self.settings.application.version,
            "Application starting"
        );

        tracing::info!(
            host = %self.settings.server.host,
            port = self.settings.server.port,
            request_timeout = self.settings.server.request_timeout,
            keep_alive_timeout = self.settings.server.keep_alive_timeout,
            "Server configuration loaded"
        );

        tracing::info!(
            level = %self.settings.logger.level,
            console_enabled = self.settings.logger.console.enabled,
            file_enabled = self.settings.logger.file.enabled,
            "Logger configuration loaded"
        );

        if let Some(reload) = self.log_reload.take() {
            spawn_log_level_reload(reload);
        }

        let state = self.build_state().await?;
        let router = create_router(state, &self.settings.server);
        tracing::info!("Router configured");

        let address = self.settings.server.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, address = %address, "Failed to bind to address");
            anyhow::anyhow!("Failed to bind to {}: {}", address, e)
        })?;

        tracing::info!(address = %address, "Server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }

    async fn build_state(&self) -> anyhow::Result<AppState> {
        let database = &self.settings.database;

        match database.backend {
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; records are lost on shutdown");
                Ok(AppState::in_memory())
            }
            StorageBackend::Postgres => {
                tracing::info!(
                    max_connections = database.max_connections,
                    min_connections = database.min_connections,
                    connection_timeout = database.connection_timeout,
                    "Database configuration loaded"
                );

                if database.auto_migrate {
                    let applied = run_pending_migrations(&database.url).await?;
                    tracing::info!(count = applied.len(), ?applied, "Migrations applied");
                }

                let pool = establish_async_connection_pool(database).await?;
                tracing::info!("Database connection pool initialized");

                Ok(AppState::postgres(pool))
            }
        }
    }
}

fn reload_log_level(reload: &LogReload) -> anyhow::Result<String> {
    let level = (reload.source)()?;
    reload.handle.set_level(&level)?;
    Ok(level)
}

#[cfg(unix)]
fn spawn_log_level_reload(reload: LogReload) {
    let mut hangup = match signal::unix::signal(signal::unix::SignalKind::hangup()) {
        Ok(hangup) => hangup,
        Err(e) => {
            tracing::error!(error = %e, "Failed to install SIGHUP handler; log level is fixed");
            return;
        }
    };

    tokio::spawn(async move {
        while hangup.recv().await.is_some() {
            match reload_log_level(&reload) {
                Ok(level) => tracing::info!(level = %level, "Log level reloaded"),
                Err(e) => tracing::warn!(error = %format!("{:#}", e), "Log level reload failed"),
            }
        }
    });
}

#[cfg(not(unix))]
fn spawn_log_level_reload(_reload: LogReload) {
    tracing::debug!("Log level reload on SIGHUP is only available on unix");
}

/// Resolves on Ctrl+C or SIGTERM.
///
/// A signal handler that cannot be installed is logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
