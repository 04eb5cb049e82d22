//! Application state for Axum web framework.

use crate::db::AsyncDbPool;
use crate::repositories::Repositories;
use crate::services::Services;

/// Shared state handed to every request handler.
///
/// Cloning is cheap; services and the pool are reference counted.
#[derive(Clone)]
pub struct AppState {
    /// All business logic services
    pub services: Services,
    /// Connection pool, present only for the Postgres backend
    pub db_pool: Option<AsyncDbPool>,
}

impl AppState {
    pub fn new(repos: Repositories, db_pool: Option<AsyncDbPool>) -> Self {
        Self {
            services: Services::new(repos),
            db_pool,
        }
    }

    /// State whose repositories share the given Postgres pool.
    pub fn postgres(pool: AsyncDbPool) -> Self {
        Self::new(Repositories::postgres(pool.clone()), Some(pool))
    }

    /// State backed by process memory; nothing survives a restart.
    pub fn in_memory() -> Self {
        Self::new(Repositories::in_memory(), None)
    }
}
