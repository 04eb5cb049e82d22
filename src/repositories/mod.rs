//! Repository layer for data access operations.

mod employee_repo;
mod memory_employee_repo;
mod postgres_employee_repo;

pub use employee_repo::EmployeeRepository;
pub use memory_employee_repo::InMemoryEmployeeRepository;
pub use postgres_employee_repo::PostgresEmployeeRepository;

use std::sync::Arc;

use crate::db::AsyncDbPool;

/// Aggregates the repositories handed to the service layer.
///
/// Cloning only bumps reference counts.
#[derive(Clone)]
pub struct Repositories {
    pub employees: Arc<dyn EmployeeRepository>,
}

impl Repositories {
    pub fn new(employees: Arc<dyn EmployeeRepository>) -> Self {
        Self { employees }
    }

    /// Repositories backed by PostgreSQL.
    pub fn postgres(pool: AsyncDbPool) -> Self {
        Self::new(Arc::new(PostgresEmployeeRepository::new(pool)))
    }

    /// Repositories backed by process memory.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryEmployeeRepository::new()))
    }
}
