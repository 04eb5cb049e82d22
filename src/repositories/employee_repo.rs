//! Storage contract for employees.

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{Employee, NewEmployee};

/// Async CRUD access to the employee store.
///
/// Implementations map every storage failure to an `AppError`; none of the
/// lookups treat absence as an error.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Employee>>;

    /// Exact, case-sensitive match.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Employee>>;

    /// All employees in ascending id order.
    async fn find_all(&self) -> AppResult<Vec<Employee>>;

    /// Insert-or-update.
    ///
    /// `employee.id == None`, or an id with no stored row, inserts under a
    /// freshly generated id. An existing id has its fields overwritten.
    /// Fails with `AppError::Duplicate` when another row already owns the email.
    async fn save(&self, employee: NewEmployee) -> AppResult<Employee>;

    /// Removes the row if present; absence is not an error.
    async fn delete_by_id(&self, id: i64) -> AppResult<()>;
}
