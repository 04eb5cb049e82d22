//! PostgreSQL employee repository using diesel_async.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::db::AsyncDbPool;
use crate::error::{AppResult, DatabaseErrorConverter};
use crate::models::{Employee, NewEmployee};
use crate::repositories::EmployeeRepository;
use crate::schema::employees;

/// Employee repository holding an async connection pool.
///
/// `AsyncDbPool` is reference counted, so cloning the repository is cheap.
#[derive(Clone)]
pub struct PostgresEmployeeRepository {
    pool: AsyncDbPool,
}

impl PostgresEmployeeRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeRepository for PostgresEmployeeRepository {
    async fn find_by_id(&self, employee_id: i64) -> AppResult<Option<Employee>> {
        let mut conn = self.pool.get().await?;

        employees::table
            .find(employee_id)
            .select(Employee::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "find employee by id"))
    }

    async fn find_by_email(&self, employee_email: &str) -> AppResult<Option<Employee>> {
        let mut conn = self.pool.get().await?;

        employees::table
            .filter(employees::email.eq(employee_email))
            .select(Employee::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "find employee by email"))
    }

    async fn find_all(&self) -> AppResult<Vec<Employee>> {
        let mut conn = self.pool.get().await?;

        employees::table
            .order(employees::id.asc())
            .select(Employee::as_select())
            .load(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "list employees"))
    }

    async fn save(&self, employee: NewEmployee) -> AppResult<Employee> {
        let mut conn = self.pool.get().await?;

        // Overwrite-or-insert must not interleave with a concurrent delete
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                if let Some(employee_id) = employee.id {
                    let updated = diesel::update(employees::table.find(employee_id))
                        .set(&employee)
                        .returning(Employee::as_returning())
                        .get_result(conn)
                        .await
                        .optional()?;

                    if let Some(updated) = updated {
                        return Ok(updated);
                    }
                }

                diesel::insert_into(employees::table)
                    .values(NewEmployee {
                        id: None,
                        ..employee
                    })
                    .returning(Employee::as_returning())
                    .get_result(conn)
                    .await
            }
            .scope_boxed()
        })
        .await
        .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "save employee"))
    }

    async fn delete_by_id(&self, employee_id: i64) -> AppResult<()> {
        let mut conn = self.pool.get().await?;

        diesel::delete(employees::table.find(employee_id))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "delete employee"))
    }
}
