//! Process-local employee repository.
//!
//! Backs the `memory` storage backend and the HTTP tests. Mirrors the
//! Postgres behavior, including the unique email constraint.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};
use crate::models::{Employee, NewEmployee};
use crate::repositories::EmployeeRepository;

#[derive(Debug)]
pub struct InMemoryEmployeeRepository {
    state: RwLock<MemoryState>,
}

#[derive(Debug)]
struct MemoryState {
    rows: BTreeMap<i64, Employee>,
    next_id: i64,
}

impl InMemoryEmployeeRepository {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Number of stored employees.
    pub async fn len(&self) -> usize {
        self.state.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryEmployeeRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Employee>> {
        Ok(self.state.read().await.rows.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Employee>> {
        let state = self.state.read().await;
        Ok(state.rows.values().find(|e| e.email == email).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Employee>> {
        Ok(self.state.read().await.rows.values().cloned().collect())
    }

    async fn save(&self, employee: NewEmployee) -> AppResult<Employee> {
        let mut state = self.state.write().await;

        let existing_id = employee.id.filter(|id| state.rows.contains_key(id));

        let clash = state
            .rows
            .values()
            .any(|row| row.email == employee.email && Some(row.id) != existing_id);
        if clash {
            return Err(AppError::duplicate_email(&employee.email));
        }

        let id = match existing_id {
            Some(id) => id,
            None => {
                let id = state.next_id;
                state.next_id += 1;
                id
            }
        };

        let saved = employee.into_employee(id);
        state.rows.insert(id, saved.clone());
        Ok(saved)
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        self.state.write().await.rows.remove(&id);
        Ok(())
    }
}
