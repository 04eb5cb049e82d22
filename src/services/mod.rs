//! Service layer for business logic operations.
//!
//! Services encapsulate business rules and sit between handlers and
//! repositories.

mod employee_service;

pub use employee_service::EmployeeService;

use crate::repositories::Repositories;

/// Aggregates all services; held by the Axum application state.
#[derive(Clone)]
pub struct Services {
    pub employees: EmployeeService,
}

impl Services {
    pub fn new(repos: Repositories) -> Self {
        Self {
            employees: EmployeeService::new(repos.employees),
        }
    }
}
