//! Employee DTOs for API requests and responses.
//!
//! Field names are camelCase on the wire. Request bodies also accept the
//! legacy `nombre`/`apellido` keys for the first and last name.

use crate::models::{Employee, NewEmployee, UpdateEmployee};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============================================================================
// Request DTOs
// ============================================================================

/// Request body for creating an employee.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "firstName": "Pepe",
    "lastName": "Lopez",
    "email": "p12@email.com"
}))]
pub struct CreateEmployeeRequest {
    /// Accepted for compatibility and ignored; storage assigns the id
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(alias = "nombre")]
    pub first_name: String,
    #[serde(alias = "apellido")]
    pub last_name: String,
    pub email: String,
}

impl CreateEmployeeRequest {
    /// Converts the request into a `NewEmployee`, dropping any client id.
    pub fn into_new_employee(self) -> NewEmployee {
        NewEmployee::new(self.first_name, self.last_name, self.email)
    }
}

/// Request body for updating an employee. Omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeRequest {
    #[serde(default, alias = "nombre")]
    pub first_name: Option<String>,
    #[serde(default, alias = "apellido")]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl UpdateEmployeeRequest {
    pub fn into_update_employee(self) -> UpdateEmployee {
        UpdateEmployee {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
        }
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Employee as returned by the API.
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": 1,
    "firstName": "Pepe",
    "lastName": "Lopez",
    "email": "p12@email.com"
}))]
pub struct EmployeeResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<Employee> for EmployeeResponse {
    fn from(employee: Employee) -> Self {
        Self {
            id: employee.id,
            first_name: employee.first_name,
            last_name: employee.last_name,
            email: employee.email,
        }
    }
}
