//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `employee` - Employee request/response DTOs
//! - `error` - Common error response DTOs
//! - `health` - Health check DTOs

mod employee;
mod error;
mod health;

pub use employee::{CreateEmployeeRequest, EmployeeResponse, UpdateEmployeeRequest};
pub use error::ErrorResponse;
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
