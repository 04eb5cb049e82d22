//! HTTP request handlers for API endpoints.

pub mod employees;
pub mod health;
