//! Health check DTOs for API responses.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use utoipa::ToSchema;

/// Health check response structure.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "status": "healthy",
    "version": "0.1.0",
    "timestamp": "2024-06-01T12:00:00Z",
    "checks": {
        "storage": {
            "status": "healthy",
            "message": "postgres: connected",
            "response_time_ms": 5
        }
    }
}))]
pub struct HealthResponse {
    /// Overall health status
    pub status: HealthStatus,
    /// Application version
    #[schema(example = "0.1.0")]
    pub version: String,
    /// Time of the check, RFC 3339
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: String,
    /// Per-component results keyed by component name
    pub checks: BTreeMap<String, ComponentHealth>,
}

impl HealthResponse {
    /// Builds a response whose overall status is the worst component status.
    pub fn from_checks(version: &str, checks: BTreeMap<String, ComponentHealth>) -> Self {
        let status = checks
            .values()
            .map(|check| check.status)
            .max()
            .unwrap_or(HealthStatus::Healthy);

        Self {
            status,
            version: version.to_string(),
            timestamp: jiff::Timestamp::now().to_string(),
            checks,
        }
    }
}

/// Health status, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Individual component health information.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentHealth {
    pub status: HealthStatus,
    #[schema(example = "postgres: connected")]
    pub message: Option<String>,
    #[schema(example = 5)]
    pub response_time_ms: Option<u64>,
}

impl ComponentHealth {
    pub fn healthy(message: impl Into<String>, elapsed: Duration) -> Self {
        Self::with_status(HealthStatus::Healthy, message, elapsed)
    }

    pub fn unhealthy(message: impl Into<String>, elapsed: Duration) -> Self {
        Self::with_status(HealthStatus::Unhealthy, message, elapsed)
    }

    fn with_status(status: HealthStatus, message: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            status,
            message: Some(message.into()),
            response_time_ms: Some(elapsed.as_millis() as u64),
        }
    }
}
