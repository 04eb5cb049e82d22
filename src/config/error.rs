//! Errors raised while loading and validating employee-rs settings

use thiserror::Error;

/// Failures of the layered settings pipeline (files, `EMPLOYEE_*` variables, validation).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested settings file (`--config` or `EMPLOYEE_CONFIG_FILE`) is missing
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Merged sources could not be deserialized into [`Settings`](super::Settings)
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// A loaded value is out of range or inconsistent with another value
    #[error("Validation error: {field} - {message}")]
    ValidationError {
        /// Dotted path of the offending key, e.g. `server.port`
        field: String,
        /// What is wrong with the value
        message: String,
    },

    /// An `EMPLOYEE_*` variable holds an unusable value, e.g. an unknown `EMPLOYEE_APP_ENV`
    #[error("Environment variable error: {0}")]
    EnvVarError(String),

    /// `EMPLOYEE_CONFIG_DIR` and `EMPLOYEE_CONFIG_FILE` were both set
    #[error("Mutual exclusivity error: {0}")]
    MutualExclusivityError(String),

    /// Errors raised by the `config` crate while merging sources
    #[error("Configuration error: {0}")]
    Other(#[from] config::ConfigError),
}

impl ConfigError {
    /// Rejects the value stored under `field`.
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        ConfigError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn file_not_found<S: Into<String>>(path: S) -> Self {
        ConfigError::FileNotFound(path.into())
    }

    pub fn mutual_exclusivity<S: Into<String>>(message: S) -> Self {
        ConfigError::MutualExclusivityError(message.into())
    }
}
