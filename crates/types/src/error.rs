//! Error types for the TCP tuning configuration

use thiserror::Error;

/// Main error type for the tuning configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TuningError {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Not found errors
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },
}

/// Result type alias for tuning operations
pub type Result<T> = std::result::Result<T, TuningError>;

/// Configuration specific errors
///
/// None of these ever reach a caller of the typed getters. They are recorded on
/// the load result and written to the log.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A candidate location did not hold the properties file
    #[error("Configuration file not found: {path}")]
    LocationNotFound { path: String },

    /// The source was opened but reading it failed
    #[error("Error reading configuration from {path}: {message}")]
    Unreadable { path: String, message: String },

    /// Malformed properties content
    #[error("Configuration parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A value could not be coerced to the requested type
    #[error("Invalid configuration value for {key}: {value:?} must be {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },
}

impl ConfigError {
    /// Whether this error means a candidate was simply absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::LocationNotFound { .. })
    }
}

// Conversion implementations for common error types

impl From<ConfigError> for TuningError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::LocationNotFound { path } => TuningError::NotFound { resource: path },
            other => TuningError::Config(other.to_string()),
        }
    }
}
