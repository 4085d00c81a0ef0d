//! Shared types for the TCP tuning configuration
//!
//! This crate contains the error taxonomy, the well-known tuning keys and the
//! descriptors of where a properties file was loaded from.

pub mod error;
pub mod keys;
pub mod source;

// Re-export commonly used types
pub use error::{ConfigError, Result, TuningError};
pub use keys::{CONF_DIRECTORY, CONF_LOCATION_KEY, TUNING_FILE_NAME};
pub use source::PropertySource;
