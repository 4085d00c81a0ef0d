//! Where the loaded properties came from

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// The candidate that supplied the loaded mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "location", rename_all = "snake_case")]
pub enum PropertySource {
    /// File under the directory named by the `conf.location` override
    ConfLocation(PathBuf),
    /// Relative path resolved by the resource locator
    Resource(String),
    /// No candidate was readable
    #[default]
    None,
}

impl PropertySource {
    /// Whether a candidate was found
    pub fn is_found(&self) -> bool {
        !matches!(self, PropertySource::None)
    }
}

impl fmt::Display for PropertySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertySource::ConfLocation(path) => write!(f, "file {}", path.display()),
            PropertySource::Resource(path) => write!(f, "resource {}", path),
            PropertySource::None => write!(f, "none"),
        }
    }
}
