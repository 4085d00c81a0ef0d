//! Lookup strategies consulted by the resolver

use crate::properties::Properties;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::warn;

/// A key to raw string lookup
pub trait ValueSource: Send + Sync {
    /// Raw value for `key`, if defined
    fn get(&self, key: &str) -> Option<String>;

    /// Name of the source for log output
    fn name(&self) -> &str;
}

/// Process environment overrides.
///
/// Reads variables by exact key name, e.g. `so_timeout` or `conf.location`.
/// With a prefix, keys are upper-cased and `.` becomes `_`, so
/// `conf.location` under `TCP_` reads `TCP_CONF_LOCATION`.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    prefix: Option<String>,
}

impl EnvOverrides {
    /// Exact-name environment lookup
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefixed, upper-cased environment lookup
    pub fn prefixed(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }

    /// Environment variable name read for `key`
    pub fn variable_name(&self, key: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, key.replace('.', "_").to_uppercase()),
            None => key.to_string(),
        }
    }
}

impl ValueSource for EnvOverrides {
    fn get(&self, key: &str) -> Option<String> {
        let name = self.variable_name(key);
        if name.is_empty() || name.contains(['=', '\0']) {
            return None;
        }
        let raw = std::env::var_os(&name)?;
        match raw.into_string() {
            Ok(value) => Some(value),
            Err(raw) => {
                warn!(variable = %name, "Override is not valid UTF-8, using a lossy conversion");
                Some(raw.to_string_lossy().into_owned())
            }
        }
    }

    fn name(&self) -> &str {
        "environment"
    }
}

/// In-memory overrides for embedding hosts and tests
#[derive(Debug, Default)]
pub struct MapOverrides {
    values: RwLock<HashMap<String, String>>,
}

impl MapOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.into(), value.into());
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.values
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key)
    }
}

impl ValueSource for MapOverrides {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    fn name(&self) -> &str {
        "overrides"
    }
}

/// The loaded mapping is the last strategy in the chain
impl ValueSource for Properties {
    fn get(&self, key: &str) -> Option<String> {
        Properties::get(self, key).map(str::to_string)
    }

    fn name(&self) -> &str {
        "properties"
    }
}
