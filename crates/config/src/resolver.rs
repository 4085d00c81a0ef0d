//! Typed, override-aware lookup of tuning values

use crate::loader::{LoadedProperties, PropertiesLoader};
use crate::overrides::{EnvOverrides, ValueSource};
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};
use tuning_types::{ConfigError, PropertySource};

static GLOBAL: OnceLock<ConfigResolver> = OnceLock::new();

/// Resolves tuning values from overrides first, then the loaded properties.
///
/// The loaded mapping is fixed at construction. Overrides are consulted on
/// every call and may change between calls.
pub struct ConfigResolver {
    overrides: Arc<dyn ValueSource>,
    loaded: LoadedProperties,
}

impl ConfigResolver {
    /// Run `loader` once and build a resolver over the result
    pub fn load(loader: &PropertiesLoader, overrides: Arc<dyn ValueSource>) -> Self {
        let loaded = loader.load(overrides.as_ref());
        Self::from_parts(overrides, loaded)
    }

    pub fn from_parts(overrides: Arc<dyn ValueSource>, loaded: LoadedProperties) -> Self {
        Self { overrides, loaded }
    }

    /// Process-wide resolver.
    ///
    /// The first call loads `tcp.properties` with environment overrides;
    /// concurrent first callers block until that single load completes.
    pub fn global() -> &'static ConfigResolver {
        Self::get_or_load(&GLOBAL, Self::default_parts)
    }

    /// Loader and overrides used by [`ConfigResolver::global`]
    fn default_parts() -> (PropertiesLoader, Arc<dyn ValueSource>) {
        let overrides: Arc<dyn ValueSource> = Arc::new(EnvOverrides::new());
        (PropertiesLoader::default(), overrides)
    }

    /// Load into `cell` on first access; `parts` runs at most once per cell
    fn get_or_load<F>(cell: &OnceLock<ConfigResolver>, parts: F) -> &ConfigResolver
    where
        F: FnOnce() -> (PropertiesLoader, Arc<dyn ValueSource>),
    {
        cell.get_or_init(|| {
            let (loader, overrides) = parts();
            Self::load(&loader, overrides)
        })
    }

    /// Install the process-wide resolver before its first use.
    ///
    /// Hands `resolver` back if one is already in place.
    pub fn init_global(resolver: ConfigResolver) -> Result<&'static ConfigResolver, ConfigResolver> {
        GLOBAL.set(resolver)?;
        Ok(Self::global())
    }

    pub fn loaded(&self) -> &LoadedProperties {
        &self.loaded
    }

    /// Where the loaded mapping came from
    pub fn source(&self) -> &PropertySource {
        self.loaded.source()
    }

    /// Raw text for `name`: the first hit of overrides, then loaded properties
    fn lookup(&self, name: &str) -> Option<String> {
        let chain: [&dyn ValueSource; 2] = [self.overrides.as_ref(), self.loaded.properties()];
        chain.iter().find_map(|source| source.get(name))
    }

    /// Integer value, `None` when unset or not an integer
    pub fn get_int(&self, name: &str) -> Option<i32> {
        self.int_property(name, None)
    }

    /// Integer value, `default` when unset or not an integer
    pub fn get_int_or(&self, name: &str, default: i32) -> i32 {
        self.int_property(name, Some(default)).unwrap_or(default)
    }

    fn int_property(&self, name: &str, default: Option<i32>) -> Option<i32> {
        let Some(val) = self.lookup(name) else {
            return default;
        };

        match val.parse::<i32>() {
            Ok(parsed) => {
                debug!(key = name, value = %val, "Using TCP tuning parameter");
                Some(parsed)
            }
            Err(_) => {
                let err = ConfigError::InvalidValue {
                    key: name.to_string(),
                    value: val,
                    expected: "an integer",
                };
                warn!(key = name, error = %err, "Invalid TCP tuning property value");
                default
            }
        }
    }

    /// Boolean value, `None` when unset
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.bool_property(name, None)
    }

    /// Boolean value, `default` when unset.
    ///
    /// Only `true` in any letter case is truthy; every other string is `false`.
    pub fn get_bool_or(&self, name: &str, default: bool) -> bool {
        self.bool_property(name, Some(default)).unwrap_or(default)
    }

    fn bool_property(&self, name: &str, default: Option<bool>) -> Option<bool> {
        match self.lookup(name) {
            Some(val) => {
                debug!(key = name, value = %val, "Using TCP tuning parameter");
                Some(val.eq_ignore_ascii_case("true"))
            }
            None => default,
        }
    }

    /// String value verbatim, `None` when unset
    pub fn get_string(&self, name: &str) -> Option<String> {
        let val = self.lookup(name)?;
        debug!(key = name, value = %val, "Using TCP tuning parameter");
        Some(val)
    }

    /// String value verbatim, `default` when unset
    pub fn get_string_or(&self, name: &str, default: &str) -> String {
        self.get_string(name).unwrap_or_else(|| default.to_string())
    }
}

impl fmt::Debug for ConfigResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigResolver")
            .field("overrides", &self.overrides.name())
            .field("loaded", &self.loaded)
            .finish()
    }
}
