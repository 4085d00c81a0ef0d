//! TCP transport tuning configuration
//!
//! Resolves named tuning values from process overrides first and then from a
//! `tcp.properties` file located once at startup. Lookups never fail; missing
//! or malformed values fall back to the caller's default.

pub mod loader;
pub mod locator;
pub mod overrides;
pub mod properties;
pub mod resolver;
pub mod tuning;

#[cfg(test)]
pub(crate) mod test_support;

pub use loader::{LoadedProperties, PropertiesLoader};
pub use locator::{EmbeddedLocator, ResourceLocator, ResourceStream, SearchPathLocator};
pub use overrides::{EnvOverrides, MapOverrides, ValueSource};
pub use properties::Properties;
pub use resolver::ConfigResolver;
pub use tuning::TuningParameters;
pub use tuning_types::{keys, ConfigError, PropertySource};
