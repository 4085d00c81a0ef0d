//! Properties loader implementation

use crate::locator::{ResourceLocator, ResourceStream, SearchPathLocator};
use crate::overrides::ValueSource;
use crate::properties::{self, Properties};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use tuning_types::{
    ConfigError, PropertySource, Result, TuningError, CONF_DIRECTORY, CONF_LOCATION_KEY,
    TUNING_FILE_NAME,
};

/// Result of a load. Always usable, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedProperties {
    properties: Properties,
    source: PropertySource,
    issues: Vec<ConfigError>,
}

impl LoadedProperties {
    /// Empty mapping with no source
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap an already parsed mapping
    pub fn from_properties(properties: Properties, source: PropertySource) -> Self {
        Self {
            properties,
            source,
            issues: Vec::new(),
        }
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Candidate the mapping was read from
    pub fn source(&self) -> &PropertySource {
        &self.source
    }

    /// Failures absorbed while loading
    pub fn issues(&self) -> &[ConfigError] {
        &self.issues
    }

    /// No source was readable, or something went wrong on the way
    pub fn is_degraded(&self) -> bool {
        !self.source().is_found() || !self.issues.is_empty()
    }

    /// For hosts that refuse to start on defaults alone.
    ///
    /// Fails with the first absorbed issue, or when no candidate was found.
    pub fn ensure_loaded(&self) -> Result<&Properties> {
        if let Some(issue) = self.issues.first() {
            return Err(issue.clone().into());
        }
        if !self.source.is_found() {
            return Err(TuningError::NotFound {
                resource: TUNING_FILE_NAME.to_string(),
            });
        }
        Ok(&self.properties)
    }
}

/// Locates and parses the tuning properties file
#[derive(Clone)]
pub struct PropertiesLoader {
    file_name: String,
    locator: Arc<dyn ResourceLocator>,
}

impl Default for PropertiesLoader {
    fn default() -> Self {
        Self::new(TUNING_FILE_NAME)
    }
}

impl PropertiesLoader {
    /// Loader for `file_name` on the process search path
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            locator: Arc::new(SearchPathLocator::from_process()),
        }
    }

    /// Replace the resource locator
    pub fn with_locator(mut self, locator: impl ResourceLocator + 'static) -> Self {
        self.locator = Arc::new(locator);
        self
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Load the first readable candidate.
    ///
    /// Candidates are, in order: `<conf.location>/<file>` on the filesystem,
    /// `<file>` on the resource locator, then `conf/<file>` on the resource
    /// locator. Never fails; problems are logged and kept in
    /// [`LoadedProperties::issues`].
    pub fn load(&self, overrides: &dyn ValueSource) -> LoadedProperties {
        info!(
            file = %self.file_name,
            locator = self.locator.name(),
            "Loading the TCP tuning config file"
        );

        let mut issues = Vec::new();
        let nested = format!("{}/{}", CONF_DIRECTORY, self.file_name);

        let opened = self
            .open_conf_location(overrides, &mut issues)
            .or_else(|| self.open_resource(&self.file_name))
            .or_else(|| self.open_resource(&nested));

        let Some((source, stream)) = opened else {
            debug!(file = %self.file_name, "No TCP tuning config file found, using defaults");
            return LoadedProperties {
                properties: Properties::new(),
                source: PropertySource::None,
                issues,
            };
        };

        let properties = read_properties(stream, &source, &mut issues);
        info!(
            source = %source,
            entries = properties.len(),
            "Loaded TCP tuning properties"
        );

        LoadedProperties {
            properties,
            source,
            issues,
        }
    }

    fn open_conf_location(
        &self,
        overrides: &dyn ValueSource,
        issues: &mut Vec<ConfigError>,
    ) -> Option<(PropertySource, ResourceStream)> {
        let dir = overrides.get(CONF_LOCATION_KEY)?;
        if dir.trim().is_empty() {
            warn!(key = CONF_LOCATION_KEY, "Ignoring empty configured location");
            return None;
        }
        let path = Path::new(&dir).join(&self.file_name);

        match open_file(&path) {
            Ok(file) => Some((PropertySource::ConfLocation(path), Box::new(file) as ResourceStream)),
            Err(err) => {
                warn!(
                    key = CONF_LOCATION_KEY,
                    error = %err,
                    "Error loading TCP tuning properties from the configured location"
                );
                issues.push(err);
                None
            }
        }
    }

    fn open_resource(&self, path: &str) -> Option<(PropertySource, ResourceStream)> {
        debug!(path, "Loading the TCP tuning config file from the resource path");
        let stream = self.locator.open(path);
        if stream.is_none() {
            debug!(path, "Unable to load the TCP tuning config file");
        }
        stream.map(|s| (PropertySource::Resource(path.to_string()), s))
    }
}

fn open_file(path: &Path) -> std::result::Result<File, ConfigError> {
    let not_found = || ConfigError::LocationNotFound {
        path: path.display().to_string(),
    };
    let unreadable = |e: std::io::Error| ConfigError::Unreadable {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => not_found(),
        _ => unreadable(e),
    })?;
    match file.metadata() {
        Ok(meta) if meta.is_file() => Ok(file),
        Ok(_) => Err(not_found()),
        Err(e) => Err(unreadable(e)),
    }
}

/// Best effort: whatever was read and parsed before a failure is kept
fn read_properties(
    mut stream: ResourceStream,
    source: &PropertySource,
    issues: &mut Vec<ConfigError>,
) -> Properties {
    let mut bytes = Vec::new();
    if let Err(e) = stream.read_to_end(&mut bytes) {
        let err = ConfigError::Unreadable {
            path: source.to_string(),
            message: e.to_string(),
        };
        error!(source = %source, error = %err, "Error reading TCP tuning properties");
        issues.push(err);
    }

    let mut props = Properties::new();
    if let Err(err) = properties::parse_into(&properties::decode(&bytes), &mut props) {
        error!(source = %source, error = %err, "Error parsing TCP tuning properties");
        issues.push(err);
    }
    props
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::EmbeddedLocator;
    use crate::overrides::MapOverrides;
    use crate::test_support::capture_logs;
    use std::fs;
    use std::io;
    use tempfile::TempDir;

    /// Yields some bytes, then fails
    struct FailingStream {
        data: io::Cursor<Vec<u8>>,
    }

    impl Read for FailingStream {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.data.read(buf)? {
                0 => Err(io::Error::new(io::ErrorKind::Other, "device went away")),
                n => Ok(n),
            }
        }
    }

    struct FailingLocator;

    impl ResourceLocator for FailingLocator {
        fn open(&self, _path: &str) -> Option<ResourceStream> {
            Some(Box::new(FailingStream {
                data: io::Cursor::new(b"so_timeout=5000\nso_keep".to_vec()),
            }))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn loader(locator: EmbeddedLocator) -> PropertiesLoader {
        PropertiesLoader::default().with_locator(locator)
    }

    #[test]
    fn test_load_root_resource() {
        let loader = loader(
            EmbeddedLocator::new()
                .with_resource("tcp.properties", "so_timeout=5000\nkeep_alive=true")
                .with_resource("conf/tcp.properties", "so_timeout=1"),
        );
        let loaded = loader.load(&MapOverrides::new());

        assert_eq!(loaded.source(), &PropertySource::Resource("tcp.properties".to_string()));
        assert_eq!(loaded.properties().get("so_timeout"), Some("5000"));
        assert_eq!(loaded.properties().get("keep_alive"), Some("true"));
        assert!(!loaded.is_degraded());
    }

    #[test]
    fn test_fallback_to_conf_directory() {
        let loader = loader(EmbeddedLocator::new().with_resource("conf/tcp.properties", "backlog=256"));
        let overrides = MapOverrides::new().with(CONF_LOCATION_KEY, "/nonexistent/tuning/dir");

        let (loaded, logs) = capture_logs(|| loader.load(&overrides));

        assert_eq!(
            loaded.source(),
            &PropertySource::Resource("conf/tcp.properties".to_string())
        );
        assert_eq!(
            loaded.properties(),
            &Properties::parse("backlog=256").unwrap()
        );
        assert_eq!(
            loaded.issues(),
            &[ConfigError::LocationNotFound {
                path: "/nonexistent/tuning/dir/tcp.properties".to_string(),
            }]
        );
        assert!(loaded.is_degraded());
        assert!(logs.contains("WARN"));
        assert!(logs.contains("conf.location"));
    }

    #[test]
    fn test_conf_location_wins() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("tcp.properties"), "so_timeout=9000").unwrap();

        let loader = loader(EmbeddedLocator::new().with_resource("tcp.properties", "so_timeout=1"));
        let overrides =
            MapOverrides::new().with(CONF_LOCATION_KEY, dir.path().to_string_lossy());
        let loaded = loader.load(&overrides);

        assert_eq!(
            loaded.source(),
            &PropertySource::ConfLocation(dir.path().join("tcp.properties"))
        );
        assert_eq!(loaded.properties().get("so_timeout"), Some("9000"));
        assert!(loaded.issues().is_empty());
    }

    #[test]
    fn test_conf_location_directory_falls_through() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("tcp.properties")).unwrap();

        let loader = loader(EmbeddedLocator::new().with_resource("tcp.properties", "backlog=8"));
        let overrides =
            MapOverrides::new().with(CONF_LOCATION_KEY, dir.path().to_string_lossy());
        let loaded = loader.load(&overrides);

        assert_eq!(loaded.properties().get("backlog"), Some("8"));
        assert!(loaded.issues()[0].is_not_found());
    }

    #[test]
    fn test_no_candidates_yields_empty_mapping() {
        let (loaded, logs) = capture_logs(|| loader(EmbeddedLocator::new()).load(&MapOverrides::new()));

        assert!(loaded.properties().is_empty());
        assert_eq!(loaded.source(), &PropertySource::None);
        assert!(loaded.issues().is_empty());
        assert!(loaded.is_degraded());
        assert!(!logs.contains("ERROR"));
    }

    #[test]
    fn test_parse_failure_keeps_partial_mapping() {
        let loader = loader(
            EmbeddedLocator::new().with_resource("tcp.properties", "backlog=8\nbad=\\uZZZZ\nlater=1"),
        );
        let (loaded, logs) = capture_logs(|| loader.load(&MapOverrides::new()));

        assert_eq!(loaded.properties().get("backlog"), Some("8"));
        assert!(!loaded.properties().contains_key("later"));
        assert!(matches!(loaded.issues(), [ConfigError::Parse { line: 2, .. }]));
        assert!(logs.contains("ERROR"));
    }

    #[test]
    fn test_read_failure_keeps_partial_mapping() {
        let loader = PropertiesLoader::default().with_locator(FailingLocator);
        let loaded = loader.load(&MapOverrides::new());

        assert_eq!(loaded.properties().get("so_timeout"), Some("5000"));
        assert_eq!(loaded.properties().get("so_keep"), Some(""));
        assert!(matches!(loaded.issues(), [ConfigError::Unreadable { .. }]));
    }

    #[test]
    fn test_custom_file_name() {
        let loader = PropertiesLoader::new("listener.properties")
            .with_locator(EmbeddedLocator::new().with_resource("conf/listener.properties", "a=b"));
        assert_eq!(loader.file_name(), "listener.properties");
        assert_eq!(loader.load(&MapOverrides::new()).properties().get("a"), Some("b"));
    }

    #[test]
    fn test_empty_result() {
        let loaded = LoadedProperties::empty();
        assert!(loaded.properties().is_empty());
        assert_eq!(loaded.source(), &PropertySource::None);
        assert_eq!(
            loaded.ensure_loaded(),
            Err(TuningError::NotFound {
                resource: "tcp.properties".to_string(),
            })
        );
    }

    #[test]
    fn test_ensure_loaded() {
        let clean = loader(EmbeddedLocator::new().with_resource("tcp.properties", "backlog=8"))
            .load(&MapOverrides::new());
        assert_eq!(clean.ensure_loaded().unwrap().get("backlog"), Some("8"));

        let broken = loader(EmbeddedLocator::new().with_resource("tcp.properties", "bad=\\u00"))
            .load(&MapOverrides::new());
        assert!(matches!(broken.ensure_loaded(), Err(TuningError::Config(msg)) if msg.contains("line 1")));

        let misplaced = loader(EmbeddedLocator::new().with_resource("tcp.properties", "backlog=8"))
            .load(&MapOverrides::new().with(CONF_LOCATION_KEY, "/nonexistent/tuning/dir"));
        assert!(matches!(misplaced.ensure_loaded(), Err(TuningError::NotFound { .. })));
    }

    #[test]
    fn test_empty_conf_location_is_ignored() {
        let loader = loader(EmbeddedLocator::new().with_resource("tcp.properties", "backlog=8"));
        for blank in ["", "   "] {
            let (loaded, logs) = capture_logs(|| {
                loader.load(&MapOverrides::new().with(CONF_LOCATION_KEY, blank))
            });

            assert_eq!(
                loaded.source(),
                &PropertySource::Resource("tcp.properties".to_string())
            );
            assert_eq!(loaded.properties().get("backlog"), Some("8"));
            assert!(loaded.issues().is_empty());
            assert!(logs.contains("WARN"));
        }
    }
}
