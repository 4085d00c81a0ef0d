//! Resource location on a host-provided search path

use std::collections::HashMap;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Byte stream handed back by a locator
pub type ResourceStream = Box<dyn Read + Send>;

/// Resolves relative resource paths such as `conf/tcp.properties`
pub trait ResourceLocator: Send + Sync {
    /// Open `path`, or `None` when no root provides it
    fn open(&self, path: &str) -> Option<ResourceStream>;

    /// Name of the locator for log output
    fn name(&self) -> &str;
}

/// Searches an ordered list of root directories
#[derive(Debug, Clone)]
pub struct SearchPathLocator {
    roots: Vec<PathBuf>,
}

impl SearchPathLocator {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    /// Current working directory, then the directory of the running executable
    pub fn from_process() -> Self {
        let mut roots = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            roots.push(cwd);
        }
        if let Some(dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            if !roots.contains(&dir) {
                roots.push(dir);
            }
        }
        Self { roots }
    }

    /// Append a root searched after the existing ones
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots.push(root.into());
        self
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

impl Default for SearchPathLocator {
    fn default() -> Self {
        Self::from_process()
    }
}

impl ResourceLocator for SearchPathLocator {
    fn open(&self, path: &str) -> Option<ResourceStream> {
        let relative: PathBuf = path.split('/').filter(|part| !part.is_empty()).collect();

        for root in &self.roots {
            let candidate = root.join(&relative);
            if !candidate.is_file() {
                continue;
            }
            match File::open(&candidate) {
                Ok(file) => {
                    debug!(path = %candidate.display(), "Resolved resource");
                    return Some(Box::new(file));
                }
                Err(e) => {
                    warn!(path = %candidate.display(), error = %e, "Unable to open resource");
                }
            }
        }

        None
    }

    fn name(&self) -> &str {
        "search-path"
    }
}

/// Resources packaged into the binary, e.g. via `include_bytes!`
#[derive(Debug, Clone, Default)]
pub struct EmbeddedLocator {
    resources: HashMap<String, Arc<[u8]>>,
}

impl EmbeddedLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource(mut self, path: impl AsRef<str>, bytes: impl Into<Vec<u8>>) -> Self {
        let bytes: Vec<u8> = bytes.into();
        self.resources.insert(normalize(path.as_ref()), Arc::from(bytes));
        self
    }
}

impl ResourceLocator for EmbeddedLocator {
    fn open(&self, path: &str) -> Option<ResourceStream> {
        self.resources
            .get(&normalize(path))
            .map(|bytes| Box::new(Cursor::new(Arc::clone(bytes))) as ResourceStream)
    }

    fn name(&self) -> &str {
        "embedded"
    }
}

fn normalize(path: &str) -> String {
    path.trim_start_matches('/').to_string()
}
