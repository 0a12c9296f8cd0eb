//! SDK configuration.
//!
//! A [`SigilConfig`] names the storage root and, optionally, overrides for
//! the registry and store directories. There are no hidden defaults or
//! global paths: the root is always supplied by the caller, either directly
//! or through a `sigil.toml` file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};

/// On-disk layout configuration.
///
/// ```toml
/// root = "/var/lib/sigil"
/// registry_dir = "patterns"   # optional, default "registry"
/// store_dir = "blobs"         # optional, default "store"
/// ```
///
/// Relative override paths resolve under `root`; absolute paths are used
/// as-is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigilConfig {
    /// Root directory all storage lives under.
    pub root: PathBuf,
    /// Override for the pattern registry directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_dir: Option<PathBuf>,
    /// Override for the content store directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_dir: Option<PathBuf>,
}

impl SigilConfig {
    /// Configuration with the default layout under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            registry_dir: None,
            store_dir: None,
        }
    }

    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> SdkResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        toml::from_str(&text).map_err(|e| SdkError::Config(e.to_string()))
    }

    /// The directory the pattern registry persists to.
    pub fn registry_path(&self) -> PathBuf {
        self.resolve(self.registry_dir.as_deref(), "registry")
    }

    /// The directory the content store persists to.
    pub fn store_path(&self) -> PathBuf {
        self.resolve(self.store_dir.as_deref(), "store")
    }

    fn resolve(&self, overridden: Option<&Path>, default: &str) -> PathBuf {
        match overridden {
            Some(path) if path.is_absolute() => path.to_path_buf(),
            Some(path) => self.root.join(path),
            None => self.root.join(default),
        }
    }
}
