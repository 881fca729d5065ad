//! File-based config discovery.

use std::fs;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::Serialized;

use crate::config::SnarlConfig;
use crate::error::{ConfigError, Result};

/// A config file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// `snarl.toml`, settings at the top level.
    SnarlToml(PathBuf),
    /// `pyproject.toml`, settings under `[tool.snarl]`.
    Pyproject(PathBuf),
}

impl ConfigSource {
    /// Classify an explicit path by file name.
    pub fn from_path(path: &Path) -> Self {
        if path.file_name().and_then(|n| n.to_str()) == Some("pyproject.toml") {
            Self::Pyproject(path.to_path_buf())
        } else {
            Self::SnarlToml(path.to_path_buf())
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::SnarlToml(path) | Self::Pyproject(path) => path,
        }
    }
}

/// Searches a directory for Snarl configuration.
///
/// # Example
///
/// ```no_run
/// use snarl_config::ConfigDiscovery;
///
/// let config = ConfigDiscovery::new(".").load().unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Find a config file in the root directory
    ///
    /// Searches in this order:
    /// 1. snarl.toml
    /// 2. pyproject.toml with a `[tool.snarl]` table
    pub fn find(&self) -> Option<ConfigSource> {
        let toml_path = self.root.join("snarl.toml");
        if toml_path.is_file() {
            return Some(ConfigSource::SnarlToml(toml_path));
        }

        let pyproject = self.root.join("pyproject.toml");
        let has_table = fs::read_to_string(&pyproject)
            .ok()
            .and_then(|content| content.parse::<toml::Table>().ok())
            .is_some_and(|table| {
                table
                    .get("tool")
                    .and_then(|tool| tool.get("snarl"))
                    .is_some_and(toml::Value::is_table)
            });
        has_table.then_some(ConfigSource::Pyproject(pyproject))
    }

    /// Load the discovered file over the defaults, ignoring the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no config file is found.
    pub fn load(&self) -> Result<SnarlConfig> {
        let source = self.find().ok_or(ConfigError::NotFound)?;
        let config: SnarlConfig = Figment::new()
            .merge(Serialized::defaults(SnarlConfig::default()))
            .merge(source.provider())
            .extract()
            .map_err(|e| ConfigError::invalid(source.path().display().to_string(), e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
