use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format as _, Serialized, Toml};
use serde::{Deserialize, Serialize};
use snarl_analysis::snarl_graph::detector::DEFAULT_MAX_CYCLES;
use snarl_analysis::{AnalyzerConfig, Mode};
use tracing::debug;

use crate::discovery::{ConfigDiscovery, ConfigSource};
use crate::error::{ConfigError, Result};
use crate::settings::GlobalSettings;

/// Prefix of environment variables read by [`SnarlConfig::load`].
pub const ENV_PREFIX: &str = "SNARL_";

/// Snarl configuration, loaded from `snarl.toml`, `pyproject.toml`
/// (`[tool.snarl]`), the environment, and CLI flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnarlConfig {
    /// Source root to analyze
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Extra exclude globs, appended to the defaults
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Apply the built-in excludes (VCS, caches, virtualenvs, tests)
    #[serde(default = "default_true")]
    pub use_default_excludes: bool,

    /// Only report cycles of at most this many modules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cycle_length: Option<usize>,

    /// Capture mode
    #[serde(default)]
    pub mode: Mode,

    /// Cap on cycles reported per run
    #[serde(default = "default_max_cycles")]
    pub max_cycles: usize,

    /// Read and parse files in parallel
    #[serde(default = "default_true")]
    pub parallel: bool,

    #[serde(default)]
    pub settings: GlobalSettings,
}

fn default_true() -> bool {
    true
}

fn default_max_cycles() -> usize {
    DEFAULT_MAX_CYCLES
}

impl Default for SnarlConfig {
    fn default() -> Self {
        Self {
            root: None,
            exclude: Vec::new(),
            use_default_excludes: true,
            max_cycle_length: None,
            mode: Mode::Static,
            max_cycles: DEFAULT_MAX_CYCLES,
            parallel: true,
            settings: GlobalSettings::default(),
        }
    }
}

/// Values given on the command line. Unset fields leave lower layers alone;
/// `exclude` patterns are appended.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_default_excludes: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_cycle_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_cycles: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel: Option<bool>,
}

impl SnarlConfig {
    /// Load configuration from every layer.
    ///
    /// Priority: CLI overrides > `SNARL_*` environment > config file >
    /// defaults. The file is `config_path` when given, otherwise whatever
    /// [`ConfigDiscovery`] finds in `search_dir`. The result is validated.
    pub fn load(
        search_dir: &Path,
        config_path: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<Self> {
        Self::load_with_env(search_dir, config_path, overrides, ENV_PREFIX)
    }

    /// [`SnarlConfig::load`] with a custom environment prefix.
    pub fn load_with_env(
        search_dir: &Path,
        config_path: Option<&Path>,
        overrides: &ConfigOverrides,
        env_prefix: &str,
    ) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let source = match config_path {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::invalid(
                        "config",
                        format!("config file {} does not exist", path.display()),
                    ));
                }
                Some(ConfigSource::from_path(path))
            }
            None => ConfigDiscovery::new(search_dir).find(),
        };
        if let Some(source) = &source {
            debug!(path = %source.path().display(), "using config file");
            figment = figment.merge(source.provider());
        }

        // SNARL_SETTINGS__LOG_LEVEL -> settings.log_level
        figment = figment.merge(Env::prefixed(env_prefix).split("__"));
        figment = figment.admerge(Serialized::defaults(overrides));

        let config: Self = figment
            .extract()
            .map_err(|e| ConfigError::invalid("configuration", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Analyzer settings for this configuration. `fallback_root` is used
    /// when no layer set a root.
    pub fn analyzer_config(&self, fallback_root: &Path) -> AnalyzerConfig {
        AnalyzerConfig {
            root: self
                .root
                .clone()
                .unwrap_or_else(|| fallback_root.to_path_buf()),
            exclude: self.exclude.clone(),
            use_default_excludes: self.use_default_excludes,
            max_cycle_length: self.max_cycle_length,
            max_cycles: self.max_cycles,
            mode: self.mode,
            parallel: self.parallel,
            ..AnalyzerConfig::default()
        }
    }
}

impl ConfigSource {
    pub(crate) fn provider(&self) -> Figment {
        match self {
            Self::SnarlToml(path) => Figment::from(Toml::file(path)),
            Self::Pyproject(path) => Figment::from(Toml::file(path)).focus("tool.snarl"),
        }
    }
}
