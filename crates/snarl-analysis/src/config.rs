//! Analysis run configuration.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use snarl_graph::SuggestionPolicy;
use snarl_graph::detector::DEFAULT_MAX_CYCLES;

/// Maximum source file size (10 MiB). Larger files are skipped with a
/// `TooLarge` diagnostic.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Exclusions applied unless disabled: VCS metadata, caches, virtualenvs,
/// build output, and test code.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "**/.git/**",
    "**/.hg/**",
    "**/__pycache__/**",
    "**/.venv/**",
    "**/venv/**",
    "**/site-packages/**",
    "**/build/**",
    "**/dist/**",
    "**/node_modules/**",
    "**/.tox/**",
    "**/tests/**",
    "**/test/**",
    "**/test_*.py",
    "**/*_test.py",
    "**/conftest.py",
];

/// Which capture modes feed the graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Parse the source tree.
    #[default]
    Static,
    /// Use a captured import trace only.
    Runtime,
    /// Static graph plus runtime edges the parser could not see.
    Both,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Runtime => "runtime",
            Self::Both => "both",
        }
    }

    pub fn uses_static(self) -> bool {
        matches!(self, Self::Static | Self::Both)
    }

    pub fn uses_runtime(self) -> bool {
        matches!(self, Self::Runtime | Self::Both)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "static" => Ok(Self::Static),
            "runtime" => Ok(Self::Runtime),
            "both" => Ok(Self::Both),
            other => Err(format!(
                "unknown mode '{other}' (expected static, runtime, or both)"
            )),
        }
    }
}

/// Everything an [`Analyzer`](crate::Analyzer) needs for one run.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub root: PathBuf,
    /// Extra exclude globs, matched against paths relative to `root`.
    pub exclude: Vec<String>,
    pub use_default_excludes: bool,
    pub max_cycle_length: Option<usize>,
    pub max_cycles: usize,
    pub mode: Mode,
    /// Read and parse files on the rayon pool.
    pub parallel: bool,
    pub suggestion_policy: SuggestionPolicy,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            exclude: Vec::new(),
            use_default_excludes: true,
            max_cycle_length: None,
            max_cycles: DEFAULT_MAX_CYCLES,
            mode: Mode::Static,
            parallel: true,
            suggestion_policy: SuggestionPolicy::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Default excludes (when enabled) followed by user patterns.
    pub fn effective_excludes(&self) -> Vec<String> {
        let mut patterns: Vec<String> = if self.use_default_excludes {
            DEFAULT_EXCLUDES.iter().map(|p| p.to_string()).collect()
        } else {
            Vec::new()
        };
        patterns.extend(self.exclude.iter().cloned());
        patterns
    }
}
