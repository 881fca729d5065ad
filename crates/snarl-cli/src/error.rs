//! Error types for the Snarl CLI.
//!
//! Library errors convert into [`CliError`] via `#[from]`; the binary turns
//! a `CliError` into a miette report with a hint where one helps.
//!
//! # Example
//!
//! ```rust,no_run
//! use snarl_cli::error::{Result, ResultExt};
//! use std::path::Path;
//!
//! fn read_trace(path: &Path) -> Result<String> {
//!     std::fs::read_to_string(path).with_path(path)
//! }
//! ```

mod report;

use std::path::PathBuf;

use thiserror::Error;

pub use self::report::cli_error_to_miette;

#[derive(Debug, Error)]
pub enum CliError {
    /// The analysis run failed as a whole
    #[error(transparent)]
    Analyze(#[from] snarl_analysis::AnalyzeError),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] snarl_config::ConfigError),

    /// Export or graph document failure
    #[error("Graph error: {0}")]
    Graph(#[from] snarl_analysis::snarl_graph::Error),

    /// Invalid combination of command-line options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Trace file is not a valid trace log
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Custom(String),
}

pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Context helpers for fallible CLI operations.
pub trait ResultExt<T> {
    /// Turn a not-found I/O error into [`CliError::FileNotFound`] for `path`.
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;

    /// Prefix the error message.
    fn context(self, msg: impl std::fmt::Display) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| match e.into() {
            CliError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                CliError::FileNotFound(path.as_ref().to_path_buf())
            }
            other => other,
        })
    }

    fn context(self, msg: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{msg}: {err}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snarl_analysis::AnalyzeError;

    #[test]
    fn config_errors_convert() {
        let err: CliError = snarl_config::ConfigError::NotFound.into();
        assert!(matches!(err, CliError::Config(_)));
        assert!(err.to_string().starts_with("Configuration error"));
    }

    #[test]
    fn analyze_errors_are_transparent() {
        let err: CliError = AnalyzeError::MissingTrace.into();
        assert_eq!(err.to_string(), AnalyzeError::MissingTrace.to_string());
    }

    #[test]
    fn with_path_maps_not_found() {
        let result: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        let err = result.with_path("trace.json").unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(p) if p == PathBuf::from("trace.json")));
    }

    #[test]
    fn with_path_keeps_other_errors() {
        let result: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert!(matches!(result.with_path("out.dot").unwrap_err(), CliError::Io(_)));
    }

    #[test]
    fn context_prefixes_message() {
        let result: Result<()> = Err(CliError::InvalidArgument("bad".into()));
        let err = result.context("Failed to write report").unwrap_err();
        assert_eq!(err.to_string(), "Failed to write report: Invalid argument: bad");
    }
}
