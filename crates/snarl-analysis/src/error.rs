//! Error types for analysis runs.
//!
//! Only structural failures are errors. Per-file problems are reported as
//! [`Diagnostic`](crate::Diagnostic)s and never abort a run.

use std::path::PathBuf;

/// The source root could not be indexed.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("source root not found: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("source root is not a directory: {}", .0.display())]
    RootNotDirectory(PathBuf),

    #[error("source root is not readable: {}", path.display())]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid exclude pattern '{pattern}'")]
    InvalidExcludePattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// A runtime trace session could not be started.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TraceSetupError {
    /// Another session on the same tracer has not finished yet.
    #[error("an import trace session is already active")]
    AlreadyActive,

    /// The host refused to register the import hook.
    #[error("import hook registration rejected: {reason}")]
    HookRejected { reason: String },
}

/// Fatal failure of an analysis run.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    TraceSetup(#[from] TraceSetupError),

    #[error(transparent)]
    Graph(#[from] snarl_graph::Error),

    /// The run was cancelled; nothing was reported.
    #[error("analysis cancelled")]
    Cancelled,

    /// Runtime mode was requested without a captured trace.
    #[error("runtime mode requires a captured import trace")]
    MissingTrace,

    /// The import parser could not be initialized.
    #[error("failed to initialize the Python parser: {0}")]
    Parser(String),
}

pub type Result<T> = std::result::Result<T, AnalyzeError>;
