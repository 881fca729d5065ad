//! Non-fatal findings collected during a run.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// What went wrong with one file or one part of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// File could not be read or was not UTF-8.
    Unreadable,
    /// File exceeded the size limit.
    TooLarge,
    /// File has syntax errors; its imports were not extracted.
    Parse,
    /// Relative import escaped the package root or named nothing indexed.
    UnresolvedRelative,
    /// Two files map to the same module name.
    DuplicateModule,
    /// Cycle enumeration stopped early; results are partial.
    CycleDetectionOverflow,
}

impl DiagnosticKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unreadable => "unreadable",
            Self::TooLarge => "too-large",
            Self::Parse => "parse",
            Self::UnresolvedRelative => "unresolved-relative",
            Self::DuplicateModule => "duplicate-module",
            Self::CycleDetectionOverflow => "cycle-detection-overflow",
        }
    }

    /// The file was left out of the graph entirely.
    pub fn skips_file(self) -> bool {
        matches!(self, Self::Unreadable | Self::TooLarge | Self::Parse)
    }
}

/// A warning attached to the analysis report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub path: Option<PathBuf>,
    pub line: Option<usize>,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            path: None,
            line: None,
            kind,
            message: message.into(),
        }
    }

    pub fn for_file(kind: DiagnosticKind, path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::new(kind, message)
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.kind.as_str())?;
        if let Some(path) = &self.path {
            write!(f, "{}", path.display())?;
            if let Some(line) = self.line {
                write!(f, ":{line}")?;
            }
            f.write_str(": ")?;
        }
        f.write_str(&self.message)
    }
}
