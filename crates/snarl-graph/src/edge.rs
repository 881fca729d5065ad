//! Import edges and their kinds.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ModuleId;

/// How an import statement binds its target.
///
/// Placement takes precedence over form when an extractor tags an edge:
/// an `import *` inside a function body is `Deferred`, not `Star`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    /// Module-level `import x` / `from x import y`.
    Absolute,
    /// Module-level `from .x import y`.
    Relative,
    /// Guarded by a conditional, exception handler, loop or `with` block.
    Conditional,
    /// Inside a function body; executed at call time, not load time.
    Deferred,
    /// Module-level `from x import *`.
    Star,
}

impl ImportKind {
    /// Executed unconditionally while the importing module loads.
    pub fn is_load_time(self) -> bool {
        matches!(self, Self::Absolute | Self::Relative | Self::Star)
    }

    /// Avoidable at load time.
    pub fn is_soft(self) -> bool {
        !self.is_load_time()
    }

    /// Rank used to pick the kind that represents a set of parallel edges.
    pub fn weight(self) -> u8 {
        match self {
            Self::Star => 4,
            Self::Absolute | Self::Relative => 3,
            Self::Conditional => 2,
            Self::Deferred => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Absolute => "absolute",
            Self::Relative => "relative",
            Self::Conditional => "conditional",
            Self::Deferred => "deferred",
            Self::Star => "star",
        }
    }
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One import relation observed at one call site.
///
/// The same `(from, to)` pair may appear several times at different lines.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ImportEdge {
    pub from: ModuleId,
    pub to: ModuleId,
    /// File containing the import statement.
    pub file: PathBuf,
    /// 1-based line; 0 when unknown (runtime-observed edges).
    pub line: usize,
    pub kind: ImportKind,
}

impl ImportEdge {
    pub fn new(
        from: ModuleId,
        to: ModuleId,
        file: impl Into<PathBuf>,
        line: usize,
        kind: ImportKind,
    ) -> Self {
        Self {
            from,
            to,
            file: file.into(),
            line,
            kind,
        }
    }

    /// Identity used for duplicate suppression.
    pub fn key(&self) -> (ModuleId, ModuleId, usize) {
        (self.from.clone(), self.to.clone(), self.line)
    }

    pub fn is_self_import(&self) -> bool {
        self.from == self.to
    }
}
