//! Dotted logical module identifiers.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Name of the synthetic module that absorbs imports escaping the project.
pub const EXTERNAL_SENTINEL: &str = "<external>";

/// Errors produced while validating a module name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModuleIdError {
    #[error("module name is empty")]
    Empty,

    #[error("module name '{0}' contains an empty segment")]
    EmptySegment(String),

    #[error("module name '{0}' contains whitespace")]
    Whitespace(String),
}

/// Logical module identity, e.g. `pkg.sub.module`.
///
/// Backed by `Arc<str>` so clones are cheap; ids are copied into every edge
/// and cycle. Ordering is plain lexicographic order of the dotted name,
/// which is what cycle canonicalization relies on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModuleId(Arc<str>);

impl ModuleId {
    /// Create a validated module id from a dotted name.
    pub fn new(name: impl AsRef<str>) -> Result<Self, ModuleIdError> {
        let name = name.as_ref();
        if name == EXTERNAL_SENTINEL {
            return Ok(Self::external());
        }
        if name.is_empty() {
            return Err(ModuleIdError::Empty);
        }
        if name.chars().any(char::is_whitespace) {
            return Err(ModuleIdError::Whitespace(name.to_string()));
        }
        if name.split('.').any(str::is_empty) {
            return Err(ModuleIdError::EmptySegment(name.to_string()));
        }
        Ok(Self(Arc::from(name)))
    }

    /// The sentinel that unresolvable relative imports point at.
    pub fn external() -> Self {
        Self(Arc::from(EXTERNAL_SENTINEL))
    }

    pub fn is_external(&self) -> bool {
        &*self.0 == EXTERNAL_SENTINEL
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate over the dotted segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Number of dotted segments.
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// Last segment (`c` for `a.b.c`).
    pub fn leaf(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&*self.0)
    }

    /// Enclosing dotted name (`a.b` for `a.b.c`), `None` at top level.
    pub fn parent(&self) -> Option<ModuleId> {
        if self.is_external() {
            return None;
        }
        self.0
            .rfind('.')
            .map(|idx| ModuleId(Arc::from(&self.0[..idx])))
    }

    /// Append a dotted suffix.
    pub fn join(&self, suffix: &str) -> Result<ModuleId, ModuleIdError> {
        ModuleId::new(format!("{}.{}", self.0, suffix))
    }

    /// Dotted prefixes from longest to shortest, starting with the id itself.
    pub fn prefixes(&self) -> Vec<ModuleId> {
        let mut out = vec![self.clone()];
        let mut current = self.parent();
        while let Some(id) = current {
            current = id.parent();
            out.push(id);
        }
        out
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ModuleId {
    type Error = ModuleIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ModuleId::new(value)
    }
}

impl From<ModuleId> for String {
    fn from(id: ModuleId) -> Self {
        id.0.to_string()
    }
}

impl AsRef<str> for ModuleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_names() {
        assert_eq!(ModuleId::new(""), Err(ModuleIdError::Empty));
        assert!(matches!(
            ModuleId::new("a..b"),
            Err(ModuleIdError::EmptySegment(_))
        ));
        assert!(matches!(
            ModuleId::new(".a"),
            Err(ModuleIdError::EmptySegment(_))
        ));
        assert!(matches!(
            ModuleId::new("a b"),
            Err(ModuleIdError::Whitespace(_))
        ));
    }

    #[test]
    fn parent_and_leaf() {
        let id = ModuleId::new("pkg.sub.mod").unwrap();
        assert_eq!(id.leaf(), "mod");
        assert_eq!(id.parent().unwrap().as_str(), "pkg.sub");
        assert_eq!(id.depth(), 3);
        assert!(ModuleId::new("top").unwrap().parent().is_none());
    }

    #[test]
    fn prefixes_run_longest_first() {
        let id = ModuleId::new("a.b.c").unwrap();
        let names: Vec<_> = id.prefixes().iter().map(|p| p.to_string()).collect();
        assert_eq!(names, vec!["a.b.c", "a.b", "a"]);
    }

    #[test]
    fn external_sentinel_round_trips() {
        let ext = ModuleId::new(EXTERNAL_SENTINEL).unwrap();
        assert!(ext.is_external());
        assert_eq!(ext, ModuleId::external());
        assert!(ext.parent().is_none());
    }

    #[test]
    fn serde_validates_on_the_way_in() {
        let ok: ModuleId = serde_json::from_str("\"pkg.mod\"").unwrap();
        assert_eq!(ok.as_str(), "pkg.mod");
        assert!(serde_json::from_str::<ModuleId>("\"pkg..mod\"").is_err());
    }
}
