use serde::{Deserialize, Serialize};

use super::ModuleId;

/// An import of something outside the indexed tree (stdlib, third-party)
/// and the project modules that import it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExternalImport {
    pub specifier: String,
    pub importers: Vec<ModuleId>,
}

impl ExternalImport {
    pub fn new(specifier: impl Into<String>) -> Self {
        Self {
            specifier: specifier.into(),
            importers: Vec::new(),
        }
    }

    /// Record an importer once.
    pub fn push_importer(&mut self, module_id: ModuleId) {
        if !self.importers.contains(&module_id) {
            self.importers.push(module_id);
        }
    }

    /// Top-level distribution name (`requests` for `requests.adapters`).
    pub fn top_level(&self) -> &str {
        self.specifier.split('.').next().unwrap_or(self.specifier.as_str())
    }
}
