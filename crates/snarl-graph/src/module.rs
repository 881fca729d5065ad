use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::ModuleId;

/// A node of the import graph: one source file or package marker.
///
/// Created once per distinct file during indexing and never mutated
/// afterwards; the graph hands out `Arc<Module>` clones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub id: ModuleId,
    pub path: PathBuf,
    /// Dotted package containing this module (the module itself for packages).
    pub package: Option<ModuleId>,
    pub line_count: Option<usize>,
    pub is_package: bool,
    /// Not backed by a project file (external sentinel, runtime-only module).
    #[serde(default)]
    pub is_synthetic: bool,
}

impl Module {
    /// Create a new module builder with sensible defaults.
    ///
    /// The package defaults to the id's dotted parent.
    pub fn builder(id: ModuleId, path: PathBuf) -> ModuleBuilder {
        let package = id.parent();
        ModuleBuilder {
            module: Self {
                id,
                path,
                package,
                line_count: None,
                is_package: false,
                is_synthetic: false,
            },
        }
    }

    /// The synthetic module that escaping relative imports resolve to.
    pub fn external_sentinel() -> Self {
        Self::builder(ModuleId::external(), PathBuf::new())
            .synthetic(true)
            .build()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Builder for [`Module`].
#[derive(Debug)]
pub struct ModuleBuilder {
    module: Module,
}

impl ModuleBuilder {
    pub fn package(mut self, package: Option<ModuleId>) -> Self {
        self.module.package = package;
        self
    }

    pub fn line_count(mut self, lines: usize) -> Self {
        self.module.line_count = Some(lines);
        self
    }

    /// Mark as a package marker. A package is its own package.
    pub fn is_package(mut self, value: bool) -> Self {
        self.module.is_package = value;
        if value {
            self.module.package = Some(self.module.id.clone());
        }
        self
    }

    pub fn synthetic(mut self, value: bool) -> Self {
        self.module.is_synthetic = value;
        self
    }

    pub fn build(self) -> Module {
        self.module
    }
}
