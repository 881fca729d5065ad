//! Resolve syntactic import statements against the module index.

use snarl_graph::{ImportEdge, ImportKind, Module, ModuleId};

use super::parser::{ImportForm, ImportStatement, Placement};
use crate::index::SourceModuleIndex;
use crate::{Diagnostic, DiagnosticKind};

/// Everything one statement contributes.
#[derive(Debug, Default)]
pub(crate) struct Resolved {
    pub edges: Vec<ImportEdge>,
    /// Specifiers outside the indexed tree.
    pub external: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Edge kind for a statement. Placement beats form.
pub(crate) fn edge_kind(statement: &ImportStatement) -> ImportKind {
    match statement.placement {
        Placement::Deferred => ImportKind::Deferred,
        Placement::Conditional => ImportKind::Conditional,
        Placement::ModuleLevel => match &statement.form {
            ImportForm::From { wildcard: true, .. } => ImportKind::Star,
            ImportForm::From { level, .. } if *level > 0 => ImportKind::Relative,
            _ => ImportKind::Absolute,
        },
    }
}

pub(crate) fn resolve(
    statement: &ImportStatement,
    importer: &Module,
    index: &SourceModuleIndex,
) -> Resolved {
    let mut resolver = Resolver {
        importer,
        index,
        line: statement.line,
        kind: edge_kind(statement),
        out: Resolved::default(),
    };

    match &statement.form {
        ImportForm::Import { modules } => {
            for name in modules {
                match index.resolve_prefix(name) {
                    Some(target) => resolver.edge(target),
                    None => resolver.out.external.push(name.clone()),
                }
            }
        }
        ImportForm::From {
            level: 0,
            module: Some(module),
            names,
            wildcard,
        } => {
            let targets = resolver.from_targets(module, names, *wildcard);
            if targets.is_empty() && index.resolve_prefix(module).is_none() {
                resolver.out.external.push(module.clone());
            }
            for target in targets {
                resolver.edge(target);
            }
        }
        ImportForm::From {
            level,
            module,
            names,
            wildcard,
        } => resolver.relative(*level, module.as_deref(), names, *wildcard),
    }

    resolver.out
}

struct Resolver<'a> {
    importer: &'a Module,
    index: &'a SourceModuleIndex,
    line: usize,
    kind: ImportKind,
    out: Resolved,
}

impl Resolver<'_> {
    fn edge(&mut self, target: ModuleId) {
        let duplicate = self.out.edges.iter().any(|e| e.to == target);
        if !duplicate {
            self.out.edges.push(ImportEdge::new(
                self.importer.id.clone(),
                target,
                self.importer.path.clone(),
                self.line,
                self.kind,
            ));
        }
    }

    /// Targets of `from <module> import <names>` where `module` is a fully
    /// qualified dotted name.
    ///
    /// Each name that is itself an indexed submodule gets its own edge. Any
    /// other name is an attribute of `module`, so the edge goes to the
    /// longest indexed prefix of `module`. Inside a package's `__init__`
    /// that prefix can be the package itself; such names refer to its own
    /// namespace and produce no edge.
    fn from_targets(&self, module: &str, names: &[String], wildcard: bool) -> Vec<ModuleId> {
        let mut targets = Vec::new();
        let mut needs_parent = wildcard || names.is_empty();

        for name in names {
            match ModuleId::new(format!("{module}.{name}")) {
                Ok(candidate) if self.index.contains(&candidate) => targets.push(candidate),
                _ => needs_parent = true,
            }
        }

        if needs_parent {
            if let Some(parent) = self.index.resolve_prefix(module) {
                let own_namespace = self.importer.is_package && parent == self.importer.id;
                if !own_namespace && !targets.contains(&parent) {
                    targets.push(parent);
                }
            }
        }
        targets
    }

    fn relative(&mut self, level: usize, module: Option<&str>, names: &[String], wildcard: bool) {
        let Some(base) = relative_base(self.importer, level) else {
            self.escape(level, module);
            return;
        };

        let qualified = match module {
            Some(module) => format!("{base}.{module}"),
            None => base.to_string(),
        };

        let targets = self.from_targets(&qualified, names, wildcard);
        if targets.is_empty() && self.index.resolve_prefix(&qualified).is_none() {
            self.unresolved(&qualified);
            return;
        }
        for target in targets {
            self.edge(target);
        }
    }

    fn escape(&mut self, level: usize, module: Option<&str>) {
        let written = format!("{}{}", ".".repeat(level), module.unwrap_or(""));
        self.out.diagnostics.push(
            Diagnostic::for_file(
                DiagnosticKind::UnresolvedRelative,
                &self.importer.path,
                format!("relative import '{written}' escapes the package root"),
            )
            .at_line(self.line),
        );
        self.edge(ModuleId::external());
    }

    fn unresolved(&mut self, qualified: &str) {
        self.out.diagnostics.push(
            Diagnostic::for_file(
                DiagnosticKind::UnresolvedRelative,
                &self.importer.path,
                format!("relative import target '{qualified}' is not an indexed module"),
            )
            .at_line(self.line),
        );
        self.edge(ModuleId::external());
    }
}

/// Package a relative import of `level` dots is anchored at.
///
/// One dot is the importer's own package; each further dot moves up one
/// level. `None` when that climbs past the top of the tree.
pub(crate) fn relative_base(importer: &Module, level: usize) -> Option<ModuleId> {
    let mut base = if importer.is_package {
        Some(importer.id.clone())
    } else {
        importer.id.parent()
    };
    for _ in 1..level {
        base = base?.parent();
    }
    base
}
