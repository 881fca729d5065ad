//! Static import extraction.
//!
//! Each indexed file is parsed independently into a local edge list; the
//! lists are merged sequentially afterwards so workers share nothing.

mod parser;
mod resolve;

pub use parser::{ImportForm, ImportStatement, Placement, PythonImportParser, SyntaxFailure};

use std::collections::BTreeMap;

use rayon::prelude::*;
use snarl_graph::{ExternalImport, ImportEdge};
use tracing::{debug, info, info_span, warn};

use crate::index::{IndexedFile, SourceModuleIndex};
use crate::{AnalyzeError, CancellationToken, Diagnostic, DiagnosticKind};

/// Imports contributed by one file.
#[derive(Debug, Clone, Default)]
pub struct FileImports {
    pub edges: Vec<ImportEdge>,
    /// Unresolved absolute specifiers, in source order.
    pub external: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Merged result of extracting every file in an index.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Sorted by (from, to, line).
    pub edges: Vec<ImportEdge>,
    /// Sorted by specifier.
    pub external_imports: Vec<ExternalImport>,
    pub diagnostics: Vec<Diagnostic>,
    /// Files whose syntax tree was walked.
    pub files_parsed: usize,
}

impl Extraction {
    /// Some edge points at the `<external>` sentinel.
    pub fn references_sentinel(&self) -> bool {
        self.edges.iter().any(|e| e.to.is_external())
    }
}

/// Parses indexed files and resolves their imports to edges.
pub struct StaticImportExtractor<'a> {
    index: &'a SourceModuleIndex,
}

impl<'a> StaticImportExtractor<'a> {
    pub fn new(index: &'a SourceModuleIndex) -> Self {
        Self { index }
    }

    /// Extract every file. Per-file failures become diagnostics; only
    /// cancellation or a parser that cannot be built is an error.
    pub fn extract(
        &self,
        parallel: bool,
        cancel: &CancellationToken,
    ) -> Result<Extraction, AnalyzeError> {
        let _span = info_span!("extract", files = self.index.len()).entered();

        let outcomes: Vec<Option<Result<FileImports, String>>> = if parallel {
            self.index
                .files()
                .par_iter()
                .map_init(PythonImportParser::new, |parser, file| {
                    self.extract_with(parser.as_mut(), file, cancel)
                })
                .collect()
        } else {
            let mut parser = PythonImportParser::new();
            self.index
                .files()
                .iter()
                .map(|file| self.extract_with(parser.as_mut(), file, cancel))
                .collect()
        };

        if cancel.is_cancelled() {
            return Err(AnalyzeError::Cancelled);
        }

        let mut extraction = Extraction::default();
        let mut external: BTreeMap<String, ExternalImport> = BTreeMap::new();

        for (file, outcome) in self.index.files().iter().zip(outcomes) {
            let imports = match outcome {
                Some(Ok(imports)) => imports,
                Some(Err(message)) => return Err(AnalyzeError::Parser(message)),
                None => return Err(AnalyzeError::Cancelled),
            };

            if !imports.diagnostics.iter().any(|d| d.kind == DiagnosticKind::Parse) {
                extraction.files_parsed += 1;
            }
            for specifier in imports.external {
                external
                    .entry(specifier.clone())
                    .or_insert_with(|| ExternalImport::new(specifier))
                    .push_importer(file.module.id.clone());
            }
            extraction.edges.extend(imports.edges);
            extraction.diagnostics.extend(imports.diagnostics);
        }

        extraction.edges.sort();
        extraction.external_imports = external.into_values().collect();

        for diagnostic in &extraction.diagnostics {
            warn!(%diagnostic, "import extraction");
        }
        info!(
            files_parsed = extraction.files_parsed,
            edges = extraction.edges.len(),
            external = extraction.external_imports.len(),
            "extracted static imports"
        );
        Ok(extraction)
    }

    fn extract_with(
        &self,
        parser: Result<&mut PythonImportParser, &mut String>,
        file: &IndexedFile,
        cancel: &CancellationToken,
    ) -> Option<Result<FileImports, String>> {
        if cancel.is_cancelled() {
            return None;
        }
        match parser {
            Ok(parser) => Some(Ok(self.extract_file(parser, file))),
            Err(message) => Some(Err(message.clone())),
        }
    }

    /// Parse and resolve a single file.
    pub fn extract_file(&self, parser: &mut PythonImportParser, file: &IndexedFile) -> FileImports {
        let statements = match parser.parse(&file.source) {
            Ok(statements) => statements,
            Err(failure) => {
                debug!(module = %file.module.id, line = failure.line, "syntax error");
                return FileImports {
                    diagnostics: vec![
                        Diagnostic::for_file(DiagnosticKind::Parse, &file.module.path, failure.message)
                            .at_line(failure.line),
                    ],
                    ..FileImports::default()
                };
            }
        };

        let mut imports = FileImports::default();
        for statement in &statements {
            let resolved = resolve::resolve(statement, &file.module, self.index);
            imports.edges.extend(resolved.edges);
            imports.external.extend(resolved.external);
            imports.diagnostics.extend(resolved.diagnostics);
        }
        debug!(
            module = %file.module.id,
            statements = statements.len(),
            edges = imports.edges.len(),
            "extracted file"
        );
        imports
    }

    pub fn index(&self) -> &SourceModuleIndex {
        self.index
    }
}
