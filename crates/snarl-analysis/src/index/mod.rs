//! Source tree indexing: `.py` files to dotted module identities.

mod exclude;
mod naming;

pub use exclude::ExcludeMatcher;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use snarl_graph::{Module, ModuleId};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::MAX_FILE_SIZE;
use crate::{CancellationToken, Diagnostic, DiagnosticKind, IndexError};

/// One indexed source file and its contents.
#[derive(Debug, Clone)]
pub struct IndexedFile {
    pub module: Module,
    pub source: Arc<str>,
}

/// Options for [`SourceModuleIndex::build`].
#[derive(Debug, Clone, Default)]
pub struct IndexOptions {
    /// Exclude globs, already including any defaults.
    pub exclude: Vec<String>,
    pub parallel: bool,
    /// Files are skipped once this is cancelled; callers check it afterwards.
    pub cancel: CancellationToken,
}

/// Deterministic map from module identity to source file.
#[derive(Debug, Clone)]
pub struct SourceModuleIndex {
    root: PathBuf,
    files: Vec<IndexedFile>,
    by_id: FxHashMap<ModuleId, usize>,
    files_scanned: usize,
    diagnostics: Vec<Diagnostic>,
}

/// A `.py` file that passed exclusion and naming.
struct Candidate {
    id: ModuleId,
    is_package: bool,
    path: PathBuf,
}

impl SourceModuleIndex {
    /// Walk `root` and read every eligible source file.
    ///
    /// Fails only when the root itself is unusable or an exclude pattern does
    /// not compile. Unreadable, oversized, or unnameable files become
    /// diagnostics.
    pub fn build(root: impl AsRef<Path>, options: &IndexOptions) -> Result<Self, IndexError> {
        let root = check_root(root.as_ref())?;
        let matcher = ExcludeMatcher::new(&options.exclude)?;
        let prefix = root_package_name(&root);

        let mut diagnostics = Vec::new();
        let mut candidates = Vec::new();
        let mut files_scanned = 0;

        let walker = WalkDir::new(&root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !entry.file_type().is_dir()
                    || !matcher.is_excluded_dir(relative(&root, entry.path()))
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| root.clone());
                    diagnostics.push(Diagnostic::for_file(
                        DiagnosticKind::Unreadable,
                        path,
                        err.to_string(),
                    ));
                    continue;
                }
            };

            if !entry.file_type().is_file()
                || entry.path().extension().and_then(|e| e.to_str()) != Some("py")
            {
                continue;
            }

            let rel = relative(&root, entry.path());
            if matcher.is_excluded(rel) {
                debug!(path = %rel.display(), "excluded");
                continue;
            }
            files_scanned += 1;

            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            if size > MAX_FILE_SIZE {
                diagnostics.push(Diagnostic::for_file(
                    DiagnosticKind::TooLarge,
                    entry.path(),
                    format!("file is {size} bytes, limit is {MAX_FILE_SIZE}"),
                ));
                continue;
            }

            let named = naming::module_name(rel, prefix.as_deref())
                .and_then(|(name, is_package)| ModuleId::new(&name).ok().map(|id| (id, is_package)));
            match named {
                Some((id, is_package)) => candidates.push(Candidate {
                    id,
                    is_package,
                    path: entry.path().to_path_buf(),
                }),
                None => diagnostics.push(Diagnostic::for_file(
                    DiagnosticKind::Unreadable,
                    entry.path(),
                    "path does not map to a valid module name",
                )),
            }
        }

        let outcomes: Vec<Option<Result<IndexedFile, Diagnostic>>> = if options.parallel {
            candidates
                .into_par_iter()
                .map(|c| read_candidate(c, &options.cancel))
                .collect()
        } else {
            candidates
                .into_iter()
                .map(|c| read_candidate(c, &options.cancel))
                .collect()
        };

        let mut files: Vec<IndexedFile> = Vec::new();
        for outcome in outcomes.into_iter().flatten() {
            match outcome {
                Ok(file) => files.push(file),
                Err(diagnostic) => diagnostics.push(diagnostic),
            }
        }

        let files = dedupe(files, &mut diagnostics);
        let by_id = files
            .iter()
            .enumerate()
            .map(|(i, f)| (f.module.id.clone(), i))
            .collect();

        for diagnostic in &diagnostics {
            warn!(%diagnostic, "skipped during indexing");
        }
        info!(
            root = %root.display(),
            files_scanned,
            modules = files.len(),
            skipped = diagnostics.len(),
            "indexed source tree"
        );

        Ok(Self {
            root,
            files,
            by_id,
            files_scanned,
            diagnostics,
        })
    }

    /// Canonicalized root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Indexed files sorted by module id.
    pub fn files(&self) -> &[IndexedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, id: &ModuleId) -> Option<&IndexedFile> {
        self.by_id.get(id).map(|&i| &self.files[i])
    }

    pub fn contains(&self, id: &ModuleId) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn contains_name(&self, dotted: &str) -> bool {
        ModuleId::new(dotted).is_ok_and(|id| self.contains(&id))
    }

    /// Longest indexed dotted prefix of `dotted` (`a.b` for `a.b.c` when
    /// only `a.b` is indexed).
    pub fn resolve_prefix(&self, dotted: &str) -> Option<ModuleId> {
        let id = ModuleId::new(dotted).ok()?;
        id.prefixes().into_iter().find(|p| self.contains(p))
    }

    /// `.py` files seen after exclusion, including skipped ones.
    pub fn files_scanned(&self) -> usize {
        self.files_scanned
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.files.iter().map(|f| &f.module)
    }
}

fn check_root(root: &Path) -> Result<PathBuf, IndexError> {
    let metadata = match std::fs::metadata(root) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(IndexError::RootNotFound(root.to_path_buf()));
        }
        Err(source) => {
            return Err(IndexError::RootUnreadable {
                path: root.to_path_buf(),
                source,
            });
        }
    };
    if !metadata.is_dir() {
        return Err(IndexError::RootNotDirectory(root.to_path_buf()));
    }

    std::fs::read_dir(root).map_err(|source| IndexError::RootUnreadable {
        path: root.to_path_buf(),
        source,
    })?;
    std::fs::canonicalize(root).map_err(|source| IndexError::RootUnreadable {
        path: root.to_path_buf(),
        source,
    })
}

/// A root containing `__init__.py` is itself a package; its modules are
/// named under the root directory's name.
fn root_package_name(root: &Path) -> Option<String> {
    if !root.join("__init__.py").is_file() {
        return None;
    }
    root.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
}

fn relative<'a>(root: &Path, path: &'a Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}

fn read_candidate(
    candidate: Candidate,
    cancel: &CancellationToken,
) -> Option<Result<IndexedFile, Diagnostic>> {
    if cancel.is_cancelled() {
        return None;
    }

    let bytes = match std::fs::read(&candidate.path) {
        Ok(bytes) => bytes,
        Err(err) => {
            return Some(Err(Diagnostic::for_file(
                DiagnosticKind::Unreadable,
                &candidate.path,
                err.to_string(),
            )));
        }
    };
    let source = match String::from_utf8(bytes) {
        Ok(source) => source,
        Err(_) => {
            return Some(Err(Diagnostic::for_file(
                DiagnosticKind::Unreadable,
                &candidate.path,
                "file is not valid UTF-8",
            )));
        }
    };

    let module = Module::builder(candidate.id, candidate.path)
        .is_package(candidate.is_package)
        .line_count(source.lines().count())
        .build();

    Some(Ok(IndexedFile {
        module,
        source: Arc::from(source),
    }))
}

/// Sort by id and keep one file per id. A package (`x/__init__.py`) wins
/// over a same-named module (`x.py`), matching the interpreter.
fn dedupe(mut files: Vec<IndexedFile>, diagnostics: &mut Vec<Diagnostic>) -> Vec<IndexedFile> {
    files.sort_by(|a, b| {
        a.module
            .id
            .cmp(&b.module.id)
            .then_with(|| b.module.is_package.cmp(&a.module.is_package))
            .then_with(|| a.module.path.cmp(&b.module.path))
    });

    let mut kept: Vec<IndexedFile> = Vec::with_capacity(files.len());
    for file in files {
        let previous = kept.last().filter(|p| p.module.id == file.module.id);
        if let Some(previous) = previous {
            diagnostics.push(Diagnostic::for_file(
                DiagnosticKind::DuplicateModule,
                &file.module.path,
                format!(
                    "module '{}' is already provided by {}",
                    file.module.id,
                    previous.module.path.display()
                ),
            ));
            continue;
        }
        kept.push(file);
    }
    kept
}
