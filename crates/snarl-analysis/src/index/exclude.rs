use std::path::Path;

use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};

use crate::IndexError;

/// Compiled exclude patterns, matched against root-relative paths.
///
/// Patterns ending in `/**` also prune the directory itself so the walk
/// never descends into it.
#[derive(Debug, Clone)]
pub struct ExcludeMatcher {
    files: GlobSet,
    dirs: GlobSet,
}

impl ExcludeMatcher {
    pub fn new(patterns: &[String]) -> Result<Self, IndexError> {
        let mut files = GlobSetBuilder::new();
        let mut dirs = GlobSetBuilder::new();

        for pattern in patterns {
            files.add(compile(pattern)?);
            if let Some(dir) = pattern.strip_suffix("/**") {
                if !dir.is_empty() {
                    dirs.add(compile(dir)?);
                }
            }
        }

        Ok(Self {
            files: build(files, patterns)?,
            dirs: build(dirs, patterns)?,
        })
    }

    pub fn is_excluded(&self, relative: &Path) -> bool {
        self.files.is_match(relative)
    }

    pub fn is_excluded_dir(&self, relative: &Path) -> bool {
        self.dirs.is_match(relative)
    }
}

fn compile(pattern: &str) -> Result<Glob, IndexError> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|source| IndexError::InvalidExcludePattern {
            pattern: pattern.to_string(),
            source,
        })
}

fn build(builder: GlobSetBuilder, patterns: &[String]) -> Result<GlobSet, IndexError> {
    builder
        .build()
        .map_err(|source| IndexError::InvalidExcludePattern {
            pattern: patterns.join(", "),
            source,
        })
}
