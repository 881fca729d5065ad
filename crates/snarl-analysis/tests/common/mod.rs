//! Shared test utilities for analysis tests.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use snarl_analysis::{AnalysisReport, Analyzer};
use tempfile::TempDir;

/// Create a test project with the given files.
///
/// # Arguments
/// * `temp` - Temporary directory
/// * `files` - Array of (path, content) tuples
///
/// # Returns
/// The root path of the created project
pub fn create_test_project(temp: &TempDir, files: &[(&str, &str)]) -> PathBuf {
    let root = temp.path().to_path_buf();

    for (path, content) in files {
        let file_path = root.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .unwrap_or_else(|e| panic!("Failed to create parent directory for {path}: {e}"));
        }
        fs::write(&file_path, content).unwrap_or_else(|e| panic!("Failed to write file {path}: {e}"));
    }

    root
}

/// Three modules importing each other in a ring at module level.
pub fn create_ring_project(temp: &TempDir) -> PathBuf {
    create_test_project(
        temp,
        &[
            ("a.py", "import b\n"),
            ("b.py", "import c\n"),
            ("c.py", "import a\n"),
        ],
    )
}

/// Analyze `files` sequentially with default settings.
pub fn analyze_files(files: &[(&str, &str)]) -> AnalysisReport {
    let temp = TempDir::new().unwrap();
    let root = create_test_project(&temp, files);
    Analyzer::new()
        .root(root)
        .parallel(false)
        .analyze()
        .unwrap()
}

/// Cycle chains in report order.
pub fn chains(report: &AnalysisReport) -> Vec<String> {
    report.cycles.iter().map(|c| c.cycle.format_chain()).collect()
}
