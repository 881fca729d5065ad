mod common;

use common::{analyze_files, chains, create_ring_project, create_test_project};
use snarl_analysis::snarl_graph::{FixType, GraphDocument, Severity};
use snarl_analysis::{AnalyzeError, Analyzer, CancellationToken, DiagnosticKind, IndexError, Mode};
use tempfile::TempDir;

#[test]
fn three_module_ring_is_one_high_cycle() {
    let temp = TempDir::new().unwrap();
    let root = create_ring_project(&temp);

    let report = Analyzer::new().root(root).analyze().unwrap();

    assert_eq!(chains(&report), vec!["a -> b -> c -> a"]);
    let cycle = &report.cycles[0];
    assert_eq!(cycle.severity(), Severity::High);
    assert_eq!(cycle.suggestion.fix_type, FixType::ExtractSharedModule);
    assert_eq!(cycle.suggestion.affected_files.len(), 3);

    assert_eq!(report.counters.files_scanned, 3);
    assert_eq!(report.counters.modules_found, 3);
    assert_eq!(report.counters.edges_found, 3);
    assert_eq!(report.counters.cycles_found, 1);
    assert_eq!(report.counters.high, 1);
    assert!(report.diagnostics.is_empty());
}

#[test]
fn function_local_import_downgrades_to_medium() {
    let report = analyze_files(&[
        ("a.py", "def load():\n    import b\n    return b\n"),
        ("b.py", "import a\n"),
    ]);

    assert_eq!(chains(&report), vec!["a -> b -> a"]);
    assert_eq!(report.cycles[0].severity(), Severity::Medium);
    assert_eq!(report.cycles[0].suggestion.fix_type, FixType::DeferImportToCallSite);
    assert_eq!(report.cycles[0].assessment.soft_hops, 1);
}

#[test]
fn self_import_is_critical() {
    let report = analyze_files(&[("loop.py", "import loop\n")]);

    assert_eq!(report.cycles.len(), 1);
    assert_eq!(report.cycles[0].cycle.len(), 1);
    assert_eq!(report.cycles[0].severity(), Severity::Critical);
    assert_eq!(report.counters.critical, 1);
}

#[test]
fn star_import_in_pair_is_critical() {
    let report = analyze_files(&[("a.py", "from b import *\n"), ("b.py", "import a\n")]);

    assert_eq!(report.cycles[0].severity(), Severity::Critical);
    assert_eq!(report.worst_severity(), Some(Severity::Critical));
}

#[test]
fn conditional_imports_are_soft() {
    let report = analyze_files(&[
        ("a.py", "try:\n    import b\nexcept ImportError:\n    b = None\n"),
        ("b.py", "import a\n"),
    ]);

    assert_eq!(report.cycles[0].severity(), Severity::Medium);
}

#[test]
fn cycles_are_ordered_by_severity_then_modules() {
    let report = analyze_files(&[
        ("a.py", "import b\n"),
        ("b.py", "import a\n"),
        ("m.py", "import m\n"),
        ("x.py", "def f():\n    import y\n"),
        ("y.py", "import x\n"),
    ]);

    assert_eq!(
        chains(&report),
        vec!["m -> m", "a -> b -> a", "x -> y -> x"]
    );
    let severities: Vec<Severity> = report.cycles.iter().map(|c| c.severity()).collect();
    assert_eq!(severities, vec![Severity::Critical, Severity::High, Severity::Medium]);
}

#[test]
fn packages_and_relative_imports_resolve() {
    let report = analyze_files(&[
        ("shop/__init__.py", ""),
        ("shop/models.py", "from .orders import Order\n"),
        ("shop/orders.py", "from . import models\n"),
    ]);

    assert_eq!(chains(&report), vec!["shop.models -> shop.orders -> shop.models"]);
    assert_eq!(report.cycles[0].severity(), Severity::High);
}

#[test]
fn parse_errors_are_diagnostics_not_failures() {
    let report = analyze_files(&[
        ("a.py", "import b\n"),
        ("b.py", "import a\n"),
        ("broken.py", "def oops(:\n    pass\n"),
    ]);

    assert_eq!(report.cycles.len(), 1);
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].kind, DiagnosticKind::Parse);
    assert!(report.to_string().contains("Warnings:"));
}

#[test]
fn escaping_relative_import_targets_the_sentinel() {
    let report = analyze_files(&[("main.py", "from .. import settings\n")]);

    let edges = report.edges();
    assert_eq!(edges.len(), 1);
    assert!(edges[0].to.is_external());
    assert_eq!(report.stats.synthetic_module_count, 1);
    assert!(report.is_acyclic());
    assert_eq!(report.diagnostics[0].kind, DiagnosticKind::UnresolvedRelative);
}

#[test]
fn external_imports_are_aggregated() {
    let report = analyze_files(&[
        ("a.py", "import os\nimport requests.adapters\n"),
        ("b.py", "import os\nfrom collections import OrderedDict\n"),
    ]);

    let specifiers: Vec<&str> = report
        .external_imports
        .iter()
        .map(|e| e.specifier.as_str())
        .collect();
    assert_eq!(specifiers, vec!["collections", "os", "requests.adapters"]);
    let os = &report.external_imports[1];
    assert_eq!(os.importers.len(), 2);
    assert_eq!(report.counters.edges_found, 0);
}

#[test]
fn default_and_custom_excludes_apply() {
    let temp = TempDir::new().unwrap();
    let root = create_test_project(
        &temp,
        &[
            ("app.py", "import legacy.old\n"),
            ("legacy/old.py", "import app\n"),
            ("tests/test_app.py", "import app\n"),
            (".venv/lib/site.py", "import app\n"),
        ],
    );

    let report = Analyzer::new().root(&root).analyze().unwrap();
    assert_eq!(report.counters.modules_found, 2);
    assert_eq!(report.cycles.len(), 1);

    let report = Analyzer::new()
        .root(&root)
        .exclude(["legacy/**"])
        .analyze()
        .unwrap();
    assert_eq!(report.counters.modules_found, 1);
    assert!(report.is_acyclic());
}

#[test]
fn max_cycle_length_bounds_reported_cycles() {
    let files = [
        ("a.py", "import b\n"),
        ("b.py", "import c\n"),
        ("c.py", "import d\n"),
        ("d.py", "import a\n"),
    ];
    let temp = TempDir::new().unwrap();
    let root = create_test_project(&temp, &files);

    let bounded = Analyzer::new()
        .root(&root)
        .max_cycle_length(Some(3))
        .analyze()
        .unwrap();
    assert!(bounded.is_acyclic());

    let full = Analyzer::new().root(&root).analyze().unwrap();
    assert_eq!(chains(&full), vec!["a -> b -> c -> d -> a"]);
    assert_eq!(full.cycles[0].severity(), Severity::Medium);
}

#[test]
fn repeated_runs_are_identical() {
    let temp = TempDir::new().unwrap();
    let root = create_test_project(
        &temp,
        &[
            ("a.py", "import b\nimport c\n"),
            ("b.py", "import a\nimport c\n"),
            ("c.py", "import a\n"),
        ],
    );

    let first = Analyzer::new().root(&root).analyze().unwrap();
    let second = Analyzer::new().root(&root).parallel(false).analyze().unwrap();
    assert_eq!(first.cycles, second.cycles);
    assert_eq!(first.edges(), second.edges());
}

#[test]
fn report_exports_round_trip() {
    let temp = TempDir::new().unwrap();
    let root = create_ring_project(&temp);
    let report = Analyzer::new().root(root).analyze().unwrap();

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["counters"]["cycles_found"], 1);
    assert_eq!(json["cycles"][0]["chain"], "a -> b -> c -> a");
    assert_eq!(json["cycles"][0]["suggestion"]["fix_type"], "extract-shared-module");

    let document = report.to_document();
    assert_eq!(document.cycles[0].fix_type, Some(FixType::ExtractSharedModule));
    let text = document.to_json().unwrap();
    let rebuilt = GraphDocument::from_json(&text).unwrap().into_graph().unwrap();
    assert_eq!(rebuilt.all_edges(), report.edges());

    let dot = report.to_dot();
    assert!(dot.contains("\"a\" -> \"b\" [color=red, penwidth=2];"));
}

#[test]
fn cancelled_run_reports_nothing() {
    let temp = TempDir::new().unwrap();
    let root = create_ring_project(&temp);
    let token = CancellationToken::new();
    token.cancel();

    let result = Analyzer::new().root(root).cancellation(token).analyze();
    assert!(matches!(result, Err(AnalyzeError::Cancelled)));
}

#[test]
fn missing_root_is_an_index_error() {
    let temp = TempDir::new().unwrap();
    let result = Analyzer::new().root(temp.path().join("nope")).analyze();
    assert!(matches!(
        result,
        Err(AnalyzeError::Index(IndexError::RootNotFound(_)))
    ));
}

#[test]
fn runtime_mode_requires_a_trace() {
    let temp = TempDir::new().unwrap();
    let root = create_ring_project(&temp);
    let result = Analyzer::new().root(root).mode(Mode::Runtime).analyze();
    assert!(matches!(result, Err(AnalyzeError::MissingTrace)));
}
