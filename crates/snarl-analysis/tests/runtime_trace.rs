mod common;

use common::{chains, create_test_project};
use snarl_analysis::snarl_graph::{ImportKind, ModuleId, Severity};
use snarl_analysis::{
    Analyzer, ForwardingHook, Mode, RuntimeImportTracer, TraceLog, TraceSetupError,
};
use tempfile::TempDir;

fn id(name: &str) -> ModuleId {
    ModuleId::new(name).unwrap()
}

/// `y` starts loading, imports `x`, and `x` imports `y` back before `y`
/// has finished.
fn reentrant_trace() -> TraceLog {
    let hook = ForwardingHook::new();
    let tracer = RuntimeImportTracer::new(hook.clone());
    let ((), log) = tracer
        .trace(|| {
            hook.start("y", None);
            hook.start("x", Some("y"));
            hook.start("y", Some("x"));
            hook.end("y");
            hook.end("x");
            hook.end("y");
        })
        .unwrap();
    log
}

#[test]
fn reentrant_import_is_flagged_and_becomes_an_edge() {
    let log = reentrant_trace();

    let reentrant: Vec<_> = log.reentrant().collect();
    assert_eq!(reentrant.len(), 1);
    assert_eq!(reentrant[0].imported, id("y"));
    assert_eq!(reentrant[0].importer, Some(id("x")));
    assert!(reentrant[0].in_progress);
    assert_eq!(reentrant[0].depth, 2);

    let graph = log.to_graph().unwrap();
    assert!(graph.has_edge(&id("x"), &id("y")));
    assert!(graph.has_edge(&id("y"), &id("x")));
    assert_eq!(graph.edges_between(&id("x"), &id("y"))[0].kind, ImportKind::Absolute);
}

#[test]
fn runtime_mode_reports_the_observed_cycle() {
    let temp = TempDir::new().unwrap();
    let root = create_test_project(&temp, &[("x.py", ""), ("y.py", "")]);

    let report = Analyzer::new()
        .root(root)
        .mode(Mode::Runtime)
        .trace_log(reentrant_trace())
        .analyze()
        .unwrap();

    assert_eq!(chains(&report), vec!["x -> y -> x"]);
    assert_eq!(report.cycles[0].severity(), Severity::High);
    let edge = &report.edges()[0];
    assert_eq!(edge.line, 0);
    assert!(edge.file.ends_with("x.py"));
}

#[test]
fn both_mode_adds_only_edges_the_parser_missed() {
    let temp = TempDir::new().unwrap();
    let root = create_test_project(
        &temp,
        &[
            ("a.py", "import b\n"),
            ("b.py", "import importlib\nA = importlib.import_module('a')\n"),
        ],
    );

    let hook = ForwardingHook::new();
    let tracer = RuntimeImportTracer::new(hook.clone());
    let ((), log) = tracer
        .trace(|| {
            hook.start("a", None);
            hook.start("b", Some("a"));
            hook.start("importlib", Some("b"));
            hook.end("importlib");
            hook.start("a", Some("b"));
            hook.end("a");
            hook.end("b");
            hook.end("a");
        })
        .unwrap();

    let report = Analyzer::new()
        .root(&root)
        .mode(Mode::Both)
        .trace_log(log.clone())
        .analyze()
        .unwrap();

    let edges = report.edges();
    assert_eq!(edges.len(), 2);
    // a -> b keeps its static call site
    assert_eq!(edges[0].from, id("a"));
    assert_eq!(edges[0].line, 1);
    // b -> a only exists at runtime
    assert_eq!(edges[1].from, id("b"));
    assert_eq!(edges[1].line, 0);
    assert_eq!(chains(&report), vec!["a -> b -> a"]);

    let importlib = report
        .external_imports
        .iter()
        .find(|e| e.specifier == "importlib")
        .unwrap();
    assert_eq!(importlib.importers, vec![id("b")]);

    let static_only = Analyzer::new().root(&root).analyze().unwrap();
    assert!(static_only.is_acyclic());
}

#[test]
fn late_runtime_imports_are_deferred() {
    let temp = TempDir::new().unwrap();
    let root = create_test_project(&temp, &[("a.py", ""), ("b.py", "")]);

    let hook = ForwardingHook::new();
    let tracer = RuntimeImportTracer::new(hook.clone());
    let ((), log) = tracer
        .trace(|| {
            hook.start("a", None);
            hook.start("b", Some("a"));
            hook.end("b");
            hook.end("a");
            // a function in b runs after both finished loading
            hook.start("a", Some("b"));
            hook.end("a");
        })
        .unwrap();

    let report = Analyzer::new()
        .root(root)
        .mode(Mode::Runtime)
        .trace_log(log)
        .analyze()
        .unwrap();

    assert_eq!(report.cycles.len(), 1);
    assert_eq!(report.cycles[0].severity(), Severity::Medium);
}

#[test]
fn second_session_on_a_busy_hook_fails() {
    let hook = ForwardingHook::new();
    let first = RuntimeImportTracer::new(hook.clone());
    let second = RuntimeImportTracer::new(hook.clone());

    let session = first.start().unwrap();
    assert!(matches!(
        second.start(),
        Err(TraceSetupError::HookRejected { .. })
    ));
    assert!(!second.is_active());
    drop(session);
    assert!(second.start().is_ok());
}

#[test]
fn trace_log_survives_json() {
    let log = reentrant_trace();
    let json = serde_json::to_string(&log).unwrap();
    let parsed: TraceLog = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, log);
}
