//! Smoke tests for snarl-graph.
//!
//! Fast, deterministic end-to-end checks of the detection pipeline on small
//! hand-built graphs. Randomized invariants live in property_tests.rs.

use std::path::PathBuf;

use crate::{
    CycleDetector, DependencyGraph, FixSuggestionSynthesizer, FixType, GraphDocument,
    ImportEdge, ImportKind, Module, ModuleId, Severity,
};

fn id(name: &str) -> ModuleId {
    ModuleId::new(name).expect("valid module id")
}

fn build(modules: &[&str], edges: &[(&str, &str, usize, ImportKind)]) -> DependencyGraph {
    let graph = DependencyGraph::from_modules(
        modules
            .iter()
            .map(|n| Module::builder(id(n), PathBuf::from(format!("{n}.py"))).build()),
    );
    for (from, to, line, kind) in edges {
        graph
            .add_edge(ImportEdge::new(id(from), id(to), format!("{from}.py"), *line, *kind))
            .expect("endpoints registered");
    }
    graph
}

#[test]
fn test_three_module_ring() {
    let graph = build(
        &["a", "b", "c"],
        &[
            ("a", "b", 1, ImportKind::Absolute),
            ("b", "c", 1, ImportKind::Absolute),
            ("c", "a", 1, ImportKind::Absolute),
        ],
    );

    let detection = CycleDetector::new().detect(&graph);
    assert_eq!(detection.cycles.len(), 1);

    let found = &detection.cycles[0];
    assert_eq!(found.cycle.modules(), &[id("a"), id("b"), id("c")]);
    assert_eq!(found.severity(), Severity::High);

    let suggestion = FixSuggestionSynthesizer::new().synthesize(
        &found.cycle,
        &found.hops,
        &found.assessment,
        &graph,
    );
    assert_eq!(suggestion.fix_type, FixType::ExtractSharedModule);
}

#[test]
fn test_function_local_import_still_forms_cycle() {
    let graph = build(
        &["a", "b"],
        &[
            ("a", "b", 5, ImportKind::Deferred),
            ("b", "a", 1, ImportKind::Absolute),
        ],
    );

    let detection = CycleDetector::new().detect(&graph);
    assert_eq!(detection.cycles.len(), 1);
    assert_eq!(detection.cycles[0].severity(), Severity::Medium);
    assert_eq!(detection.cycles[0].assessment.soft_hops, 1);
}

#[test]
fn test_self_import() {
    let graph = build(&["solo"], &[("solo", "solo", 3, ImportKind::Conditional)]);
    let detection = CycleDetector::new().detect(&graph);
    assert_eq!(detection.cycles.len(), 1);
    assert!(detection.cycles[0].cycle.is_self_loop());
    assert_eq!(detection.cycles[0].severity(), Severity::Critical);
}

#[test]
fn test_external_sentinel_never_cycles() {
    let graph = build(&["pkg.a", "pkg.b"], &[("pkg.a", "pkg.b", 1, ImportKind::Absolute)]);
    graph.add_module(Module::external_sentinel());
    for from in ["pkg.a", "pkg.b"] {
        graph
            .add_edge(ImportEdge::new(
                id(from),
                ModuleId::external(),
                format!("{from}.py"),
                2,
                ImportKind::Relative,
            ))
            .expect("sentinel registered");
    }

    assert!(CycleDetector::new().detect(&graph).is_empty());
    assert_eq!(graph.dependents(&ModuleId::external()).len(), 2);
}

#[test]
fn test_document_round_trip_after_detection() {
    let graph = build(
        &["x", "y", "z"],
        &[
            ("x", "y", 1, ImportKind::Star),
            ("y", "x", 1, ImportKind::Absolute),
            ("y", "z", 2, ImportKind::Absolute),
        ],
    );
    let detection = CycleDetector::new().detect(&graph);
    assert_eq!(detection.cycles[0].severity(), Severity::Critical);

    let json = GraphDocument::from_graph(&graph)
        .with_cycles(&detection)
        .to_json()
        .expect("serialize");
    let rebuilt = GraphDocument::from_json(&json)
        .and_then(GraphDocument::into_graph)
        .expect("rebuild");

    let again = CycleDetector::new().detect(&rebuilt);
    assert_eq!(again.cycles, detection.cycles);
}
