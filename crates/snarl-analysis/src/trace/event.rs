use std::path::PathBuf;
use std::time::Duration;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use snarl_graph::{DependencyGraph, ImportEdge, ImportKind, Module, ModuleId};

/// One observed module load, in observation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEvent {
    /// Position in the session's log, starting at 0.
    pub sequence: u64,
    /// Module whose code triggered the load; `None` for top-level loads.
    pub importer: Option<ModuleId>,
    pub imported: ModuleId,
    /// Time since the session started.
    pub elapsed: Duration,
    /// Loads in progress when this one started.
    pub depth: usize,
    /// `imported` was already loading: a re-entrant import, the runtime
    /// signature of a cycle.
    pub in_progress: bool,
    /// `importer` was still executing its own module body.
    pub importer_loading: bool,
}

impl TraceEvent {
    /// Kind of the edge this event implies.
    pub fn edge_kind(&self) -> ImportKind {
        if self.importer_loading {
            ImportKind::Absolute
        } else {
            ImportKind::Deferred
        }
    }
}

/// Event log captured by one trace session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceLog {
    pub events: Vec<TraceEvent>,
}

impl TraceLog {
    pub fn new(events: Vec<TraceEvent>) -> Self {
        Self { events }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events that re-entered a module still loading.
    pub fn reentrant(&self) -> impl Iterator<Item = &TraceEvent> {
        self.events.iter().filter(|e| e.in_progress)
    }

    /// Every module seen as importer or imported, sorted.
    pub fn modules(&self) -> Vec<ModuleId> {
        let mut modules: Vec<ModuleId> = self
            .events
            .iter()
            .flat_map(|e| e.importer.iter().chain(std::iter::once(&e.imported)))
            .cloned()
            .collect();
        modules.sort();
        modules.dedup();
        modules
    }

    /// One edge per observed (importer, imported) pair, sorted.
    ///
    /// A pair seen both while its importer was loading and later is
    /// recorded as load-time. Runtime edges carry no source location.
    pub fn edges(&self) -> Vec<ImportEdge> {
        let mut pairs: FxHashMap<(ModuleId, ModuleId), ImportKind> = FxHashMap::default();
        for event in &self.events {
            let Some(importer) = &event.importer else {
                continue;
            };
            let kind = event.edge_kind();
            pairs
                .entry((importer.clone(), event.imported.clone()))
                .and_modify(|k| {
                    if kind.weight() > k.weight() {
                        *k = kind;
                    }
                })
                .or_insert(kind);
        }

        let mut edges: Vec<ImportEdge> = pairs
            .into_iter()
            .map(|((from, to), kind)| ImportEdge::new(from, to, PathBuf::new(), 0, kind))
            .collect();
        edges.sort();
        edges
    }

    /// Graph derived from the log alone. Modules are synthetic since no
    /// source file backs them.
    pub fn to_graph(&self) -> snarl_graph::Result<DependencyGraph> {
        let graph = DependencyGraph::from_modules(
            self.modules()
                .into_iter()
                .map(|id| Module::builder(id, PathBuf::new()).synthetic(true).build()),
        );
        graph.extend_edges(self.edges())?;
        Ok(graph)
    }
}
