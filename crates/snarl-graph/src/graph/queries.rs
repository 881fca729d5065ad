//! Query methods for DependencyGraph.
//!
//! Every query returns owned, sorted data so callers never hold the lock and
//! output order does not depend on hash iteration order.

use std::sync::Arc;

use super::super::{ImportEdge, Module, ModuleId};
use super::DependencyGraph;

impl DependencyGraph {
    /// Look up a module by id.
    pub fn module(&self, id: &ModuleId) -> Option<Arc<Module>> {
        self.inner.read().modules.get(id).cloned()
    }

    pub fn contains(&self, id: &ModuleId) -> bool {
        self.inner.read().modules.contains_key(id)
    }

    /// All registered modules, sorted by id.
    pub fn all_modules(&self) -> Vec<Arc<Module>> {
        let inner = self.inner.read();
        let mut modules: Vec<_> = inner.modules.values().cloned().collect();
        modules.sort_by(|a, b| a.id.cmp(&b.id));
        modules
    }

    /// All edges, sorted by `(from, to, line, kind)`.
    pub fn all_edges(&self) -> Vec<ImportEdge> {
        let inner = self.inner.read();
        let mut edges: Vec<_> = inner.outgoing.values().flatten().cloned().collect();
        edges.sort();
        edges
    }

    /// Distinct modules imported by `id`, sorted.
    pub fn neighbors(&self, id: &ModuleId) -> Vec<ModuleId> {
        let inner = self.inner.read();
        let mut targets: Vec<ModuleId> = inner
            .outgoing
            .get(id)
            .map(|edges| edges.iter().map(|e| e.to.clone()).collect())
            .unwrap_or_default();
        targets.sort();
        targets.dedup();
        targets
    }

    /// Distinct modules importing `id`, sorted.
    pub fn dependents(&self, id: &ModuleId) -> Vec<ModuleId> {
        let inner = self.inner.read();
        let mut importers: Vec<ModuleId> = inner
            .incoming
            .get(id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        importers.sort();
        importers
    }

    /// Outgoing edges of `id`, sorted.
    pub fn edges_from(&self, id: &ModuleId) -> Vec<ImportEdge> {
        let inner = self.inner.read();
        let mut edges = inner.outgoing.get(id).cloned().unwrap_or_default();
        edges.sort();
        edges
    }

    /// Every edge for the `(from, to)` pair, ordered by line.
    pub fn edges_between(&self, from: &ModuleId, to: &ModuleId) -> Vec<ImportEdge> {
        let inner = self.inner.read();
        let mut edges: Vec<ImportEdge> = inner
            .outgoing
            .get(from)
            .map(|edges| edges.iter().filter(|e| &e.to == to).cloned().collect())
            .unwrap_or_default();
        edges.sort();
        edges
    }

    pub fn has_edge(&self, from: &ModuleId, to: &ModuleId) -> bool {
        self.inner
            .read()
            .outgoing
            .get(from)
            .is_some_and(|edges| edges.iter().any(|e| &e.to == to))
    }

    pub fn module_count(&self) -> usize {
        self.inner.read().modules.len()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.read().edge_keys.len()
    }

    /// Number of distinct modules `id` imports.
    pub fn fan_out(&self, id: &ModuleId) -> usize {
        self.neighbors(id).len()
    }

    /// Number of distinct modules importing `id`.
    pub fn fan_in(&self, id: &ModuleId) -> usize {
        self.inner
            .read()
            .incoming
            .get(id)
            .map_or(0, |set| set.len())
    }
}
