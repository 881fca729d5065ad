//! Canonical cycle representation.

use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::{DependencyGraph, Error, ImportEdge, ImportKind, ModuleId, Result};

/// An elementary cycle of modules.
///
/// Stored without the closing module: `[a, b, c]` means `a -> b -> c -> a`.
/// The sequence is rotated to start at its lexicographically smallest module,
/// so rotations of the same cycle compare equal and sort by that module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Cycle {
    modules: Vec<ModuleId>,
}

impl Cycle {
    /// Build a canonical cycle from modules in walk order.
    ///
    /// A single module is a self-import. Repeated modules are rejected since
    /// the cycle would not be elementary.
    pub fn new(modules: Vec<ModuleId>) -> Result<Self> {
        if modules.is_empty() {
            return Err(Error::InvalidCycle("cycle has no modules".to_string()));
        }

        let mut seen = FxHashSet::default();
        for module in &modules {
            if !seen.insert(module) {
                return Err(Error::InvalidCycle(format!(
                    "module '{module}' appears more than once"
                )));
            }
        }

        Ok(Self::canonical(modules))
    }

    /// Rotate so the smallest module comes first. Callers guarantee the
    /// input is non-empty and free of repeats.
    pub(crate) fn canonical(mut modules: Vec<ModuleId>) -> Self {
        if let Some(start) = modules
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.cmp(b.1))
            .map(|(idx, _)| idx)
        {
            modules.rotate_left(start);
        }
        Self { modules }
    }

    pub fn modules(&self) -> &[ModuleId] {
        &self.modules
    }

    /// Number of distinct modules (and of hops).
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn is_self_loop(&self) -> bool {
        self.modules.len() == 1
    }

    pub fn contains(&self, id: &ModuleId) -> bool {
        self.modules.contains(id)
    }

    /// `(from, to)` pairs in walk order, including the closing hop.
    pub fn hops(&self) -> Vec<(ModuleId, ModuleId)> {
        let n = self.modules.len();
        (0..n)
            .map(|i| (self.modules[i].clone(), self.modules[(i + 1) % n].clone()))
            .collect()
    }

    /// Render as `a -> b -> c -> a`.
    pub fn format_chain(&self) -> String {
        let mut parts: Vec<&str> = self.modules.iter().map(ModuleId::as_str).collect();
        if let Some(first) = self.modules.first() {
            parts.push(first.as_str());
        }
        parts.join(" -> ")
    }

    /// Attach the graph's edges to every hop.
    ///
    /// Returns `None` if some hop has no backing edge in `graph`.
    pub fn resolve(&self, graph: &DependencyGraph) -> Option<Vec<CycleHop>> {
        self.hops()
            .into_iter()
            .map(|(from, to)| {
                let edges = graph.edges_between(&from, &to);
                if edges.is_empty() {
                    None
                } else {
                    Some(CycleHop { from, to, edges })
                }
            })
            .collect()
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_chain())
    }
}

/// One step of a cycle with every parallel edge backing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleHop {
    pub from: ModuleId,
    pub to: ModuleId,
    /// Never empty; ordered by line.
    pub edges: Vec<ImportEdge>,
}

impl CycleHop {
    /// The most load-bearing kind among the parallel edges.
    pub fn effective_kind(&self) -> ImportKind {
        self.edges
            .iter()
            .map(|e| e.kind)
            .max_by_key(|k| k.weight())
            .unwrap_or(ImportKind::Absolute)
    }

    /// First call site, used when citing the hop in suggestions.
    pub fn primary_edge(&self) -> Option<&ImportEdge> {
        self.edges.first()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::Module;

    fn ids(names: &[&str]) -> Vec<ModuleId> {
        names.iter().map(|n| ModuleId::new(n).unwrap()).collect()
    }

    #[test]
    fn rotations_canonicalize_equal() {
        let a = Cycle::new(ids(&["b", "c", "a"])).unwrap();
        let b = Cycle::new(ids(&["c", "a", "b"])).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.modules(), ids(&["a", "b", "c"]).as_slice());
    }

    #[test]
    fn reversed_walk_is_a_different_cycle() {
        let forward = Cycle::new(ids(&["a", "b", "c"])).unwrap();
        let backward = Cycle::new(ids(&["a", "c", "b"])).unwrap();
        assert_ne!(forward, backward);
    }

    #[test]
    fn rejects_empty_and_repeats() {
        assert!(Cycle::new(Vec::new()).is_err());
        assert!(Cycle::new(ids(&["a", "b", "a"])).is_err());
    }

    #[test]
    fn chain_and_hops_close_the_loop() {
        let cycle = Cycle::new(ids(&["a", "b", "c"])).unwrap();
        assert_eq!(cycle.format_chain(), "a -> b -> c -> a");
        let hops = cycle.hops();
        assert_eq!(hops.len(), 3);
        assert_eq!(hops[2], (ModuleId::new("c").unwrap(), ModuleId::new("a").unwrap()));

        let selfie = Cycle::new(ids(&["solo"])).unwrap();
        assert!(selfie.is_self_loop());
        assert_eq!(selfie.format_chain(), "solo -> solo");
    }

    #[test]
    fn resolve_collects_parallel_edges() {
        let graph = DependencyGraph::from_modules(
            ids(&["a", "b"])
                .into_iter()
                .map(|id| Module::builder(id, PathBuf::from("x.py")).build()),
        );
        let (a, b) = (ModuleId::new("a").unwrap(), ModuleId::new("b").unwrap());
        graph
            .add_edge(ImportEdge::new(a.clone(), b.clone(), "a.py", 4, ImportKind::Deferred))
            .unwrap();
        graph
            .add_edge(ImportEdge::new(a.clone(), b.clone(), "a.py", 1, ImportKind::Absolute))
            .unwrap();

        let cycle = Cycle::new(vec![a.clone(), b.clone()]).unwrap();
        assert!(cycle.resolve(&graph).is_none());

        graph
            .add_edge(ImportEdge::new(b, a, "b.py", 2, ImportKind::Star))
            .unwrap();
        let hops = cycle.resolve(&graph).unwrap();
        assert_eq!(hops[0].edges.len(), 2);
        assert_eq!(hops[0].primary_edge().map(|e| e.line), Some(1));
        assert_eq!(hops[0].effective_kind(), ImportKind::Absolute);
        assert_eq!(hops[1].effective_kind(), ImportKind::Star);
    }
}
