//! Traversal methods for DependencyGraph.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};

use super::super::ModuleId;
use super::DependencyGraph;

/// Dense index view of the graph used by the cycle algorithms.
///
/// `ids[i]` is the module at index `i`; `successors[i]` holds the distinct
/// targets of its outgoing edges. Both are sorted so index order matches
/// lexicographic module order.
#[derive(Debug, Clone)]
pub(crate) struct Adjacency {
    pub(crate) ids: Vec<ModuleId>,
    pub(crate) successors: Vec<Vec<usize>>,
}

impl DependencyGraph {
    /// Whether `to` can be reached from `from` along import edges.
    ///
    /// A module trivially reaches itself when it is registered.
    pub fn reachable(&self, from: &ModuleId, to: &ModuleId) -> bool {
        let inner = self.inner.read();
        if !inner.modules.contains_key(from) {
            return false;
        }
        if from == to {
            return true;
        }

        let mut visited = FxHashSet::default();
        let mut queue = VecDeque::new();
        visited.insert(from);
        queue.push_back(from);

        while let Some(current) = queue.pop_front() {
            let Some(edges) = inner.outgoing.get(current) else {
                continue;
            };
            for edge in edges {
                if &edge.to == to {
                    return true;
                }
                if visited.insert(&edge.to) {
                    queue.push_back(&edge.to);
                }
            }
        }

        false
    }

    /// Every module reachable from `id`, excluding `id` itself unless it
    /// sits on a cycle. Sorted.
    pub fn transitive_dependencies(&self, id: &ModuleId) -> Vec<ModuleId> {
        let inner = self.inner.read();
        let mut visited: FxHashSet<&ModuleId> = FxHashSet::default();
        let mut stack: Vec<&ModuleId> = vec![id];

        while let Some(current) = stack.pop() {
            let Some(edges) = inner.outgoing.get(current) else {
                continue;
            };
            for edge in edges {
                if visited.insert(&edge.to) {
                    stack.push(&edge.to);
                }
            }
        }

        let mut out: Vec<ModuleId> = visited.into_iter().cloned().collect();
        out.sort();
        out
    }

    /// Snapshot the graph as dense indices under a single read lock.
    pub(crate) fn adjacency(&self) -> Adjacency {
        let inner = self.inner.read();

        let mut ids: Vec<ModuleId> = inner.modules.keys().cloned().collect();
        ids.sort();
        let index: FxHashMap<&ModuleId, usize> =
            ids.iter().enumerate().map(|(i, id)| (id, i)).collect();

        let successors = ids
            .iter()
            .map(|id| {
                let mut targets: Vec<usize> = inner
                    .outgoing
                    .get(id)
                    .map(|edges| {
                        edges
                            .iter()
                            .filter_map(|e| index.get(&e.to).copied())
                            .collect()
                    })
                    .unwrap_or_default();
                targets.sort_unstable();
                targets.dedup();
                targets
            })
            .collect();

        Adjacency { ids, successors }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::{DependencyGraph, ImportEdge, ImportKind, Module, ModuleId};

    fn id(name: &str) -> ModuleId {
        ModuleId::new(name).unwrap()
    }

    fn chain(names: &[&str], edges: &[(&str, &str)]) -> DependencyGraph {
        let graph = DependencyGraph::from_modules(
            names
                .iter()
                .map(|n| Module::builder(id(n), PathBuf::from(format!("{n}.py"))).build()),
        );
        for (line, (from, to)) in edges.iter().enumerate() {
            graph
                .add_edge(ImportEdge::new(id(from), id(to), "x.py", line + 1, ImportKind::Absolute))
                .unwrap();
        }
        graph
    }

    #[test]
    fn reachability_follows_direction() {
        let graph = chain(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        assert!(graph.reachable(&id("a"), &id("c")));
        assert!(!graph.reachable(&id("c"), &id("a")));
        assert!(graph.reachable(&id("b"), &id("b")));
        assert!(!graph.reachable(&id("zzz"), &id("a")));
    }

    #[test]
    fn transitive_dependencies_include_self_only_on_cycle() {
        let graph = chain(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        assert_eq!(graph.transitive_dependencies(&id("a")), vec![id("b"), id("c")]);

        let cyclic = chain(&["a", "b"], &[("a", "b"), ("b", "a")]);
        assert_eq!(cyclic.transitive_dependencies(&id("a")), vec![id("a"), id("b")]);
    }

    #[test]
    fn adjacency_uses_sorted_indices() {
        let graph = chain(&["c", "a", "b"], &[("c", "a"), ("a", "b"), ("a", "b")]);
        let adj = graph.adjacency();
        assert_eq!(adj.ids, vec![id("a"), id("b"), id("c")]);
        assert_eq!(adj.successors, vec![vec![1], vec![], vec![0]]);
    }
}
