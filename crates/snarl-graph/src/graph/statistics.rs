//! Statistics methods for DependencyGraph.

use rustc_hash::{FxHashMap, FxHashSet};

use super::super::GraphStatistics;
use super::DependencyGraph;

impl DependencyGraph {
    /// Compute a statistics snapshot under one read lock.
    pub fn statistics(&self) -> GraphStatistics {
        let inner = self.inner.read();

        let package_count = inner
            .modules
            .values()
            .filter_map(|m| m.package.as_ref())
            .collect::<FxHashSet<_>>()
            .len();
        let synthetic_module_count = inner.modules.values().filter(|m| m.is_synthetic).count();

        let mut self_import_count = 0;
        let mut load_time_edge_count = 0;
        let mut fan_out: FxHashMap<_, FxHashSet<_>> = FxHashMap::default();
        for edge in inner.outgoing.values().flatten() {
            if edge.is_self_import() {
                self_import_count += 1;
            }
            if edge.kind.is_load_time() {
                load_time_edge_count += 1;
            }
            fan_out.entry(&edge.from).or_default().insert(&edge.to);
        }

        GraphStatistics {
            module_count: inner.modules.len(),
            edge_count: inner.edge_keys.len(),
            package_count,
            synthetic_module_count,
            self_import_count,
            load_time_edge_count,
            max_fan_in: inner.incoming.values().map(|s| s.len()).max().unwrap_or(0),
            max_fan_out: fan_out.values().map(|s| s.len()).max().unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::{DependencyGraph, ImportEdge, ImportKind, Module, ModuleId};

    #[test]
    fn counts_packages_and_edges() {
        let id = |n: &str| ModuleId::new(n).unwrap();
        let graph = DependencyGraph::new();
        graph.add_module(Module::builder(id("pkg"), PathBuf::from("pkg/__init__.py")).is_package(true).build());
        graph.add_module(Module::builder(id("pkg.a"), PathBuf::from("pkg/a.py")).build());
        graph.add_module(Module::builder(id("tool"), PathBuf::from("tool.py")).build());
        graph.add_module(Module::external_sentinel());

        for (from, to, line, kind) in [
            ("pkg.a", "pkg.a", 1, ImportKind::Absolute),
            ("pkg.a", "tool", 2, ImportKind::Deferred),
            ("tool", "pkg", 1, ImportKind::Star),
            ("tool", "<external>", 2, ImportKind::Relative),
        ] {
            graph
                .add_edge(ImportEdge::new(id(from), id(to), "x.py", line, kind))
                .unwrap();
        }

        let stats = graph.statistics();
        assert_eq!(stats.module_count, 4);
        assert_eq!(stats.edge_count, 4);
        assert_eq!(stats.package_count, 1);
        assert_eq!(stats.synthetic_module_count, 1);
        assert_eq!(stats.self_import_count, 1);
        assert_eq!(stats.load_time_edge_count, 3);
        assert_eq!(stats.max_fan_out, 2);
        assert_eq!(stats.max_fan_in, 1);
    }
}
