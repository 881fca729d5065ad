//! In-memory DependencyGraph implementation.
//!
//! Storage is a set of hash maps behind one `RwLock`: modules by id, outgoing
//! edges per module, a reverse index of importers, and the set of edge keys
//! used to keep `add_edge` idempotent. Method groups live in the submodules
//! as separate `impl DependencyGraph` blocks.

mod mutations;
mod queries;
mod statistics;
mod traversal;

pub(crate) use traversal::Adjacency;

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};

use super::{ImportEdge, Module, ModuleId};

/// Directed import graph: modules as nodes, import edges with metadata.
///
/// The graph is append-only. There is no removal operation; build a fresh
/// graph per analysis run.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    pub(crate) inner: Arc<RwLock<GraphInner>>,
}

#[derive(Debug, Default)]
pub(crate) struct GraphInner {
    pub(crate) modules: FxHashMap<ModuleId, Arc<Module>>,
    pub(crate) outgoing: FxHashMap<ModuleId, Vec<ImportEdge>>,
    pub(crate) incoming: FxHashMap<ModuleId, FxHashSet<ModuleId>>,
    pub(crate) edge_keys: FxHashSet<(ModuleId, ModuleId, usize)>,
}

impl DependencyGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a graph from modules (without edges).
    pub fn from_modules<I>(modules: I) -> Self
    where
        I: IntoIterator<Item = Module>,
    {
        let graph = Self::new();
        for module in modules {
            graph.add_module(module);
        }
        graph
    }
}
