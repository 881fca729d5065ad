//! Mutation methods for DependencyGraph.

use std::sync::Arc;

use super::super::{Error, ImportEdge, Module, Result};
use super::DependencyGraph;

impl DependencyGraph {
    /// Register a module.
    ///
    /// Modules are immutable once registered: returns `false` and keeps the
    /// existing entry when the id is already present.
    pub fn add_module(&self, module: Module) -> bool {
        let mut inner = self.inner.write();
        if inner.modules.contains_key(&module.id) {
            return false;
        }
        inner.modules.insert(module.id.clone(), Arc::new(module));
        true
    }

    /// Add an import edge, updating the reverse index.
    ///
    /// Idempotent for a repeated `(from, to, line)` triple (returns
    /// `Ok(false)`), additive for distinct lines. Both endpoints must already
    /// be registered.
    pub fn add_edge(&self, edge: ImportEdge) -> Result<bool> {
        let mut inner = self.inner.write();

        for endpoint in [&edge.from, &edge.to] {
            if !inner.modules.contains_key(endpoint) {
                return Err(Error::UnknownModule(endpoint.clone()));
            }
        }

        if !inner.edge_keys.insert(edge.key()) {
            return Ok(false);
        }

        inner
            .incoming
            .entry(edge.to.clone())
            .or_default()
            .insert(edge.from.clone());
        inner
            .outgoing
            .entry(edge.from.clone())
            .or_default()
            .push(edge);

        Ok(true)
    }

    /// Add several edges, returning how many were new.
    pub fn extend_edges<I>(&self, edges: I) -> Result<usize>
    where
        I: IntoIterator<Item = ImportEdge>,
    {
        let mut added = 0;
        for edge in edges {
            if self.add_edge(edge)? {
                added += 1;
            }
        }
        Ok(added)
    }
}
