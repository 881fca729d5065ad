//! Interchange formats: a JSON node/edge document and DOT.
//!
//! Both are pure functions of a graph and its cycles.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::{
    Cycle, CycleDetection, DependencyGraph, Error, FixType, ImportEdge, ImportKind, Module,
    ModuleId, Result, Severity,
};

/// Current JSON document version.
pub const FORMAT_VERSION: u32 = 1;

/// Node/edge list document for external tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub version: u32,
    pub modules: Vec<Module>,
    pub edges: Vec<ImportEdge>,
    #[serde(default)]
    pub cycles: Vec<CycleRecord>,
}

/// A reported cycle inside a [`GraphDocument`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleRecord {
    /// Canonical order, without the closing module.
    pub modules: Vec<ModuleId>,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_type: Option<FixType>,
}

impl GraphDocument {
    /// Snapshot every module and edge, sorted.
    pub fn from_graph(graph: &DependencyGraph) -> Self {
        Self {
            version: FORMAT_VERSION,
            modules: graph.all_modules().iter().map(|m| Module::clone(m)).collect(),
            edges: graph.all_edges(),
            cycles: Vec::new(),
        }
    }

    /// Attach detected cycles without fix types.
    pub fn with_cycles(mut self, detection: &CycleDetection) -> Self {
        self.cycles = detection
            .cycles
            .iter()
            .map(|c| CycleRecord {
                modules: c.cycle.modules().to_vec(),
                severity: c.severity(),
                fix_type: None,
            })
            .collect();
        self
    }

    pub fn with_cycle_records(mut self, records: Vec<CycleRecord>) -> Self {
        self.cycles = records;
        self
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let document: Self = serde_json::from_str(json)?;
        if document.version != FORMAT_VERSION {
            return Err(Error::IncompatibleFormat {
                expected: FORMAT_VERSION,
                found: document.version,
            });
        }
        Ok(document)
    }

    /// Rebuild a graph. Fails if an edge references a module missing from
    /// the document.
    pub fn into_graph(self) -> Result<DependencyGraph> {
        let graph = DependencyGraph::from_modules(self.modules);
        graph.extend_edges(self.edges)?;
        Ok(graph)
    }
}

/// Escape a label for a double-quoted DOT identifier.
fn escape_label(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Render the graph as DOT.
///
/// Modules are clustered by package. Edges between the same pair are drawn
/// once using the most load-bearing kind: soft edges are dashed, edges on a
/// reported cycle are red.
pub fn to_dot(graph: &DependencyGraph, cycles: &[Cycle]) -> String {
    let cycle_hops: FxHashSet<(ModuleId, ModuleId)> =
        cycles.iter().flat_map(|c| c.hops()).collect();

    let mut out = String::from("digraph imports {\n");
    out.push_str("    rankdir=LR;\n");
    out.push_str("    node [shape=box, fontname=\"Helvetica\"];\n");

    let mut packages: BTreeMap<Option<ModuleId>, Vec<ModuleId>> = BTreeMap::new();
    for module in graph.all_modules() {
        packages
            .entry(module.package.clone())
            .or_default()
            .push(module.id.clone());
    }

    for (package, members) in &packages {
        match package {
            Some(package) => {
                let name = escape_label(package.as_str());
                let _ = writeln!(out, "    subgraph \"cluster_{name}\" {{");
                let _ = writeln!(out, "        label=\"{name}\";");
                for id in members {
                    let _ = writeln!(out, "        \"{}\";", escape_label(id.as_str()));
                }
                out.push_str("    }\n");
            }
            None => {
                for id in members {
                    let _ = writeln!(out, "    \"{}\";", escape_label(id.as_str()));
                }
            }
        }
    }

    let mut pairs: BTreeMap<(ModuleId, ModuleId), ImportKind> = BTreeMap::new();
    for edge in graph.all_edges() {
        pairs
            .entry((edge.from.clone(), edge.to.clone()))
            .and_modify(|kind| {
                if edge.kind.weight() > kind.weight() {
                    *kind = edge.kind;
                }
            })
            .or_insert(edge.kind);
    }

    for ((from, to), kind) in &pairs {
        let mut attrs = Vec::new();
        if cycle_hops.contains(&(from.clone(), to.clone())) {
            attrs.push("color=red".to_string());
            attrs.push("penwidth=2".to_string());
        }
        if kind.is_soft() {
            attrs.push("style=dashed".to_string());
            attrs.push(format!("label=\"{kind}\""));
        }
        let _ = write!(
            out,
            "    \"{}\" -> \"{}\"",
            escape_label(from.as_str()),
            escape_label(to.as_str())
        );
        if !attrs.is_empty() {
            let _ = write!(out, " [{}]", attrs.join(", "));
        }
        out.push_str(";\n");
    }

    out.push_str("}\n");
    out
}
