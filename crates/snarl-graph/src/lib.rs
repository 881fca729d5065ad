//! # snarl-graph
//!
//! Pure graph data structures and cycle analysis for module import graphs.
//!
//! This crate provides the `DependencyGraph` model and the algorithms that
//! reason over it, without any file-system or parser logic. Extraction of
//! import edges from source trees (or from a live import trace) lives in
//! `snarl-analysis`; this crate only receives modules and edges.
//!
//! ## Overview
//!
//! - **Graph model**: [`Module`] nodes, [`ImportEdge`] edges with kind and
//!   call-site metadata, append-only during a run
//! - **Cycle detection**: Tarjan SCC decomposition followed by bounded
//!   elementary-cycle enumeration ([`CycleDetector`])
//! - **Severity**: rule-based, recomputed on demand ([`severity`])
//! - **Fix suggestions**: one refactoring pattern per cycle ([`suggestion`])
//! - **Export**: JSON node/edge documents and DOT ([`export`])
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     DependencyGraph                      │
//! │        (Arc<RwLock>, append-only, reverse index)         │
//! └──────────────────────────┬───────────────────────────────┘
//!                            │
//!                            ▼
//!                  ┌───────────────────┐
//!                  │   CycleDetector   │  Tarjan → Johnson / shortest
//!                  └─────────┬─────────┘
//!                            │
//!              ┌─────────────┴─────────────┐
//!              ▼                           ▼
//!    ┌──────────────────┐      ┌──────────────────────────┐
//!    │ severity::assess │      │ FixSuggestionSynthesizer │
//!    └──────────────────┘      └──────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use snarl_graph::{CycleDetector, DependencyGraph, ImportEdge, ImportKind, Module, ModuleId};
//! use std::path::PathBuf;
//!
//! # fn main() -> snarl_graph::Result<()> {
//! let graph = DependencyGraph::new();
//! let a = ModuleId::new("a")?;
//! let b = ModuleId::new("b")?;
//!
//! graph.add_module(Module::builder(a.clone(), PathBuf::from("a.py")).build());
//! graph.add_module(Module::builder(b.clone(), PathBuf::from("b.py")).build());
//! graph.add_edge(ImportEdge::new(a.clone(), b.clone(), "a.py", 1, ImportKind::Absolute))?;
//! graph.add_edge(ImportEdge::new(b.clone(), a.clone(), "b.py", 1, ImportKind::Absolute))?;
//!
//! let detection = CycleDetector::new().detect(&graph);
//! assert_eq!(detection.cycles.len(), 1);
//! assert_eq!(detection.cycles[0].cycle.format_chain(), "a -> b -> a");
//! # Ok(())
//! # }
//! ```
//!
//! ## Thread Safety
//!
//! `DependencyGraph` wraps its state in `Arc<parking_lot::RwLock<_>>`.
//! Clones share the same graph, concurrent readers never block each other,
//! and insertions take a single write lock.

pub mod cycle;
pub mod detector;
pub mod edge;
pub mod export;
pub mod external_dep;
mod graph;
pub mod module;
pub mod module_id;
pub mod severity;
pub mod statistics;
pub mod suggestion;

pub use cycle::{Cycle, CycleHop};
pub use detector::{CycleDetection, CycleDetector, DetectedCycle, Truncation, TruncationReason};
pub use edge::{ImportEdge, ImportKind};
pub use export::{CycleRecord, GraphDocument, to_dot};
pub use external_dep::ExternalImport;
pub use graph::DependencyGraph;
pub use module::{Module, ModuleBuilder};
pub use module_id::{ModuleId, ModuleIdError};
pub use severity::{Severity, SeverityAssessment};
pub use statistics::GraphStatistics;
pub use suggestion::{FixSuggestion, FixSuggestionSynthesizer, FixType, SuggestionPolicy};

/// Error types for graph operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An edge referenced a module that was never registered.
    #[error("unknown module '{0}': register the module before adding edges to it")]
    UnknownModule(ModuleId),

    /// A dotted module name failed validation.
    #[error(transparent)]
    InvalidModuleId(#[from] ModuleIdError),

    /// A module sequence cannot form a cycle.
    #[error("invalid cycle: {0}")]
    InvalidCycle(String),

    /// Interchange document was written by an incompatible version.
    #[error("incompatible graph document version: expected {expected}, found {found}")]
    IncompatibleFormat { expected: u32, found: u32 },

    /// Interchange document could not be (de)serialized.
    #[error("export error: {0}")]
    Export(#[from] serde_json::Error),
}

/// Result type alias for graph operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests;
