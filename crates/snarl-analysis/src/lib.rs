//! # snarl-analysis
//!
//! Builds import graphs for Python source trees and reports their cycles.
//!
//! Two capture modes feed one [`DependencyGraph`](snarl_graph::DependencyGraph):
//!
//! - **static**: [`SourceModuleIndex`] maps `.py` files to dotted module
//!   names and [`StaticImportExtractor`] parses each file with tree-sitter,
//!   tagging every import with where it executes (module level,
//!   conditional, deferred).
//! - **runtime**: a [`RuntimeImportTracer`] session records the loads a
//!   host actually performs, including re-entrant ones, into a
//!   [`TraceLog`].
//!
//! [`Analyzer`] ties them together and returns an [`AnalysisReport`].
//!
//! ```rust,no_run
//! use snarl_analysis::Analyzer;
//!
//! # fn main() -> snarl_analysis::Result<()> {
//! let report = Analyzer::new().root("./myproject").analyze()?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
mod cancel;
pub mod config;
mod diagnostics;
mod error;
pub mod extract;
pub mod index;
pub mod report;
pub mod trace;

pub use analyzer::{Analyzer, Configured, Unconfigured};
pub use cancel::CancellationToken;
pub use config::{AnalyzerConfig, DEFAULT_EXCLUDES, MAX_FILE_SIZE, Mode};
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use error::{AnalyzeError, IndexError, Result, TraceSetupError};
pub use extract::{Extraction, StaticImportExtractor};
pub use index::{IndexOptions, IndexedFile, SourceModuleIndex};
pub use report::{AnalysisReport, ReportedCycle, RunCounters};
pub use trace::{
    ForwardingHook, ImportHook, ImportObserver, RuntimeImportTracer, TraceEvent, TraceLog,
    TraceRecorder, TraceSession,
};

pub use snarl_graph;
