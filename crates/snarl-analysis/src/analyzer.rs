//! Analysis run orchestration.
//!
//! One call to [`Analyzer::analyze`] is a bounded, synchronous batch:
//! index the tree, build the graph from static imports and/or a captured
//! trace, detect cycles, then assess and suggest fixes for each.

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::path::PathBuf;

use rustc_hash::FxHashSet;
use snarl_graph::{
    CycleDetector, DependencyGraph, ExternalImport, FixSuggestionSynthesizer, ImportEdge, Module,
    ModuleId, SuggestionPolicy, TruncationReason,
};
use tracing::{debug, info, info_span, warn};

use crate::config::{AnalyzerConfig, Mode};
use crate::extract::StaticImportExtractor;
use crate::index::{IndexOptions, SourceModuleIndex};
use crate::report::{AnalysisReport, ReportedCycle, RunCounters};
use crate::trace::TraceLog;
use crate::{AnalyzeError, CancellationToken, Diagnostic, DiagnosticKind, Result};

/// Typestate marker for an analyzer without a source root.
#[derive(Debug, Clone, Copy)]
pub struct Unconfigured;

/// Typestate marker for an analyzer with a source root.
#[derive(Debug, Clone, Copy)]
pub struct Configured;

/// Import graph analyzer.
///
/// `analyze()` only exists once a root has been set.
///
/// # Example
///
/// ```rust,no_run
/// use snarl_analysis::{Analyzer, Mode};
///
/// # fn main() -> snarl_analysis::Result<()> {
/// let report = Analyzer::new()
///     .root("src")
///     .exclude(["legacy/**"])
///     .max_cycle_length(Some(6))
///     .mode(Mode::Static)
///     .analyze()?;
///
/// for cycle in &report.cycles {
///     println!("[{}] {}", cycle.severity(), cycle.cycle.format_chain());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Analyzer<State = Unconfigured> {
    config: AnalyzerConfig,
    trace: Option<TraceLog>,
    cancel: CancellationToken,
    _state: PhantomData<State>,
}

impl Default for Analyzer<Unconfigured> {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer<Unconfigured> {
    pub fn new() -> Self {
        Self {
            config: AnalyzerConfig::default(),
            trace: None,
            cancel: CancellationToken::new(),
            _state: PhantomData,
        }
    }

    /// Set the source root, enabling `analyze()`.
    pub fn root(mut self, root: impl Into<PathBuf>) -> Analyzer<Configured> {
        self.config.root = root.into();
        self.into_state()
    }

    /// Start from a complete configuration, root included.
    pub fn with_config(config: AnalyzerConfig) -> Analyzer<Configured> {
        Analyzer {
            config,
            trace: None,
            cancel: CancellationToken::new(),
            _state: PhantomData,
        }
    }
}

impl<State> Analyzer<State> {
    fn into_state<Next>(self) -> Analyzer<Next> {
        Analyzer {
            config: self.config,
            trace: self.trace,
            cancel: self.cancel,
            _state: PhantomData,
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Add exclude globs, relative to the root.
    pub fn exclude(mut self, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.config
            .exclude
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Whether the built-in excludes apply (default: true).
    pub fn use_default_excludes(mut self, enabled: bool) -> Self {
        self.config.use_default_excludes = enabled;
        self
    }

    /// Only report cycles of at most this many modules.
    pub fn max_cycle_length(mut self, max: Option<usize>) -> Self {
        self.config.max_cycle_length = max;
        self
    }

    /// Cap on cycles reported per run.
    ///
    /// Default: 10,000
    pub fn max_cycles(mut self, max: usize) -> Self {
        self.config.max_cycles = max;
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Read and parse files on the rayon pool (default: true).
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    pub fn suggestion_policy(mut self, policy: SuggestionPolicy) -> Self {
        self.config.suggestion_policy = policy;
        self
    }

    /// Captured import trace for `runtime` and `both` modes.
    pub fn trace_log(mut self, log: TraceLog) -> Self {
        self.trace = Some(log);
        self
    }

    /// Token the caller can use to abandon the run.
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }
}

impl Analyzer<Configured> {
    /// Run the analysis.
    ///
    /// Per-file problems end up in the report's diagnostics. Errors are
    /// reserved for an unusable root, a missing trace in runtime mode, and
    /// cancellation; a cancelled run reports nothing.
    pub fn analyze(self) -> Result<AnalysisReport> {
        let Self {
            config,
            trace,
            cancel,
            ..
        } = self;
        let mode = config.mode;
        let _span = info_span!("analyze", root = %config.root.display(), %mode).entered();

        if mode.uses_runtime() && trace.is_none() {
            return Err(AnalyzeError::MissingTrace);
        }

        let index = SourceModuleIndex::build(
            &config.root,
            &IndexOptions {
                exclude: config.effective_excludes(),
                parallel: config.parallel,
                cancel: cancel.clone(),
            },
        )?;
        checkpoint(&cancel)?;

        let mut diagnostics = index.diagnostics().to_vec();
        let mut external_imports = Vec::new();
        let graph = DependencyGraph::from_modules(index.modules().cloned());

        if mode.uses_static() {
            let extraction = StaticImportExtractor::new(&index).extract(config.parallel, &cancel)?;
            if extraction.references_sentinel() {
                graph.add_module(Module::external_sentinel());
            }
            graph.extend_edges(extraction.edges)?;
            diagnostics.extend(extraction.diagnostics);
            external_imports = extraction.external_imports;
        }

        if let Some(trace) = trace.as_ref().filter(|_| mode.uses_runtime()) {
            merge_trace(&graph, &index, trace, &mut external_imports)?;
        }
        checkpoint(&cancel)?;

        let detection = CycleDetector::new()
            .with_max_cycle_length(config.max_cycle_length)
            .with_max_cycles(config.max_cycles)
            .detect(&graph);
        checkpoint(&cancel)?;

        for truncation in &detection.truncations {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::CycleDetectionOverflow,
                format!(
                    "cycles through '{}' ({} modules) are incomplete: {}",
                    truncation.component,
                    truncation.component_size,
                    truncation_note(truncation.reason)
                ),
            ));
        }

        let synthesizer = FixSuggestionSynthesizer::with_policy(config.suggestion_policy);
        let cycles: Vec<ReportedCycle> = detection
            .cycles
            .into_iter()
            .map(|detected| {
                let suggestion = synthesizer.synthesize(
                    &detected.cycle,
                    &detected.hops,
                    &detected.assessment,
                    &graph,
                );
                ReportedCycle {
                    cycle: detected.cycle,
                    hops: detected.hops,
                    assessment: detected.assessment,
                    suggestion,
                }
            })
            .collect();

        let mut counters = RunCounters {
            files_scanned: index.files_scanned(),
            modules_found: index.len(),
            edges_found: graph.edge_count(),
            ..RunCounters::default()
        };
        counters.count_cycles(&cycles);

        info!(
            files = counters.files_scanned,
            modules = counters.modules_found,
            edges = counters.edges_found,
            cycles = counters.cycles_found,
            diagnostics = diagnostics.len(),
            "analysis complete"
        );

        Ok(AnalysisReport {
            root: index.root().to_path_buf(),
            mode,
            stats: graph.statistics(),
            graph,
            cycles,
            counters,
            diagnostics,
            external_imports,
            truncated: detection.truncated,
            truncations: detection.truncations,
        })
    }
}

fn truncation_note(reason: TruncationReason) -> &'static str {
    match reason {
        TruncationReason::ShortestCyclesOnly => {
            "only the shortest cycle through each module was enumerated"
        }
        TruncationReason::CycleCapReached => "the cycle limit was reached",
    }
}

fn checkpoint(cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        warn!("analysis cancelled");
        return Err(AnalyzeError::Cancelled);
    }
    Ok(())
}

/// Add runtime-observed edges between indexed modules.
///
/// A pair the graph already connects keeps only its static edges, which
/// carry exact lines. Loads of modules outside the tree become external
/// imports of the indexed importer; loads between two unindexed modules
/// are dropped.
fn merge_trace(
    graph: &DependencyGraph,
    index: &SourceModuleIndex,
    trace: &TraceLog,
    external_imports: &mut Vec<ExternalImport>,
) -> Result<()> {
    let known_pairs: FxHashSet<(ModuleId, ModuleId)> = graph
        .all_edges()
        .into_iter()
        .map(|e| (e.from, e.to))
        .collect();

    let mut external: BTreeMap<String, ExternalImport> = external_imports
        .drain(..)
        .map(|e| (e.specifier.clone(), e))
        .collect();

    let mut added = 0;
    let mut dropped = 0;
    for edge in trace.edges() {
        let Some(importer) = index.get(&edge.from) else {
            dropped += 1;
            continue;
        };
        if !index.contains(&edge.to) {
            external
                .entry(edge.to.to_string())
                .or_insert_with(|| ExternalImport::new(edge.to.as_str()))
                .push_importer(edge.from.clone());
            continue;
        }
        if known_pairs.contains(&(edge.from.clone(), edge.to.clone())) {
            continue;
        }
        let located = ImportEdge::new(
            edge.from,
            edge.to,
            importer.module.path.clone(),
            edge.line,
            edge.kind,
        );
        if graph.add_edge(located)? {
            added += 1;
        }
    }

    *external_imports = external.into_values().collect();
    debug!(added, dropped, "merged runtime edges");
    Ok(())
}
