use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use snarl_graph::{
    Cycle, CycleHop, CycleRecord, DependencyGraph, ExternalImport, FixSuggestion, GraphDocument,
    GraphStatistics, ImportEdge, Module, Severity, SeverityAssessment, Truncation,
};

use crate::{Diagnostic, Mode};

/// A detected cycle with its assessment and suggested fix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportedCycle {
    pub cycle: Cycle,
    pub hops: Vec<CycleHop>,
    pub assessment: SeverityAssessment,
    pub suggestion: FixSuggestion,
}

impl ReportedCycle {
    pub fn severity(&self) -> Severity {
        self.assessment.severity
    }
}

/// Aggregate counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunCounters {
    pub files_scanned: usize,
    pub modules_found: usize,
    pub edges_found: usize,
    pub cycles_found: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl RunCounters {
    pub fn for_severity(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }

    pub(crate) fn count_cycles(&mut self, cycles: &[ReportedCycle]) {
        self.cycles_found = cycles.len();
        for cycle in cycles {
            match cycle.severity() {
                Severity::Critical => self.critical += 1,
                Severity::High => self.high += 1,
                Severity::Medium => self.medium += 1,
                Severity::Low => self.low += 1,
            }
        }
    }
}

/// Immutable result of an analysis run.
#[derive(Debug)]
pub struct AnalysisReport {
    pub root: PathBuf,
    pub mode: Mode,
    pub graph: DependencyGraph,
    /// Severity descending, then canonical module order.
    pub cycles: Vec<ReportedCycle>,
    pub counters: RunCounters,
    pub stats: GraphStatistics,
    /// Skipped files and other non-fatal findings.
    pub diagnostics: Vec<Diagnostic>,
    /// Imports that resolved outside the tree, sorted by specifier.
    pub external_imports: Vec<ExternalImport>,
    /// Some cycles may be missing; see `truncations`.
    pub truncated: bool,
    pub truncations: Vec<Truncation>,
}

impl AnalysisReport {
    pub fn modules(&self) -> Vec<Arc<Module>> {
        self.graph.all_modules()
    }

    pub fn edges(&self) -> Vec<ImportEdge> {
        self.graph.all_edges()
    }

    /// No cycles were found.
    pub fn is_acyclic(&self) -> bool {
        self.cycles.is_empty()
    }

    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn cycles_with_severity(&self, severity: Severity) -> impl Iterator<Item = &ReportedCycle> {
        self.cycles.iter().filter(move |c| c.severity() == severity)
    }

    /// Highest severity among reported cycles.
    pub fn worst_severity(&self) -> Option<Severity> {
        self.cycles.iter().map(ReportedCycle::severity).max()
    }

    /// Node/edge interchange document including cycles and fix types.
    pub fn to_document(&self) -> GraphDocument {
        let records = self
            .cycles
            .iter()
            .map(|c| CycleRecord {
                modules: c.cycle.modules().to_vec(),
                severity: c.severity(),
                fix_type: Some(c.suggestion.fix_type),
            })
            .collect();
        GraphDocument::from_graph(&self.graph).with_cycle_records(records)
    }

    /// Full report as pretty JSON: counters, diagnostics, cycles with
    /// suggestions, and the graph document.
    pub fn to_json(&self) -> snarl_graph::Result<String> {
        let view = ReportView {
            root: &self.root,
            mode: self.mode,
            counters: &self.counters,
            stats: &self.stats,
            truncated: self.truncated,
            truncations: &self.truncations,
            diagnostics: &self.diagnostics,
            external_imports: &self.external_imports,
            cycles: self.cycles.iter().map(CycleView::from).collect(),
            graph: self.to_document(),
        };
        Ok(serde_json::to_string_pretty(&view)?)
    }

    /// DOT rendering with reported cycles highlighted.
    pub fn to_dot(&self) -> String {
        let cycles: Vec<Cycle> = self.cycles.iter().map(|c| c.cycle.clone()).collect();
        snarl_graph::to_dot(&self.graph, &cycles)
    }
}

#[derive(Serialize)]
struct ReportView<'a> {
    root: &'a PathBuf,
    mode: Mode,
    counters: &'a RunCounters,
    stats: &'a GraphStatistics,
    truncated: bool,
    truncations: &'a [Truncation],
    diagnostics: &'a [Diagnostic],
    external_imports: &'a [ExternalImport],
    cycles: Vec<CycleView<'a>>,
    graph: GraphDocument,
}

#[derive(Serialize)]
struct CycleView<'a> {
    chain: String,
    modules: &'a Cycle,
    severity: Severity,
    assessment: &'a SeverityAssessment,
    suggestion: &'a FixSuggestion,
    hops: &'a [CycleHop],
}

impl<'a> From<&'a ReportedCycle> for CycleView<'a> {
    fn from(cycle: &'a ReportedCycle) -> Self {
        Self {
            chain: cycle.cycle.format_chain(),
            modules: &cycle.cycle,
            severity: cycle.severity(),
            assessment: &cycle.assessment,
            suggestion: &cycle.suggestion,
            hops: &cycle.hops,
        }
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Import Analysis")?;
        writeln!(f, "===============")?;
        writeln!(f, "Root: {}", self.root.display())?;
        writeln!(f, "Mode: {}", self.mode)?;
        writeln!(f, "Files scanned: {}", self.counters.files_scanned)?;
        writeln!(f, "Modules: {}", self.counters.modules_found)?;
        writeln!(f, "Imports: {}", self.counters.edges_found)?;
        writeln!(f, "External imports: {}", self.external_imports.len())?;
        write!(f, "Cycles: {}", self.counters.cycles_found)?;
        if self.truncated {
            write!(f, " (partial)")?;
        }
        writeln!(f)?;

        for severity in Severity::ALL {
            let count = self.counters.for_severity(severity);
            if count > 0 {
                writeln!(f, "  {severity}: {count}")?;
            }
        }

        if !self.cycles.is_empty() {
            writeln!(f, "\nCycles:")?;
            for cycle in &self.cycles {
                writeln!(f, "  [{}] {}", cycle.severity(), cycle.cycle.format_chain())?;
                writeln!(f, "      fix: {}", cycle.suggestion.fix_type)?;
            }
        }

        if !self.diagnostics.is_empty() {
            writeln!(f, "\nWarnings:")?;
            for diagnostic in &self.diagnostics {
                writeln!(f, "  - {diagnostic}")?;
            }
        }

        Ok(())
    }
}
