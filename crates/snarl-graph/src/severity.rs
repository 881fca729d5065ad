//! Rule-based cycle severity.
//!
//! Severity is never stored on a cycle; it is recomputed from the cycle's
//! structure each time it is needed. Rules, first match wins:
//!
//! | Tier | Rule |
//! |---|---|
//! | critical | self-import, or length 2 with every hop hard and at least one `star` hop |
//! | high | length ≤ 3 with every hop hard |
//! | low | every hop `deferred` |
//! | medium | any `conditional`/`deferred` hop, or length 4–6 |
//! | low | length > 6 |
//!
//! A hop is hard when its effective kind is executed at load time
//! (`absolute`, `relative`, `star`). Package crossing is reported but does
//! not move the tier.

use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::{Cycle, CycleHop, DependencyGraph, ImportKind};

/// Cycle severity tiers. `Critical` compares greatest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// All tiers, most severe first.
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a cycle from its length and the effective kind of each hop.
pub fn classify(length: usize, kinds: &[ImportKind]) -> Severity {
    if length <= 1 {
        return Severity::Critical;
    }

    let all_hard = kinds.iter().all(|k| k.is_load_time());
    if all_hard {
        if length == 2 && kinds.contains(&ImportKind::Star) {
            return Severity::Critical;
        }
        if length <= 3 {
            return Severity::High;
        }
    }

    if !kinds.is_empty() && kinds.iter().all(|k| *k == ImportKind::Deferred) {
        return Severity::Low;
    }

    if kinds.iter().any(|k| k.is_soft()) || (4..=6).contains(&length) {
        return Severity::Medium;
    }

    Severity::Low
}

/// Severity together with the structural facts that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityAssessment {
    pub severity: Severity,
    pub length: usize,
    pub hard_hops: usize,
    pub soft_hops: usize,
    pub star_hops: usize,
    /// Members belong to more than one package.
    pub crosses_packages: bool,
}

impl SeverityAssessment {
    pub fn has_soft_hop(&self) -> bool {
        self.soft_hops > 0
    }
}

/// Assess a resolved cycle against the graph it came from.
pub fn assess(cycle: &Cycle, hops: &[CycleHop], graph: &DependencyGraph) -> SeverityAssessment {
    let kinds: Vec<ImportKind> = hops.iter().map(CycleHop::effective_kind).collect();
    let hard_hops = kinds.iter().filter(|k| k.is_load_time()).count();
    let star_hops = kinds.iter().filter(|k| **k == ImportKind::Star).count();

    SeverityAssessment {
        severity: classify(cycle.len(), &kinds),
        length: cycle.len(),
        hard_hops,
        soft_hops: kinds.len() - hard_hops,
        star_hops,
        crosses_packages: crosses_packages(cycle, graph),
    }
}

fn crosses_packages(cycle: &Cycle, graph: &DependencyGraph) -> bool {
    let packages: FxHashSet<_> = cycle
        .modules()
        .iter()
        .map(|id| {
            graph
                .module(id)
                .and_then(|m| m.package.clone())
                .or_else(|| id.parent())
        })
        .collect();
    packages.len() > 1
}
