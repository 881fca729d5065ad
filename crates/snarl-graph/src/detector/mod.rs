//! Cycle detection over a [`DependencyGraph`].
//!
//! Detection runs Tarjan's SCC decomposition, then enumerates elementary
//! cycles inside each non-trivial component:
//!
//! - with a configured maximum length `k`: every cycle of at most `k` modules
//! - components of up to [`EXHAUSTIVE_SCC_LIMIT`] modules: every cycle
//!   (Johnson's algorithm)
//! - larger components: one shortest cycle through each module, and the
//!   result is flagged truncated
//!
//! A global cap flags truncation when more cycles exist than it allows. Output is
//! canonicalized, deduplicated, and sorted by severity (most severe first),
//! then by module names.

mod johnson;
mod shortest;
mod tarjan;

use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::graph::Adjacency;
use super::severity::{self, Severity, SeverityAssessment};
use super::{Cycle, CycleHop, DependencyGraph, ModuleId};

/// Components up to this size are enumerated exhaustively when no maximum
/// cycle length is configured.
pub const EXHAUSTIVE_SCC_LIMIT: usize = 12;

/// Default cap on the number of cycles reported by one detection.
pub const DEFAULT_MAX_CYCLES: usize = 10_000;

/// Configurable cycle detector.
#[derive(Debug, Clone)]
pub struct CycleDetector {
    max_cycle_length: Option<usize>,
    max_cycles: usize,
}

impl Default for CycleDetector {
    fn default() -> Self {
        Self {
            max_cycle_length: None,
            max_cycles: DEFAULT_MAX_CYCLES,
        }
    }
}

/// A cycle with its backing edges and severity assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectedCycle {
    pub cycle: Cycle,
    pub hops: Vec<CycleHop>,
    pub assessment: SeverityAssessment,
}

impl DetectedCycle {
    pub fn severity(&self) -> Severity {
        self.assessment.severity
    }
}

/// Why a component's cycles are incomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TruncationReason {
    /// Component too large for exhaustive enumeration; only shortest
    /// cycles were sampled.
    ShortestCyclesOnly,
    /// The global cycle cap was reached.
    CycleCapReached,
}

/// Record of a component whose cycles were not fully enumerated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Truncation {
    /// Smallest module of the component.
    pub component: ModuleId,
    pub component_size: usize,
    pub reason: TruncationReason,
}

/// Result of one detection run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CycleDetection {
    pub cycles: Vec<DetectedCycle>,
    /// Some cycles may be missing; see `truncations`.
    pub truncated: bool,
    pub truncations: Vec<Truncation>,
    /// Number of components containing at least one cycle.
    pub cyclic_component_count: usize,
}

impl CycleDetection {
    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }

    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.cycles.iter().filter(|c| c.severity() == severity).count()
    }

    /// Cycles only, in report order.
    pub fn cycle_list(&self) -> Vec<Cycle> {
        self.cycles.iter().map(|c| c.cycle.clone()).collect()
    }
}

impl CycleDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only report cycles of at most `max` modules. Values below 1 are
    /// treated as 1.
    pub fn with_max_cycle_length(mut self, max: Option<usize>) -> Self {
        self.max_cycle_length = max.map(|m| m.max(1));
        self
    }

    /// Stop after `max` cycles and flag the result truncated.
    pub fn with_max_cycles(mut self, max: usize) -> Self {
        self.max_cycles = max.max(1);
        self
    }

    pub fn max_cycle_length(&self) -> Option<usize> {
        self.max_cycle_length
    }

    pub fn max_cycles(&self) -> usize {
        self.max_cycles
    }

    /// Find, assess, and order every cycle in `graph`.
    pub fn detect(&self, graph: &DependencyGraph) -> CycleDetection {
        let adjacency = graph.adjacency();
        let components = tarjan::strongly_connected_components(&adjacency.successors);

        let mut detection = CycleDetection::default();
        let mut seen: FxHashSet<Cycle> = FxHashSet::default();

        let mut cyclic: Vec<Vec<usize>> = components
            .into_iter()
            .filter(|members| {
                members.len() > 1 || adjacency.successors[members[0]].contains(&members[0])
            })
            .collect();
        cyclic.sort_by_key(|members| members[0]);
        detection.cyclic_component_count = cyclic.len();

        for members in &cyclic {
            let remaining = self.max_cycles.saturating_sub(seen.len());
            if remaining == 0 {
                detection.truncations.push(self.truncation(
                    &adjacency,
                    members,
                    TruncationReason::CycleCapReached,
                ));
                continue;
            }

            let local = local_adjacency(&adjacency, members);
            let (enumeration, sampled) = match self.max_cycle_length {
                Some(max_len) => (johnson::bounded_cycles(&local, max_len, remaining), false),
                None if members.len() <= EXHAUSTIVE_SCC_LIMIT => {
                    (johnson::all_cycles(&local, remaining), false)
                }
                None => (shortest::shortest_cycles(&local, remaining), true),
            };

            debug!(
                component = %adjacency.ids[members[0]],
                size = members.len(),
                cycles = enumeration.cycles.len(),
                sampled,
                "enumerated component"
            );

            if sampled {
                detection.truncations.push(self.truncation(
                    &adjacency,
                    members,
                    TruncationReason::ShortestCyclesOnly,
                ));
            }
            if enumeration.hit_limit {
                detection.truncations.push(self.truncation(
                    &adjacency,
                    members,
                    TruncationReason::CycleCapReached,
                ));
            }

            for local_cycle in enumeration.cycles {
                let ids = local_cycle
                    .into_iter()
                    .map(|i| adjacency.ids[members[i]].clone())
                    .collect();
                let cycle = Cycle::canonical(ids);
                if !seen.insert(cycle.clone()) {
                    continue;
                }
                if let Some(hops) = cycle.resolve(graph) {
                    let assessment = severity::assess(&cycle, &hops, graph);
                    detection.cycles.push(DetectedCycle {
                        cycle,
                        hops,
                        assessment,
                    });
                }
            }
        }

        detection.cycles.sort_by(|a, b| {
            b.severity()
                .cmp(&a.severity())
                .then_with(|| a.cycle.cmp(&b.cycle))
        });
        detection.truncated = !detection.truncations.is_empty();

        if detection.truncated {
            warn!(
                truncations = detection.truncations.len(),
                "cycle enumeration incomplete"
            );
        }
        info!(
            cycles = detection.cycles.len(),
            components = detection.cyclic_component_count,
            truncated = detection.truncated,
            "cycle detection complete"
        );

        detection
    }

    fn truncation(
        &self,
        adjacency: &Adjacency,
        members: &[usize],
        reason: TruncationReason,
    ) -> Truncation {
        Truncation {
            component: adjacency.ids[members[0]].clone(),
            component_size: members.len(),
            reason,
        }
    }
}

/// Re-index a component's nodes to `0..members.len()`, keeping only edges
/// inside the component. `members` is sorted, so local order still follows
/// module names.
fn local_adjacency(adjacency: &Adjacency, members: &[usize]) -> Vec<Vec<usize>> {
    members
        .iter()
        .map(|&global| {
            adjacency.successors[global]
                .iter()
                .filter_map(|target| members.binary_search(target).ok())
                .collect()
        })
        .collect()
}
