//! Structural fix suggestions for cycles.
//!
//! Every reported cycle gets exactly one [`FixSuggestion`]. The fix type is
//! picked by [`select_fix_type`], a pure function of the cycle's structural
//! traits, in this order:
//!
//! 1. any soft hop: `defer-import-to-call-site`
//! 2. two small, low fan-out modules: `merge-modules`
//! 3. members span packages: `invert-dependency-via-interface`
//! 4. a member is an import hub: `introduce-dependency-injection`
//! 5. otherwise: `extract-shared-module`
//!
//! The thresholds live in [`SuggestionPolicy`].

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{Cycle, CycleHop, DependencyGraph, ModuleId, SeverityAssessment};

/// Fixed taxonomy of refactoring patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FixType {
    ExtractSharedModule,
    InvertDependencyViaInterface,
    DeferImportToCallSite,
    MergeModules,
    IntroduceDependencyInjection,
}

impl FixType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExtractSharedModule => "extract-shared-module",
            Self::InvertDependencyViaInterface => "invert-dependency-via-interface",
            Self::DeferImportToCallSite => "defer-import-to-call-site",
            Self::MergeModules => "merge-modules",
            Self::IntroduceDependencyInjection => "introduce-dependency-injection",
        }
    }
}

impl fmt::Display for FixType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A suggested refactoring for one cycle.
///
/// `example` is template-generated text naming the real modules involved.
/// It is illustrative only and is not guaranteed to be valid or complete
/// code for the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixSuggestion {
    pub fix_type: FixType,
    pub description: String,
    /// Files to touch, in cycle order.
    pub affected_files: Vec<PathBuf>,
    pub example: Option<String>,
}

/// Thresholds used when choosing a fix type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionPolicy {
    /// Modules at or below this many lines count as small. Unknown sizes
    /// count as small.
    pub small_module_lines: usize,
    /// Fan-out at or below this is low.
    pub low_fan_out: usize,
    /// Fan-out at or above this makes a module an import hub.
    pub hub_fan_out: usize,
}

impl Default for SuggestionPolicy {
    fn default() -> Self {
        Self {
            small_module_lines: 200,
            low_fan_out: 3,
            hub_fan_out: 8,
        }
    }
}

/// Structural facts about a cycle that drive fix selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleTraits {
    pub length: usize,
    pub has_soft_hop: bool,
    pub crosses_packages: bool,
    /// Every member is small and has low fan-out.
    pub members_small: bool,
    pub max_fan_out: usize,
}

/// Pick the fix type for a cycle. Pure and deterministic.
pub fn select_fix_type(policy: &SuggestionPolicy, traits: &CycleTraits) -> FixType {
    if traits.has_soft_hop {
        FixType::DeferImportToCallSite
    } else if traits.length == 2 && traits.members_small {
        FixType::MergeModules
    } else if traits.crosses_packages {
        FixType::InvertDependencyViaInterface
    } else if traits.max_fan_out >= policy.hub_fan_out {
        FixType::IntroduceDependencyInjection
    } else {
        FixType::ExtractSharedModule
    }
}

/// Builds one [`FixSuggestion`] per cycle.
#[derive(Debug, Clone, Default)]
pub struct FixSuggestionSynthesizer {
    policy: SuggestionPolicy,
}

impl FixSuggestionSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: SuggestionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &SuggestionPolicy {
        &self.policy
    }

    /// Gather the traits of a resolved cycle.
    pub fn traits(
        &self,
        cycle: &Cycle,
        assessment: &SeverityAssessment,
        graph: &DependencyGraph,
    ) -> CycleTraits {
        let mut members_small = true;
        let mut max_fan_out = 0;

        for id in cycle.modules() {
            let fan_out = graph.fan_out(id);
            max_fan_out = max_fan_out.max(fan_out);

            let lines = graph.module(id).and_then(|m| m.line_count);
            let small = lines.is_none_or(|n| n <= self.policy.small_module_lines);
            if !small || fan_out > self.policy.low_fan_out {
                members_small = false;
            }
        }

        CycleTraits {
            length: cycle.len(),
            has_soft_hop: assessment.has_soft_hop(),
            crosses_packages: assessment.crosses_packages,
            members_small,
            max_fan_out,
        }
    }

    pub fn synthesize(
        &self,
        cycle: &Cycle,
        hops: &[CycleHop],
        assessment: &SeverityAssessment,
        graph: &DependencyGraph,
    ) -> FixSuggestion {
        let traits = self.traits(cycle, assessment, graph);
        let fix_type = select_fix_type(&self.policy, &traits);
        let chain = cycle.format_chain();

        let (description, example) = match fix_type {
            FixType::DeferImportToCallSite => defer_template(&chain, hops),
            FixType::MergeModules => merge_template(&chain, cycle),
            FixType::InvertDependencyViaInterface => invert_template(&chain, hops, graph),
            FixType::IntroduceDependencyInjection => inject_template(&chain, cycle, graph),
            FixType::ExtractSharedModule => extract_template(&chain, cycle),
        };

        FixSuggestion {
            fix_type,
            description,
            affected_files: affected_files(cycle, hops, graph),
            example: Some(example),
        }
    }
}

fn affected_files(cycle: &Cycle, hops: &[CycleHop], graph: &DependencyGraph) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    let module_paths = cycle
        .modules()
        .iter()
        .filter_map(|id| graph.module(id))
        .filter(|m| !m.is_synthetic)
        .map(|m| m.path.clone());
    let edge_files = hops.iter().flat_map(|h| h.edges.iter().map(|e| e.file.clone()));

    for path in module_paths.chain(edge_files) {
        if !path.as_os_str().is_empty() && !files.contains(&path) {
            files.push(path);
        }
    }
    files
}

/// The hop to cut: the first hard hop, or the first hop at all.
fn hop_to_defer(hops: &[CycleHop]) -> Option<&CycleHop> {
    hops.iter()
        .find(|h| h.effective_kind().is_load_time())
        .or_else(|| hops.first())
}

fn defer_template(chain: &str, hops: &[CycleHop]) -> (String, String) {
    let Some(hop) = hop_to_defer(hops) else {
        return (format!("Defer an import in {chain} to its call site."), String::new());
    };
    let line = hop.primary_edge().map_or(0, |e| e.line);
    let description = format!(
        "Cycle {chain} is already partly avoidable at load time. Move the module-level \
         import of '{to}' in '{from}' (line {line}) into the function that uses it so \
         '{from}' no longer needs '{to}' while loading.",
        to = hop.to,
        from = hop.from,
    );
    let example = format!(
        "# {from}\n\
         def uses_{leaf}():\n    \
             import {to}\n    \
             return {to}\n",
        from = hop.from,
        to = hop.to,
        leaf = hop.to.leaf(),
    );
    (description, example)
}

fn merge_template(chain: &str, cycle: &Cycle) -> (String, String) {
    let (a, b) = match cycle.modules() {
        [a, b, ..] => (a, b),
        _ => return (format!("Merge the modules of {chain}."), String::new()),
    };
    let description = format!(
        "'{a}' and '{b}' are small and tightly coupled ({chain}). Merge them into a \
         single module and update importers."
    );
    let example = format!(
        "# {a}\n\
         # ... existing contents of {a} ...\n\
         # ... contents moved from {b} ...\n\
         \n\
         # elsewhere\n\
         from {a} import *  # previously split across {a} and {b}\n"
    );
    (description, example)
}

fn invert_template(chain: &str, hops: &[CycleHop], graph: &DependencyGraph) -> (String, String) {
    let package_of = |id: &ModuleId| {
        graph
            .module(id)
            .and_then(|m| m.package.clone())
            .or_else(|| id.parent())
    };
    let crossing = hops
        .iter()
        .find(|h| package_of(&h.from) != package_of(&h.to))
        .or_else(|| hops.first());
    let Some(hop) = crossing else {
        return (format!("Invert a dependency in {chain}."), String::new());
    };

    let interface = format!("{}Protocol", pascal_case(hop.to.leaf()));
    let home = package_of(&hop.from)
        .map(|p| format!("{p}.interfaces"))
        .unwrap_or_else(|| "interfaces".to_string());
    let description = format!(
        "Cycle {chain} crosses package boundaries. Have '{from}' depend on an \
         interface '{interface}' defined in '{home}' instead of importing '{to}' \
         directly; '{to}' implements it.",
        from = hop.from,
        to = hop.to,
    );
    let example = format!(
        "# {home}\n\
         from typing import Protocol\n\
         \n\
         class {interface}(Protocol):\n    \
             ...\n\
         \n\
         # {from}\n\
         from {home} import {interface}\n",
        from = hop.from,
    );
    (description, example)
}

fn inject_template(chain: &str, cycle: &Cycle, graph: &DependencyGraph) -> (String, String) {
    let hub = cycle
        .modules()
        .iter()
        .max_by_key(|id| (graph.fan_out(id), std::cmp::Reverse((*id).clone())));
    let Some(hub) = hub else {
        return (format!("Inject dependencies in {chain}."), String::new());
    };
    let collaborators: Vec<&ModuleId> = cycle.modules().iter().filter(|id| *id != hub).collect();
    let names = collaborators
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let description = format!(
        "'{hub}' imports {fan_out} modules and sits on cycle {chain}. Pass its \
         collaborators ({names}) in as constructor or function arguments instead of \
         importing them at module level.",
        fan_out = graph.fan_out(hub),
    );
    let params = collaborators
        .iter()
        .map(|id| id.leaf().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let example = format!(
        "# {hub}\n\
         class {class}:\n    \
             def __init__(self, {params}):\n        \
                 ...\n",
        class = pascal_case(hub.leaf()),
    );
    (description, example)
}

fn extract_template(chain: &str, cycle: &Cycle) -> (String, String) {
    let shared = shared_module_name(cycle);
    let members = cycle
        .modules()
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let description = format!(
        "Move the definitions that {members} need from each other into a new module \
         '{shared}' and import it from each member, breaking {chain}."
    );
    let mut example = format!("# {shared}\n# definitions shared by {members}\n");
    for id in cycle.modules() {
        example.push_str(&format!("\n# {id}\nfrom {shared} import ...\n"));
    }
    (description, example)
}

/// `pkg.shared` when every member lives under `pkg`, otherwise `shared`.
fn shared_module_name(cycle: &Cycle) -> String {
    let mut common: Option<Vec<&str>> = None;
    for id in cycle.modules() {
        let parent: Vec<&str> = match id.parent() {
            Some(_) => {
                let segments: Vec<&str> = id.segments().collect();
                segments[..segments.len() - 1].to_vec()
            }
            None => Vec::new(),
        };
        common = Some(match common {
            None => parent,
            Some(prev) => prev
                .iter()
                .zip(parent.iter())
                .take_while(|(x, y)| x == y)
                .map(|(x, _)| *x)
                .collect(),
        });
    }
    match common {
        Some(prefix) if !prefix.is_empty() => format!("{}.shared", prefix.join(".")),
        _ => "shared".to_string(),
    }
}

fn pascal_case(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::severity::assess;
    use crate::{ImportEdge, ImportKind, Module};

    fn id(name: &str) -> ModuleId {
        ModuleId::new(name).unwrap()
    }

    fn graph_with(modules: &[(&str, Option<usize>)], edges: &[(&str, &str, ImportKind)]) -> DependencyGraph {
        let graph = DependencyGraph::new();
        for (name, lines) in modules {
            let mut builder =
                Module::builder(id(name), PathBuf::from(format!("{}.py", name.replace('.', "/"))));
            if let Some(n) = lines {
                builder = builder.line_count(*n);
            }
            graph.add_module(builder.build());
        }
        for (line, (from, to, kind)) in edges.iter().enumerate() {
            graph
                .add_edge(ImportEdge::new(
                    id(from),
                    id(to),
                    format!("{}.py", from.replace('.', "/")),
                    line + 1,
                    *kind,
                ))
                .unwrap();
        }
        graph
    }

    fn suggest(graph: &DependencyGraph, names: &[&str]) -> FixSuggestion {
        let cycle = Cycle::new(names.iter().map(|n| id(n)).collect()).unwrap();
        let hops = cycle.resolve(graph).unwrap();
        let assessment = assess(&cycle, &hops, graph);
        FixSuggestionSynthesizer::new().synthesize(&cycle, &hops, &assessment, graph)
    }

    fn traits(length: usize) -> CycleTraits {
        CycleTraits {
            length,
            has_soft_hop: false,
            crosses_packages: false,
            members_small: false,
            max_fan_out: 1,
        }
    }

    #[test]
    fn selection_order_is_stable() {
        let policy = SuggestionPolicy::default();
        let soft = CycleTraits { has_soft_hop: true, members_small: true, ..traits(2) };
        assert_eq!(select_fix_type(&policy, &soft), FixType::DeferImportToCallSite);

        let small_pair = CycleTraits { members_small: true, crosses_packages: true, ..traits(2) };
        assert_eq!(select_fix_type(&policy, &small_pair), FixType::MergeModules);

        let crossing = CycleTraits { crosses_packages: true, max_fan_out: 20, ..traits(3) };
        assert_eq!(select_fix_type(&policy, &crossing), FixType::InvertDependencyViaInterface);

        let hub = CycleTraits { max_fan_out: 8, ..traits(3) };
        assert_eq!(select_fix_type(&policy, &hub), FixType::IntroduceDependencyInjection);

        assert_eq!(select_fix_type(&policy, &traits(3)), FixType::ExtractSharedModule);
    }

    #[test]
    fn triangle_extracts_shared_module() {
        let graph = graph_with(
            &[("a", Some(10)), ("b", Some(10)), ("c", Some(10))],
            &[
                ("a", "b", ImportKind::Absolute),
                ("b", "c", ImportKind::Absolute),
                ("c", "a", ImportKind::Absolute),
            ],
        );
        let suggestion = suggest(&graph, &["a", "b", "c"]);
        assert_eq!(suggestion.fix_type, FixType::ExtractSharedModule);
        assert_eq!(
            suggestion.affected_files,
            vec![PathBuf::from("a.py"), PathBuf::from("b.py"), PathBuf::from("c.py")]
        );
        let example = suggestion.example.unwrap();
        assert!(example.contains("# shared"));
        assert!(example.contains("# c\nfrom shared import"));
    }

    #[test]
    fn deferred_hop_suggests_deferring_the_hard_one() {
        let graph = graph_with(
            &[("a", None), ("b", None)],
            &[("a", "b", ImportKind::Deferred), ("b", "a", ImportKind::Absolute)],
        );
        let suggestion = suggest(&graph, &["a", "b"]);
        assert_eq!(suggestion.fix_type, FixType::DeferImportToCallSite);
        assert!(suggestion.description.contains("import of 'a' in 'b'"));
        assert!(suggestion.example.unwrap().contains("    import a"));
    }

    #[test]
    fn small_pair_merges_but_large_pair_does_not() {
        let edges = [("a", "b", ImportKind::Absolute), ("b", "a", ImportKind::Absolute)];
        let small = graph_with(&[("a", Some(50)), ("b", None)], &edges);
        assert_eq!(suggest(&small, &["a", "b"]).fix_type, FixType::MergeModules);

        let large = graph_with(&[("a", Some(50)), ("b", Some(900))], &edges);
        assert_eq!(suggest(&large, &["a", "b"]).fix_type, FixType::ExtractSharedModule);
    }

    #[test]
    fn package_crossing_inverts_dependency() {
        let graph = graph_with(
            &[
                ("app.models.user", Some(500)),
                ("app.services.auth", Some(500)),
                ("app.services.audit", Some(500)),
            ],
            &[
                ("app.models.user", "app.services.auth", ImportKind::Absolute),
                ("app.services.auth", "app.services.audit", ImportKind::Absolute),
                ("app.services.audit", "app.models.user", ImportKind::Absolute),
            ],
        );
        let suggestion = suggest(
            &graph,
            &["app.models.user", "app.services.auth", "app.services.audit"],
        );
        assert_eq!(suggestion.fix_type, FixType::InvertDependencyViaInterface);
        let example = suggestion.example.unwrap();
        assert!(example.contains("class AuthProtocol(Protocol)"));
        assert!(example.contains("# app.models.interfaces"));
    }

    #[test]
    fn shared_module_uses_common_package() {
        let cycle = Cycle::new(vec![id("pkg.sub.a"), id("pkg.sub.b"), id("pkg.c")]).unwrap();
        assert_eq!(shared_module_name(&cycle), "pkg.shared");
        let top = Cycle::new(vec![id("a"), id("pkg.b")]).unwrap();
        assert_eq!(shared_module_name(&top), "shared");
    }

    #[test]
    fn fix_type_serializes_kebab_case() {
        let json = serde_json::to_string(&FixType::IntroduceDependencyInjection).unwrap();
        assert_eq!(json, "\"introduce-dependency-injection\"");
    }
}
