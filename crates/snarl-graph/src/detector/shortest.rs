//! Shortest-cycle sampling for components too large to enumerate.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use super::johnson::Enumeration;

/// One shortest cycle through each node, found by BFS back to the node.
///
/// Cycles are returned in walk order starting at the first node they were
/// found for. A cycle shared by several nodes is kept once and counts once
/// against `limit`.
pub(crate) fn shortest_cycles(adj: &[Vec<usize>], limit: usize) -> Enumeration {
    let n = adj.len();
    let search_limit = limit.saturating_add(1);
    let mut cycles = Vec::new();
    let mut seen: FxHashSet<Vec<usize>> = FxHashSet::default();
    let mut parent = vec![usize::MAX; n];
    let mut queue = VecDeque::new();

    for start in 0..n {
        if cycles.len() >= search_limit {
            break;
        }
        if let Some(cycle) = shortest_through(adj, start, &mut parent, &mut queue) {
            if seen.insert(rotated_to_min(&cycle)) {
                cycles.push(cycle);
            }
        }
    }

    Enumeration::capped(cycles, limit)
}

/// Rotation starting at the smallest node; equal for every walk of one cycle.
fn rotated_to_min(cycle: &[usize]) -> Vec<usize> {
    let start = cycle
        .iter()
        .enumerate()
        .min_by_key(|&(_, node)| *node)
        .map_or(0, |(i, _)| i);
    let mut rotated = cycle.to_vec();
    rotated.rotate_left(start);
    rotated
}

fn shortest_through(
    adj: &[Vec<usize>],
    start: usize,
    parent: &mut [usize],
    queue: &mut VecDeque<usize>,
) -> Option<Vec<usize>> {
    parent.fill(usize::MAX);
    queue.clear();
    queue.push_back(start);

    while let Some(v) = queue.pop_front() {
        for &w in &adj[v] {
            if w == start {
                let mut path = vec![v];
                let mut current = v;
                while current != start {
                    current = parent[current];
                    path.push(current);
                }
                path.reverse();
                return Some(path);
            }
            if parent[w] == usize::MAX {
                parent[w] = v;
                queue.push_back(w);
            }
        }
    }

    None
}
