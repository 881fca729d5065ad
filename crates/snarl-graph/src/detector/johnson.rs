//! Elementary cycle enumeration inside one strongly connected component.
//!
//! Both enumerators root every cycle at its smallest node index and only walk
//! through larger indices, so each elementary cycle is produced exactly once.

/// Cycles found plus whether the `limit` cut enumeration short.
pub(crate) struct Enumeration {
    pub(crate) cycles: Vec<Vec<usize>>,
    pub(crate) hit_limit: bool,
}

impl Enumeration {
    /// Keep at most `limit` cycles from a search allowed to run to
    /// `limit + 1`. Only a cycle past the limit marks the result as cut.
    pub(crate) fn capped(mut cycles: Vec<Vec<usize>>, limit: usize) -> Self {
        let hit_limit = cycles.len() > limit;
        cycles.truncate(limit);
        Self { cycles, hit_limit }
    }
}

/// Johnson's algorithm with blocked sets and B-lists.
///
/// Recursion depth is bounded by the component size; callers only use this
/// for small components.
pub(crate) fn all_cycles(adj: &[Vec<usize>], limit: usize) -> Enumeration {
    let mut search = JohnsonSearch {
        adj,
        blocked: vec![false; adj.len()],
        blocked_by: vec![Vec::new(); adj.len()],
        path: Vec::new(),
        cycles: Vec::new(),
        limit: limit.saturating_add(1),
    };

    for start in 0..adj.len() {
        if search.full() {
            break;
        }
        for node in start..adj.len() {
            search.blocked[node] = false;
            search.blocked_by[node].clear();
        }
        search.circuit(start, start);
    }

    Enumeration::capped(search.cycles, limit)
}

struct JohnsonSearch<'a> {
    adj: &'a [Vec<usize>],
    blocked: Vec<bool>,
    blocked_by: Vec<Vec<usize>>,
    path: Vec<usize>,
    cycles: Vec<Vec<usize>>,
    limit: usize,
}

impl JohnsonSearch<'_> {
    fn full(&self) -> bool {
        self.cycles.len() >= self.limit
    }

    fn circuit(&mut self, v: usize, start: usize) -> bool {
        let adj = self.adj;
        let mut found = false;
        self.path.push(v);
        self.blocked[v] = true;

        for &w in &adj[v] {
            if self.full() {
                break;
            }
            if w < start {
                continue;
            }
            if w == start {
                self.cycles.push(self.path.clone());
                found = true;
            } else if !self.blocked[w] && self.circuit(w, start) {
                found = true;
            }
        }

        if found {
            self.unblock(v);
        } else {
            for &w in &adj[v] {
                if w >= start && !self.blocked_by[w].contains(&v) {
                    self.blocked_by[w].push(v);
                }
            }
        }

        self.path.pop();
        found
    }

    fn unblock(&mut self, u: usize) {
        let mut pending = vec![u];
        while let Some(node) = pending.pop() {
            self.blocked[node] = false;
            for w in std::mem::take(&mut self.blocked_by[node]) {
                if self.blocked[w] {
                    pending.push(w);
                }
            }
        }
    }
}

/// Every elementary cycle with at most `max_len` nodes.
///
/// Plain depth-limited search from each start node with an on-path set;
/// iterative so large components with a generous bound stay off the
/// recursion stack.
pub(crate) fn bounded_cycles(adj: &[Vec<usize>], max_len: usize, limit: usize) -> Enumeration {
    let n = adj.len();
    let search_limit = limit.saturating_add(1);
    let mut cycles = Vec::new();
    let mut on_path = vec![false; n];

    'starts: for start in 0..n {
        let mut path = vec![start];
        let mut frames: Vec<(usize, usize)> = vec![(start, 0)];
        on_path[start] = true;

        while let Some(frame) = frames.last_mut() {
            let v = frame.0;
            if frame.1 >= adj[v].len() {
                frames.pop();
                path.pop();
                on_path[v] = false;
                continue;
            }
            let w = adj[v][frame.1];
            frame.1 += 1;

            if w == start {
                cycles.push(path.clone());
                if cycles.len() >= search_limit {
                    break 'starts;
                }
            } else if w > start && !on_path[w] && path.len() < max_len {
                on_path[w] = true;
                path.push(w);
                frames.push((w, 0));
            }
        }
    }

    Enumeration::capped(cycles, limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete(n: usize) -> Vec<Vec<usize>> {
        (0..n)
            .map(|v| (0..n).filter(|&w| w != v).collect())
            .collect()
    }

    /// Number of elementary cycles in the complete digraph on `n` nodes.
    fn complete_cycle_count(n: usize) -> usize {
        let mut total = 0;
        for k in 2..=n {
            // C(n, k) * (k - 1)!
            let choose: usize = (0..k).map(|i| n - i).product::<usize>() / (1..=k).product::<usize>();
            total += choose * (1..k).product::<usize>();
        }
        total
    }

    #[test]
    fn triangle_with_chord() {
        // 0 -> 1 -> 2 -> 0 and 1 -> 0
        let adj = vec![vec![1], vec![0, 2], vec![0]];
        let mut found = all_cycles(&adj, usize::MAX).cycles;
        found.sort();
        assert_eq!(found, vec![vec![0, 1], vec![0, 1, 2]]);
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let adj = vec![vec![0, 1], vec![0]];
        let mut found = all_cycles(&adj, usize::MAX).cycles;
        found.sort();
        assert_eq!(found, vec![vec![0], vec![0, 1]]);
    }

    #[test]
    fn complete_graph_count_matches_formula() {
        for n in 2..=5 {
            let adj = complete(n);
            assert_eq!(all_cycles(&adj, usize::MAX).cycles.len(), complete_cycle_count(n));
            assert_eq!(
                bounded_cycles(&adj, n, usize::MAX).cycles.len(),
                complete_cycle_count(n)
            );
        }
    }

    #[test]
    fn bound_drops_longer_cycles() {
        let adj = complete(4);
        let found = bounded_cycles(&adj, 2, usize::MAX).cycles;
        assert_eq!(found.len(), 6);
        assert!(found.iter().all(|c| c.len() == 2));
    }

    #[test]
    fn limit_stops_enumeration() {
        let adj = complete(5);
        let johnson = all_cycles(&adj, 3);
        assert_eq!(johnson.cycles.len(), 3);
        assert!(johnson.hit_limit);

        let bounded = bounded_cycles(&adj, 5, 4);
        assert_eq!(bounded.cycles.len(), 4);
        assert!(bounded.hit_limit);
    }

    #[test]
    fn limit_equal_to_cycle_count_is_complete() {
        // exactly two cycles: 0 -> 1 -> 0 and 0 -> 1 -> 2 -> 0
        let adj = vec![vec![1], vec![0, 2], vec![0]];

        let johnson = all_cycles(&adj, 2);
        assert_eq!(johnson.cycles.len(), 2);
        assert!(!johnson.hit_limit);

        let bounded = bounded_cycles(&adj, 3, 2);
        assert_eq!(bounded.cycles.len(), 2);
        assert!(!bounded.hit_limit);

        assert!(all_cycles(&adj, 1).hit_limit);
        assert!(bounded_cycles(&adj, 3, 1).hit_limit);
    }
}
