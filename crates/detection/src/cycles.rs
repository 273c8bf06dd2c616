//! Bounded elementary cycle enumeration.
//!
//! Every elementary cycle is reported exactly once, rooted at its
//! lexicographically smallest account. Roots are tried in ascending account
//! order and successors are explored in ascending account order, so the cycle
//! sequence (and therefore which cycles survive the cap) depends only on the
//! graph, never on input row order.

use crate::graph::TransactionGraph;

/// Length bounds and cap for one enumeration.
#[derive(Debug, Clone, Copy)]
pub struct CycleBounds {
    pub min_len: usize,
    pub max_len: usize,
    pub max_cycles: usize,
}

struct Search<'a> {
    graph: &'a TransactionGraph,
    rank: Vec<usize>,
    sorted_successors: Vec<Vec<usize>>,
    bounds: CycleBounds,
    on_path: Vec<bool>,
    path: Vec<usize>,
    found: Vec<Vec<String>>,
}

impl Search<'_> {
    fn full(&self) -> bool {
        self.found.len() >= self.bounds.max_cycles
    }

    fn extend(&mut self, root: usize, node: usize) {
        for i in 0..self.sorted_successors[node].len() {
            if self.full() {
                return;
            }
            let next = self.sorted_successors[node][i];
            if next == root {
                if self.path.len() >= self.bounds.min_len {
                    let members: Vec<String> = self
                        .path
                        .iter()
                        .map(|&n| self.graph.account(n).to_string())
                        .collect();
                    self.found.push(members);
                }
                continue;
            }
            if self.rank[next] < self.rank[root]
                || self.on_path[next]
                || self.path.len() >= self.bounds.max_len
            {
                continue;
            }
            self.on_path[next] = true;
            self.path.push(next);
            self.extend(root, next);
            self.path.pop();
            self.on_path[next] = false;
        }
    }
}

/// Enumerate elementary cycles with `min_len..=max_len` members, stopping as
/// soon as `max_cycles` have been found.
///
/// Each cycle is listed starting from its smallest account, in edge order.
pub fn find_cycles(graph: &TransactionGraph, bounds: CycleBounds) -> Vec<Vec<String>> {
    let n = graph.node_count();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| graph.account(a).cmp(graph.account(b)));

    let mut rank = vec![0; n];
    for (position, &node) in order.iter().enumerate() {
        rank[node] = position;
    }

    let sorted_successors = (0..n)
        .map(|node| {
            let mut next = graph.successors(node).to_vec();
            next.sort_by_key(|&s| rank[s]);
            next
        })
        .collect();

    let mut search = Search {
        graph,
        rank,
        sorted_successors,
        bounds,
        on_path: vec![false; n],
        path: Vec::with_capacity(bounds.max_len),
        found: Vec::new(),
    };

    for root in order {
        if search.full() {
            break;
        }
        search.on_path[root] = true;
        search.path.push(root);
        search.extend(root, root);
        search.path.pop();
        search.on_path[root] = false;
    }

    search.found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Transaction;
    use chrono::NaiveDate;

    const BOUNDS: CycleBounds = CycleBounds {
        min_len: 3,
        max_len: 5,
        max_cycles: 50,
    };

    fn graph(edges: &[(&str, &str)]) -> TransactionGraph {
        let timestamp = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let txs: Vec<Transaction> = edges
            .iter()
            .map(|(s, r)| Transaction {
                timestamp,
                sender_id: s.to_string(),
                receiver_id: r.to_string(),
            })
            .collect();
        TransactionGraph::build(&txs)
    }

    #[test]
    fn test_triangle_found_once_from_smallest_account() {
        let g = graph(&[("C", "A"), ("A", "B"), ("B", "C")]);
        let cycles = find_cycles(&g, BOUNDS);
        assert_eq!(cycles, vec![vec!["A", "B", "C"]]);
    }

    #[test]
    fn test_short_and_long_cycles_excluded() {
        // 2-cycle, self-loop and a 6-cycle
        let g = graph(&[
            ("A", "B"),
            ("B", "A"),
            ("S", "S"),
            ("P1", "P2"),
            ("P2", "P3"),
            ("P3", "P4"),
            ("P4", "P5"),
            ("P5", "P6"),
            ("P6", "P1"),
        ]);
        assert!(find_cycles(&g, BOUNDS).is_empty());
    }

    #[test]
    fn test_five_cycle_included() {
        let g = graph(&[("A", "B"), ("B", "C"), ("C", "D"), ("D", "E"), ("E", "A")]);
        assert_eq!(find_cycles(&g, BOUNDS).len(), 1);
    }

    #[test]
    fn test_overlapping_cycles_enumerated_in_order() {
        // A->B->C->A and A->B->D->A share the edge A->B
        let g = graph(&[("A", "B"), ("B", "D"), ("D", "A"), ("B", "C"), ("C", "A")]);
        let cycles = find_cycles(&g, BOUNDS);
        assert_eq!(cycles, vec![vec!["A", "B", "C"], vec!["A", "B", "D"]]);
    }

    #[test]
    fn test_cap_stops_enumeration() {
        let mut edges = Vec::new();
        let names: Vec<[String; 3]> = (0..10)
            .map(|i| [format!("T{i:02}a"), format!("T{i:02}b"), format!("T{i:02}c")])
            .collect();
        for [a, b, c] in &names {
            edges.push((a.as_str(), b.as_str()));
            edges.push((b.as_str(), c.as_str()));
            edges.push((c.as_str(), a.as_str()));
        }
        let g = graph(&edges);
        let bounds = CycleBounds { max_cycles: 4, ..BOUNDS };
        let cycles = find_cycles(&g, bounds);
        assert_eq!(cycles.len(), 4);
        assert_eq!(cycles[3][0], "T03a");
    }

    #[test]
    fn test_result_independent_of_row_order() {
        let forward = graph(&[("A", "B"), ("B", "C"), ("C", "A"), ("C", "D"), ("D", "A")]);
        let backward = graph(&[("D", "A"), ("C", "D"), ("C", "A"), ("B", "C"), ("A", "B")]);
        assert_eq!(find_cycles(&forward, BOUNDS), find_cycles(&backward, BOUNDS));
    }
}
