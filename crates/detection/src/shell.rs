//! Two-hop layering chains through low-activity accounts.

use std::collections::HashMap;
use std::ops::RangeInclusive;

use crate::graph::TransactionGraph;
use crate::types::Transaction;

/// Outgoing transaction count per account, over raw rows.
pub fn outgoing_counts(transactions: &[Transaction]) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for tx in transactions {
        *counts.entry(tx.sender_id.as_str()).or_insert(0) += 1;
    }
    counts
}

/// Find every path `start -> hop -> end` with `end != start` where `start`
/// sends at most `candidate_max_out` transactions and all three accounts send
/// a count within `hop_range`.
///
/// Paths are not deduplicated. They come out in graph node order for the
/// start account, then successor order for each hop.
pub fn find_shell_chains(
    graph: &TransactionGraph,
    out_counts: &HashMap<&str, usize>,
    candidate_max_out: usize,
    hop_range: RangeInclusive<usize>,
) -> Vec<Vec<String>> {
    let count_of = |node: usize| out_counts.get(graph.account(node)).copied().unwrap_or(0);
    let qualifies = |node: usize| hop_range.contains(&count_of(node));

    let mut chains = Vec::new();
    for start in 0..graph.node_count() {
        if count_of(start) > candidate_max_out {
            continue;
        }
        for &hop in graph.successors(start) {
            for &end in graph.successors(hop) {
                if end == start {
                    continue;
                }
                if qualifies(start) && qualifies(hop) && qualifies(end) {
                    chains.push(vec![
                        graph.account(start).to_string(),
                        graph.account(hop).to_string(),
                        graph.account(end).to_string(),
                    ]);
                }
            }
        }
    }
    chains
}
