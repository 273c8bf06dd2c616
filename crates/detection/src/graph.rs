//! Directed account graph built from transactions.

use std::collections::{HashMap, HashSet};

use crate::types::Transaction;

/// Directed graph with one node per account and one edge per distinct
/// (sender, receiver) pair.
///
/// Nodes are numbered in first-appearance order (sender before receiver,
/// row by row); successor lists keep first-seen edge order.
#[derive(Debug, Clone, Default)]
pub struct TransactionGraph {
    accounts: Vec<String>,
    index: HashMap<String, usize>,
    successors: Vec<Vec<usize>>,
    edges: HashSet<(usize, usize)>,
}

impl TransactionGraph {
    /// Build the graph from an ordered transaction sequence.
    pub fn build(transactions: &[Transaction]) -> Self {
        let mut graph = Self::default();
        for tx in transactions {
            let sender = graph.intern(&tx.sender_id);
            let receiver = graph.intern(&tx.receiver_id);
            if graph.edges.insert((sender, receiver)) {
                graph.successors[sender].push(receiver);
            }
        }
        graph
    }

    fn intern(&mut self, account: &str) -> usize {
        if let Some(&id) = self.index.get(account) {
            return id;
        }
        let id = self.accounts.len();
        self.accounts.push(account.to_string());
        self.index.insert(account.to_string(), id);
        self.successors.push(Vec::new());
        id
    }

    pub fn node_count(&self) -> usize {
        self.accounts.len()
    }

    #[cfg(test)]
    fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Account id for a node index.
    pub fn account(&self, node: usize) -> &str {
        &self.accounts[node]
    }

    #[cfg(test)]
    fn node_of(&self, account: &str) -> Option<usize> {
        self.index.get(account).copied()
    }

    /// Accounts in node order.
    pub fn accounts(&self) -> impl Iterator<Item = &str> {
        self.accounts.iter().map(String::as_str)
    }

    /// Successors of `node` in first-seen edge order.
    pub fn successors(&self, node: usize) -> &[usize] {
        &self.successors[node]
    }

    #[cfg(test)]
    fn has_edge(&self, from: usize, to: usize) -> bool {
        self.edges.contains(&(from, to))
    }

    /// Deduplicated edges, grouped by source in node order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.successors.iter().enumerate().flat_map(move |(from, targets)| {
            targets
                .iter()
                .map(move |&to| (self.accounts[from].as_str(), self.accounts[to].as_str()))
        })
    }
}
