//! Fan-in and fan-out (smurfing) detection over raw transactions.

use std::collections::{BTreeMap, HashSet};

use chrono::{Duration, NaiveDateTime};

use crate::types::Transaction;

/// Running statistics for all transactions sharing one endpoint.
#[derive(Debug, Clone)]
pub struct ActivityBucket {
    pub count: usize,
    pub first_seen: NaiveDateTime,
    pub last_seen: NaiveDateTime,
    /// Distinct counterparties in first-seen order.
    pub counterparties: Vec<String>,
    seen: HashSet<String>,
}

impl ActivityBucket {
    fn new(timestamp: NaiveDateTime) -> Self {
        Self {
            count: 0,
            first_seen: timestamp,
            last_seen: timestamp,
            counterparties: Vec::new(),
            seen: HashSet::new(),
        }
    }

    fn record(&mut self, timestamp: NaiveDateTime, counterparty: &str) {
        self.count += 1;
        self.first_seen = self.first_seen.min(timestamp);
        self.last_seen = self.last_seen.max(timestamp);
        if self.seen.insert(counterparty.to_string()) {
            self.counterparties.push(counterparty.to_string());
        }
    }

    /// Time between the earliest and latest transaction.
    pub fn span(&self) -> Duration {
        self.last_seen - self.first_seen
    }

    /// At least `min_count` transactions within an inclusive window.
    pub fn is_burst(&self, min_count: usize, window: Duration) -> bool {
        self.count >= min_count && self.span() <= window
    }
}

/// Which endpoint transactions are grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Sender,
    Receiver,
}

/// Group transactions by one endpoint in a single pass, keyed in ascending
/// account order.
pub fn group_by(transactions: &[Transaction], endpoint: Endpoint) -> BTreeMap<&str, ActivityBucket> {
    let mut groups: BTreeMap<&str, ActivityBucket> = BTreeMap::new();
    for tx in transactions {
        let (key, counterparty) = match endpoint {
            Endpoint::Sender => (tx.sender_id.as_str(), tx.receiver_id.as_str()),
            Endpoint::Receiver => (tx.receiver_id.as_str(), tx.sender_id.as_str()),
        };
        groups
            .entry(key)
            .or_insert_with(|| ActivityBucket::new(tx.timestamp))
            .record(tx.timestamp, counterparty);
    }
    groups
}

/// Fan-in rings: distinct senders followed by the receiver.
pub fn find_fan_in(
    by_receiver: &BTreeMap<&str, ActivityBucket>,
    min_count: usize,
    window: Duration,
) -> Vec<Vec<String>> {
    by_receiver
        .iter()
        .filter(|(_, bucket)| bucket.is_burst(min_count, window))
        .map(|(receiver, bucket)| {
            let mut members = bucket.counterparties.clone();
            members.push(receiver.to_string());
            members
        })
        .collect()
}

/// Fan-out rings: the sender followed by distinct receivers.
pub fn find_fan_out(
    by_sender: &BTreeMap<&str, ActivityBucket>,
    min_count: usize,
    window: Duration,
) -> Vec<Vec<String>> {
    by_sender
        .iter()
        .filter(|(_, bucket)| bucket.is_burst(min_count, window))
        .map(|(sender, bucket)| {
            let mut members = Vec::with_capacity(bucket.counterparties.len() + 1);
            members.push(sender.to_string());
            members.extend(bucket.counterparties.iter().cloned());
            members
        })
        .collect()
}
