//! Single-dataset and batch detection passes.

use std::time::Instant;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::DetectionConfig;
use crate::cycles::{find_cycles, CycleBounds};
use crate::error::Result;
use crate::fan::{find_fan_in, find_fan_out, group_by, Endpoint};
use crate::graph::TransactionGraph;
use crate::prepare::prepare_transactions;
use crate::rings::RingRegistry;
use crate::scoring::ScoreBoard;
use crate::shell::{find_shell_chains, outgoing_counts};
use crate::types::{
    DetectionResult, GraphEdge, GraphNode, GraphProjection, PatternType, RawRecord, Summary, Transaction,
};
use crate::velocity::find_high_velocity;

/// Result for one named dataset of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetResult {
    pub dataset: String,
    pub result: DetectionResult,
}

/// Run every detector over prepared transactions.
///
/// Rings are numbered from `start_ring_counter` in phase order: cycles,
/// fan-in, fan-out, shell chains. Only the first `max_rows` transactions
/// are considered. Fails with `RingCounterExhausted` rather than reusing
/// ids when the counter cannot cover every ring of the pass.
///
/// # Arguments
/// * `transactions` - Transactions in ledger order
/// * `start_ring_counter` - Counter carried over from the previous dataset
/// * `config` - Detector thresholds
pub fn analyze(
    transactions: &[Transaction],
    start_ring_counter: u32,
    config: &DetectionConfig,
) -> Result<DetectionResult> {
    config.validate()?;
    let started = Instant::now();
    let transactions = &transactions[..transactions.len().min(config.max_rows)];

    let graph = TransactionGraph::build(transactions);
    let mut registry = RingRegistry::starting_at(start_ring_counter);
    let mut board = ScoreBoard::new();

    let bounds = CycleBounds {
        min_len: config.cycle_min_len,
        max_len: config.cycle_max_len,
        max_cycles: config.max_cycles,
    };
    for members in find_cycles(&graph, bounds) {
        board.record_ring(&mut registry, PatternType::Cycle, members, config.cycle_score)?;
    }

    let by_receiver = group_by(transactions, Endpoint::Receiver);
    let by_sender = group_by(transactions, Endpoint::Sender);
    let fan_window = Duration::hours(config.fan_window_hours);
    for members in find_fan_in(&by_receiver, config.fan_min_transactions, fan_window) {
        board.record_ring(&mut registry, PatternType::FanIn, members, config.fan_score)?;
    }
    for members in find_fan_out(&by_sender, config.fan_min_transactions, fan_window) {
        board.record_ring(&mut registry, PatternType::FanOut, members, config.fan_score)?;
    }

    let out_counts = outgoing_counts(transactions);
    let hop_range = config.shell_hop_min_out..=config.shell_hop_max_out;
    for members in find_shell_chains(&graph, &out_counts, config.shell_candidate_max_out, hop_range) {
        board.record_ring(&mut registry, PatternType::ShellChain, members, config.shell_score)?;
    }

    let velocity_window = Duration::hours(config.velocity_window_hours);
    for sender in find_high_velocity(&by_sender, config.velocity_min_transactions, velocity_window) {
        board.flag(sender, PatternType::HighVelocity, config.velocity_score);
    }

    let graph_projection = project_graph(&graph, &board);
    let (suspicious_accounts, fraud_rings) = board.into_report();

    let summary = Summary {
        total_accounts_analyzed: graph.node_count(),
        suspicious_accounts_flagged: suspicious_accounts.len(),
        fraud_rings_detected: fraud_rings.len(),
        processing_time_seconds: round_seconds(started.elapsed().as_secs_f64(), 3),
    };

    info!(
        transactions = transactions.len(),
        accounts = summary.total_accounts_analyzed,
        flagged = summary.suspicious_accounts_flagged,
        rings = summary.fraud_rings_detected,
        "Detection pass complete"
    );

    Ok(DetectionResult {
        suspicious_accounts,
        fraud_rings,
        graph: graph_projection,
        summary,
        next_ring_counter: registry.next_counter(),
    })
}

/// Prepare raw ledger rows and run a detection pass over them.
pub fn analyze_records(
    records: &[RawRecord],
    start_ring_counter: u32,
    config: &DetectionConfig,
) -> Result<DetectionResult> {
    let prepared = prepare_transactions(records, config)?;
    analyze(&prepared.transactions, start_ring_counter, config)
}

/// Analyze datasets in order, threading the ring counter from each result
/// into the next so ring ids never collide across the batch.
///
/// The first dataset that fails aborts the batch.
pub fn analyze_batch<N: Into<String>>(
    datasets: impl IntoIterator<Item = (N, Vec<RawRecord>)>,
    start_ring_counter: u32,
    config: &DetectionConfig,
) -> Result<Vec<DatasetResult>> {
    let mut counter = start_ring_counter;
    let mut results = Vec::new();
    for (name, records) in datasets {
        let dataset = name.into();
        let result = analyze_records(&records, counter, config)?;
        info!("Dataset {} used rings up to counter {}", dataset, result.next_ring_counter);
        counter = result.next_ring_counter;
        results.push(DatasetResult { dataset, result });
    }
    Ok(results)
}

fn project_graph(graph: &TransactionGraph, board: &ScoreBoard) -> GraphProjection {
    let nodes = graph
        .accounts()
        .map(|account| GraphNode {
            id: account.to_string(),
            suspicious: board.is_flagged(account),
            ring_id: board.ring_of(account).to_string(),
        })
        .collect();
    let edges = graph
        .edges()
        .map(|(source, target)| GraphEdge {
            source: source.to_string(),
            target: target.to_string(),
        })
        .collect();
    GraphProjection { nodes, edges }
}

/// Round a duration in seconds to `decimals` places.
pub fn round_seconds(seconds: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (seconds * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DetectionError;

    fn record(ts: &str, sender: &str, receiver: &str) -> RawRecord {
        RawRecord::new(ts, sender, receiver)
    }

    #[test]
    fn test_empty_input_yields_empty_result() {
        let result = analyze(&[], 7, &DetectionConfig::default()).unwrap();
        assert!(result.suspicious_accounts.is_empty());
        assert!(result.fraud_rings.is_empty());
        assert_eq!(result.summary.total_accounts_analyzed, 0);
        assert_eq!(result.next_ring_counter, 7);
    }

    #[test]
    fn test_cycle_and_shell_phase_order() {
        // A->B->C->A is both a cycle and a set of shell chains
        let records = vec![
            record("2024-01-01 10:00:00", "A", "B"),
            record("2024-01-01 11:00:00", "B", "C"),
            record("2024-01-01 12:00:00", "C", "A"),
        ];
        let result = analyze_records(&records, 1, &DetectionConfig::default()).unwrap();

        let patterns: Vec<_> = result.fraud_rings.iter().map(|r| r.pattern_type).collect();
        assert_eq!(
            patterns,
            vec![
                PatternType::Cycle,
                PatternType::ShellChain,
                PatternType::ShellChain,
                PatternType::ShellChain,
            ]
        );
        assert_eq!(result.fraud_rings[0].ring_id, "RING_001");
        assert_eq!(result.next_ring_counter, 5);
        assert!(result.suspicious_accounts.iter().all(|a| a.suspicion_score == 100.0));
    }

    #[test]
    fn test_graph_projection_marks_flagged_accounts() {
        let records = vec![
            record("2024-01-01 10:00:00", "A", "B"),
            record("2024-01-01 11:00:00", "B", "C"),
            record("2024-01-01 12:00:00", "C", "A"),
            record("2024-01-01 12:00:00", "X", "Y"),
            record("2024-01-01 12:00:00", "X", "Y"),
        ];
        let config = DetectionConfig {
            shell_hop_max_out: 0,
            shell_hop_min_out: 0,
            ..DetectionConfig::default()
        };
        let result = analyze_records(&records, 1, &config).unwrap();

        assert_eq!(result.graph.nodes.len(), 5);
        assert_eq!(result.graph.edges.len(), 4);
        let x = result.graph.nodes.iter().find(|n| n.id == "X").unwrap();
        assert!(!x.suspicious);
        assert_eq!(x.ring_id, "");
        let a = result.graph.nodes.iter().find(|n| n.id == "A").unwrap();
        assert!(a.suspicious);
        assert_eq!(a.ring_id, "RING_001");
    }

    #[test]
    fn test_invalid_config_rejected_before_analysis() {
        let config = DetectionConfig {
            max_rows: 0,
            ..DetectionConfig::default()
        };
        assert!(analyze(&[], 1, &config).is_err());
    }

    #[test]
    fn test_counter_at_limit_fails_instead_of_wrapping() {
        let records = vec![
            record("2024-01-01 10:00:00", "A", "B"),
            record("2024-01-01 11:00:00", "B", "C"),
            record("2024-01-01 12:00:00", "C", "A"),
        ];
        let err = analyze_records(&records, u32::MAX, &DetectionConfig::default()).unwrap_err();
        assert_eq!(err, DetectionError::RingCounterExhausted(u32::MAX));

        // A ring-free dataset leaves the counter untouched
        let quiet = vec![record("2024-01-01 10:00:00", "A", "B")];
        let result = analyze_records(&quiet, u32::MAX, &DetectionConfig::default()).unwrap();
        assert_eq!(result.next_ring_counter, u32::MAX);
    }

    #[test]
    fn test_oversized_window_is_config_error() {
        let config = DetectionConfig {
            fan_window_hours: i64::MAX,
            ..DetectionConfig::default()
        };
        let records = vec![record("2024-01-01 10:00:00", "A", "B")];
        assert!(matches!(
            analyze_records(&records, 1, &config),
            Err(DetectionError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_round_seconds() {
        assert_eq!(round_seconds(0.123456, 3), 0.123);
        assert_eq!(round_seconds(1.2349, 2), 1.23);
    }
}
