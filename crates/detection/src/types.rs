//! Transaction records and detection result models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A ledger row as supplied by ingest, before timestamp parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub timestamp: String,
    pub sender_id: String,
    pub receiver_id: String,
}

impl RawRecord {
    pub fn new(
        timestamp: impl Into<String>,
        sender_id: impl Into<String>,
        receiver_id: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            sender_id: sender_id.into(),
            receiver_id: receiver_id.into(),
        }
    }
}

/// A transaction that survived timestamp parsing and id validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub timestamp: NaiveDateTime,
    pub sender_id: String,
    pub receiver_id: String,
}

/// Pattern tags attached to accounts and rings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    Cycle,
    FanIn,
    FanOut,
    ShellChain,
    HighVelocity,
}

impl PatternType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternType::Cycle => "cycle",
            PatternType::FanIn => "fan_in",
            PatternType::FanOut => "fan_out",
            PatternType::ShellChain => "shell_chain",
            PatternType::HighVelocity => "high_velocity",
        }
    }
}

/// A named group of accounts linked by one detected pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudRing {
    pub ring_id: String,
    /// Discovery order; duplicates are kept.
    pub member_accounts: Vec<String>,
    pub pattern_type: PatternType,
}

/// One flagged account in the final report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuspiciousAccount {
    pub account_id: String,
    /// Clamped to [0, 100].
    pub suspicion_score: f64,
    pub detected_patterns: Vec<PatternType>,
    /// Last ring assigned to the account, or empty.
    pub ring_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub suspicious: bool,
    pub ring_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
}

/// Node/edge projection of the transaction graph for visualisation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphProjection {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_accounts_analyzed: usize,
    pub suspicious_accounts_flagged: usize,
    pub fraud_rings_detected: usize,
    pub processing_time_seconds: f64,
}

/// Complete output of one detection pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub suspicious_accounts: Vec<SuspiciousAccount>,
    pub fraud_rings: Vec<FraudRing>,
    pub graph: GraphProjection,
    pub summary: Summary,
    /// Starting counter for the next dataset in a batch.
    pub next_ring_counter: u32,
}
