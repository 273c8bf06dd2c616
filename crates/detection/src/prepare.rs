//! Timestamp filtering, id validation and the row cap.

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::config::DetectionConfig;
use crate::error::{DetectionError, Result};
use crate::types::{RawRecord, Transaction};

/// Only timestamps in exactly this shape are analyzed.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Transactions ready for a detection pass.
#[derive(Debug, Clone, Default)]
pub struct PreparedInput {
    pub transactions: Vec<Transaction>,
    /// Rows dropped for an unparseable timestamp.
    pub dropped_rows: usize,
    /// Valid-timestamp rows beyond the row cap.
    pub truncated_rows: usize,
}

/// Parse a timestamp in the fixed ledger format.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).ok()
}

/// Filter, validate and cap raw ledger rows, preserving their order.
///
/// Rows with a bad timestamp are dropped silently. A kept row with an empty
/// sender or receiver rejects the whole input. Rows past `max_rows` are
/// ignored without validation.
pub fn prepare_transactions(records: &[RawRecord], config: &DetectionConfig) -> Result<PreparedInput> {
    let mut prepared = PreparedInput::default();

    for (index, record) in records.iter().enumerate() {
        let Some(timestamp) = parse_timestamp(&record.timestamp) else {
            prepared.dropped_rows += 1;
            continue;
        };

        if prepared.transactions.len() >= config.max_rows {
            prepared.truncated_rows += 1;
            continue;
        }

        let row = index + 1;
        if record.sender_id.trim().is_empty() {
            return Err(DetectionError::InvalidRecord { row, field: "sender_id" });
        }
        if record.receiver_id.trim().is_empty() {
            return Err(DetectionError::InvalidRecord { row, field: "receiver_id" });
        }

        prepared.transactions.push(Transaction {
            timestamp,
            sender_id: record.sender_id.clone(),
            receiver_id: record.receiver_id.clone(),
        });
    }

    if prepared.dropped_rows > 0 {
        warn!("Dropped {} rows with unparseable timestamps", prepared.dropped_rows);
    }
    if prepared.truncated_rows > 0 {
        warn!(
            "Ignoring {} rows beyond the {} row cap",
            prepared.truncated_rows, config.max_rows
        );
    }
    debug!("Prepared {} transactions", prepared.transactions.len());

    Ok(prepared)
}
