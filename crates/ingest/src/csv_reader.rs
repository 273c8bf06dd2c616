//! Ledger CSV parsing into raw records.

use std::io::Read;
use std::path::Path;

use ringwatch_detection::RawRecord;
use tracing::{debug, info};

use crate::error::IngestError;

/// Columns every ledger must carry, in any order. Extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 3] = ["timestamp", "sender_id", "receiver_id"];

/// Read ledger rows from any reader with a header row.
///
/// Field values are returned verbatim; timestamp parsing and id checks
/// happen in the detection crate.
pub fn read_ledger<R: Read>(reader: R) -> Result<Vec<RawRecord>, IngestError> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers()?.clone();

    let mut positions = [0usize; 3];
    for (slot, column) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h.trim() == column)
            .ok_or_else(|| IngestError::MissingColumn(column.to_string()))?;
    }
    debug!("Ledger column positions: {:?}", positions);

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let field = |i: usize| row.get(positions[i]).unwrap_or("").to_string();
        records.push(RawRecord {
            timestamp: field(0),
            sender_id: field(1),
            receiver_id: field(2),
        });
    }

    Ok(records)
}

/// Read a ledger from an in-memory CSV document.
pub fn read_ledger_str(body: &str) -> Result<Vec<RawRecord>, IngestError> {
    read_ledger(body.as_bytes())
}

/// Read a ledger file from disk.
pub fn read_ledger_path<P: AsRef<Path>>(path: P) -> Result<Vec<RawRecord>, IngestError> {
    let file = std::fs::File::open(path.as_ref())?;
    let records = read_ledger(file)?;
    info!("Read {} rows from {:?}", records.len(), path.as_ref());
    Ok(records)
}
