//! Ingest error types.

use thiserror::Error;

/// Errors raised while reading a ledger file.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Required column absent from the header row.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Malformed CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
