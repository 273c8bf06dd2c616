//! CSV ingest for transaction ledgers.

pub mod csv_reader;
pub mod error;

pub use csv_reader::{read_ledger, read_ledger_path, read_ledger_str, REQUIRED_COLUMNS};
pub use error::IngestError;
