//! Fraud ring detection over sender/receiver transaction ledgers.
//!
//! A detection pass is a pure function of the prepared transactions and the
//! starting ring counter. Every account map is rebuilt per call; only the
//! ring counter is threaded between calls by the caller.

pub mod analyzer;
pub mod config;
pub mod cycles;
pub mod error;
pub mod fan;
pub mod graph;
pub mod prepare;
pub mod rings;
pub mod scoring;
pub mod shell;
pub mod types;
pub mod velocity;

pub use analyzer::{analyze, analyze_batch, analyze_records, DatasetResult};
pub use config::DetectionConfig;
pub use error::{DetectionError, Result};
pub use prepare::{prepare_transactions, PreparedInput};
pub use rings::RingRegistry;
pub use types::{DetectionResult, FraudRing, PatternType, RawRecord, SuspiciousAccount, Transaction};
