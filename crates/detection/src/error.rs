//! Detection error types.

use thiserror::Error;

/// Errors raised while preparing or analyzing a dataset.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DetectionError {
    /// A row carried an empty account identifier.
    #[error("Invalid record at row {row}: {field} is empty")]
    InvalidRecord { row: usize, field: &'static str },

    /// No ring id is left after this counter value.
    #[error("Ring counter exhausted at {0}")]
    RingCounterExhausted(u32),

    /// Thresholds that cannot drive a detection pass.
    #[error("Invalid detection config: {0}")]
    InvalidConfig(String),
}

/// Result type for detection operations.
pub type Result<T> = std::result::Result<T, DetectionError>;
