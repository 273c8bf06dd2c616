//! Observability for ringwatch: logging, metrics and JSON reports.

pub mod logging;
pub mod metrics;
pub mod report;

pub use logging::init_logging;
pub use metrics::Metrics;
pub use report::write_report;
