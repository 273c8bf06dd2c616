//! Structured logging setup.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging with environment-based filtering.
///
/// Logs go to stderr so JSON results on stdout stay machine-readable.
///
/// # Arguments
/// * `log_level` - Optional filter override (e.g., "info", "ringwatch_detection=debug")
/// * `json` - Emit JSON lines instead of human-readable text
pub fn init_logging(log_level: Option<&str>, json: bool) -> anyhow::Result<()> {
    let filter = match log_level {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()?;
    }

    Ok(())
}
