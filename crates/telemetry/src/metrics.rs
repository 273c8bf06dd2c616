//! Prometheus metrics for detection passes.

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use ringwatch_detection::DetectionResult;

/// Metrics collector for the ringwatch service.
///
/// Each instance owns its registry, so several collectors can coexist in
/// one process.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    datasets_analyzed: IntCounter,
    transactions_analyzed: IntCounter,
    rows_dropped: IntCounter,
    rows_truncated: IntCounter,
    rings_detected: IntCounterVec,
    suspicious_accounts: IntCounter,
    analysis_latency: Histogram,
}

impl Metrics {
    /// Create a new metrics instance.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let datasets_analyzed = IntCounter::new(
            "ringwatch_datasets_analyzed_total",
            "Total number of datasets analyzed",
        )?;
        let transactions_analyzed = IntCounter::new(
            "ringwatch_transactions_analyzed_total",
            "Total number of transactions fed to detection passes",
        )?;
        let rows_dropped = IntCounter::new(
            "ringwatch_rows_dropped_total",
            "Rows dropped for an unparseable timestamp",
        )?;
        let rows_truncated = IntCounter::new(
            "ringwatch_rows_truncated_total",
            "Rows ignored beyond the per-dataset row cap",
        )?;
        let rings_detected = IntCounterVec::new(
            Opts::new("ringwatch_rings_detected_total", "Fraud rings detected"),
            &["pattern"],
        )?;
        let suspicious_accounts = IntCounter::new(
            "ringwatch_suspicious_accounts_total",
            "Suspicious accounts flagged",
        )?;
        let analysis_latency = Histogram::with_opts(HistogramOpts::new(
            "ringwatch_analysis_seconds",
            "Detection pass latency in seconds",
        ))?;

        registry.register(Box::new(datasets_analyzed.clone()))?;
        registry.register(Box::new(transactions_analyzed.clone()))?;
        registry.register(Box::new(rows_dropped.clone()))?;
        registry.register(Box::new(rows_truncated.clone()))?;
        registry.register(Box::new(rings_detected.clone()))?;
        registry.register(Box::new(suspicious_accounts.clone()))?;
        registry.register(Box::new(analysis_latency.clone()))?;

        Ok(Self {
            registry,
            datasets_analyzed,
            transactions_analyzed,
            rows_dropped,
            rows_truncated,
            rings_detected,
            suspicious_accounts,
            analysis_latency,
        })
    }

    /// Record row accounting from record preparation.
    pub fn observe_rows(&self, analyzed: usize, dropped: usize, truncated: usize) {
        self.transactions_analyzed.inc_by(analyzed as u64);
        self.rows_dropped.inc_by(dropped as u64);
        self.rows_truncated.inc_by(truncated as u64);
    }

    /// Record the outcome of one detection pass.
    pub fn observe_result(&self, result: &DetectionResult) {
        self.datasets_analyzed.inc();
        self.suspicious_accounts
            .inc_by(result.summary.suspicious_accounts_flagged as u64);
        for ring in &result.fraud_rings {
            self.rings_detected
                .with_label_values(&[ring.pattern_type.as_str()])
                .inc();
        }
        self.analysis_latency
            .observe(result.summary.processing_time_seconds);
    }

    /// Get Prometheus metrics as a string.
    pub fn gather(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringwatch_detection::{analyze_records, DetectionConfig, RawRecord};

    #[test]
    fn test_ring_counts_labelled_by_pattern() {
        let metrics = Metrics::new().unwrap();
        let records = vec![
            RawRecord::new("2024-01-01 10:00:00", "A", "B"),
            RawRecord::new("2024-01-01 11:00:00", "B", "C"),
            RawRecord::new("2024-01-01 12:00:00", "C", "A"),
        ];
        let result = analyze_records(&records, 1, &DetectionConfig::default()).unwrap();
        metrics.observe_rows(3, 0, 0);
        metrics.observe_result(&result);

        let text = metrics.gather().unwrap();
        assert!(text.contains("ringwatch_rings_detected_total{pattern=\"cycle\"} 1"));
        assert!(text.contains("ringwatch_rings_detected_total{pattern=\"shell_chain\"} 3"));
        assert!(text.contains("ringwatch_datasets_analyzed_total 1"));
    }

    #[test]
    fn test_instances_are_independent() {
        let first = Metrics::new().unwrap();
        let second = Metrics::new().unwrap();
        first.observe_rows(5, 1, 0);
        assert!(second.gather().unwrap().contains("ringwatch_transactions_analyzed_total 0"));
    }
}
