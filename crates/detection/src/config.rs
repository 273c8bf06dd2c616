//! Detection thresholds and score weights.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{DetectionError, Result};

/// Thresholds for every detector in a pass.
///
/// Missing keys in a config file fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Rows analyzed after the timestamp filter.
    pub max_rows: usize,
    /// Cycle rings emitted per pass.
    pub max_cycles: usize,
    pub cycle_min_len: usize,
    pub cycle_max_len: usize,
    pub fan_min_transactions: usize,
    pub fan_window_hours: i64,
    /// Outgoing count at or below which an account may start a shell chain.
    pub shell_candidate_max_out: usize,
    pub shell_hop_min_out: usize,
    pub shell_hop_max_out: usize,
    pub velocity_min_transactions: usize,
    pub velocity_window_hours: i64,
    pub cycle_score: f64,
    pub fan_score: f64,
    pub shell_score: f64,
    pub velocity_score: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            max_rows: 7000,
            max_cycles: 50,
            cycle_min_len: 3,
            cycle_max_len: 5,
            fan_min_transactions: 10,
            fan_window_hours: 72,
            shell_candidate_max_out: 5,
            shell_hop_min_out: 1,
            shell_hop_max_out: 3,
            velocity_min_transactions: 5,
            velocity_window_hours: 24,
            cycle_score: 40.0,
            fan_score: 30.0,
            shell_score: 25.0,
            velocity_score: 15.0,
        }
    }
}

impl DetectionConfig {
    /// Reject thresholds that cannot drive a pass.
    pub fn validate(&self) -> Result<()> {
        if self.max_rows == 0 {
            return Err(DetectionError::InvalidConfig("max_rows must be positive".into()));
        }
        if self.cycle_min_len < 2 || self.cycle_min_len > self.cycle_max_len {
            return Err(DetectionError::InvalidConfig(format!(
                "cycle length range {}..={} is empty or below 2",
                self.cycle_min_len, self.cycle_max_len
            )));
        }
        if self.shell_hop_min_out > self.shell_hop_max_out {
            return Err(DetectionError::InvalidConfig(format!(
                "shell hop range {}..={} is empty",
                self.shell_hop_min_out, self.shell_hop_max_out
            )));
        }
        for (name, hours) in [
            ("fan_window_hours", self.fan_window_hours),
            ("velocity_window_hours", self.velocity_window_hours),
        ] {
            if hours < 0 || Duration::try_hours(hours).is_none() {
                return Err(DetectionError::InvalidConfig(format!(
                    "{name} {hours} is not a representable time window"
                )));
            }
        }
        let weights = [self.cycle_score, self.fan_score, self.shell_score, self.velocity_score];
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(DetectionError::InvalidConfig("score weights must be finite".into()));
        }
        Ok(())
    }
}
