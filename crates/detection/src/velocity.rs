//! Single-account transaction bursts.

use std::collections::BTreeMap;

use chrono::Duration;

use crate::fan::ActivityBucket;

/// Senders with at least `min_count` transactions inside an inclusive
/// `window`, in ascending account order.
pub fn find_high_velocity<'a>(
    by_sender: &BTreeMap<&'a str, ActivityBucket>,
    min_count: usize,
    window: Duration,
) -> Vec<&'a str> {
    by_sender
        .iter()
        .filter(|(_, bucket)| bucket.is_burst(min_count, window))
        .map(|(&sender, _)| sender)
        .collect()
}
