//! Sequential ring identifiers threaded across datasets.

use crate::error::{DetectionError, Result};

/// Prefix of every ring id.
pub const RING_PREFIX: &str = "RING_";

/// Issues ring ids from a caller-supplied starting counter.
///
/// The registry is a plain value: build it from the counter carried over
/// from the previous dataset and hand [`RingRegistry::next_counter`] back to
/// the caller once the pass is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingRegistry {
    next: u32,
}

impl Default for RingRegistry {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl RingRegistry {
    pub fn starting_at(counter: u32) -> Self {
        Self { next: counter }
    }

    /// Consume the next counter value and return its ring id.
    ///
    /// Fails once the counter cannot advance, so ids never wrap.
    pub fn issue(&mut self) -> Result<String> {
        let next = self
            .next
            .checked_add(1)
            .ok_or(DetectionError::RingCounterExhausted(self.next))?;
        let id = format_ring_id(self.next);
        self.next = next;
        Ok(id)
    }

    /// Counter value the next dataset should start from.
    pub fn next_counter(&self) -> u32 {
        self.next
    }
}

/// `RING_` followed by the counter, zero-padded to three digits.
pub fn format_ring_id(counter: u32) -> String {
    format!("{}{:03}", RING_PREFIX, counter)
}

/// Numeric suffix of a ring id, if it has one.
pub fn ring_number(ring_id: &str) -> Option<u32> {
    ring_id.strip_prefix(RING_PREFIX)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential_and_padded() {
        let mut registry = RingRegistry::default();
        assert_eq!(registry.issue().unwrap(), "RING_001");
        assert_eq!(registry.issue().unwrap(), "RING_002");
        assert_eq!(registry.next_counter(), 3);
    }

    #[test]
    fn test_counter_continues_from_caller_value() {
        let mut registry = RingRegistry::starting_at(998);
        assert_eq!(registry.issue().unwrap(), "RING_998");
        assert_eq!(registry.issue().unwrap(), "RING_999");
        assert_eq!(registry.issue().unwrap(), "RING_1000");
        assert_eq!(registry.next_counter(), 1001);
    }

    #[test]
    fn test_exhausted_counter_does_not_wrap() {
        let mut registry = RingRegistry::starting_at(u32::MAX - 1);
        assert_eq!(registry.issue().unwrap(), format!("RING_{}", u32::MAX - 1));
        assert_eq!(
            registry.issue(),
            Err(DetectionError::RingCounterExhausted(u32::MAX))
        );
        assert_eq!(registry.next_counter(), u32::MAX);
    }

    #[test]
    fn test_ring_number_round_trip() {
        assert_eq!(ring_number("RING_042"), Some(42));
        assert_eq!(ring_number("CYCLE_042"), None);
    }
}
