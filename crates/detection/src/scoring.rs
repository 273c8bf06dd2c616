//! Per-account score accumulation and ring bookkeeping.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::Result;
use crate::rings::RingRegistry;
use crate::types::{FraudRing, PatternType, SuspiciousAccount};

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

#[derive(Debug, Clone)]
struct AccountState {
    account_id: String,
    score: f64,
    patterns: Vec<PatternType>,
    ring_id: Option<String>,
}

/// Accumulates detector contributions for one pass.
///
/// Scores only ever grow by addition; pattern tags are appended; the ring id
/// is overwritten by the most recent ring an account joins.
#[derive(Debug, Clone, Default)]
pub struct ScoreBoard {
    accounts: Vec<AccountState>,
    index: HashMap<String, usize>,
    rings: Vec<FraudRing>,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    fn state_mut(&mut self, account: &str) -> &mut AccountState {
        let slot = match self.index.get(account) {
            Some(&slot) => slot,
            None => {
                let slot = self.accounts.len();
                self.accounts.push(AccountState {
                    account_id: account.to_string(),
                    score: 0.0,
                    patterns: Vec::new(),
                    ring_id: None,
                });
                self.index.insert(account.to_string(), slot);
                slot
            }
        };
        &mut self.accounts[slot]
    }

    /// Add `weight` and a `pattern` tag to one account.
    pub fn flag(&mut self, account: &str, pattern: PatternType, weight: f64) {
        let state = self.state_mut(account);
        state.score += weight;
        state.patterns.push(pattern);
    }

    /// Register a ring for `members`, scoring each distinct member once.
    ///
    /// The member list is stored as discovered, duplicates included.
    pub fn record_ring(
        &mut self,
        registry: &mut RingRegistry,
        pattern: PatternType,
        members: Vec<String>,
        weight: f64,
    ) -> Result<&FraudRing> {
        let ring_id = registry.issue()?;
        let mut seen = HashSet::new();
        for member in &members {
            if !seen.insert(member.as_str()) {
                continue;
            }
            self.flag(member, pattern, weight);
            self.state_mut(member).ring_id = Some(ring_id.clone());
        }

        debug!("{} {} with {} members", ring_id, pattern.as_str(), members.len());
        self.rings.push(FraudRing {
            ring_id,
            member_accounts: members,
            pattern_type: pattern,
        });
        Ok(&self.rings[self.rings.len() - 1])
    }

    pub fn is_flagged(&self, account: &str) -> bool {
        self.index.contains_key(account)
    }

    /// Last ring id assigned to `account`, or empty.
    pub fn ring_of(&self, account: &str) -> &str {
        self.index
            .get(account)
            .and_then(|&slot| self.accounts[slot].ring_id.as_deref())
            .unwrap_or("")
    }

    /// Clamp scores and order accounts by score, highest first.
    ///
    /// Ties keep the order in which accounts were first flagged.
    pub fn into_report(self) -> (Vec<SuspiciousAccount>, Vec<FraudRing>) {
        let mut accounts: Vec<SuspiciousAccount> = self
            .accounts
            .into_iter()
            .map(|state| SuspiciousAccount {
                account_id: state.account_id,
                suspicion_score: state.score.clamp(MIN_SCORE, MAX_SCORE),
                detected_patterns: state.patterns,
                ring_id: state.ring_id.unwrap_or_default(),
            })
            .collect();
        accounts.sort_by(|a, b| b.suspicion_score.total_cmp(&a.suspicion_score));
        (accounts, self.rings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn test_scores_accumulate_and_clamp() {
        let mut board = ScoreBoard::new();
        let mut registry = RingRegistry::default();
        for _ in 0..3 {
            board
                .record_ring(&mut registry, PatternType::Cycle, members(&["A", "B", "C"]), 40.0)
                .unwrap();
        }

        let (accounts, rings) = board.into_report();
        assert_eq!(rings.len(), 3);
        assert_eq!(accounts[0].suspicion_score, 100.0);
        assert_eq!(accounts[0].detected_patterns.len(), 3);
    }

    #[test]
    fn test_last_ring_wins() {
        let mut board = ScoreBoard::new();
        let mut registry = RingRegistry::default();
        board
            .record_ring(&mut registry, PatternType::Cycle, members(&["A", "B", "C"]), 40.0)
            .unwrap();
        board
            .record_ring(&mut registry, PatternType::ShellChain, members(&["C", "D", "E"]), 25.0)
            .unwrap();

        assert_eq!(board.ring_of("A"), "RING_001");
        assert_eq!(board.ring_of("C"), "RING_002");
        assert_eq!(board.ring_of("Z"), "");
    }

    #[test]
    fn test_duplicate_members_scored_once() {
        let mut board = ScoreBoard::new();
        let mut registry = RingRegistry::default();
        let ring = board
            .record_ring(&mut registry, PatternType::FanIn, members(&["A", "R", "R"]), 30.0)
            .unwrap()
            .clone();
        assert_eq!(ring.member_accounts.len(), 3);

        let (accounts, _) = board.into_report();
        let r = accounts.iter().find(|a| a.account_id == "R").unwrap();
        assert_eq!(r.suspicion_score, 30.0);
        assert_eq!(r.detected_patterns, vec![PatternType::FanIn]);
    }

    #[test]
    fn test_ties_keep_first_touch_order() {
        let mut board = ScoreBoard::new();
        board.flag("X", PatternType::HighVelocity, 15.0);
        board.flag("Y", PatternType::HighVelocity, 15.0);
        board.flag("Z", PatternType::Cycle, 40.0);
        board.flag("W", PatternType::HighVelocity, 15.0);

        let (accounts, _) = board.into_report();
        let order: Vec<_> = accounts.iter().map(|a| a.account_id.as_str()).collect();
        assert_eq!(order, vec!["Z", "X", "Y", "W"]);
        assert!(accounts.iter().all(|a| a.ring_id.is_empty()));
    }
}
