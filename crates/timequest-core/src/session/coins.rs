//! Coin balance and the once-per-round reward latch.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::lessons::LessonId;

/// Monotonic coin counter for a session.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoinBalance {
    coins: u64,
}

impl CoinBalance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn coins(&self) -> u64 {
        self.coins
    }

    /// Credit `amount` and return the new balance.
    pub fn add(&mut self, amount: u32) -> u64 {
        self.coins = self.coins.saturating_add(u64::from(amount));
        self.coins
    }
}

/// Guards a lesson's completion bonus so it is paid at most once per round,
/// however many qualifying submissions arrive.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RewardLatch {
    claimed: bool,
}

impl RewardLatch {
    pub fn is_claimed(&self) -> bool {
        self.claimed
    }

    /// Pay `amount` into `coins` unless already claimed.
    pub fn claim(&mut self, lesson: LessonId, amount: u32, coins: &mut CoinBalance) -> Option<Event> {
        if self.claimed {
            return None;
        }
        self.claimed = true;
        let balance = coins.add(amount);
        tracing::info!(%lesson, amount, balance, "completion bonus awarded");
        Some(Event::CoinsAwarded {
            lesson,
            amount,
            balance,
            at: Utc::now(),
        })
    }

    /// Re-arm for a new round.
    pub fn reset(&mut self) {
        self.claimed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latch_pays_once_until_reset() {
        let mut coins = CoinBalance::new();
        let mut latch = RewardLatch::default();

        assert!(latch.claim(LessonId::TimeBlocking, 20, &mut coins).is_some());
        assert!(latch.claim(LessonId::TimeBlocking, 20, &mut coins).is_none());
        assert_eq!(coins.coins(), 20);

        latch.reset();
        assert!(latch.claim(LessonId::TimeBlocking, 20, &mut coins).is_some());
        assert_eq!(coins.coins(), 40);
    }

    #[test]
    fn add_returns_balance() {
        let mut coins = CoinBalance::new();
        assert_eq!(coins.add(5), 5);
        assert_eq!(coins.add(35), 40);
    }
}
