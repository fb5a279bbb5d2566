//! Progression Rules - experience curve, stage thresholds, decay amounts
//!
//! Pure functions shared by the character entity, the ledger adapters
//! and the scheduled jobs. Nothing here touches storage.

use chrono::{DateTime, Duration, Utc};

/// Level at which an egg hatches into a child.
pub const HATCH_LEVEL: i32 = 2;
/// Level at which a child evolves into an adult.
pub const EVOLVE_LEVEL: i32 = 10;

/// Cumulative experience required to reach `level + 1`.
///
/// The per-level increment is `floor(100 * 1.2^(n - 1))`; the threshold
/// for level N is the sum of increments for levels 1..=N. Returns 0 for
/// levels below 1.
pub fn threshold_exp_for_level(level: i32) -> i64 {
    if level < 1 {
        return 0;
    }
    (1..=level)
        .map(|n| (100.0 * 1.2f64.powi(n - 1)) as i64)
        .sum()
}

/// Cumulative experience that was required to reach `level`.
pub fn exp_floor(level: i32) -> i64 {
    threshold_exp_for_level(level - 1)
}

/// Cumulative experience required to leave `level`.
pub fn exp_ceiling(level: i32) -> i64 {
    threshold_exp_for_level(level)
}

/// Tunable bond decay amounts. The exact daily/inactivity figures are a
/// product tuning decision, so they live in configuration rather than
/// as hardcoded invariants.
#[derive(Debug, Clone)]
pub struct DecayConfig {
    /// Bond lost by every character on each daily tick.
    pub daily_amount: i32,
    /// Extra bond lost when the character has been inactive too long.
    pub inactivity_penalty: i32,
    /// Inactivity window before the penalty applies.
    pub inactive_after: Duration,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            daily_amount: 10,
            inactivity_penalty: 10,
            inactive_after: Duration::hours(24),
        }
    }
}

impl DecayConfig {
    /// Total bond to subtract for one tick at `now`.
    pub fn decay_amount(&self, last_activity_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i32 {
        let mut total = self.daily_amount;
        if let Some(last) = last_activity_at {
            if last <= now - self.inactive_after {
                total += self.inactivity_penalty;
            }
        }
        total
    }
}

/// Feeding economics: cost in food per feed, bond gained per feed, and
/// the food floor below which feeding is blocked.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub food_cost: i32,
    pub bond_gain: i32,
    /// Feeding is refused while food_count is at or below this.
    pub min_food_to_feed: i32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            food_cost: 5,
            bond_gain: 10,
            min_food_to_feed: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_regression_values() {
        assert_eq!(threshold_exp_for_level(1), 100);
        assert_eq!(threshold_exp_for_level(2), 220);
        assert_eq!(threshold_exp_for_level(3), 364);
    }

    #[test]
    fn test_threshold_below_level_one_is_zero() {
        assert_eq!(threshold_exp_for_level(0), 0);
        assert_eq!(threshold_exp_for_level(-3), 0);
    }

    #[test]
    fn test_thresholds_chain_continuously() {
        for level in 1..=30 {
            assert!(exp_ceiling(level) > exp_floor(level));
            assert_eq!(exp_floor(level + 1), exp_ceiling(level));
        }
    }

    #[test]
    fn test_decay_amount_without_inactivity() {
        let config = DecayConfig::default();
        let now = Utc::now();
        assert_eq!(config.decay_amount(Some(now), now), 10);
        assert_eq!(config.decay_amount(None, now), 10);
    }

    #[test]
    fn test_decay_amount_with_inactivity_penalty() {
        let config = DecayConfig::default();
        let now = Utc::now();
        let stale = now - Duration::hours(25);
        assert_eq!(config.decay_amount(Some(stale), now), 20);
    }

    #[test]
    fn test_decay_amount_just_inside_window() {
        let config = DecayConfig::default();
        let now = Utc::now();
        let recent = now - Duration::hours(23);
        assert_eq!(config.decay_amount(Some(recent), now), 10);
    }
}
