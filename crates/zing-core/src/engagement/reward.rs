//! Reward calculation.
//!
//! Two independent formulas are kept side by side:
//!
//! - [`RewardCalculator::click_reward`]: the per-click incremental bonus the
//!   feed applies when a read qualifies (+10% of base per prior qualifying
//!   read in the current feed, uncapped).
//! - [`RewardCalculator::streak_reward`]: the streak-day bonus of the reward
//!   state (+10% of base per streak day, capped at five days).
//!
//! Both double on weekends. They are not composed with each other.

use serde::{Deserialize, Serialize};

/// Tunables for both reward formulas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardConfig {
    #[serde(default = "default_base_points")]
    pub base_points: u64,
    /// Fraction of base added per prior qualifying read.
    #[serde(default = "default_bonus_step")]
    pub click_bonus_step: f64,
    /// Fraction of base added per streak day.
    #[serde(default = "default_bonus_step")]
    pub streak_bonus_step: f64,
    /// Streak days beyond this add no further bonus.
    #[serde(default = "default_streak_bonus_cap")]
    pub streak_bonus_cap: u32,
    #[serde(default = "default_weekend_multiplier")]
    pub weekend_multiplier: u64,
    #[serde(default = "default_milestone_points")]
    pub milestone_points: u64,
    /// Awarded once when the last unread article of a loaded feed is read.
    #[serde(default = "default_feed_completion_bonus")]
    pub feed_completion_bonus: u64,
}

fn default_base_points() -> u64 {
    10
}
fn default_bonus_step() -> f64 {
    0.1
}
fn default_streak_bonus_cap() -> u32 {
    5
}
fn default_weekend_multiplier() -> u64 {
    2
}
fn default_milestone_points() -> u64 {
    100
}
fn default_feed_completion_bonus() -> u64 {
    20
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            base_points: default_base_points(),
            click_bonus_step: default_bonus_step(),
            streak_bonus_step: default_bonus_step(),
            streak_bonus_cap: default_streak_bonus_cap(),
            weekend_multiplier: default_weekend_multiplier(),
            milestone_points: default_milestone_points(),
            feed_completion_bonus: default_feed_completion_bonus(),
        }
    }
}

/// Pure reward formulas. Holds no state beyond its configuration.
#[derive(Debug, Clone, Default)]
pub struct RewardCalculator {
    config: RewardConfig,
}

impl RewardCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RewardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    /// Bonus multiplier for the feed path: `prior_reads * step`, uncapped.
    pub fn click_bonus_multiplier(&self, prior_qualifying_reads: u32) -> f64 {
        prior_qualifying_reads as f64 * self.config.click_bonus_step
    }

    /// Points for a qualifying read in the feed.
    ///
    /// `round(base + base * multiplier)`, then the weekend multiplier on the
    /// rounded session reward.
    pub fn click_reward(&self, prior_qualifying_reads: u32, is_weekend: bool) -> u64 {
        let base = self.config.base_points as f64;
        let earned = (base + base * self.click_bonus_multiplier(prior_qualifying_reads)).round() as u64;
        self.apply_weekend(earned, is_weekend)
    }

    /// Bonus multiplier for the streak-day path, clamped at the cap.
    pub fn streak_bonus_multiplier(&self, streak: u32) -> f64 {
        streak.min(self.config.streak_bonus_cap) as f64 * self.config.streak_bonus_step
    }

    /// Points for the streak-day reward path.
    pub fn streak_reward(&self, streak: u32, is_weekend: bool) -> u64 {
        let base = self.config.base_points as f64;
        let earned = (base + base * self.streak_bonus_multiplier(streak)).round() as u64;
        self.apply_weekend(earned, is_weekend)
    }

    fn apply_weekend(&self, earned: u64, is_weekend: bool) -> u64 {
        if is_weekend {
            earned.saturating_mul(self.config.weekend_multiplier)
        } else {
            earned
        }
    }
}
