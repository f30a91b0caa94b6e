//! Client-owned reward state.
//!
//! One `RewardState` is owned by the engagement controller and handed to
//! views by reference. It is the only place points, streak and the milestone
//! flag are mutated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::milestone::MilestoneDetector;
use super::reward::{RewardCalculator, RewardConfig};
use super::streak::{StreakConfig, StreakReset, StreakTracker};

/// Read-only view for display binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardSnapshot {
    pub points: u64,
    pub streak: u32,
    pub milestone_reached: bool,
    pub double_points: bool,
}

/// What a single local credit changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedCredit {
    pub earned_points: u64,
    pub points: u64,
    pub streak: u32,
    pub milestone_hit: bool,
}

#[derive(Debug, Clone)]
pub struct RewardState {
    points: u64,
    streak: StreakTracker,
    milestone: MilestoneDetector,
    /// Fixed at construction from the local weekday.
    double_points: bool,
    calculator: RewardCalculator,
}

impl RewardState {
    pub fn new(
        rewards: RewardConfig,
        streak: StreakConfig,
        now: DateTime<Utc>,
        is_weekend: bool,
    ) -> Self {
        Self {
            points: 0,
            streak: StreakTracker::with_config(streak, now),
            milestone: MilestoneDetector::new(rewards.milestone_points),
            double_points: is_weekend,
            calculator: RewardCalculator::with_config(rewards),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn points(&self) -> u64 {
        self.points
    }

    pub fn streak(&self) -> u32 {
        self.streak.current_streak()
    }

    pub fn milestone_reached(&self) -> bool {
        self.milestone.is_reached()
    }

    pub fn double_points(&self) -> bool {
        self.double_points
    }

    pub fn calculator(&self) -> &RewardCalculator {
        &self.calculator
    }

    pub fn streak_tracker(&self) -> &StreakTracker {
        &self.streak
    }

    pub fn snapshot(&self) -> RewardSnapshot {
        RewardSnapshot {
            points: self.points,
            streak: self.streak(),
            milestone_reached: self.milestone_reached(),
            double_points: self.double_points,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Optimistically add `earned` points and one streak step.
    pub fn apply_credit(&mut self, earned: u64) -> AppliedCredit {
        let milestone_hit = self.milestone.check(self.points, earned);
        self.points = self.points.saturating_add(earned);
        let streak = self.streak.increment();
        AppliedCredit {
            earned_points: earned,
            points: self.points,
            streak,
            milestone_hit,
        }
    }

    /// The streak-day reward path: base plus a capped per-day bonus,
    /// doubled on weekends.
    pub fn earn_streak_reward(&mut self) -> AppliedCredit {
        let earned = self
            .calculator
            .streak_reward(self.streak(), self.double_points);
        self.apply_credit(earned)
    }

    /// Replace points and streak with authoritative remote values.
    pub fn hydrate(&mut self, points: u64, streak: u32) {
        self.points = points;
        self.streak.set_streak(streak);
    }

    /// Run the streak reset schedule.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<StreakReset> {
        self.streak.tick(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 6, 9, 0, 0).unwrap()
    }

    fn state(is_weekend: bool) -> RewardState {
        RewardState::new(RewardConfig::default(), StreakConfig::default(), t0(), is_weekend)
    }

    #[test]
    fn credit_updates_points_and_streak() {
        let mut s = state(false);
        let applied = s.apply_credit(10);
        assert_eq!(applied.points, 10);
        assert_eq!(applied.streak, 1);
        assert!(!applied.milestone_hit);
    }

    #[test]
    fn milestone_fires_once_over_two_crossings() {
        let mut s = state(false);
        assert!(!s.apply_credit(60).milestone_hit);
        assert!(s.apply_credit(60).milestone_hit);
        assert!(!s.apply_credit(60).milestone_hit);
        assert_eq!(s.points(), 180);
        assert!(s.milestone_reached());
    }

    #[test]
    fn streak_reward_uses_current_streak_then_increments() {
        let mut s = state(false);
        assert_eq!(s.earn_streak_reward().earned_points, 10);
        assert_eq!(s.earn_streak_reward().earned_points, 11);
        assert_eq!(s.streak(), 2);
    }

    #[test]
    fn streak_reward_doubles_on_weekend() {
        let mut s = state(true);
        s.hydrate(0, 7);
        assert_eq!(s.earn_streak_reward().earned_points, 30);
    }

    #[test]
    fn hydrate_then_tick_resets_streak() {
        let mut s = state(false);
        s.hydrate(40, 3);
        assert_eq!(s.snapshot().points, 40);
        let reset = s.tick(t0() + Duration::hours(24)).unwrap();
        assert_eq!(reset.streak_before, 3);
        assert_eq!(s.streak(), 0);
        assert_eq!(s.points(), 40);
    }
}
