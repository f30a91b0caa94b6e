//! Qualifying-read streak with a fixed-interval reset.
//!
//! The streak grows by one on every qualifying credit. It is reset to zero
//! on a fixed schedule measured from tracker initialization (every 24 hours
//! by default), independent of when the last qualifying read happened.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Configuration for the streak reset schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakConfig {
    #[serde(default = "default_reset_interval_hours")]
    pub reset_interval_hours: u32,
}

fn default_reset_interval_hours() -> u32 {
    24
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            reset_interval_hours: default_reset_interval_hours(),
        }
    }
}

impl StreakConfig {
    pub fn reset_interval(&self) -> Duration {
        Duration::hours(i64::from(self.reset_interval_hours.max(1)))
    }
}

/// `at + by`, saturating at the latest representable instant.
fn saturating_add(at: DateTime<Utc>, by: Duration) -> DateTime<Utc> {
    at.checked_add_signed(by).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakState {
    Idle,
    Active(u32),
}

/// A scheduled reset that actually took place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakReset {
    pub streak_before: u32,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct StreakTracker {
    streak: u32,
    initialized_at: DateTime<Utc>,
    interval: Duration,
    next_reset_at: DateTime<Utc>,
}

impl StreakTracker {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self::with_config(StreakConfig::default(), now)
    }

    pub fn with_config(config: StreakConfig, now: DateTime<Utc>) -> Self {
        let interval = config.reset_interval();
        Self {
            streak: 0,
            initialized_at: now,
            interval,
            next_reset_at: saturating_add(now, interval),
        }
    }

    pub fn current_streak(&self) -> u32 {
        self.streak
    }

    pub fn state(&self) -> StreakState {
        match self.streak {
            0 => StreakState::Idle,
            n => StreakState::Active(n),
        }
    }

    pub fn initialized_at(&self) -> DateTime<Utc> {
        self.initialized_at
    }

    pub fn next_reset_at(&self) -> DateTime<Utc> {
        self.next_reset_at
    }

    /// Qualifying credit. Returns the new streak.
    pub fn increment(&mut self) -> u32 {
        self.streak = self.streak.saturating_add(1);
        self.streak
    }

    /// Overwrite from an authoritative value (login hydrate).
    pub fn set_streak(&mut self, streak: u32) {
        self.streak = streak;
    }

    /// Run the reset schedule up to `now`.
    ///
    /// Missed intervals are skipped over; at most one reset is reported.
    /// Returns `None` when no reset boundary was crossed. A boundary crossed
    /// while the streak is already zero still advances the schedule but is
    /// not reported.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<StreakReset> {
        if now < self.next_reset_at {
            return None;
        }

        let boundary = self.catch_up(now);
        let streak_before = std::mem::take(&mut self.streak);
        (streak_before > 0).then_some(StreakReset {
            streak_before,
            at: boundary,
        })
    }

    /// Advance `next_reset_at` past `now`, returning the last crossed boundary.
    fn catch_up(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        let elapsed = (now - self.next_reset_at).num_milliseconds();
        let step = self.interval.num_milliseconds().max(1);
        let skipped = elapsed / step;
        let boundary = self.next_reset_at + Duration::milliseconds(skipped * step);
        self.next_reset_at = saturating_add(boundary, self.interval);
        boundary
    }
}
