use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engagement::TriggerPolicy;

/// Which remote confirmation a report refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationKind {
    MarkRead,
    AddPoints,
}

/// How a credit was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditTrigger {
    /// User returned to the feed.
    Manual,
    /// Deferred threshold credit fired while the article was open.
    Threshold,
}

/// Every state change in the rewards engine produces an Event.
/// The UI layer drains them for display binding and notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        session_id: Uuid,
        article_id: String,
        policy: TriggerPolicy,
        at: DateTime<Utc>,
    },
    /// A prior uncredited session was discarded by opening another article
    /// or tearing the view down.
    SessionAbandoned {
        session_id: Uuid,
        article_id: String,
        dwell_secs: f64,
        at: DateTime<Utc>,
    },
    /// Session ended below the threshold.
    SessionNotQualified {
        session_id: Uuid,
        article_id: String,
        dwell_secs: f64,
        at: DateTime<Utc>,
    },
    /// Optimistic local credit applied.
    RewardCredited {
        session_id: Uuid,
        article_id: String,
        earned_points: u64,
        bonus_points: u64,
        reading_time_secs: u64,
        points: u64,
        streak: u32,
        trigger: CreditTrigger,
        at: DateTime<Utc>,
    },
    /// Streak-day reward applied through the reward state.
    StreakRewardEarned {
        earned_points: u64,
        points: u64,
        streak: u32,
        at: DateTime<Utc>,
    },
    /// Last unread article of the loaded feed was read.
    FeedCompleted {
        bonus_points: u64,
        at: DateTime<Utc>,
    },
    MilestoneReached {
        threshold: u64,
        points: u64,
        at: DateTime<Utc>,
    },
    StreakReset {
        streak_before: u32,
        at: DateTime<Utc>,
    },
    ConfirmationSucceeded {
        session_id: Uuid,
        kind: ConfirmationKind,
        message: String,
        at: DateTime<Utc>,
    },
    /// Remote confirmation failed; local state stays ahead of the store.
    ConfirmationFailed {
        session_id: Uuid,
        kind: ConfirmationKind,
        error: String,
        queued_for_retry: bool,
        at: DateTime<Utc>,
    },
    /// Points and streak replaced by authoritative remote values.
    StateHydrated {
        points: u64,
        streak: u32,
        at: DateTime<Utc>,
    },
}
