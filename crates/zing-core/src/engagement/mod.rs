//! Reading-engagement rewards engine.
//!
//! Leaf components are plain state machines driven by a caller-supplied
//! `now`; [`EngagementController`] wires them together per article view.

mod controller;
mod dwell;
mod feed;
mod milestone;
mod reward;
mod state;
mod streak;

pub use controller::{
    CloseDecision, CreditOutcome, CreditPlan, EngagementController, EngineSettings,
    ScheduledCredit, SessionConfig, TickOutcome, TriggerPolicy,
};
pub use dwell::{DwellTimer, ReadingSession, StoppedSession, QUALIFYING_READ_THRESHOLD_SECS};
pub use feed::{FeedArticle, FeedTracker};
pub use milestone::MilestoneDetector;
pub use reward::{RewardCalculator, RewardConfig};
pub use state::{AppliedCredit, RewardSnapshot, RewardState};
pub use streak::{StreakConfig, StreakReset, StreakState, StreakTracker};
