//! # Zing Core Library
//!
//! Core business logic for the reading-engagement rewards of the Inbox Zing
//! news client. The same library backs the `zing` CLI and any UI shell.
//!
//! ## Architecture
//!
//! - **Engagement**: wall-clock state machines (dwell timer, streak tracker,
//!   milestone detector) that the caller drives with `tick()`, wired together
//!   by the [`EngagementController`]
//! - **Reconcile**: optimistic local credit first, then concurrent remote
//!   confirmations that are never rolled back
//! - **Remote**: the point and read-state store behind the [`RewardStore`]
//!   trait, with an HTTP client and an in-memory store
//! - **Storage**: TOML configuration and the data directory
//!
//! ## Key Components
//!
//! - [`EngagementController`]: one article view at a time, credit exactly once
//! - [`RewardCalculator`]: per-click and streak-day reward formulas
//! - [`ReconciliationCoordinator`]: remote confirmation and optional retry queue
//! - [`Config`]: application configuration management

pub mod clock;
pub mod engagement;
pub mod error;
pub mod events;
pub mod reconcile;
pub mod remote;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engagement::{
    CloseDecision, CreditOutcome, CreditPlan, EngagementController, EngineSettings,
    FeedArticle, RewardCalculator, RewardConfig, RewardSnapshot, TriggerPolicy,
};
pub use error::{ConfigError, CoreError, RemoteError, ValidationError};
pub use events::{ConfirmationKind, CreditTrigger, Event};
pub use reconcile::{ConfirmationReport, PendingConfirmations, ReconciliationCoordinator};
pub use remote::{HttpRewardStore, MemoryRewardStore, ReadingStatistics, RewardStore};
pub use storage::Config;
