//! Engagement session controller.
//!
//! Owns the reward state and drives one article view at a time:
//!
//! ```text
//! open_article ──> [session active] ──> begin_close ──> Credit | NotQualified | AlreadyCredited
//!                        │
//!                        └── tick (fire-on-threshold, due) ──> Credit, session stays open
//! ```
//!
//! Every path that yields a [`CreditPlan`] marks the session credited before
//! returning, so the remote confirmations for a session can only be started
//! once. The async wrappers ([`EngagementController::on_article_closed`],
//! [`EngagementController::poll`]) then hand the plan to the coordinator.
//!
//! ## Usage
//!
//! ```ignore
//! let mut controller = EngagementController::new(coordinator, SystemClock, settings);
//! controller.hydrate().await?;
//! controller.open_article("https://news.example/a")?;
//! // while the article is open:
//! controller.poll().await;
//! // back to the feed:
//! let outcome = controller.on_article_closed().await;
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::dwell::{DwellTimer, ReadingSession, QUALIFYING_READ_THRESHOLD_SECS};
use super::feed::{FeedArticle, FeedTracker};
use super::reward::RewardConfig;
use super::state::{AppliedCredit, RewardSnapshot, RewardState};
use super::streak::{StreakConfig, StreakReset};
use crate::clock::{Clock, SystemClock};
use crate::error::{CoreError, ValidationError};
use crate::events::{CreditTrigger, Event};
use crate::reconcile::{ConfirmationReport, ReconciliationCoordinator};
use crate::remote::RewardStore;

/// When a qualifying read is credited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerPolicy {
    /// Dwell is measured only when the user returns to the feed.
    #[default]
    #[serde(alias = "poll-on-exit")]
    PollOnExit,
    /// A deferred credit fires once the threshold elapses with the article
    /// still open.
    #[serde(alias = "fire-on-threshold")]
    FireOnThreshold,
}

impl fmt::Display for TriggerPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerPolicy::PollOnExit => f.write_str("poll_on_exit"),
            TriggerPolicy::FireOnThreshold => f.write_str("fire_on_threshold"),
        }
    }
}

impl FromStr for TriggerPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('-', "_").as_str() {
            "poll_on_exit" => Ok(TriggerPolicy::PollOnExit),
            "fire_on_threshold" => Ok(TriggerPolicy::FireOnThreshold),
            other => Err(ValidationError::InvalidValue {
                field: "trigger".into(),
                message: format!("unknown trigger policy '{other}'"),
            }),
        }
    }
}

/// Session-level settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_threshold_secs")]
    pub threshold_secs: u64,
    #[serde(default)]
    pub trigger: TriggerPolicy,
}

fn default_threshold_secs() -> u64 {
    QUALIFYING_READ_THRESHOLD_SECS
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            threshold_secs: default_threshold_secs(),
            trigger: TriggerPolicy::default(),
        }
    }
}

/// Everything the controller needs besides its collaborators.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineSettings {
    pub session: SessionConfig,
    pub rewards: RewardConfig,
    pub streak: StreakConfig,
}

/// An optimistic credit that still has to be confirmed remotely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditPlan {
    pub session_id: Uuid,
    pub article_id: String,
    /// Per-click reward for this read. This is the amount sent to add-points.
    pub earned_points: u64,
    /// Feed-completion bonus, applied to local points only. Usually zero.
    pub bonus_points: u64,
    pub reading_time_secs: u64,
    pub milestone_hit: bool,
    pub trigger: CreditTrigger,
}

/// Deferred threshold credit for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledCredit {
    pub session_id: Uuid,
    pub due_at: DateTime<Utc>,
}

/// Synchronous result of ending a session.
#[derive(Debug, Clone, PartialEq)]
pub enum CloseDecision {
    /// Nothing was open.
    NoSession,
    /// Dwell stayed under the threshold.
    NotQualified { dwell_secs: f64 },
    /// The deferred threshold credit already ran for this session.
    AlreadyCredited,
    Credit(CreditPlan),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    pub streak_reset: Option<StreakReset>,
    pub credit: Option<CreditPlan>,
}

/// What the feed view shows after a session ends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreditOutcome {
    pub earned_points: u64,
    pub bonus_points: u64,
    pub milestone_hit: bool,
    /// `None` when no credit happened.
    pub confirmation: Option<ConfirmationReport>,
}

impl CreditOutcome {
    fn credited(plan: &CreditPlan, report: ConfirmationReport) -> Self {
        Self {
            earned_points: plan.earned_points,
            bonus_points: plan.bonus_points,
            milestone_hit: plan.milestone_hit,
            confirmation: Some(report),
        }
    }

    pub fn was_credited(&self) -> bool {
        self.confirmation.is_some()
    }
}

pub struct EngagementController<S, C = SystemClock> {
    clock: C,
    session: SessionConfig,
    timer: DwellTimer,
    scheduled: Option<ScheduledCredit>,
    state: RewardState,
    feed: FeedTracker,
    coordinator: ReconciliationCoordinator<S>,
    events: Vec<Event>,
}

impl<S: RewardStore, C: Clock> EngagementController<S, C> {
    /// Weekend doubling is decided here, once, from the clock's weekday.
    pub fn new(coordinator: ReconciliationCoordinator<S>, clock: C, settings: EngineSettings) -> Self {
        let now = clock.now();
        let state = RewardState::new(settings.rewards, settings.streak, now, clock.is_weekend());
        Self {
            clock,
            session: settings.session,
            timer: DwellTimer::new(),
            scheduled: None,
            state,
            feed: FeedTracker::new(),
            coordinator,
            events: Vec::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &RewardState {
        &self.state
    }

    pub fn snapshot(&self) -> RewardSnapshot {
        self.state.snapshot()
    }

    pub fn policy(&self) -> TriggerPolicy {
        self.session.trigger
    }

    pub fn threshold_secs(&self) -> u64 {
        self.session.threshold_secs
    }

    pub fn active_session(&self) -> Option<&ReadingSession> {
        self.timer.session()
    }

    pub fn elapsed_seconds(&self) -> Option<f64> {
        self.timer.elapsed_seconds(self.clock.now())
    }

    pub fn scheduled_credit(&self) -> Option<ScheduledCredit> {
        self.scheduled
    }

    pub fn feed(&self) -> &FeedTracker {
        &self.feed
    }

    pub fn coordinator(&self) -> &ReconciliationCoordinator<S> {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut ReconciliationCoordinator<S> {
        &mut self.coordinator
    }

    /// Take all events produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Replace the loaded feed. Resets the per-click bonus counter.
    pub fn load_feed(&mut self, articles: Vec<FeedArticle>) {
        debug!(articles = articles.len(), "feed loaded");
        self.feed.load(articles);
    }

    /// Start a reading session for `article_id`.
    ///
    /// A prior session that was never credited is abandoned without credit
    /// and its deferred credit, if any, is cancelled.
    pub fn open_article(&mut self, article_id: &str) -> Result<Uuid, ValidationError> {
        if article_id.trim().is_empty() {
            return Err(ValidationError::EmptyArticleId);
        }

        let now = self.clock.now();
        self.scheduled = None;

        let (session_id, abandoned) = self.timer.start(article_id, now);
        if let Some(abandoned) = abandoned {
            self.abandon(abandoned, now);
        }

        if self.session.trigger == TriggerPolicy::FireOnThreshold {
            match self.threshold_due_at(now) {
                Some(due_at) => self.scheduled = Some(ScheduledCredit { session_id, due_at }),
                None => warn!(
                    threshold_secs = self.session.threshold_secs,
                    "threshold out of range; no deferred credit scheduled"
                ),
            }
        }

        debug!(session = %session_id, article = article_id, policy = %self.session.trigger, "session started");
        self.events.push(Event::SessionStarted {
            session_id,
            article_id: article_id.to_string(),
            policy: self.session.trigger,
            at: now,
        });
        Ok(session_id)
    }

    /// End the active session (user returned to the feed).
    ///
    /// Applies the optimistic credit when the dwell qualifies. No remote
    /// call is made here.
    pub fn begin_close(&mut self) -> CloseDecision {
        let now = self.clock.now();
        self.scheduled = None;

        let Some(stopped) = self.timer.stop(now) else {
            debug!("close requested with no active session");
            return CloseDecision::NoSession;
        };
        let session = stopped.session;

        if session.credited {
            debug!(session = %session.session_id, "session already credited");
            return CloseDecision::AlreadyCredited;
        }

        if stopped.elapsed_secs < self.session.threshold_secs as f64 {
            debug!(
                session = %session.session_id,
                dwell_secs = stopped.elapsed_secs,
                "not enough time spent reading to earn points"
            );
            self.events.push(Event::SessionNotQualified {
                session_id: session.session_id,
                article_id: session.article_id,
                dwell_secs: stopped.elapsed_secs,
                at: now,
            });
            return CloseDecision::NotQualified {
                dwell_secs: stopped.elapsed_secs,
            };
        }

        CloseDecision::Credit(self.apply_credit(
            session.session_id,
            session.article_id,
            stopped.elapsed_secs,
            CreditTrigger::Manual,
            now,
        ))
    }

    /// Advance time-driven state: the streak reset schedule and, under
    /// fire-on-threshold, the deferred credit of the active session.
    pub fn tick(&mut self) -> TickOutcome {
        let now = self.clock.now();

        let streak_reset = self.state.tick(now);
        if let Some(reset) = &streak_reset {
            info!(streak_before = reset.streak_before, "streak reset");
            self.events.push(Event::StreakReset {
                streak_before: reset.streak_before,
                at: reset.at,
            });
        }

        TickOutcome {
            streak_reset,
            credit: self.fire_scheduled(now),
        }
    }

    /// Drop the active session and its deferred credit (view torn down).
    pub fn teardown(&mut self) {
        let now = self.clock.now();
        self.scheduled = None;
        if let Some(session) = self.timer.clear().filter(|s| !s.credited) {
            self.abandon(session, now);
        }
    }

    /// The streak-day reward path. Local only.
    pub fn earn_streak_reward(&mut self) -> AppliedCredit {
        let now = self.clock.now();
        let applied = self.state.earn_streak_reward();
        info!(earned = applied.earned_points, streak = applied.streak, "streak reward earned");
        self.events.push(Event::StreakRewardEarned {
            earned_points: applied.earned_points,
            points: applied.points,
            streak: applied.streak,
            at: now,
        });
        if applied.milestone_hit {
            self.push_milestone(applied.points, now);
        }
        applied
    }

    // ── Async ────────────────────────────────────────────────────────

    /// End the active session and, if it qualified, confirm remotely.
    pub async fn on_article_closed(&mut self) -> CreditOutcome {
        match self.begin_close() {
            CloseDecision::Credit(plan) => {
                let report = self.confirm(&plan).await;
                CreditOutcome::credited(&plan, report)
            }
            _ => CreditOutcome::default(),
        }
    }

    /// `tick`, then confirm any credit it produced.
    pub async fn poll(&mut self) -> Option<CreditOutcome> {
        let plan = self.tick().credit?;
        let report = self.confirm(&plan).await;
        Some(CreditOutcome::credited(&plan, report))
    }

    /// Send the remote confirmations for an already-applied plan.
    pub async fn confirm(&mut self, plan: &CreditPlan) -> ConfirmationReport {
        let report = self.coordinator.confirm(plan, self.clock.now()).await;
        self.events.extend(report.events(self.clock.now()));
        report
    }

    /// Replace local points and streak with the store's values (login).
    pub async fn hydrate(&mut self) -> Result<RewardSnapshot, CoreError> {
        let store = self.coordinator.store();
        let username = self.coordinator.username();
        let (points, streak) = tokio::join!(
            store.current_points(username),
            store.current_streak(username),
        );
        let (points, streak) = (points?, streak?);

        self.state.hydrate(points, streak);
        info!(points, streak, "reward state hydrated");
        self.events.push(Event::StateHydrated {
            points,
            streak,
            at: self.clock.now(),
        });
        Ok(self.state.snapshot())
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// `now + threshold`, or `None` when that instant is not representable.
    fn threshold_due_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let secs = i64::try_from(self.session.threshold_secs).ok()?;
        now.checked_add_signed(Duration::try_seconds(secs)?)
    }

    fn fire_scheduled(&mut self, now: DateTime<Utc>) -> Option<CreditPlan> {
        let scheduled = self.scheduled?;
        if now < scheduled.due_at {
            return None;
        }
        self.scheduled = None;

        let session = self.timer.session_mut()?;
        if session.session_id != scheduled.session_id || session.credited {
            return None;
        }
        session.credited = true;
        let session_id = session.session_id;
        let article_id = session.article_id.clone();
        let elapsed = session.elapsed_secs_at(now);

        Some(self.apply_credit(session_id, article_id, elapsed, CreditTrigger::Threshold, now))
    }

    fn apply_credit(
        &mut self,
        session_id: Uuid,
        article_id: String,
        elapsed_secs: f64,
        trigger: CreditTrigger,
        now: DateTime<Utc>,
    ) -> CreditPlan {
        let calculator = self.state.calculator();
        let earned = calculator.click_reward(self.feed.prior_reads(), self.state.double_points());
        let completion_bonus = calculator.config().feed_completion_bonus;

        let completed_feed = self.feed.record_qualifying_read(&article_id);
        let bonus = if completed_feed { completion_bonus } else { 0 };
        let applied = self.state.apply_credit(earned.saturating_add(bonus));
        let reading_time_secs = elapsed_secs.round() as u64;

        info!(
            session = %session_id,
            article = %article_id,
            earned,
            bonus,
            reading_time_secs,
            points = applied.points,
            streak = applied.streak,
            "reading reward credited"
        );

        self.events.push(Event::RewardCredited {
            session_id,
            article_id: article_id.clone(),
            earned_points: earned,
            bonus_points: bonus,
            reading_time_secs,
            points: applied.points,
            streak: applied.streak,
            trigger,
            at: now,
        });
        if completed_feed {
            self.events.push(Event::FeedCompleted {
                bonus_points: bonus,
                at: now,
            });
        }
        if applied.milestone_hit {
            self.push_milestone(applied.points, now);
        }

        CreditPlan {
            session_id,
            article_id,
            earned_points: earned,
            bonus_points: bonus,
            reading_time_secs,
            milestone_hit: applied.milestone_hit,
            trigger,
        }
    }

    fn push_milestone(&mut self, points: u64, now: DateTime<Utc>) {
        let threshold = self.state.calculator().config().milestone_points;
        info!(threshold, points, "milestone reached");
        self.events.push(Event::MilestoneReached {
            threshold,
            points,
            at: now,
        });
    }

    fn abandon(&mut self, session: ReadingSession, now: DateTime<Utc>) {
        let dwell_secs = session.elapsed_secs_at(now);
        debug!(session = %session.session_id, dwell_secs, "session abandoned without credit");
        self.events.push(Event::SessionAbandoned {
            session_id: session.session_id,
            article_id: session.article_id,
            dwell_secs,
            at: now,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::events::ConfirmationKind;
    use crate::remote::MemoryRewardStore;
    use chrono::TimeZone;

    // 2024-03-06 is a Wednesday.
    fn weekday_clock() -> ManualClock {
        ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 6, 9, 0, 0).unwrap())
    }

    fn controller(
        clock: &ManualClock,
        policy: TriggerPolicy,
    ) -> (EngagementController<MemoryRewardStore, ManualClock>, MemoryRewardStore) {
        let store = MemoryRewardStore::new();
        let settings = EngineSettings {
            session: SessionConfig {
                trigger: policy,
                ..Default::default()
            },
            ..Default::default()
        };
        let coordinator = ReconciliationCoordinator::new(store.clone(), "alice");
        (EngagementController::new(coordinator, clock.clone(), settings), store)
    }

    #[test]
    fn empty_article_id_is_rejected() {
        let clock = weekday_clock();
        let (mut c, _) = controller(&clock, TriggerPolicy::PollOnExit);
        assert!(matches!(c.open_article("  "), Err(ValidationError::EmptyArticleId)));
        assert!(c.active_session().is_none());
    }

    #[test]
    fn close_without_session_is_noop() {
        let clock = weekday_clock();
        let (mut c, _) = controller(&clock, TriggerPolicy::PollOnExit);
        assert_eq!(c.begin_close(), CloseDecision::NoSession);
        assert!(c.drain_events().is_empty());
    }

    #[test]
    fn short_read_is_not_credited() {
        let clock = weekday_clock();
        let (mut c, _) = controller(&clock, TriggerPolicy::PollOnExit);
        c.open_article("a").unwrap();
        clock.advance_secs(5);
        assert_eq!(c.begin_close(), CloseDecision::NotQualified { dwell_secs: 5.0 });
        assert_eq!(c.snapshot().points, 0);
        assert_eq!(c.snapshot().streak, 0);
    }

    #[test]
    fn qualifying_close_sets_plan_and_state() {
        let clock = weekday_clock();
        let (mut c, _) = controller(&clock, TriggerPolicy::PollOnExit);
        c.open_article("a").unwrap();
        clock.advance_secs(25);
        let CloseDecision::Credit(plan) = c.begin_close() else {
            panic!("expected credit");
        };
        assert_eq!(plan.earned_points, 10);
        assert_eq!(plan.reading_time_secs, 25);
        assert_eq!(plan.trigger, CreditTrigger::Manual);
        assert_eq!(c.snapshot().points, 10);
        assert_eq!(c.snapshot().streak, 1);
        // Session is gone; a second close is a no-op.
        assert_eq!(c.begin_close(), CloseDecision::NoSession);
    }

    #[test]
    fn threshold_fire_then_manual_close_credits_once() {
        let clock = weekday_clock();
        let (mut c, _) = controller(&clock, TriggerPolicy::FireOnThreshold);
        let session_id = c.open_article("a").unwrap();
        assert_eq!(c.scheduled_credit().unwrap().session_id, session_id);

        clock.advance_secs(19);
        assert!(c.tick().credit.is_none());
        clock.advance_secs(1);
        let plan = c.tick().credit.expect("threshold credit");
        assert_eq!(plan.trigger, CreditTrigger::Threshold);
        assert!(c.active_session().unwrap().credited);
        assert!(c.scheduled_credit().is_none());

        clock.advance_secs(10);
        assert!(c.tick().credit.is_none());
        assert_eq!(c.begin_close(), CloseDecision::AlreadyCredited);
        assert_eq!(c.snapshot().points, 10);
        assert_eq!(c.snapshot().streak, 1);
    }

    #[test]
    fn manual_close_cancels_deferred_credit() {
        let clock = weekday_clock();
        let (mut c, _) = controller(&clock, TriggerPolicy::FireOnThreshold);
        c.open_article("a").unwrap();
        clock.advance_secs(5);
        assert!(matches!(c.begin_close(), CloseDecision::NotQualified { .. }));
        assert!(c.scheduled_credit().is_none());
        clock.advance_secs(60);
        assert!(c.tick().credit.is_none());
    }

    #[test]
    fn new_article_cancels_stale_schedule_and_abandons_prior() {
        let clock = weekday_clock();
        let (mut c, _) = controller(&clock, TriggerPolicy::FireOnThreshold);
        let first = c.open_article("a").unwrap();
        clock.advance_secs(10);
        let second = c.open_article("b").unwrap();
        assert_eq!(c.scheduled_credit().unwrap().session_id, second);

        let events = c.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            Event::SessionAbandoned { session_id, .. } if *session_id == first
        )));

        // First schedule would have been due at +20s; nothing fires.
        clock.advance_secs(10);
        assert!(c.tick().credit.is_none());
        clock.advance_secs(10);
        let plan = c.tick().credit.unwrap();
        assert_eq!(plan.session_id, second);
        assert_eq!(plan.article_id, "b");
    }

    fn controller_with_threshold(
        clock: &ManualClock,
        threshold_secs: u64,
    ) -> EngagementController<MemoryRewardStore, ManualClock> {
        let settings = EngineSettings {
            session: SessionConfig {
                threshold_secs,
                trigger: TriggerPolicy::FireOnThreshold,
            },
            ..Default::default()
        };
        let coordinator = ReconciliationCoordinator::new(MemoryRewardStore::new(), "alice");
        EngagementController::new(coordinator, clock.clone(), settings)
    }

    #[test]
    fn unrepresentable_threshold_never_credits_early() {
        for threshold_secs in [u64::MAX, 1 << 62, i64::MAX as u64] {
            let clock = weekday_clock();
            let mut c = controller_with_threshold(&clock, threshold_secs);
            c.open_article("a").unwrap();
            assert!(c.scheduled_credit().is_none());
            assert!(c.tick().credit.is_none());

            clock.advance_secs(3600);
            assert!(c.tick().credit.is_none());
            assert!(matches!(c.begin_close(), CloseDecision::NotQualified { .. }));
            assert_eq!(c.snapshot().points, 0);
        }
    }

    #[test]
    fn teardown_cancels_schedule() {
        let clock = weekday_clock();
        let (mut c, _) = controller(&clock, TriggerPolicy::FireOnThreshold);
        c.open_article("a").unwrap();
        c.teardown();
        assert!(c.scheduled_credit().is_none());
        assert!(c.active_session().is_none());
        clock.advance_secs(30);
        assert!(c.tick().credit.is_none());
    }

    #[test]
    fn per_click_bonus_grows_with_feed_reads() {
        let clock = weekday_clock();
        let (mut c, _) = controller(&clock, TriggerPolicy::PollOnExit);
        let mut earned = Vec::new();
        for article in ["a", "b", "c"] {
            c.open_article(article).unwrap();
            clock.advance_secs(21);
            if let CloseDecision::Credit(plan) = c.begin_close() {
                earned.push(plan.earned_points);
            }
        }
        assert_eq!(earned, vec![10, 11, 12]);
        assert_eq!(c.snapshot().streak, 3);
    }

    #[test]
    fn feed_completion_bonus_rides_on_last_credit() {
        let clock = weekday_clock();
        let (mut c, _) = controller(&clock, TriggerPolicy::PollOnExit);
        c.load_feed(vec![FeedArticle::new("a", "A"), FeedArticle::new("b", "B")]);

        c.open_article("a").unwrap();
        clock.advance_secs(30);
        c.begin_close();

        c.open_article("b").unwrap();
        clock.advance_secs(30);
        let CloseDecision::Credit(plan) = c.begin_close() else {
            panic!("expected credit");
        };
        assert_eq!(plan.earned_points, 11);
        assert_eq!(plan.bonus_points, 20);
        assert_eq!(c.snapshot().points, 41);
        assert!(c
            .drain_events()
            .iter()
            .any(|e| matches!(e, Event::FeedCompleted { bonus_points: 20, .. })));
    }

    #[test]
    fn streak_reset_runs_from_tick() {
        let clock = weekday_clock();
        let (mut c, _) = controller(&clock, TriggerPolicy::PollOnExit);
        c.open_article("a").unwrap();
        clock.advance_secs(30);
        c.begin_close();
        assert_eq!(c.snapshot().streak, 1);

        clock.advance(Duration::hours(24));
        let outcome = c.tick();
        assert_eq!(outcome.streak_reset.unwrap().streak_before, 1);
        assert_eq!(c.snapshot().streak, 0);
        assert_eq!(c.snapshot().points, 10);
    }

    #[test]
    fn streak_reward_path_is_separate_from_clicks() {
        let clock = weekday_clock();
        let (mut c, _) = controller(&clock, TriggerPolicy::PollOnExit);
        let applied = c.earn_streak_reward();
        assert_eq!(applied.earned_points, 10);
        assert_eq!(c.feed().prior_reads(), 0);
        assert_eq!(c.snapshot().streak, 1);
    }

    #[tokio::test]
    async fn closed_session_confirms_both_calls() {
        let clock = weekday_clock();
        let (mut c, store) = controller(&clock, TriggerPolicy::PollOnExit);
        c.open_article("a").unwrap();
        clock.advance_secs(25);
        let outcome = c.on_article_closed().await;
        assert_eq!(outcome.earned_points, 10);
        assert!(outcome.confirmation.unwrap().fully_confirmed());
        assert_eq!(store.points_of("alice"), 10);
        assert_eq!(store.reading_time_of("alice", "a"), Some(25));
    }

    #[tokio::test]
    async fn failed_add_points_keeps_local_credit() {
        let clock = weekday_clock();
        let (mut c, store) = controller(&clock, TriggerPolicy::PollOnExit);
        store.fail(ConfirmationKind::AddPoints);
        c.open_article("a").unwrap();
        clock.advance_secs(25);
        let outcome = c.on_article_closed().await;
        let report = outcome.confirmation.unwrap();
        assert!(report.mark_read.is_confirmed());
        assert!(!report.add_points.is_confirmed());
        assert!(!report.add_points.queued_for_retry);
        assert_eq!(c.snapshot().points, 10);
        assert_eq!(store.points_of("alice"), 0);
    }

    #[test]
    fn trigger_policy_parses_both_spellings() {
        assert_eq!("fire-on-threshold".parse::<TriggerPolicy>().unwrap(), TriggerPolicy::FireOnThreshold);
        assert_eq!("poll_on_exit".parse::<TriggerPolicy>().unwrap(), TriggerPolicy::PollOnExit);
        assert!("sometimes".parse::<TriggerPolicy>().is_err());
    }
}
