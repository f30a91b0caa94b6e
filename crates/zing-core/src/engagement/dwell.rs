//! Dwell timer: how long a single article view has been open.
//!
//! Like the rest of the engine this is a wall-clock state machine with no
//! internal thread. Every call takes `now` from the caller's clock.
//!
//! ```text
//! Idle -> Active -> Idle        (stop)
//!         Active -> Active      (start on another article abandons the first)
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum dwell for a read to qualify for a reward.
pub const QUALIFYING_READ_THRESHOLD_SECS: u64 = 20;

/// One article view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingSession {
    pub session_id: Uuid,
    /// Unique article identifier (the source URL in practice).
    pub article_id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    /// Set once a credit protocol has begun for this session.
    pub credited: bool,
}

impl ReadingSession {
    fn new(article_id: String, started_at: DateTime<Utc>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            article_id,
            started_at,
            ended_at: None,
            credited: false,
        }
    }

    /// Seconds between `started_at` and `now`, never negative.
    pub fn elapsed_secs_at(&self, now: DateTime<Utc>) -> f64 {
        let ms = (now - self.started_at).num_milliseconds().max(0);
        ms as f64 / 1000.0
    }
}

/// Result of stopping the timer.
#[derive(Debug, Clone, PartialEq)]
pub struct StoppedSession {
    pub session: ReadingSession,
    pub elapsed_secs: f64,
}

#[derive(Debug, Clone, Default)]
pub struct DwellTimer {
    active: Option<ReadingSession>,
}

impl DwellTimer {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn session(&self) -> Option<&ReadingSession> {
        self.active.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut ReadingSession> {
        self.active.as_mut()
    }

    /// Elapsed seconds for the active session, `None` when idle.
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> Option<f64> {
        self.active.as_ref().map(|s| s.elapsed_secs_at(now))
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin timing `article_id`, returning the new session id.
    ///
    /// Any prior session is replaced. If it was never credited it is
    /// returned alongside so the caller can report it as abandoned.
    pub fn start(
        &mut self,
        article_id: impl Into<String>,
        now: DateTime<Utc>,
    ) -> (Uuid, Option<ReadingSession>) {
        let session = ReadingSession::new(article_id.into(), now);
        let session_id = session.session_id;
        let previous = self.active.replace(session);
        (session_id, previous.filter(|s| !s.credited))
    }

    /// Stop timing. Returns `None` when no session is active.
    pub fn stop(&mut self, now: DateTime<Utc>) -> Option<StoppedSession> {
        let mut session = self.active.take()?;
        session.ended_at = Some(now);
        let elapsed_secs = session.elapsed_secs_at(now);
        Some(StoppedSession {
            session,
            elapsed_secs,
        })
    }

    /// Drop the active session without measuring it.
    pub fn clear(&mut self) -> Option<ReadingSession> {
        self.active.take()
    }
}
