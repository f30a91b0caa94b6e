//! Remote confirmation of optimistic credits.
//!
//! The local state is already updated when a [`CreditPlan`] reaches the
//! coordinator. Both confirmations are sent concurrently and succeed or
//! fail on their own; a failure is logged and never rolled back locally.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::pending::{PendingConfirmation, PendingConfirmations};
use crate::engagement::CreditPlan;
use crate::error::{CoreError, RemoteError};
use crate::events::{ConfirmationKind, Event};
use crate::remote::RewardStore;

/// Outcome of one remote confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub kind: ConfirmationKind,
    /// Server message on success, error text on failure.
    pub result: Result<String, String>,
    pub queued_for_retry: bool,
}

impl Confirmation {
    pub fn is_confirmed(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationReport {
    pub session_id: Uuid,
    pub mark_read: Confirmation,
    pub add_points: Confirmation,
}

impl ConfirmationReport {
    /// Both the read record and the points reached the store.
    pub fn fully_confirmed(&self) -> bool {
        self.mark_read.is_confirmed() && self.add_points.is_confirmed()
    }

    pub fn events(&self, at: DateTime<Utc>) -> Vec<Event> {
        [&self.mark_read, &self.add_points]
            .into_iter()
            .map(|c| match &c.result {
                Ok(message) => Event::ConfirmationSucceeded {
                    session_id: self.session_id,
                    kind: c.kind,
                    message: message.clone(),
                    at,
                },
                Err(error) => Event::ConfirmationFailed {
                    session_id: self.session_id,
                    kind: c.kind,
                    error: error.clone(),
                    queued_for_retry: c.queued_for_retry,
                    at,
                },
            })
            .collect()
    }
}

/// Result of retrying the pending queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushSummary {
    pub confirmed: usize,
    pub still_pending: usize,
}

pub struct ReconciliationCoordinator<S> {
    store: S,
    username: String,
    /// Present only when retrying failed confirmations is enabled.
    pending: Option<PendingConfirmations>,
}

impl<S: RewardStore> ReconciliationCoordinator<S> {
    pub fn new(store: S, username: impl Into<String>) -> Self {
        Self {
            store,
            username: username.into(),
            pending: None,
        }
    }

    pub fn with_retry_queue(mut self, queue: PendingConfirmations) -> Self {
        self.pending = Some(queue);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn pending(&self) -> Option<&PendingConfirmations> {
        self.pending.as_ref()
    }

    /// Send mark-read and add-points for `plan`.
    ///
    /// Completion order between the two calls is unspecified.
    pub async fn confirm(&mut self, plan: &CreditPlan, now: DateTime<Utc>) -> ConfirmationReport {
        debug!(
            session = %plan.session_id,
            article = %plan.article_id,
            points = plan.earned_points,
            "sending remote confirmations"
        );

        let (mark_read, add_points) = tokio::join!(
            self.store
                .mark_article_read(&self.username, &plan.article_id, plan.reading_time_secs),
            self.store.add_points(&self.username, plan.earned_points),
        );

        let report = ConfirmationReport {
            session_id: plan.session_id,
            mark_read: self.settle(plan, ConfirmationKind::MarkRead, mark_read, now),
            add_points: self.settle(plan, ConfirmationKind::AddPoints, add_points, now),
        };

        if let Some(queue) = &self.pending {
            if !report.fully_confirmed() {
                if let Err(e) = queue.persist() {
                    warn!(error = %e, "failed to persist pending confirmations");
                }
            }
        }
        report
    }

    fn settle(
        &mut self,
        plan: &CreditPlan,
        kind: ConfirmationKind,
        result: Result<String, RemoteError>,
        now: DateTime<Utc>,
    ) -> Confirmation {
        match result {
            Ok(message) => {
                info!(session = %plan.session_id, ?kind, %message, "confirmation accepted");
                Confirmation {
                    kind,
                    result: Ok(message),
                    queued_for_retry: false,
                }
            }
            Err(e) => {
                let error = e.to_string();
                warn!(
                    session = %plan.session_id,
                    ?kind,
                    %error,
                    "confirmation failed; local state stays ahead of the store"
                );
                let queued_for_retry = match self.pending.as_mut() {
                    Some(queue) => {
                        queue.enqueue(PendingConfirmation {
                            session_id: plan.session_id,
                            kind,
                            username: self.username.clone(),
                            article_id: plan.article_id.clone(),
                            reading_time_secs: plan.reading_time_secs,
                            points: plan.earned_points,
                            first_failed_at: now,
                            attempts: 1,
                            last_error: error.clone(),
                        });
                        true
                    }
                    None => false,
                };
                Confirmation {
                    kind,
                    result: Err(error),
                    queued_for_retry,
                }
            }
        }
    }

    /// Retry every queued confirmation once, oldest first.
    pub async fn flush_pending(&mut self) -> Result<FlushSummary, CoreError> {
        let Some(entries) = self.pending.as_ref().map(PendingConfirmations::entries) else {
            return Ok(FlushSummary::default());
        };

        let mut summary = FlushSummary::default();
        for mut entry in entries {
            let result = match entry.kind {
                ConfirmationKind::MarkRead => {
                    self.store
                        .mark_article_read(&entry.username, &entry.article_id, entry.reading_time_secs)
                        .await
                }
                ConfirmationKind::AddPoints => {
                    self.store.add_points(&entry.username, entry.points).await
                }
            };

            let Some(queue) = self.pending.as_mut() else {
                break;
            };
            match result {
                Ok(message) => {
                    info!(session = %entry.session_id, kind = ?entry.kind, %message, "queued confirmation accepted");
                    queue.remove(entry.session_id, entry.kind);
                    summary.confirmed += 1;
                }
                Err(e) => {
                    entry.attempts = entry.attempts.saturating_add(1);
                    entry.last_error = e.to_string();
                    warn!(session = %entry.session_id, kind = ?entry.kind, attempts = entry.attempts, error = %entry.last_error, "queued confirmation failed again");
                    queue.enqueue(entry);
                    summary.still_pending += 1;
                }
            }
        }

        if let Some(queue) = &self.pending {
            queue.persist()?;
        }
        Ok(summary)
    }
}
