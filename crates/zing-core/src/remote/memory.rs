//! In-memory reward store.
//!
//! Keeps per-user points, streak and read records, records every call it
//! receives, and can be told to fail specific operations. Clones share the
//! same backing data.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use super::{ReadingStatistics, RewardStore};
use crate::error::RemoteError;
use crate::events::ConfirmationKind;

/// A call observed by the store, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    CurrentPoints {
        username: String,
    },
    CurrentStreak {
        username: String,
    },
    AddPoints {
        username: String,
        amount: u64,
    },
    MarkArticleRead {
        username: String,
        article_id: String,
        reading_time_secs: u64,
    },
    ReadingStatistics {
        username: String,
    },
}

#[derive(Debug, Default)]
struct UserRecord {
    points: u64,
    streak: u32,
    /// article id -> reading time seconds
    read: HashMap<String, u64>,
}

#[derive(Debug, Default)]
struct Inner {
    users: HashMap<String, UserRecord>,
    calls: Vec<StoreCall>,
    failing: HashSet<ConfirmationKind>,
    failing_reads: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryRewardStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryRewardStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Seed a user with server-side points and streak.
    pub fn with_user(self, username: &str, points: u64, streak: u32) -> Self {
        {
            let mut inner = self.lock();
            let user = inner.users.entry(username.to_string()).or_default();
            user.points = points;
            user.streak = streak;
        }
        self
    }

    /// Make every subsequent call of `kind` fail until cleared.
    pub fn fail(&self, kind: ConfirmationKind) {
        self.lock().failing.insert(kind);
    }

    /// Make the read-only endpoints (points, streak, statistics) fail.
    pub fn fail_reads(&self, failing: bool) {
        self.lock().failing_reads = failing;
    }

    pub fn recover(&self, kind: ConfirmationKind) {
        self.lock().failing.remove(&kind);
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    pub fn add_points_calls(&self) -> Vec<StoreCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, StoreCall::AddPoints { .. }))
            .collect()
    }

    pub fn mark_read_calls(&self) -> Vec<StoreCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, StoreCall::MarkArticleRead { .. }))
            .collect()
    }

    pub fn points_of(&self, username: &str) -> u64 {
        self.lock().users.get(username).map(|u| u.points).unwrap_or(0)
    }

    pub fn reading_time_of(&self, username: &str, article_id: &str) -> Option<u64> {
        self.lock()
            .users
            .get(username)
            .and_then(|u| u.read.get(article_id).copied())
    }

    fn unavailable(what: &str) -> RemoteError {
        RemoteError::Unavailable(format!("{what} unavailable"))
    }
}

impl RewardStore for MemoryRewardStore {
    async fn current_points(&self, username: &str) -> Result<u64, RemoteError> {
        let mut inner = self.lock();
        inner.calls.push(StoreCall::CurrentPoints {
            username: username.to_string(),
        });
        if inner.failing_reads {
            return Err(Self::unavailable("current-points"));
        }
        Ok(inner.users.get(username).map(|u| u.points).unwrap_or(0))
    }

    async fn current_streak(&self, username: &str) -> Result<u32, RemoteError> {
        let mut inner = self.lock();
        inner.calls.push(StoreCall::CurrentStreak {
            username: username.to_string(),
        });
        if inner.failing_reads {
            return Err(Self::unavailable("current-streak"));
        }
        Ok(inner.users.get(username).map(|u| u.streak).unwrap_or(0))
    }

    async fn add_points(&self, username: &str, amount: u64) -> Result<String, RemoteError> {
        let mut inner = self.lock();
        inner.calls.push(StoreCall::AddPoints {
            username: username.to_string(),
            amount,
        });
        if inner.failing.contains(&ConfirmationKind::AddPoints) {
            return Err(Self::unavailable("add-points"));
        }
        let user = inner.users.entry(username.to_string()).or_default();
        user.points = user.points.saturating_add(amount);
        Ok(format!("Points updated. New total: {}", user.points))
    }

    async fn mark_article_read(
        &self,
        username: &str,
        article_id: &str,
        reading_time_secs: u64,
    ) -> Result<String, RemoteError> {
        let mut inner = self.lock();
        inner.calls.push(StoreCall::MarkArticleRead {
            username: username.to_string(),
            article_id: article_id.to_string(),
            reading_time_secs,
        });
        if inner.failing.contains(&ConfirmationKind::MarkRead) {
            return Err(Self::unavailable("mark-article-read"));
        }
        let user = inner.users.entry(username.to_string()).or_default();
        user.read.insert(article_id.to_string(), reading_time_secs);
        Ok("Article marked as read".to_string())
    }

    async fn reading_statistics(&self, username: &str) -> Result<ReadingStatistics, RemoteError> {
        let mut inner = self.lock();
        inner.calls.push(StoreCall::ReadingStatistics {
            username: username.to_string(),
        });
        if inner.failing_reads {
            return Err(Self::unavailable("reading-statistics"));
        }
        let stats = inner
            .users
            .get(username)
            .map(|u| ReadingStatistics {
                articles_read: u.read.len() as u64,
                articles_left: 0,
                reading_time: u.read.values().sum(),
            })
            .unwrap_or_default();
        Ok(stats)
    }
}
