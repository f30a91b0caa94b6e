//! Persistent queue of remote confirmations that failed.
//!
//! Only used when `reconcile.retry_failed` is enabled. Entries are keyed by
//! session and kind, so a session can hold at most one pending entry per
//! confirmation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use uuid::Uuid;

use crate::error::CoreError;
use crate::events::ConfirmationKind;

/// A confirmation waiting to be retried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingConfirmation {
    pub session_id: Uuid,
    pub kind: ConfirmationKind,
    pub username: String,
    pub article_id: String,
    pub reading_time_secs: u64,
    pub points: u64,
    pub first_failed_at: DateTime<Utc>,
    pub attempts: u32,
    pub last_error: String,
}

impl PendingConfirmation {
    pub fn key(&self) -> String {
        pending_key(self.session_id, self.kind)
    }
}

fn pending_key(session_id: Uuid, kind: ConfirmationKind) -> String {
    let kind = match kind {
        ConfirmationKind::MarkRead => "mark_read",
        ConfirmationKind::AddPoints => "add_points",
    };
    format!("{session_id}:{kind}")
}

#[derive(Debug)]
pub struct PendingConfirmations {
    pending: BTreeMap<String, PendingConfirmation>,
    /// Backing file. `None` keeps the queue in memory only.
    queue_file: Option<PathBuf>,
}

impl PendingConfirmations {
    pub fn in_memory() -> Self {
        Self {
            pending: BTreeMap::new(),
            queue_file: None,
        }
    }

    /// Open a file-backed queue, loading existing entries if present.
    pub fn open(path: PathBuf) -> Result<Self, CoreError> {
        let mut queue = Self {
            pending: BTreeMap::new(),
            queue_file: Some(path),
        };
        queue.load()?;
        Ok(queue)
    }

    /// Add or replace the entry for this session and kind.
    ///
    /// A replaced entry keeps its first failure time and attempt count.
    pub fn enqueue(&mut self, mut entry: PendingConfirmation) {
        if let Some(existing) = self.pending.get(&entry.key()) {
            entry.first_failed_at = existing.first_failed_at;
            entry.attempts = entry.attempts.max(existing.attempts);
        }
        self.pending.insert(entry.key(), entry);
    }

    pub fn remove(&mut self, session_id: Uuid, kind: ConfirmationKind) -> Option<PendingConfirmation> {
        self.pending.remove(&pending_key(session_id, kind))
    }

    /// Oldest failures first.
    pub fn entries(&self) -> Vec<PendingConfirmation> {
        let mut entries: Vec<_> = self.pending.values().cloned().collect();
        entries.sort_by_key(|e| e.first_failed_at);
        entries
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Persist queue to disk. No-op for in-memory queues.
    pub fn persist(&self) -> Result<(), CoreError> {
        let Some(path) = &self.queue_file else {
            return Ok(());
        };
        let data = serde_json::to_string_pretty(&self.pending)?;
        std::fs::write(path, data)?;
        Ok(())
    }

    fn load(&mut self) -> Result<(), CoreError> {
        let Some(path) = &self.queue_file else {
            return Ok(());
        };
        if !path.exists() {
            return Ok(());
        }
        let content = std::fs::read_to_string(path)?;
        self.pending = serde_json::from_str(&content)?;
        Ok(())
    }
}

impl Default for PendingConfirmations {
    fn default() -> Self {
        Self::in_memory()
    }
}
