//! Per-feed reading progress.
//!
//! Tracks the articles of the currently loaded feed, how many qualifying
//! reads happened since it was loaded (the per-click bonus input), and the
//! one-time "everything read" bonus.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedArticle {
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub is_read: bool,
}

impl FeedArticle {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            is_read: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeedTracker {
    articles: Vec<FeedArticle>,
    qualifying_reads: u32,
    completion_awarded: bool,
}

impl FeedTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the feed. Resets the click counter and the completion bonus.
    pub fn load(&mut self, articles: Vec<FeedArticle>) {
        self.completion_awarded = !articles.is_empty() && articles.iter().all(|a| a.is_read);
        self.articles = articles;
        self.qualifying_reads = 0;
    }

    pub fn articles(&self) -> &[FeedArticle] {
        &self.articles
    }

    /// Qualifying reads since the feed was loaded.
    pub fn prior_reads(&self) -> u32 {
        self.qualifying_reads
    }

    pub fn remaining(&self) -> usize {
        self.articles.iter().filter(|a| !a.is_read).count()
    }

    /// Record a qualifying read of `article_id`.
    ///
    /// Returns `true` when this read finished the loaded feed for the first
    /// time.
    pub fn record_qualifying_read(&mut self, article_id: &str) -> bool {
        self.qualifying_reads = self.qualifying_reads.saturating_add(1);

        let Some(article) = self.articles.iter_mut().find(|a| a.url == article_id) else {
            return false;
        };
        article.is_read = true;

        if self.completion_awarded || self.remaining() > 0 {
            return false;
        }
        self.completion_awarded = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed() -> FeedTracker {
        let mut tracker = FeedTracker::new();
        tracker.load(vec![
            FeedArticle::new("https://news.example/a", "A"),
            FeedArticle::new("https://news.example/b", "B"),
        ]);
        tracker
    }

    #[test]
    fn completion_fires_once_on_last_unread() {
        let mut tracker = feed();
        assert!(!tracker.record_qualifying_read("https://news.example/a"));
        assert_eq!(tracker.remaining(), 1);
        assert!(tracker.record_qualifying_read("https://news.example/b"));
        assert!(!tracker.record_qualifying_read("https://news.example/b"));
        assert_eq!(tracker.prior_reads(), 3);
    }

    #[test]
    fn reads_outside_feed_still_count_as_clicks() {
        let mut tracker = feed();
        assert!(!tracker.record_qualifying_read("https://elsewhere.example/x"));
        assert_eq!(tracker.prior_reads(), 1);
        assert_eq!(tracker.remaining(), 2);
    }

    #[test]
    fn reload_resets_click_counter() {
        let mut tracker = feed();
        tracker.record_qualifying_read("https://news.example/a");
        tracker.load(vec![FeedArticle::new("https://news.example/c", "C")]);
        assert_eq!(tracker.prior_reads(), 0);
        assert!(tracker.record_qualifying_read("https://news.example/c"));
    }

    #[test]
    fn empty_feed_never_completes() {
        let mut tracker = FeedTracker::new();
        assert!(!tracker.record_qualifying_read("https://news.example/a"));
    }
}
