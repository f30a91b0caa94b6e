//! Remote point/read-state store.
//!
//! The engine consumes the store through the [`RewardStore`] trait. Two
//! implementations ship: [`HttpRewardStore`] for the news backend, and
//! [`MemoryRewardStore`] for offline use and tests.

pub mod http;
pub mod memory;

pub use http::HttpRewardStore;
pub use memory::{MemoryRewardStore, StoreCall};

use serde::{Deserialize, Serialize};

use crate::error::RemoteError;

/// Aggregate reading statistics kept by the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingStatistics {
    pub articles_read: u64,
    pub articles_left: u64,
    /// Total recorded reading time in seconds.
    pub reading_time: u64,
}

/// Capabilities the rewards engine needs from the authoritative store.
///
/// Calls are independent and non-transactional. Implementations must not
/// assume any ordering between `add_points` and `mark_article_read`.
#[allow(async_fn_in_trait)]
pub trait RewardStore {
    async fn current_points(&self, username: &str) -> Result<u64, RemoteError>;

    async fn current_streak(&self, username: &str) -> Result<u32, RemoteError>;

    /// Returns the server's confirmation message.
    async fn add_points(&self, username: &str, amount: u64) -> Result<String, RemoteError>;

    /// Returns the server's confirmation message.
    async fn mark_article_read(
        &self,
        username: &str,
        article_id: &str,
        reading_time_secs: u64,
    ) -> Result<String, RemoteError>;

    async fn reading_statistics(&self, username: &str) -> Result<ReadingStatistics, RemoteError>;
}
