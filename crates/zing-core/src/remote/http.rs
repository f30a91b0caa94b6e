//! HTTP client for the news backend's points and read-state endpoints.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use super::{ReadingStatistics, RewardStore};
use crate::error::RemoteError;

#[derive(Debug, Deserialize)]
struct PointsResponse {
    points: u64,
}

#[derive(Debug, Deserialize)]
struct StreakResponse {
    streak: u32,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    message: String,
}

#[derive(Debug, Clone)]
pub struct HttpRewardStore {
    client: Client,
    base_url: Url,
}

impl HttpRewardStore {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RemoteError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(RemoteError::Unavailable(format!(
                "{base_url} cannot be used as a base URL"
            )));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send<T: DeserializeOwned>(
        endpoint: &'static str,
        request: RequestBuilder,
    ) -> Result<T, RemoteError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Status {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }
        response.json::<T>().await.map_err(|e| RemoteError::Decode {
            endpoint,
            message: e.to_string(),
        })
    }
}

impl RewardStore for HttpRewardStore {
    async fn current_points(&self, username: &str) -> Result<u64, RemoteError> {
        let url = self.endpoint(&["points", username]);
        let resp: PointsResponse = Self::send("current-points", self.client.get(url)).await?;
        Ok(resp.points)
    }

    async fn current_streak(&self, username: &str) -> Result<u32, RemoteError> {
        let url = self.endpoint(&["streak", username]);
        let resp: StreakResponse = Self::send("current-streak", self.client.get(url)).await?;
        Ok(resp.streak)
    }

    async fn add_points(&self, username: &str, amount: u64) -> Result<String, RemoteError> {
        let url = self.endpoint(&["points", "update"]);
        let amount = amount.to_string();
        let request = self
            .client
            .post(url)
            .query(&[("username", username), ("points", amount.as_str())]);
        let resp: MessageResponse = Self::send("add-points", request).await?;
        Ok(resp.message)
    }

    async fn mark_article_read(
        &self,
        username: &str,
        article_id: &str,
        reading_time_secs: u64,
    ) -> Result<String, RemoteError> {
        let url = self.endpoint(&["news", username, "mark_as_read"]);
        let reading_time = reading_time_secs.to_string();
        let request = self.client.patch(url).query(&[
            ("article_url", article_id),
            ("readingTime", reading_time.as_str()),
        ]);
        let resp: MessageResponse = Self::send("mark-article-read", request).await?;
        Ok(resp.message)
    }

    async fn reading_statistics(&self, username: &str) -> Result<ReadingStatistics, RemoteError> {
        let url = self.endpoint(&["news", username, "statistics"]);
        Self::send("reading-statistics", self.client.get(url)).await
    }
}
