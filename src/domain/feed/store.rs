use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::feed::{Feed, FeedGroup, HealthStatus};
use crate::error::AppResult;

/// Row-oriented storage for feeds. Implemented by the Postgres repository;
/// injectable so the ingestion coordinator can be exercised against
/// in-memory doubles.
#[async_trait]
pub trait FeedStore: Send + Sync {
    async fn insert(&self, feed: &Feed) -> AppResult<()>;

    async fn find_by_id(&self, feed_id: Uuid) -> AppResult<Option<Feed>>;

    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<Feed>>;

    async fn exists_for_user(&self, user_id: Uuid, url: &str) -> AppResult<bool>;

    async fn delete(&self, feed_id: Uuid) -> AppResult<bool>;

    /// Successful ingestion attempt: healthy, fetch timestamp recorded,
    /// previous error cleared.
    async fn record_success(&self, feed_id: Uuid, fetched_at: DateTime<Utc>) -> AppResult<()>;

    /// Failed ingestion attempt: error status and message recorded, the
    /// last-fetched timestamp is left untouched.
    async fn record_failure(&self, feed_id: Uuid, error_message: &str) -> AppResult<()>;

    /// Caller-driven health update; records the check time alongside.
    async fn set_health(
        &self,
        feed_id: Uuid,
        status: HealthStatus,
        error_message: Option<&str>,
        checked_at: DateTime<Utc>,
    ) -> AppResult<()>;

    async fn set_refresh_interval(&self, feed_id: Uuid, minutes: i32) -> AppResult<()>;
}

#[async_trait]
pub trait FeedGroupStore: Send + Sync {
    async fn insert(&self, group: &FeedGroup) -> AppResult<()>;

    async fn find_by_id(&self, group_id: Uuid) -> AppResult<Option<FeedGroup>>;

    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<FeedGroup>>;

    async fn delete(&self, group_id: Uuid) -> AppResult<bool>;
}
