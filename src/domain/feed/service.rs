use super::error::FeedServiceError;
use crate::domain::feed::health::{self, FeedHealth, FeedHealthStats};
use crate::domain::feed::store::{FeedGroupStore, FeedStore};
use crate::domain::feed::{Feed, FeedGroup, FeedGroupResponse, FeedResponse, HealthStatus};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

pub struct FeedService {
    feed_store: Arc<dyn FeedStore>,
    group_store: Arc<dyn FeedGroupStore>,
}

impl FeedService {
    pub fn new(feed_store: Arc<dyn FeedStore>, group_store: Arc<dyn FeedGroupStore>) -> Self {
        Self {
            feed_store,
            group_store,
        }
    }
}

#[async_trait]
pub trait FeedServiceApi: Send + Sync {
    async fn get_user_feeds(&self, user_id: Uuid) -> Result<Vec<FeedResponse>, FeedServiceError>;

    async fn delete_feed(&self, user_id: Uuid, feed_id: Uuid) -> Result<(), FeedServiceError>;

    async fn create_group(
        &self,
        user_id: Uuid,
        name: &str,
    ) -> Result<FeedGroupResponse, FeedServiceError>;

    async fn get_user_groups(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FeedGroupResponse>, FeedServiceError>;

    async fn delete_group(&self, user_id: Uuid, group_id: Uuid) -> Result<(), FeedServiceError>;

    /// Health view over every feed the user owns
    async fn load_feed_health(&self, user_id: Uuid) -> Result<Vec<FeedHealth>, FeedServiceError>;

    /// Caller-driven health override; also stamps the check time
    async fn update_feed_health(
        &self,
        user_id: Uuid,
        feed_id: Uuid,
        status: HealthStatus,
        error_message: Option<&str>,
    ) -> Result<(), FeedServiceError>;

    async fn set_feed_refresh_interval(
        &self,
        user_id: Uuid,
        feed_id: Uuid,
        minutes: i32,
    ) -> Result<(), FeedServiceError>;

    /// Feeds that have never been fetched or whose refresh interval has
    /// elapsed since the last fetch
    async fn feeds_needing_refresh(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FeedHealth>, FeedServiceError>;

    async fn get_feed_health_stats(
        &self,
        user_id: Uuid,
    ) -> Result<FeedHealthStats, FeedServiceError>;
}

#[async_trait]
impl FeedServiceApi for FeedService {
    async fn get_user_feeds(&self, user_id: Uuid) -> Result<Vec<FeedResponse>, FeedServiceError> {
        let feeds = self
            .feed_store
            .find_by_user(user_id)
            .await
            .map_err(|e| FeedServiceError::Dependency(e.to_string()))?;
        Ok(feeds.into_iter().map(FeedResponse::from).collect())
    }

    async fn delete_feed(&self, user_id: Uuid, feed_id: Uuid) -> Result<(), FeedServiceError> {
        self.verify_feed_ownership(feed_id, user_id).await?;

        self.feed_store
            .delete(feed_id)
            .await
            .map_err(|e| FeedServiceError::Dependency(e.to_string()))?;

        Ok(())
    }

    async fn create_group(
        &self,
        user_id: Uuid,
        name: &str,
    ) -> Result<FeedGroupResponse, FeedServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FeedServiceError::Invalid(
                "Group name cannot be empty".to_string(),
            ));
        }

        let group = FeedGroup {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            created_at: Utc::now(),
        };

        self.group_store
            .insert(&group)
            .await
            .map_err(|e| FeedServiceError::Dependency(e.to_string()))?;

        Ok(FeedGroupResponse::from(group))
    }

    async fn get_user_groups(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FeedGroupResponse>, FeedServiceError> {
        let groups = self
            .group_store
            .find_by_user(user_id)
            .await
            .map_err(|e| FeedServiceError::Dependency(e.to_string()))?;
        Ok(groups.into_iter().map(FeedGroupResponse::from).collect())
    }

    async fn delete_group(&self, user_id: Uuid, group_id: Uuid) -> Result<(), FeedServiceError> {
        let group = self
            .group_store
            .find_by_id(group_id)
            .await
            .map_err(|e| FeedServiceError::Dependency(e.to_string()))?
            .ok_or(FeedServiceError::GroupNotFound)?;

        if group.user_id != user_id {
            return Err(FeedServiceError::GroupNotFound);
        }

        self.group_store
            .delete(group_id)
            .await
            .map_err(|e| FeedServiceError::Dependency(e.to_string()))?;

        Ok(())
    }

    async fn load_feed_health(&self, user_id: Uuid) -> Result<Vec<FeedHealth>, FeedServiceError> {
        let feeds = self
            .feed_store
            .find_by_user(user_id)
            .await
            .map_err(|e| FeedServiceError::Dependency(e.to_string()))?;
        Ok(feeds.into_iter().map(FeedHealth::from).collect())
    }

    async fn update_feed_health(
        &self,
        user_id: Uuid,
        feed_id: Uuid,
        status: HealthStatus,
        error_message: Option<&str>,
    ) -> Result<(), FeedServiceError> {
        self.verify_feed_ownership(feed_id, user_id).await?;

        self.feed_store
            .set_health(feed_id, status, error_message, Utc::now())
            .await
            .map_err(|e| FeedServiceError::Dependency(e.to_string()))?;

        Ok(())
    }

    async fn set_feed_refresh_interval(
        &self,
        user_id: Uuid,
        feed_id: Uuid,
        minutes: i32,
    ) -> Result<(), FeedServiceError> {
        if minutes < 1 {
            return Err(FeedServiceError::Invalid(
                "Refresh interval must be at least 1 minute".to_string(),
            ));
        }

        self.verify_feed_ownership(feed_id, user_id).await?;

        self.feed_store
            .set_refresh_interval(feed_id, minutes)
            .await
            .map_err(|e| FeedServiceError::Dependency(e.to_string()))?;

        Ok(())
    }

    async fn feeds_needing_refresh(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FeedHealth>, FeedServiceError> {
        let now = Utc::now();
        let feeds = self.load_feed_health(user_id).await?;

        Ok(feeds
            .into_iter()
            .filter(|feed| {
                health::is_refresh_due(feed.last_fetched, feed.refresh_interval_minutes, now)
            })
            .collect())
    }

    async fn get_feed_health_stats(
        &self,
        user_id: Uuid,
    ) -> Result<FeedHealthStats, FeedServiceError> {
        let feeds = self.load_feed_health(user_id).await?;
        Ok(health::health_stats(&feeds))
    }
}

impl FeedService {
    async fn verify_feed_ownership(
        &self,
        feed_id: Uuid,
        user_id: Uuid,
    ) -> Result<Feed, FeedServiceError> {
        let feed = self
            .feed_store
            .find_by_id(feed_id)
            .await
            .map_err(|e| FeedServiceError::Dependency(e.to_string()))?
            .ok_or(FeedServiceError::NotFound)?;

        if feed.user_id != user_id {
            return Err(FeedServiceError::NotFound);
        }

        Ok(feed)
    }
}
