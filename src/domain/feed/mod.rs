pub mod error;
pub mod health;
pub mod model;
pub mod service;
pub mod store;

pub use error::FeedServiceError;
pub use health::{FeedHealth, FeedHealthStats, DEFAULT_REFRESH_INTERVAL_MINUTES};
pub use model::{Feed, FeedGroup, HealthStatus};
pub use service::{FeedService, FeedServiceApi};
pub use store::{FeedGroupStore, FeedStore};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Response for feed endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct FeedResponse {
    pub id: Uuid,
    pub url: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    pub last_fetched: Option<DateTime<Utc>>,
    pub health_status: HealthStatus,
    pub refresh_interval_minutes: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Feed> for FeedResponse {
    fn from(feed: Feed) -> Self {
        Self {
            id: feed.id,
            url: feed.url,
            title: feed.title,
            group_id: feed.group_id,
            description: feed.description,
            favicon: feed.favicon,
            last_fetched: feed.last_fetched,
            health_status: feed.health_status,
            refresh_interval_minutes: feed.refresh_interval_minutes,
            created_at: feed.created_at,
        }
    }
}

/// Response for feed group endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct FeedGroupResponse {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<FeedGroup> for FeedGroupResponse {
    fn from(group: FeedGroup) -> Self {
        Self {
            id: group.id,
            name: group.name,
            created_at: group.created_at,
        }
    }
}

/// Request to create a feed group
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
}

/// Request to override a feed's health status
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateFeedHealthRequest {
    pub status: HealthStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Request to change a feed's refresh interval
#[derive(Debug, Serialize, Deserialize)]
pub struct SetRefreshIntervalRequest {
    pub minutes: i32,
}
