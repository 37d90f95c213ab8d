use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Coarse classification of the most recent ingestion attempt for a feed.
///
/// Transitions are driven solely by the latest outcome: any success makes the
/// feed `healthy`, any fetch/parse failure makes it `error`. A feed that has
/// never been ingested stays `unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "health_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Error,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Feed {
    pub id: Uuid,
    pub user_id: Uuid,
    pub group_id: Option<Uuid>,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub favicon: Option<String>,
    pub last_fetched: Option<DateTime<Utc>>,
    pub health_status: HealthStatus,
    pub last_error: Option<String>,
    pub refresh_interval_minutes: i32,
    pub created_at: DateTime<Utc>,
}

/// User-defined label for organizing feeds
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FeedGroup {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
