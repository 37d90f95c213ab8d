use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Swipe gesture recorded against an article; right means "saved"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "swipe_direction", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    Left,
    Right,
}

/// Canonical, deduplicated unit of content. The URL is the external dedup
/// key: re-ingesting the same URL replaces content fields in place instead of
/// creating a second row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Article {
    pub id: Uuid,
    pub feed_id: Uuid,
    pub title: String,
    pub url: String,
    pub author: Option<String>,
    pub published_at: DateTime<Utc>,
    pub content: String,
    pub summary: String,
    pub image_url: Option<String>,
    pub categories: Vec<String>,
    pub read_time: i32,
    pub created_at: DateTime<Utc>,
}

/// Normalizer output; storage assigns the identifier and creation timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewArticle {
    pub feed_id: Uuid,
    pub title: String,
    pub url: String,
    pub author: Option<String>,
    pub published_at: DateTime<Utc>,
    pub content: String,
    pub summary: String,
    pub image_url: Option<String>,
    pub categories: Vec<String>,
    pub read_time: i32,
}

/// Per-user overlay state over an article; one row per (user, article)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserArticle {
    pub id: Uuid,
    pub user_id: Uuid,
    pub article_id: Uuid,
    pub is_read: bool,
    pub is_favorite: bool,
    pub read_position: i32,
    pub swiped_direction: Option<SwipeDirection>,
    pub notes: Option<String>,
    pub highlights: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Article joined with the calling user's overlay row (defaults when none)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ArticleWithState {
    pub id: Uuid,
    pub feed_id: Uuid,
    pub title: String,
    pub url: String,
    pub author: Option<String>,
    pub published_at: DateTime<Utc>,
    pub content: String,
    pub summary: String,
    pub image_url: Option<String>,
    pub categories: Vec<String>,
    pub read_time: i32,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
    pub is_favorite: bool,
    pub read_position: i32,
    pub swiped_direction: Option<SwipeDirection>,
}

impl ArticleWithState {
    /// Saved articles are those swiped right or favorited
    pub fn is_saved(&self) -> bool {
        self.swiped_direction == Some(SwipeDirection::Right) || self.is_favorite
    }
}

/// Partial update of the per-user overlay; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserArticleUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_read: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_position: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swiped_direction: Option<SwipeDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlights: Option<serde_json::Value>,
}

/// Filters for article listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArticleFilter {
    pub feed_id: Option<Uuid>,
    pub group_id: Option<Uuid>,
    pub is_read: Option<bool>,
    pub is_favorite: Option<bool>,
}

/// Aggregate article counts for the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleStats {
    pub total: usize,
    pub read: usize,
    pub saved: usize,
    pub favorite: usize,
}
