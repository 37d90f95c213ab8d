use crate::domain::feed::{Feed, FeedStore, HealthStatus};
use crate::error::{AppError, AppResult};
use crate::infrastructure::db::DbPool;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

pub struct FeedRepository {
    pool: Arc<DbPool>,
}

impl FeedRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

const FEED_COLUMNS: &str = "id, user_id, group_id, title, url, description, favicon, \
                            last_fetched, health_status, last_error, refresh_interval_minutes, created_at";

#[async_trait]
impl FeedStore for FeedRepository {
    /// Create a new feed row; a duplicate (user, url) pair is a conflict
    async fn insert(&self, feed: &Feed) -> AppResult<()> {
        let pool = self.pool.as_ref();

        sqlx::query(
            r#"
            INSERT INTO feeds (id, user_id, group_id, title, url, description, favicon,
                               last_fetched, health_status, last_error, refresh_interval_minutes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(feed.id)
        .bind(feed.user_id)
        .bind(feed.group_id)
        .bind(&feed.title)
        .bind(&feed.url)
        .bind(&feed.description)
        .bind(&feed.favicon)
        .bind(feed.last_fetched)
        .bind(feed.health_status)
        .bind(&feed.last_error)
        .bind(feed.refresh_interval_minutes)
        .bind(feed.created_at)
        .execute(pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_unique_violation() {
                    return AppError::Conflict("Feed URL already exists".to_string());
                }
            }
            AppError::Database(e)
        })?;

        Ok(())
    }

    /// Get a feed by ID
    async fn find_by_id(&self, feed_id: Uuid) -> AppResult<Option<Feed>> {
        let pool = self.pool.as_ref();
        let feed = sqlx::query_as::<_, Feed>(&format!(
            "SELECT {FEED_COLUMNS} FROM feeds WHERE id = $1"
        ))
        .bind(feed_id)
        .fetch_optional(pool)
        .await?;

        Ok(feed)
    }

    /// Get all feeds for a user, ordered by title
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<Feed>> {
        let pool = self.pool.as_ref();
        let feeds = sqlx::query_as::<_, Feed>(&format!(
            "SELECT {FEED_COLUMNS} FROM feeds WHERE user_id = $1 ORDER BY title"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(feeds)
    }

    /// Check if a user already has a feed with this URL
    async fn exists_for_user(&self, user_id: Uuid, url: &str) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM feeds
                WHERE user_id = $1 AND url = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(url)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Delete a feed; its articles cascade at the storage layer
    async fn delete(&self, feed_id: Uuid) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let result = sqlx::query("DELETE FROM feeds WHERE id = $1")
            .bind(feed_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn record_success(&self, feed_id: Uuid, fetched_at: DateTime<Utc>) -> AppResult<()> {
        let pool = self.pool.as_ref();
        sqlx::query(
            r#"
            UPDATE feeds
            SET health_status = $2, last_fetched = $3, last_error = NULL
            WHERE id = $1
            "#,
        )
        .bind(feed_id)
        .bind(HealthStatus::Healthy)
        .bind(fetched_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn record_failure(&self, feed_id: Uuid, error_message: &str) -> AppResult<()> {
        let pool = self.pool.as_ref();
        sqlx::query(
            r#"
            UPDATE feeds
            SET health_status = $2, last_error = $3
            WHERE id = $1
            "#,
        )
        .bind(feed_id)
        .bind(HealthStatus::Error)
        .bind(error_message)
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn set_health(
        &self,
        feed_id: Uuid,
        status: HealthStatus,
        error_message: Option<&str>,
        checked_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let pool = self.pool.as_ref();
        sqlx::query(
            r#"
            UPDATE feeds
            SET health_status = $2, last_error = $3, last_fetched = $4
            WHERE id = $1
            "#,
        )
        .bind(feed_id)
        .bind(status)
        .bind(error_message)
        .bind(checked_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn set_refresh_interval(&self, feed_id: Uuid, minutes: i32) -> AppResult<()> {
        let pool = self.pool.as_ref();
        sqlx::query("UPDATE feeds SET refresh_interval_minutes = $2 WHERE id = $1")
            .bind(feed_id)
            .bind(minutes)
            .execute(pool)
            .await?;

        Ok(())
    }
}
