use crate::domain::feed::{FeedGroup, FeedGroupStore};
use crate::error::{AppError, AppResult};
use crate::infrastructure::db::DbPool;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

pub struct FeedGroupRepository {
    pool: Arc<DbPool>,
}

impl FeedGroupRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeedGroupStore for FeedGroupRepository {
    async fn insert(&self, group: &FeedGroup) -> AppResult<()> {
        let pool = self.pool.as_ref();

        sqlx::query(
            r#"
            INSERT INTO feed_groups (id, user_id, name, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(group.id)
        .bind(group.user_id)
        .bind(&group.name)
        .bind(group.created_at)
        .execute(pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_unique_violation() {
                    return AppError::Conflict("Group name already exists".to_string());
                }
            }
            AppError::Database(e)
        })?;

        Ok(())
    }

    async fn find_by_id(&self, group_id: Uuid) -> AppResult<Option<FeedGroup>> {
        let pool = self.pool.as_ref();
        let group = sqlx::query_as::<_, FeedGroup>(
            r#"
            SELECT id, user_id, name, created_at
            FROM feed_groups
            WHERE id = $1
            "#,
        )
        .bind(group_id)
        .fetch_optional(pool)
        .await?;

        Ok(group)
    }

    /// Get all groups for a user, ordered by name
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<FeedGroup>> {
        let pool = self.pool.as_ref();
        let groups = sqlx::query_as::<_, FeedGroup>(
            r#"
            SELECT id, user_id, name, created_at
            FROM feed_groups
            WHERE user_id = $1
            ORDER BY name
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(groups)
    }

    /// Delete a group; feeds in it fall back to ungrouped
    async fn delete(&self, group_id: Uuid) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let result = sqlx::query("DELETE FROM feed_groups WHERE id = $1")
            .bind(group_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
