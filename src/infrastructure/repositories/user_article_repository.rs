use crate::domain::article::{UserArticle, UserArticleStore, UserArticleUpdate};
use crate::error::AppResult;
use crate::infrastructure::db::DbPool;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

pub struct UserArticleRepository {
    pool: Arc<DbPool>,
}

impl UserArticleRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserArticleStore for UserArticleRepository {
    /// Upsert keyed on (user, article): never a plain insert, so concurrent
    /// triage actions cannot create duplicate overlay rows. Absent fields
    /// keep their stored values.
    async fn upsert_state(
        &self,
        user_id: Uuid,
        article_id: Uuid,
        update: &UserArticleUpdate,
    ) -> AppResult<UserArticle> {
        let pool = self.pool.as_ref();
        let now = Utc::now();

        let row = sqlx::query_as::<_, UserArticle>(
            r#"
            INSERT INTO user_articles
                (id, user_id, article_id, is_read, is_favorite, read_position,
                 swiped_direction, notes, highlights, created_at, updated_at)
            VALUES ($1, $2, $3, COALESCE($4, FALSE), COALESCE($5, FALSE), COALESCE($6, 0),
                    $7, $8, $9, $10, $10)
            ON CONFLICT (user_id, article_id) DO UPDATE SET
                is_read = COALESCE($4, user_articles.is_read),
                is_favorite = COALESCE($5, user_articles.is_favorite),
                read_position = COALESCE($6, user_articles.read_position),
                swiped_direction = COALESCE($7, user_articles.swiped_direction),
                notes = COALESCE($8, user_articles.notes),
                highlights = COALESCE($9, user_articles.highlights),
                updated_at = $10
            RETURNING id, user_id, article_id, is_read, is_favorite, read_position,
                      swiped_direction, notes, highlights, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(article_id)
        .bind(update.is_read)
        .bind(update.is_favorite)
        .bind(update.read_position)
        .bind(update.swiped_direction)
        .bind(&update.notes)
        .bind(&update.highlights)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(row)
    }
}
