use crate::domain::article::{ArticleFilter, ArticleStore, ArticleWithState, NewArticle};
use crate::error::AppResult;
use crate::infrastructure::db::DbPool;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Postgres, QueryBuilder};
use std::sync::Arc;
use uuid::Uuid;

pub struct ArticleRepository {
    pool: Arc<DbPool>,
}

impl ArticleRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

const ARTICLE_WITH_STATE_QUERY: &str = r#"
SELECT a.id, a.feed_id, a.title, a.url, a.author, a.published_at, a.content,
       a.summary, a.image_url, a.categories, a.read_time, a.created_at,
       COALESCE(ua.is_read, FALSE) AS is_read,
       COALESCE(ua.is_favorite, FALSE) AS is_favorite,
       COALESCE(ua.read_position, 0) AS read_position,
       ua.swiped_direction
FROM articles a
JOIN feeds f ON f.id = a.feed_id
LEFT JOIN user_articles ua ON ua.article_id = a.id AND ua.user_id = $1
WHERE f.user_id = $1
"#;

#[async_trait]
impl ArticleStore for ArticleRepository {
    /// Insert-or-replace keyed on the article URL. `published_at` is kept
    /// from the first ingestion so entries whose date fell back to "now"
    /// are not reordered by later refreshes.
    async fn upsert_batch(&self, articles: &[NewArticle]) -> AppResult<()> {
        if articles.is_empty() {
            return Ok(());
        }

        let pool = self.pool.as_ref();
        let now = Utc::now();

        let mut builder = QueryBuilder::<Postgres>::new(
            "INSERT INTO articles (id, feed_id, title, url, author, published_at, \
             content, summary, image_url, categories, read_time, created_at) ",
        );
        builder.push_values(articles, |mut row, article| {
            row.push_bind(Uuid::new_v4())
                .push_bind(article.feed_id)
                .push_bind(&article.title)
                .push_bind(&article.url)
                .push_bind(&article.author)
                .push_bind(article.published_at)
                .push_bind(&article.content)
                .push_bind(&article.summary)
                .push_bind(&article.image_url)
                .push_bind(&article.categories)
                .push_bind(article.read_time)
                .push_bind(now);
        });
        builder.push(
            " ON CONFLICT (url) DO UPDATE SET \
             feed_id = EXCLUDED.feed_id, \
             title = EXCLUDED.title, \
             author = EXCLUDED.author, \
             content = EXCLUDED.content, \
             summary = EXCLUDED.summary, \
             image_url = EXCLUDED.image_url, \
             categories = EXCLUDED.categories, \
             read_time = EXCLUDED.read_time",
        );

        builder.build().execute(pool).await?;

        Ok(())
    }

    /// Articles visible to the user, newest first, joined with the user's
    /// overlay row when one exists
    async fn list(
        &self,
        user_id: Uuid,
        filter: &ArticleFilter,
    ) -> AppResult<Vec<ArticleWithState>> {
        let pool = self.pool.as_ref();
        let query = format!(
            r#"{ARTICLE_WITH_STATE_QUERY}
  AND ($2::uuid IS NULL OR a.feed_id = $2)
  AND ($3::uuid IS NULL OR f.group_id = $3)
  AND ($4::boolean IS NULL OR COALESCE(ua.is_read, FALSE) = $4)
  AND ($5::boolean IS NULL OR COALESCE(ua.is_favorite, FALSE) = $5)
ORDER BY a.published_at DESC"#
        );

        let articles = sqlx::query_as::<_, ArticleWithState>(&query)
            .bind(user_id)
            .bind(filter.feed_id)
            .bind(filter.group_id)
            .bind(filter.is_read)
            .bind(filter.is_favorite)
            .fetch_all(pool)
            .await?;

        Ok(articles)
    }

    async fn find_by_id(
        &self,
        user_id: Uuid,
        article_id: Uuid,
    ) -> AppResult<Option<ArticleWithState>> {
        let pool = self.pool.as_ref();
        let query = format!("{ARTICLE_WITH_STATE_QUERY}  AND a.id = $2");

        let article = sqlx::query_as::<_, ArticleWithState>(&query)
            .bind(user_id)
            .bind(article_id)
            .fetch_optional(pool)
            .await?;

        Ok(article)
    }
}
