use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::article::{ArticleFilter, ArticleWithState, NewArticle, UserArticle, UserArticleUpdate};
use crate::error::AppResult;

/// Storage for canonical articles. `upsert_batch` must be idempotent on the
/// article URL: inserting the same URL twice replaces content fields rather
/// than creating a duplicate row.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    async fn upsert_batch(&self, articles: &[NewArticle]) -> AppResult<()>;

    async fn list(&self, user_id: Uuid, filter: &ArticleFilter) -> AppResult<Vec<ArticleWithState>>;

    async fn find_by_id(
        &self,
        user_id: Uuid,
        article_id: Uuid,
    ) -> AppResult<Option<ArticleWithState>>;
}

/// Storage for the per-user overlay. All writes are upserts keyed on
/// (user, article) so concurrent triage actions never create duplicate rows.
#[async_trait]
pub trait UserArticleStore: Send + Sync {
    async fn upsert_state(
        &self,
        user_id: Uuid,
        article_id: Uuid,
        update: &UserArticleUpdate,
    ) -> AppResult<UserArticle>;
}
