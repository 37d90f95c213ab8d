use super::error::ArticleServiceError;
use crate::domain::article::store::{ArticleStore, UserArticleStore};
use crate::domain::article::{
    ArticleFilter, ArticleStats, ArticleWithState, UserArticle, UserArticleUpdate,
};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

pub struct ArticleService {
    article_store: Arc<dyn ArticleStore>,
    user_article_store: Arc<dyn UserArticleStore>,
}

impl ArticleService {
    pub fn new(
        article_store: Arc<dyn ArticleStore>,
        user_article_store: Arc<dyn UserArticleStore>,
    ) -> Self {
        Self {
            article_store,
            user_article_store,
        }
    }
}

#[async_trait]
pub trait ArticleServiceApi: Send + Sync {
    /// Articles for the caller's feeds, newest first, with overlay state
    async fn list_articles(
        &self,
        user_id: Uuid,
        filter: &ArticleFilter,
    ) -> Result<Vec<ArticleWithState>, ArticleServiceError>;

    async fn get_article(
        &self,
        user_id: Uuid,
        article_id: Uuid,
    ) -> Result<ArticleWithState, ArticleServiceError>;

    /// Upsert of the (user, article) overlay row; absent fields keep their
    /// stored values
    async fn update_article_state(
        &self,
        user_id: Uuid,
        article_id: Uuid,
        update: &UserArticleUpdate,
    ) -> Result<UserArticle, ArticleServiceError>;

    async fn get_article_stats(&self, user_id: Uuid)
        -> Result<ArticleStats, ArticleServiceError>;
}

#[async_trait]
impl ArticleServiceApi for ArticleService {
    async fn list_articles(
        &self,
        user_id: Uuid,
        filter: &ArticleFilter,
    ) -> Result<Vec<ArticleWithState>, ArticleServiceError> {
        self.article_store
            .list(user_id, filter)
            .await
            .map_err(|e| ArticleServiceError::Dependency(e.to_string()))
    }

    async fn get_article(
        &self,
        user_id: Uuid,
        article_id: Uuid,
    ) -> Result<ArticleWithState, ArticleServiceError> {
        self.article_store
            .find_by_id(user_id, article_id)
            .await
            .map_err(|e| ArticleServiceError::Dependency(e.to_string()))?
            .ok_or(ArticleServiceError::NotFound)
    }

    async fn update_article_state(
        &self,
        user_id: Uuid,
        article_id: Uuid,
        update: &UserArticleUpdate,
    ) -> Result<UserArticle, ArticleServiceError> {
        // Confirm the article exists and is visible to the caller before
        // writing overlay state against it.
        self.get_article(user_id, article_id).await?;

        self.user_article_store
            .upsert_state(user_id, article_id, update)
            .await
            .map_err(|e| ArticleServiceError::Dependency(e.to_string()))
    }

    async fn get_article_stats(
        &self,
        user_id: Uuid,
    ) -> Result<ArticleStats, ArticleServiceError> {
        let articles = self
            .list_articles(user_id, &ArticleFilter::default())
            .await?;

        Ok(ArticleStats {
            total: articles.len(),
            read: articles.iter().filter(|a| a.is_read).count(),
            saved: articles.iter().filter(|a| a.is_saved()).count(),
            favorite: articles.iter().filter(|a| a.is_favorite).count(),
        })
    }
}
