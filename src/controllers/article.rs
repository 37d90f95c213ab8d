use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::article::{
    ArticleFilter, ArticleService, ArticleServiceApi, ArticleStats, ArticleWithState,
    UserArticle, UserArticleUpdate,
};
use crate::{error::AppResult, infrastructure::auth::AuthUser};

pub struct ArticleController {
    article_service: Arc<ArticleService>,
}

impl ArticleController {
    pub fn new(article_service: Arc<ArticleService>) -> Self {
        Self { article_service }
    }

    /// GET /api/articles - List articles with overlay state, newest first
    pub async fn list_articles(
        State(controller): State<Arc<ArticleController>>,
        Extension(auth_user): Extension<AuthUser>,
        Query(filter): Query<ArticleFilter>,
    ) -> AppResult<Json<Vec<ArticleWithState>>> {
        let articles = controller
            .article_service
            .list_articles(auth_user.user_id, &filter)
            .await?;
        Ok(Json(articles))
    }

    /// GET /api/articles/stats - Aggregate counts for the caller
    pub async fn get_stats(
        State(controller): State<Arc<ArticleController>>,
        Extension(auth_user): Extension<AuthUser>,
    ) -> AppResult<Json<ArticleStats>> {
        let stats = controller
            .article_service
            .get_article_stats(auth_user.user_id)
            .await?;
        Ok(Json(stats))
    }

    /// GET /api/articles/{articleId}
    pub async fn get_article(
        State(controller): State<Arc<ArticleController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(article_id): Path<Uuid>,
    ) -> AppResult<Json<ArticleWithState>> {
        let article = controller
            .article_service
            .get_article(auth_user.user_id, article_id)
            .await?;
        Ok(Json(article))
    }

    /// PATCH /api/articles/{articleId}/state - Upsert the caller's overlay
    /// (read/favorite/position/swipe/notes); absent fields are untouched
    pub async fn update_article_state(
        State(controller): State<Arc<ArticleController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(article_id): Path<Uuid>,
        Json(update): Json<UserArticleUpdate>,
    ) -> AppResult<Json<UserArticle>> {
        let state = controller
            .article_service
            .update_article_state(auth_user.user_id, article_id, &update)
            .await?;
        Ok(Json(state))
    }
}
