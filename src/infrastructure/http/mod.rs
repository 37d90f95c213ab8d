use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::controllers::{health, ArticleController, FeedController};
use crate::infrastructure::auth::{auth_middleware, request_id_middleware};
use crate::infrastructure::config::Config;
use crate::infrastructure::db::DbPool;

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    pool: Arc<DbPool>,
    config: Arc<Config>,
    feed_controller: Arc<FeedController>,
    article_controller: Arc<ArticleController>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Feed + group routes (require the caller's identity)
    let feed_routes = Router::new()
        .route(
            "/api/feeds",
            get(FeedController::list_feeds).post(FeedController::add_feed),
        )
        .route("/api/feeds/refresh", post(FeedController::refresh_feeds))
        .route("/api/feeds/health", get(FeedController::load_feed_health))
        .route(
            "/api/feeds/health/stats",
            get(FeedController::get_health_stats),
        )
        .route(
            "/api/feeds/health/due",
            get(FeedController::feeds_needing_refresh),
        )
        .route("/api/feeds/:feedId", delete(FeedController::delete_feed))
        .route(
            "/api/feeds/:feedId/health",
            patch(FeedController::update_feed_health),
        )
        .route(
            "/api/feeds/:feedId/refresh-interval",
            patch(FeedController::set_refresh_interval),
        )
        .route(
            "/api/groups",
            get(FeedController::list_groups).post(FeedController::create_group),
        )
        .route("/api/groups/:groupId", delete(FeedController::delete_group))
        .with_state(feed_controller)
        .layer(middleware::from_fn(auth_middleware));

    // Article routes (require the caller's identity)
    let article_routes = Router::new()
        .route("/api/articles", get(ArticleController::list_articles))
        .route("/api/articles/stats", get(ArticleController::get_stats))
        .route(
            "/api/articles/:articleId",
            get(ArticleController::get_article),
        )
        .route(
            "/api/articles/:articleId/state",
            patch(ArticleController::update_article_state),
        )
        .with_state(article_controller)
        .layer(middleware::from_fn(auth_middleware));

    // Build application routes
    let app = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(pool.clone())
        .merge(feed_routes)
        .merge(article_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
