use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use feedswipe_backend::domain::article::{ArticleService, ArticleStore, UserArticleStore};
use feedswipe_backend::domain::feed::{FeedGroupStore, FeedService, FeedStore};
use feedswipe_backend::domain::ingestion::{FeedFetcher, HttpFeedFetcher, IngestionService};
use feedswipe_backend::infrastructure::config::{Config, LogFormat};
use feedswipe_backend::infrastructure::db::{check_connection, create_pool};
use feedswipe_backend::infrastructure::http::start_http_server;
use feedswipe_backend::infrastructure::repositories::{
    ArticleRepository, FeedGroupRepository, FeedRepository, UserArticleRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting FeedSwipe Backend on {}:{}",
        config.host,
        config.port
    );

    // Create database connection pool
    let pool = create_pool(&config.database_url).await?;
    tracing::info!("Database connection pool created");

    // Verify database connection
    check_connection(&pool).await?;
    tracing::info!("Database connection verified");

    // Apply pending migrations
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    let pool = Arc::new(pool);
    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories (inject db pool)
    tracing::info!("Instantiating repositories...");
    let feed_store: Arc<dyn FeedStore> = Arc::new(FeedRepository::new(pool.clone()));
    let group_store: Arc<dyn FeedGroupStore> = Arc::new(FeedGroupRepository::new(pool.clone()));
    let article_store: Arc<dyn ArticleStore> = Arc::new(ArticleRepository::new(pool.clone()));
    let user_article_store: Arc<dyn UserArticleStore> =
        Arc::new(UserArticleRepository::new(pool.clone()));

    // 2. Instantiate the feed fetcher
    let fetcher: Arc<dyn FeedFetcher> = Arc::new(HttpFeedFetcher::new(Duration::from_secs(
        config.feed_fetch_timeout_secs,
    ))?);

    // 3. Instantiate services (inject stores and fetcher)
    tracing::info!("Instantiating services...");
    let feed_service = Arc::new(FeedService::new(feed_store.clone(), group_store.clone()));
    let ingestion_service = Arc::new(IngestionService::new(
        fetcher,
        feed_store.clone(),
        article_store.clone(),
        config.default_refresh_interval_minutes,
    ));
    let article_service = Arc::new(ArticleService::new(
        article_store.clone(),
        user_article_store.clone(),
    ));

    // 4. Instantiate controllers (inject services)
    tracing::info!("Instantiating controllers...");
    let feed_controller = Arc::new(feedswipe_backend::controllers::FeedController::new(
        feed_service,
        ingestion_service,
    ));
    let article_controller = Arc::new(feedswipe_backend::controllers::ArticleController::new(
        article_service,
    ));

    // Start HTTP server with all routes
    start_http_server(pool, config, feed_controller, article_controller).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "feedswipe_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "feedswipe_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
