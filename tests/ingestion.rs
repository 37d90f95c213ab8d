//! Ingestion coordinator tests against in-memory store doubles: dedup
//! upsert semantics, per-feed fault isolation and batch splitting.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use feedswipe_backend::domain::article::{
    ArticleFilter, ArticleStore, ArticleWithState, NewArticle,
};
use feedswipe_backend::domain::feed::{Feed, FeedStore, HealthStatus};
use feedswipe_backend::domain::ingestion::{
    AddFeedRequest, FeedFetcher, IngestionError, IngestionService, IngestionServiceApi,
    ParsedEntry, ParsedFeed,
};
use feedswipe_backend::error::{AppError, AppResult};

#[derive(Default)]
struct StubFetcher {
    responses: Mutex<HashMap<String, ParsedFeed>>,
}

impl StubFetcher {
    fn respond(&self, url: &str, feed: ParsedFeed) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), feed);
    }
}

#[async_trait]
impl FeedFetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<ParsedFeed, IngestionError> {
        self.responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| IngestionError::FeedFetch(format!("connection refused: {url}")))
    }
}

#[derive(Default)]
struct MemoryFeedStore {
    feeds: Mutex<HashMap<Uuid, Feed>>,
}

impl MemoryFeedStore {
    fn get(&self, feed_id: Uuid) -> Option<Feed> {
        self.feeds.lock().unwrap().get(&feed_id).cloned()
    }
}

#[async_trait]
impl FeedStore for MemoryFeedStore {
    async fn insert(&self, feed: &Feed) -> AppResult<()> {
        self.feeds.lock().unwrap().insert(feed.id, feed.clone());
        Ok(())
    }

    async fn find_by_id(&self, feed_id: Uuid) -> AppResult<Option<Feed>> {
        Ok(self.get(feed_id))
    }

    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<Feed>> {
        let mut feeds: Vec<Feed> = self
            .feeds
            .lock()
            .unwrap()
            .values()
            .filter(|feed| feed.user_id == user_id)
            .cloned()
            .collect();
        feeds.sort_by(|a, b| a.url.cmp(&b.url));
        Ok(feeds)
    }

    async fn exists_for_user(&self, user_id: Uuid, url: &str) -> AppResult<bool> {
        Ok(self
            .feeds
            .lock()
            .unwrap()
            .values()
            .any(|feed| feed.user_id == user_id && feed.url == url))
    }

    async fn delete(&self, feed_id: Uuid) -> AppResult<bool> {
        Ok(self.feeds.lock().unwrap().remove(&feed_id).is_some())
    }

    async fn record_success(&self, feed_id: Uuid, fetched_at: DateTime<Utc>) -> AppResult<()> {
        let mut feeds = self.feeds.lock().unwrap();
        if let Some(feed) = feeds.get_mut(&feed_id) {
            feed.health_status = HealthStatus::Healthy;
            feed.last_fetched = Some(fetched_at);
            feed.last_error = None;
        }
        Ok(())
    }

    async fn record_failure(&self, feed_id: Uuid, error_message: &str) -> AppResult<()> {
        let mut feeds = self.feeds.lock().unwrap();
        if let Some(feed) = feeds.get_mut(&feed_id) {
            feed.health_status = HealthStatus::Error;
            feed.last_error = Some(error_message.to_string());
        }
        Ok(())
    }

    async fn set_health(
        &self,
        feed_id: Uuid,
        status: HealthStatus,
        error_message: Option<&str>,
        checked_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut feeds = self.feeds.lock().unwrap();
        if let Some(feed) = feeds.get_mut(&feed_id) {
            feed.health_status = status;
            feed.last_error = error_message.map(str::to_string);
            feed.last_fetched = Some(checked_at);
        }
        Ok(())
    }

    async fn set_refresh_interval(&self, feed_id: Uuid, minutes: i32) -> AppResult<()> {
        let mut feeds = self.feeds.lock().unwrap();
        if let Some(feed) = feeds.get_mut(&feed_id) {
            feed.refresh_interval_minutes = minutes;
        }
        Ok(())
    }
}

/// Keyed by article URL like the Postgres unique constraint; also records
/// the size of every upsert round it receives.
#[derive(Default)]
struct MemoryArticleStore {
    rows: Mutex<HashMap<String, NewArticle>>,
    batch_sizes: Mutex<Vec<usize>>,
    fail_writes: AtomicBool,
}

impl MemoryArticleStore {
    fn row(&self, url: &str) -> Option<NewArticle> {
        self.rows.lock().unwrap().get(url).cloned()
    }

    fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn batch_sizes(&self) -> Vec<usize> {
        self.batch_sizes.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArticleStore for MemoryArticleStore {
    async fn upsert_batch(&self, articles: &[NewArticle]) -> AppResult<()> {
        self.batch_sizes.lock().unwrap().push(articles.len());
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Internal("storage unavailable".to_string()));
        }
        let mut rows = self.rows.lock().unwrap();
        for article in articles {
            rows.insert(article.url.clone(), article.clone());
        }
        Ok(())
    }

    async fn list(
        &self,
        _user_id: Uuid,
        _filter: &ArticleFilter,
    ) -> AppResult<Vec<ArticleWithState>> {
        Ok(Vec::new())
    }

    async fn find_by_id(
        &self,
        _user_id: Uuid,
        _article_id: Uuid,
    ) -> AppResult<Option<ArticleWithState>> {
        Ok(None)
    }
}

struct Harness {
    fetcher: Arc<StubFetcher>,
    feed_store: Arc<MemoryFeedStore>,
    article_store: Arc<MemoryArticleStore>,
    service: IngestionService,
}

fn harness() -> Harness {
    let fetcher = Arc::new(StubFetcher::default());
    let feed_store = Arc::new(MemoryFeedStore::default());
    let article_store = Arc::new(MemoryArticleStore::default());
    let service = IngestionService::new(
        fetcher.clone(),
        feed_store.clone(),
        article_store.clone(),
        60,
    );
    Harness {
        fetcher,
        feed_store,
        article_store,
        service,
    }
}

fn entry(title: &str, url: &str) -> ParsedEntry {
    ParsedEntry {
        title: Some(title.to_string()),
        link: Some(url.to_string()),
        ..Default::default()
    }
}

fn parsed(title: &str, entries: Vec<ParsedEntry>) -> ParsedFeed {
    ParsedFeed {
        title: Some(title.to_string()),
        entries,
        ..Default::default()
    }
}

fn add_request(url: &str) -> AddFeedRequest {
    AddFeedRequest {
        url: url.to_string(),
        group_id: None,
    }
}

#[tokio::test]
async fn add_feed_creates_feed_and_stores_its_entries() {
    let h = harness();
    let user_id = Uuid::new_v4();
    h.fetcher.respond(
        "https://blog.example/rss",
        parsed(
            "Example Blog",
            vec![
                entry("One", "https://blog.example/1"),
                entry("Two", "https://blog.example/2"),
            ],
        ),
    );

    let feed = h
        .service
        .add_feed(user_id, add_request("https://blog.example/rss"))
        .await
        .unwrap();

    assert_eq!(feed.title, "Example Blog");
    assert_eq!(feed.health_status, HealthStatus::Unknown);
    assert_eq!(feed.refresh_interval_minutes, 60);
    assert!(h.feed_store.get(feed.id).is_some());
    assert_eq!(h.article_store.row_count(), 2);
    assert_eq!(
        h.article_store.row("https://blog.example/1").unwrap().title,
        "One"
    );
}

#[tokio::test]
async fn add_feed_rejects_non_http_urls() {
    let h = harness();

    let err = h
        .service
        .add_feed(Uuid::new_v4(), add_request("ftp://blog.example/rss"))
        .await
        .unwrap_err();

    assert!(matches!(err, IngestionError::Invalid(_)));
}

#[tokio::test]
async fn add_feed_rejects_a_url_the_user_already_follows() {
    let h = harness();
    let user_id = Uuid::new_v4();
    h.fetcher
        .respond("https://blog.example/rss", parsed("Example Blog", vec![]));

    h.service
        .add_feed(user_id, add_request("https://blog.example/rss"))
        .await
        .unwrap();
    let err = h
        .service
        .add_feed(user_id, add_request("https://blog.example/rss"))
        .await
        .unwrap_err();

    assert!(matches!(err, IngestionError::DuplicateFeed));
}

#[tokio::test]
async fn add_feed_aborts_without_a_feed_row_when_the_fetch_fails() {
    let h = harness();
    let user_id = Uuid::new_v4();

    let err = h
        .service
        .add_feed(user_id, add_request("https://unreachable.example/rss"))
        .await
        .unwrap_err();

    assert!(matches!(err, IngestionError::FeedFetch(_)));
    assert!(h.feed_store.find_by_user(user_id).await.unwrap().is_empty());
    assert_eq!(h.article_store.row_count(), 0);
}

#[tokio::test]
async fn add_feed_survives_a_storage_failure_during_population() {
    let h = harness();
    let user_id = Uuid::new_v4();
    h.fetcher.respond(
        "https://blog.example/rss",
        parsed("Example Blog", vec![entry("One", "https://blog.example/1")]),
    );
    h.article_store.fail_writes.store(true, Ordering::SeqCst);

    let feed = h
        .service
        .add_feed(user_id, add_request("https://blog.example/rss"))
        .await
        .unwrap();

    // The feed is kept so a later refresh can retry population
    assert!(h.feed_store.get(feed.id).is_some());
    assert_eq!(h.article_store.row_count(), 0);
}

#[tokio::test]
async fn re_ingesting_the_same_urls_replaces_rows_in_place() {
    let h = harness();
    let user_id = Uuid::new_v4();
    h.fetcher.respond(
        "https://blog.example/rss",
        parsed(
            "Example Blog",
            vec![
                entry("One", "https://blog.example/1"),
                entry("Two", "https://blog.example/2"),
            ],
        ),
    );
    h.service
        .add_feed(user_id, add_request("https://blog.example/rss"))
        .await
        .unwrap();

    // Same URLs again, one title revised, one new entry
    h.fetcher.respond(
        "https://blog.example/rss",
        parsed(
            "Example Blog",
            vec![
                entry("One (updated)", "https://blog.example/1"),
                entry("Two", "https://blog.example/2"),
                entry("Three", "https://blog.example/3"),
            ],
        ),
    );
    let summary = h.service.refresh_feeds(user_id).await.unwrap();

    assert_eq!(summary.refreshed, 1);
    assert_eq!(h.article_store.row_count(), 3);
    assert_eq!(
        h.article_store.row("https://blog.example/1").unwrap().title,
        "One (updated)"
    );
}

#[tokio::test]
async fn one_broken_feed_never_aborts_the_others() {
    let h = harness();
    let user_id = Uuid::new_v4();
    h.fetcher.respond(
        "https://a.example/rss",
        parsed("A", vec![entry("a1", "https://a.example/1")]),
    );
    // b.example has no stubbed response, so its fetch fails
    h.fetcher.respond(
        "https://c.example/rss",
        parsed("C", vec![entry("c1", "https://c.example/1")]),
    );
    for url in [
        "https://a.example/rss",
        "https://c.example/rss",
    ] {
        h.service.add_feed(user_id, add_request(url)).await.unwrap();
    }
    let broken = Feed {
        id: Uuid::new_v4(),
        user_id,
        group_id: None,
        title: "B".to_string(),
        url: "https://b.example/rss".to_string(),
        description: None,
        favicon: None,
        last_fetched: None,
        health_status: HealthStatus::Unknown,
        last_error: None,
        refresh_interval_minutes: 60,
        created_at: Utc::now(),
    };
    h.feed_store.insert(&broken).await.unwrap();

    let summary = h.service.refresh_feeds(user_id).await.unwrap();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.refreshed, 2);
    assert_eq!(summary.failed, 1);

    let feeds = h.feed_store.find_by_user(user_id).await.unwrap();
    let by_url = |url: &str| feeds.iter().find(|f| f.url == url).unwrap();
    assert_eq!(by_url("https://a.example/rss").health_status, HealthStatus::Healthy);
    assert_eq!(by_url("https://c.example/rss").health_status, HealthStatus::Healthy);

    let failed = by_url("https://b.example/rss");
    assert_eq!(failed.health_status, HealthStatus::Error);
    assert!(failed.last_error.as_deref().unwrap().contains("connection refused"));
    // Failure never advances the fetch timestamp
    assert_eq!(failed.last_fetched, None);
}

#[tokio::test]
async fn refresh_clears_a_previous_error_on_success() {
    let h = harness();
    let user_id = Uuid::new_v4();
    h.fetcher
        .respond("https://blog.example/rss", parsed("Example Blog", vec![]));
    let feed = h
        .service
        .add_feed(user_id, add_request("https://blog.example/rss"))
        .await
        .unwrap();
    h.feed_store
        .record_failure(feed.id, "transient outage")
        .await
        .unwrap();

    h.service.refresh_feeds(user_id).await.unwrap();

    let refreshed = h.feed_store.get(feed.id).unwrap();
    assert_eq!(refreshed.health_status, HealthStatus::Healthy);
    assert_eq!(refreshed.last_error, None);
    assert!(refreshed.last_fetched.is_some());
}

#[tokio::test]
async fn entries_are_written_in_rounds_of_ten() {
    let h = harness();
    let user_id = Uuid::new_v4();
    let entries: Vec<ParsedEntry> = (0..25)
        .map(|i| entry(&format!("Entry {i}"), &format!("https://blog.example/{i}")))
        .collect();
    h.fetcher
        .respond("https://blog.example/rss", parsed("Example Blog", entries));

    h.service
        .add_feed(user_id, add_request("https://blog.example/rss"))
        .await
        .unwrap();

    assert_eq!(h.article_store.batch_sizes(), vec![10, 10, 5]);
    assert_eq!(h.article_store.row_count(), 25);
}

#[tokio::test]
async fn duplicate_entry_urls_collapse_to_the_newest_version() {
    let h = harness();
    let user_id = Uuid::new_v4();
    h.fetcher.respond(
        "https://blog.example/rss",
        parsed(
            "Example Blog",
            vec![
                entry("Old title", "https://blog.example/1"),
                entry("New title", "https://blog.example/1"),
            ],
        ),
    );

    h.service
        .add_feed(user_id, add_request("https://blog.example/rss"))
        .await
        .unwrap();

    assert_eq!(h.article_store.row_count(), 1);
    assert_eq!(h.article_store.batch_sizes(), vec![1]);
    assert_eq!(
        h.article_store.row("https://blog.example/1").unwrap().title,
        "New title"
    );
}
