use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::article::{ArticleStore, NewArticle};
use crate::domain::feed::{Feed, FeedStore, HealthStatus};
use crate::domain::ingestion::error::IngestionError;
use crate::domain::ingestion::fetch::FeedFetcher;
use crate::domain::ingestion::normalize::convert_entry_to_article;
use crate::domain::ingestion::ParsedEntry;

/// Articles are written in fixed-size rounds to stay under the storage
/// API's payload limits
const UPSERT_BATCH_SIZE: usize = 10;

/// Request to subscribe to a new feed
#[derive(Debug, Serialize, Deserialize)]
pub struct AddFeedRequest {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<Uuid>,
}

/// Outcome of a refresh pass over a user's feeds
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshSummary {
    pub total: usize,
    pub refreshed: usize,
    pub failed: usize,
}

pub struct IngestionService {
    fetcher: Arc<dyn FeedFetcher>,
    feed_store: Arc<dyn FeedStore>,
    article_store: Arc<dyn ArticleStore>,
    default_refresh_interval_minutes: i32,
}

#[async_trait]
pub trait IngestionServiceApi: Send + Sync {
    /// Subscribe to a feed and populate its articles.
    ///
    /// Fetch/parse failure aborts the whole operation and no feed row is
    /// created. Once the feed exists, article population is best-effort:
    /// its failure is logged but the created feed is still returned, so the
    /// caller may retry ingestion later.
    async fn add_feed(
        &self,
        user_id: Uuid,
        request: AddFeedRequest,
    ) -> Result<Feed, IngestionError>;

    /// Re-ingest every feed the user owns, strictly one at a time. One
    /// feed's failure never aborts the remaining feeds; it is recorded in
    /// that feed's health and the loop moves on.
    async fn refresh_feeds(&self, user_id: Uuid) -> Result<RefreshSummary, IngestionError>;
}

impl IngestionService {
    pub fn new(
        fetcher: Arc<dyn FeedFetcher>,
        feed_store: Arc<dyn FeedStore>,
        article_store: Arc<dyn ArticleStore>,
        default_refresh_interval_minutes: i32,
    ) -> Self {
        Self {
            fetcher,
            feed_store,
            article_store,
            default_refresh_interval_minutes,
        }
    }

    /// Normalize entries and upsert them in rounds of [`UPSERT_BATCH_SIZE`].
    /// A failed round is logged and the remaining rounds still run, so a
    /// mid-stream failure leaves the feed partially populated rather than
    /// empty.
    async fn populate_articles(&self, feed_id: Uuid, entries: &[ParsedEntry]) {
        let ingested_at = Utc::now();
        let articles: Vec<NewArticle> = entries
            .iter()
            .map(|entry| convert_entry_to_article(entry, feed_id, ingested_at))
            .collect();
        let articles = dedupe_by_url(articles);

        let mut failed_batches = 0usize;
        let mut total_batches = 0usize;
        for batch in articles.chunks(UPSERT_BATCH_SIZE) {
            total_batches += 1;
            if let Err(err) = self.article_store.upsert_batch(batch).await {
                let err = IngestionError::StorageWrite(err.to_string());
                tracing::error!(
                    feed_id = %feed_id,
                    batch_size = batch.len(),
                    error = %err,
                    "Article batch upsert failed, continuing with remaining batches"
                );
                failed_batches += 1;
            }
        }

        if failed_batches > 0 {
            tracing::warn!(
                feed_id = %feed_id,
                failed_batches,
                total_batches,
                "Feed populated partially"
            );
        }
    }
}

#[async_trait]
impl IngestionServiceApi for IngestionService {
    async fn add_feed(
        &self,
        user_id: Uuid,
        request: AddFeedRequest,
    ) -> Result<Feed, IngestionError> {
        let url = request.url.trim();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(IngestionError::Invalid("Invalid URL format".to_string()));
        }

        if self
            .feed_store
            .exists_for_user(user_id, url)
            .await
            .map_err(|e| IngestionError::Dependency(e.to_string()))?
        {
            return Err(IngestionError::DuplicateFeed);
        }

        // Fetch+parse failure aborts here: no partial feed record
        let parsed = self.fetcher.fetch(url).await?;

        let feed = Feed {
            id: Uuid::new_v4(),
            user_id,
            group_id: request.group_id,
            title: parsed
                .title
                .clone()
                .unwrap_or_else(|| "Untitled Feed".to_string()),
            url: url.to_string(),
            description: parsed.description.clone(),
            favicon: parsed.favicon.clone().or_else(|| parsed.image_url.clone()),
            last_fetched: None,
            health_status: HealthStatus::Unknown,
            last_error: None,
            refresh_interval_minutes: self.default_refresh_interval_minutes,
            created_at: Utc::now(),
        };

        self.feed_store
            .insert(&feed)
            .await
            .map_err(|e| IngestionError::Dependency(e.to_string()))?;

        tracing::info!(feed_id = %feed.id, url = %feed.url, entries = parsed.entries.len(), "Feed added");

        // Population failure does not roll back the created feed
        self.populate_articles(feed.id, &parsed.entries).await;

        Ok(feed)
    }

    async fn refresh_feeds(&self, user_id: Uuid) -> Result<RefreshSummary, IngestionError> {
        let feeds = self
            .feed_store
            .find_by_user(user_id)
            .await
            .map_err(|e| IngestionError::Dependency(e.to_string()))?;

        let mut summary = RefreshSummary {
            total: feeds.len(),
            ..Default::default()
        };

        for feed in feeds {
            match self.fetcher.fetch(&feed.url).await {
                Ok(parsed) => {
                    self.populate_articles(feed.id, &parsed.entries).await;

                    if let Err(err) = self.feed_store.record_success(feed.id, Utc::now()).await {
                        tracing::error!(feed_id = %feed.id, error = %err, "Failed to record feed success");
                    }
                    summary.refreshed += 1;
                }
                Err(err) => {
                    tracing::warn!(feed_id = %feed.id, url = %feed.url, error = %err, "Feed refresh failed");

                    if let Err(store_err) =
                        self.feed_store.record_failure(feed.id, &err.to_string()).await
                    {
                        tracing::error!(feed_id = %feed.id, error = %store_err, "Failed to record feed failure");
                    }
                    summary.failed += 1;
                }
            }
        }

        tracing::info!(
            total = summary.total,
            refreshed = summary.refreshed,
            failed = summary.failed,
            "Refresh pass finished"
        );

        Ok(summary)
    }
}

/// Keep the last occurrence per URL so one multi-row upsert never touches
/// the same conflict key twice
fn dedupe_by_url(articles: Vec<NewArticle>) -> Vec<NewArticle> {
    let mut seen = HashSet::new();
    let mut deduped: Vec<NewArticle> = articles
        .into_iter()
        .rev()
        .filter(|article| seen.insert(article.url.clone()))
        .collect();
    deduped.reverse();
    deduped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn article(url: &str, title: &str) -> NewArticle {
        NewArticle {
            feed_id: Uuid::nil(),
            title: title.to_string(),
            url: url.to_string(),
            author: None,
            published_at: Utc::now(),
            content: String::new(),
            summary: String::new(),
            image_url: None,
            categories: Vec::new(),
            read_time: 1,
        }
    }

    #[test]
    fn dedupe_keeps_the_last_occurrence_per_url() {
        let deduped = dedupe_by_url(vec![
            article("https://a", "old"),
            article("https://b", "b"),
            article("https://a", "new"),
        ]);

        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].url, "https://b");
        assert_eq!(deduped[1].url, "https://a");
        assert_eq!(deduped[1].title, "new");
    }

    #[test]
    fn empty_urls_collapse_into_one_entry() {
        let deduped = dedupe_by_url(vec![
            article("", "first"),
            article("", "second"),
            article("https://a", "a"),
        ]);

        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].url, "");
        assert_eq!(deduped[0].title, "second");
    }
}
