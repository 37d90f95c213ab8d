use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum IngestionError {
    /// Network or parse failure at the source; aborts only the current
    /// feed's ingestion, never other feeds
    #[error("failed to fetch feed: {0}")]
    FeedFetch(String),
    /// Upsert failure; logged and counted, never aborts the batch loop
    #[error("failed to store articles: {0}")]
    StorageWrite(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("feed already exists")]
    DuplicateFeed,
    #[error("dependency error: {0}")]
    Dependency(String),
}

impl From<IngestionError> for AppError {
    fn from(err: IngestionError) -> Self {
        match err {
            IngestionError::FeedFetch(msg) => AppError::UpstreamFeed(msg),
            IngestionError::Invalid(msg) => AppError::BadRequest(msg),
            IngestionError::DuplicateFeed => {
                AppError::Conflict("Feed URL already exists".to_string())
            }
            IngestionError::StorageWrite(msg) | IngestionError::Dependency(msg) => {
                AppError::Internal(msg)
            }
        }
    }
}
