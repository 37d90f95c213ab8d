use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum FeedServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("feed not found")]
    NotFound,
    #[error("feed group not found")]
    GroupNotFound,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<FeedServiceError> for AppError {
    fn from(err: FeedServiceError) -> Self {
        match err {
            FeedServiceError::Invalid(msg) => AppError::BadRequest(msg),
            FeedServiceError::NotFound => AppError::NotFound("Feed not found".to_string()),
            FeedServiceError::GroupNotFound => {
                AppError::NotFound("Feed group not found".to_string())
            }
            FeedServiceError::Dependency(msg) => AppError::Internal(msg),
            FeedServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
