use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum ArticleServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("article not found")]
    NotFound,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ArticleServiceError> for AppError {
    fn from(err: ArticleServiceError) -> Self {
        match err {
            ArticleServiceError::NotFound => AppError::NotFound("Article not found".to_string()),
            ArticleServiceError::Dependency(msg) => AppError::Internal(msg),
            ArticleServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
