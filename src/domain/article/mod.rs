pub mod error;
pub mod model;
pub mod service;
pub mod store;

pub use error::ArticleServiceError;
pub use model::{
    Article, ArticleFilter, ArticleStats, ArticleWithState, NewArticle, SwipeDirection,
    UserArticle, UserArticleUpdate,
};
pub use service::{ArticleService, ArticleServiceApi};
pub use store::{ArticleStore, UserArticleStore};
