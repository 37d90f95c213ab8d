pub mod article_repository;
pub mod feed_group_repository;
pub mod feed_repository;
pub mod user_article_repository;

pub use article_repository::ArticleRepository;
pub use feed_group_repository::FeedGroupRepository;
pub use feed_repository::FeedRepository;
pub use user_article_repository::UserArticleRepository;
