pub mod article;
pub mod feed;
pub mod health;

pub use article::ArticleController;
pub use feed::FeedController;
