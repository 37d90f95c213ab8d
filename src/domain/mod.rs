pub mod article;
pub mod feed;
pub mod ingestion;
