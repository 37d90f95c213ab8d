pub mod error;
pub mod extract;
pub mod fetch;
pub mod model;
pub mod normalize;
pub mod service;

pub use error::IngestionError;
pub use fetch::{parse_document, FeedFetcher, HttpFeedFetcher};
pub use model::{Enclosure, ParsedEntry, ParsedFeed};
pub use normalize::convert_entry_to_article;
pub use service::{AddFeedRequest, IngestionService, IngestionServiceApi, RefreshSummary};
