use chrono::{DateTime, Utc};

/// Feed-level metadata plus the ordered entries of one parsed document.
/// Produced by [`super::fetch::parse_document`] from either an RSS/RDF
/// channel or an Atom feed.
#[derive(Debug, Clone, Default)]
pub struct ParsedFeed {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub favicon: Option<String>,
    pub entries: Vec<ParsedEntry>,
}

/// One item of a parsed feed document, pre-normalization. Every field is
/// optional; the normalizer supplies documented defaults.
#[derive(Debug, Clone, Default)]
pub struct ParsedEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    /// Dublin Core creator, preferred over `author` when both exist
    pub creator: Option<String>,
    pub author: Option<String>,
    pub published: Option<DateTime<Utc>>,
    /// Plain content field (`<description>` for RSS, `<content>` for Atom)
    pub content: Option<String>,
    /// `<content:encoded>`, usually the richer HTML body
    pub content_encoded: Option<String>,
    /// Pre-stripped plain-text snippet derived from the plain content
    pub snippet: Option<String>,
    /// Pre-stripped plain-text snippet derived from the encoded content
    pub encoded_snippet: Option<String>,
    /// `media:content` URL attribute, the most structured image signal
    pub media_url: Option<String>,
    pub enclosure: Option<Enclosure>,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Enclosure {
    pub url: String,
    pub mime_type: String,
}
