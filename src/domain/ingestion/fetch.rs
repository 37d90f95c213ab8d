//! Feed document retrieval and parsing. The HTTP fetcher retrieves the raw
//! payload with reqwest; `parse_document` understands both RSS/RDF channels
//! and Atom feeds and flattens them into [`ParsedFeed`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::domain::ingestion::error::IngestionError;
use crate::domain::ingestion::extract::strip_html;
use crate::domain::ingestion::model::{Enclosure, ParsedEntry, ParsedFeed};

const USER_AGENT: &str = concat!("feedswipe-backend/", env!("CARGO_PKG_VERSION"));

/// Retrieves and parses a feed document for a URL. Any failure surfaces as
/// [`IngestionError::FeedFetch`] and affects that feed only.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<ParsedFeed, IngestionError>;
}

pub struct HttpFeedFetcher {
    client: reqwest::Client,
}

impl HttpFeedFetcher {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch(&self, url: &str) -> Result<ParsedFeed, IngestionError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| IngestionError::FeedFetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IngestionError::FeedFetch(format!(
                "unexpected status {status} from {url}"
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| IngestionError::FeedFetch(e.to_string()))?;

        parse_document(&body)
    }
}

/// Parse a raw feed payload, trying RSS first and falling back to Atom
pub fn parse_document(body: &[u8]) -> Result<ParsedFeed, IngestionError> {
    match rss::Channel::read_from(body) {
        Ok(channel) => Ok(from_rss(channel)),
        Err(rss_err) => match atom_syndication::Feed::read_from(body) {
            Ok(feed) => Ok(from_atom(feed)),
            Err(atom_err) => Err(IngestionError::FeedFetch(format!(
                "not a valid RSS or Atom document (rss: {rss_err}; atom: {atom_err})"
            ))),
        },
    }
}

fn from_rss(channel: rss::Channel) -> ParsedFeed {
    ParsedFeed {
        title: non_empty(channel.title()),
        description: non_empty(channel.description()),
        image_url: channel.image().map(|image| image.url().to_string()),
        // RSS has no favicon element; callers fall back to the channel image
        favicon: None,
        entries: channel.items().iter().map(entry_from_rss).collect(),
    }
}

fn entry_from_rss(item: &rss::Item) -> ParsedEntry {
    let media_url = item
        .extensions()
        .get("media")
        .and_then(|media| media.get("content"))
        .and_then(|contents| {
            contents
                .iter()
                .find_map(|ext| ext.attrs().get("url").cloned())
        });

    let enclosure = item.enclosure().map(|enclosure| Enclosure {
        url: enclosure.url().to_string(),
        mime_type: enclosure.mime_type().to_string(),
    });

    let creator = item
        .dublin_core_ext()
        .and_then(|dc| dc.creators().first().cloned());

    let content = item.description().map(str::to_string);
    let content_encoded = item.content().map(str::to_string);

    ParsedEntry {
        title: item.title().and_then(non_empty),
        link: item.link().and_then(non_empty),
        creator,
        author: item.author().map(str::to_string),
        published: item.pub_date().and_then(parse_entry_date),
        snippet: content.as_deref().map(strip_html).and_then(|s| non_empty(&s)),
        encoded_snippet: content_encoded
            .as_deref()
            .map(strip_html)
            .and_then(|s| non_empty(&s)),
        content,
        content_encoded,
        media_url,
        enclosure,
        categories: item
            .categories()
            .iter()
            .map(|category| category.name().to_string())
            .collect(),
    }
}

fn from_atom(feed: atom_syndication::Feed) -> ParsedFeed {
    ParsedFeed {
        title: non_empty(feed.title().as_str()),
        description: feed.subtitle().and_then(|subtitle| non_empty(subtitle.as_str())),
        image_url: feed.logo().map(str::to_string),
        favicon: feed.icon().map(str::to_string),
        entries: feed.entries().iter().map(entry_from_atom).collect(),
    }
}

fn entry_from_atom(entry: &atom_syndication::Entry) -> ParsedEntry {
    let link = entry
        .links()
        .iter()
        .find(|link| link.rel() == "alternate")
        .or_else(|| entry.links().first())
        .map(|link| link.href().to_string());

    let enclosure = entry
        .links()
        .iter()
        .find(|link| link.rel() == "enclosure")
        .map(|link| Enclosure {
            url: link.href().to_string(),
            mime_type: link.mime_type().unwrap_or_default().to_string(),
        });

    let content = entry
        .content()
        .and_then(|content| content.value())
        .map(str::to_string);

    ParsedEntry {
        title: non_empty(entry.title().as_str()),
        link,
        creator: None,
        author: entry.authors().first().map(|person| person.name().to_string()),
        // Atom requires `updated`, so entries always carry a usable date
        published: Some(
            entry
                .published()
                .unwrap_or_else(|| entry.updated())
                .with_timezone(&Utc),
        ),
        snippet: entry
            .summary()
            .map(|summary| strip_html(summary.as_str()))
            .and_then(|s| non_empty(&s)),
        encoded_snippet: content.as_deref().map(strip_html).and_then(|s| non_empty(&s)),
        content,
        content_encoded: None,
        media_url: None,
        enclosure,
        categories: entry
            .categories()
            .iter()
            .map(|category| category.term().to_string())
            .collect(),
    }
}

/// RSS dates are RFC 2822; plenty of feeds emit RFC 3339 anyway, so both are
/// accepted. Anything else falls through to the normalizer's ingestion-time
/// default.
fn parse_entry_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|date| date.with_timezone(&Utc))
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
