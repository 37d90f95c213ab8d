//! Maps a parsed entry into the canonical article shape. A pure transform
//! with total fallbacks: well-formed or not, an entry always normalizes.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::article::NewArticle;
use crate::domain::ingestion::extract::{
    estimate_reading_time, extract_image_url, extract_summary,
};
use crate::domain::ingestion::ParsedEntry;

/// Build the canonical article for an entry owned by `feed_id`.
///
/// Fallbacks, in contract order: title defaults to "Untitled", a missing link
/// becomes an empty URL (the known empty-key edge case), creator is preferred
/// over author, a missing or unparseable date collapses to `ingested_at`,
/// and content prefers the encoded body over the plain one.
pub fn convert_entry_to_article(
    entry: &ParsedEntry,
    feed_id: Uuid,
    ingested_at: DateTime<Utc>,
) -> NewArticle {
    let content = entry
        .content_encoded
        .clone()
        .or_else(|| entry.content.clone())
        .unwrap_or_default();

    NewArticle {
        feed_id,
        title: entry
            .title
            .clone()
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| "Untitled".to_string()),
        url: entry.link.clone().unwrap_or_default(),
        author: entry.creator.clone().or_else(|| entry.author.clone()),
        published_at: entry.published.unwrap_or(ingested_at),
        summary: extract_summary(entry),
        image_url: extract_image_url(entry),
        read_time: estimate_reading_time(&content) as i32,
        categories: entry.categories.clone(),
        content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ingestion::Enclosure;
    use pretty_assertions::assert_eq;

    #[test]
    fn bare_entry_normalizes_with_documented_defaults() {
        let now = Utc::now();
        let feed_id = Uuid::new_v4();

        let article = convert_entry_to_article(&ParsedEntry::default(), feed_id, now);

        assert_eq!(article.feed_id, feed_id);
        assert_eq!(article.title, "Untitled");
        assert_eq!(article.url, "");
        assert_eq!(article.author, None);
        assert_eq!(article.published_at, now);
        assert_eq!(article.content, "");
        assert_eq!(article.summary, "");
        assert_eq!(article.image_url, None);
        assert_eq!(article.categories, Vec::<String>::new());
        assert_eq!(article.read_time, 1);
    }

    #[test]
    fn fully_populated_entry_maps_every_field() {
        let published = Utc::now() - chrono::Duration::days(2);
        let entry = ParsedEntry {
            title: Some("Big News".to_string()),
            link: Some("https://example.com/big-news".to_string()),
            creator: Some("Alex Writer".to_string()),
            author: Some("editor@example.com".to_string()),
            published: Some(published),
            content: Some("<p>short</p>".to_string()),
            content_encoded: Some("<p>the full story</p>".to_string()),
            snippet: Some("the full story".to_string()),
            encoded_snippet: None,
            media_url: None,
            enclosure: Some(Enclosure {
                url: "https://example.com/hero.png".to_string(),
                mime_type: "image/png".to_string(),
            }),
            categories: vec!["news".to_string(), "tech".to_string()],
        };

        let article = convert_entry_to_article(&entry, Uuid::new_v4(), Utc::now());

        assert_eq!(article.title, "Big News");
        assert_eq!(article.url, "https://example.com/big-news");
        // Dublin Core creator wins over the author field
        assert_eq!(article.author.as_deref(), Some("Alex Writer"));
        assert_eq!(article.published_at, published);
        assert_eq!(article.content, "<p>the full story</p>");
        assert_eq!(article.summary, "the full story");
        assert_eq!(
            article.image_url.as_deref(),
            Some("https://example.com/hero.png")
        );
        assert_eq!(article.categories, vec!["news", "tech"]);
        assert_eq!(article.read_time, 1);
    }

    #[test]
    fn author_field_is_used_when_creator_is_absent() {
        let entry = ParsedEntry {
            author: Some("editor@example.com".to_string()),
            ..Default::default()
        };
        let article = convert_entry_to_article(&entry, Uuid::new_v4(), Utc::now());
        assert_eq!(article.author.as_deref(), Some("editor@example.com"));
    }

    #[test]
    fn empty_title_falls_back_to_untitled() {
        let entry = ParsedEntry {
            title: Some(String::new()),
            ..Default::default()
        };
        let article = convert_entry_to_article(&entry, Uuid::new_v4(), Utc::now());
        assert_eq!(article.title, "Untitled");
    }

    #[test]
    fn plain_content_is_used_when_no_encoded_body() {
        let entry = ParsedEntry {
            content: Some("<p>only description</p>".to_string()),
            ..Default::default()
        };
        let article = convert_entry_to_article(&entry, Uuid::new_v4(), Utc::now());
        assert_eq!(article.content, "<p>only description</p>");
    }
}
