//! Field extraction heuristics over parsed entries: best-available image,
//! truncated summary, and estimated reading time. All pure functions.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::ingestion::ParsedEntry;

/// Hard cap on derived summaries; longer text is cut at 297 chars + "..."
const SUMMARY_MAX_CHARS: usize = 300;

/// Average reading speed used for the read-time estimate
const WORDS_PER_MINUTE: usize = 225;

static IMG_SRC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<img[^>]+src="([^">]+)""#).expect("static pattern is valid"));

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("static pattern is valid"));

/// Best available image URL for an entry. Ordered fallback, first match
/// wins: structured `media:content` URL, then an enclosure declared as an
/// image, then the first inline `<img src>` in the encoded content (falling
/// back to the plain content), else none.
pub fn extract_image_url(entry: &ParsedEntry) -> Option<String> {
    if let Some(url) = &entry.media_url {
        return Some(url.clone());
    }

    if let Some(enclosure) = &entry.enclosure {
        if enclosure.mime_type.starts_with("image/") {
            return Some(enclosure.url.clone());
        }
    }

    let haystack = entry
        .content_encoded
        .as_deref()
        .or(entry.content.as_deref())
        .unwrap_or("");

    IMG_SRC_RE
        .captures(haystack)
        .map(|captures| captures[1].to_string())
}

/// Plain-text summary for an entry. A source-provided snippet is returned
/// verbatim, un-truncated; otherwise the encoded snippet is hard-cut at a
/// character count with no word-boundary awareness (documented behavior).
pub fn extract_summary(entry: &ParsedEntry) -> String {
    if let Some(snippet) = entry.snippet.as_deref().filter(|s| !s.is_empty()) {
        return snippet.to_string();
    }

    let text = entry
        .encoded_snippet
        .as_deref()
        .or(entry.snippet.as_deref())
        .unwrap_or("");

    if text.chars().count() > SUMMARY_MAX_CHARS {
        let cut: String = text.chars().take(SUMMARY_MAX_CHARS - 3).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

/// Estimated reading time in whole minutes, never below 1. Markup is
/// stripped, the remaining words are counted and divided by a fixed reading
/// speed, rounding up.
pub fn estimate_reading_time(html_content: &str) -> u32 {
    let plain = strip_html(html_content);
    let words = plain.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as u32
}

/// Remove markup tags via pattern removal and trim the result
pub fn strip_html(html: &str) -> String {
    TAG_RE.replace_all(html, "").trim().to_string()
}
