//! HTTP fetcher tests against a local mock server: document parsing on
//! success and error surfacing on upstream failures.

use pretty_assertions::assert_eq;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use feedswipe_backend::domain::ingestion::{FeedFetcher, HttpFeedFetcher, IngestionError};

const RSS_BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <channel>
    <title>Wire Blog</title>
    <description>A blog served over the wire</description>
    <item>
      <title>First post</title>
      <link>https://wire.example/first</link>
      <dc:creator>Sam</dc:creator>
      <description>Hello from the wire</description>
      <pubDate>Mon, 06 Sep 2021 12:00:00 GMT</pubDate>
    </item>
  </channel>
</rss>"#;

const ATOM_BODY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Wire Atom</title>
  <id>urn:uuid:60a76c80-d399-11d9-b93C-0003939e0af6</id>
  <updated>2021-09-06T12:00:00Z</updated>
  <entry>
    <title>Atom post</title>
    <id>urn:uuid:1225c695-cfb8-4ebb-aaaa-80da344efa6a</id>
    <link rel="alternate" href="https://wire.example/atom-post"/>
    <updated>2021-09-06T12:00:00Z</updated>
  </entry>
</feed>"#;

fn fetcher() -> HttpFeedFetcher {
    HttpFeedFetcher::new(Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn fetches_and_parses_an_rss_document() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(RSS_BODY, "application/rss+xml"))
        .mount(&server)
        .await;

    let parsed = fetcher()
        .fetch(&format!("{}/feed.xml", server.uri()))
        .await
        .unwrap();

    assert_eq!(parsed.title.as_deref(), Some("Wire Blog"));
    assert_eq!(parsed.entries.len(), 1);
    assert_eq!(parsed.entries[0].title.as_deref(), Some("First post"));
    assert_eq!(
        parsed.entries[0].link.as_deref(),
        Some("https://wire.example/first")
    );
    assert_eq!(parsed.entries[0].creator.as_deref(), Some("Sam"));
}

#[tokio::test]
async fn falls_back_to_atom_when_the_document_is_not_rss() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(ATOM_BODY, "application/atom+xml"))
        .mount(&server)
        .await;

    let parsed = fetcher()
        .fetch(&format!("{}/feed.xml", server.uri()))
        .await
        .unwrap();

    assert_eq!(parsed.title.as_deref(), Some("Wire Atom"));
    assert_eq!(
        parsed.entries[0].link.as_deref(),
        Some("https://wire.example/atom-post")
    );
}

#[tokio::test]
async fn a_non_success_status_is_a_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed.xml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = fetcher()
        .fetch(&format!("{}/feed.xml", server.uri()))
        .await
        .unwrap_err();

    match err {
        IngestionError::FeedFetch(msg) => assert!(msg.contains("404")),
        other => panic!("expected FeedFetch, got {other:?}"),
    }
}

#[tokio::test]
async fn a_non_feed_body_is_a_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not a feed</html>"))
        .mount(&server)
        .await;

    let err = fetcher()
        .fetch(&format!("{}/feed.xml", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, IngestionError::FeedFetch(_)));
}

#[tokio::test]
async fn an_unreachable_host_is_a_fetch_error() {
    let server = MockServer::start().await;
    let url = format!("{}/feed.xml", server.uri());
    drop(server);

    let err = fetcher().fetch(&url).await.unwrap_err();

    assert!(matches!(err, IngestionError::FeedFetch(_)));
}
