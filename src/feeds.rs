//! RSS/Atom retrieval that never fails the run.
//!
//! [`FeedFetcher::fetch`] turns a feed URL into [`RawEntry`] values. Network
//! errors, error statuses and unparseable bodies all come back as an empty
//! list; they are logged at debug level only, since an empty feed is an
//! ordinary outcome for this pipeline.

use crate::http::{FetchError, HttpSource};
use crate::models::RawEntry;
use feed_rs::model::Entry;
use feed_rs::parser;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Fetches and parses feeds over an [`HttpSource`].
#[derive(Clone)]
pub struct FeedFetcher {
    http: Arc<dyn HttpSource>,
}

impl FeedFetcher {
    pub fn new(http: Arc<dyn HttpSource>) -> Self {
        Self { http }
    }

    /// Fetch a feed, yielding no entries on any failure. Single attempt.
    #[instrument(level = "debug", skip(self))]
    pub async fn fetch(&self, url: &str) -> Vec<RawEntry> {
        match self.try_fetch(url).await {
            Ok(entries) => {
                debug!(count = entries.len(), "Parsed feed entries");
                entries
            }
            Err(e) => {
                debug!(error = %e, "Feed unavailable; treating as empty");
                Vec::new()
            }
        }
    }

    /// Fetch a feed, surfacing the failure instead of swallowing it.
    pub async fn try_fetch(&self, url: &str) -> Result<Vec<RawEntry>, FetchError> {
        let body = self.http.get_text(url, None).await?;
        parse_entries(&body)
    }
}

/// Parse an RSS, Atom or JSON Feed document into raw entries, in document order.
pub fn parse_entries(body: &str) -> Result<Vec<RawEntry>, FetchError> {
    let feed = parser::parse(body.as_bytes())
        .map_err(|e| FetchError::Parse(format!("Failed to parse feed: {e}")))?;
    Ok(feed.entries.into_iter().map(raw_entry).collect())
}

fn raw_entry(entry: Entry) -> RawEntry {
    let link = entry
        .links
        .iter()
        .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
        .or_else(|| entry.links.first())
        .map(|l| l.href.clone());
    let url = (entry.id.starts_with("http://") || entry.id.starts_with("https://"))
        .then(|| entry.id.clone());

    // YouTube carries the video description in media:group, not in a summary.
    let description = entry
        .content
        .and_then(|c| c.body)
        .or_else(|| {
            entry
                .media
                .into_iter()
                .find_map(|m| m.description.map(|d| d.content))
        });

    RawEntry {
        title: entry.title.map(|t| t.content),
        link,
        url,
        summary: entry.summary.map(|s| s.content),
        description,
        published: entry.published,
        updated: entry.updated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::{StubHttp, rss_feed};
    use chrono::{TimeZone, Utc};

    const YOUTUBE_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns:yt="http://www.youtube.com/xml/schemas/2015" xmlns:media="http://search.yahoo.com/mrss/" xmlns="http://www.w3.org/2005/Atom">
  <id>yt:channel:UCabcdefghijklmnopqrstuv</id>
  <title>Some Channel</title>
  <published>2020-01-01T00:00:00+00:00</published>
  <entry>
    <id>yt:video:abc123</id>
    <yt:videoId>abc123</yt:videoId>
    <title>A short video</title>
    <link rel="alternate" href="https://www.youtube.com/watch?v=abc123"/>
    <published>2025-03-01T10:00:00+00:00</published>
    <updated>2025-03-02T10:00:00+00:00</updated>
    <media:group>
      <media:title>A short video</media:title>
      <media:description>What this video covers.</media:description>
    </media:group>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_rss_entries() {
        let body = rss_feed(&[
            (
                "First",
                "https://a.example/1",
                "<p>Hello</p>",
                Some("Sat, 01 Mar 2025 10:00:00 GMT"),
            ),
            ("Second", "https://a.example/2", "World", None),
        ]);

        let entries = parse_entries(&body).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title.as_deref(), Some("First"));
        assert_eq!(entries[0].link.as_deref(), Some("https://a.example/1"));
        assert_eq!(entries[0].summary.as_deref(), Some("<p>Hello</p>"));
        assert_eq!(
            entries[0].published,
            Some(Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap())
        );
        assert_eq!(entries[1].timestamp(), None);
    }

    #[test]
    fn test_parse_youtube_atom_uses_media_description() {
        let entries = parse_entries(YOUTUBE_FEED).unwrap();

        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.title.as_deref(), Some("A short video"));
        assert_eq!(
            entry.link.as_deref(),
            Some("https://www.youtube.com/watch?v=abc123")
        );
        assert_eq!(
            entry.summary.as_deref().or(entry.description.as_deref()),
            Some("What this video covers.")
        );
        assert_eq!(
            entry.published,
            Some(Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap())
        );
        assert_eq!(
            entry.updated,
            Some(Utc.with_ymd_and_hms(2025, 3, 2, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_atom_prefers_alternate_link() {
        let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <id>tag:blogger.com,1999:blog-1</id>
  <title>Blog</title>
  <updated>2025-01-10T00:00:00Z</updated>
  <entry>
    <id>tag:blogger.com,1999:blog-1.post-1</id>
    <title>Post</title>
    <updated>2025-01-10T00:00:00Z</updated>
    <link rel="replies" type="application/atom+xml" href="https://b.example/feeds/1/comments/default"/>
    <link rel="edit" type="application/atom+xml" href="https://b.example/feeds/posts/default/1"/>
    <link rel="self" type="application/atom+xml" href="https://b.example/feeds/posts/default/1"/>
    <link rel="alternate" type="text/html" href="https://b.example/2025/01/post.html"/>
  </entry>
  <entry>
    <id>tag:blogger.com,1999:blog-1.post-2</id>
    <title>Only replies</title>
    <updated>2025-01-11T00:00:00Z</updated>
    <link rel="replies" href="https://b.example/feeds/2/comments/default"/>
  </entry>
</feed>"#;

        let entries = parse_entries(body).unwrap();
        assert_eq!(
            entries[0].link.as_deref(),
            Some("https://b.example/2025/01/post.html")
        );
        assert_eq!(
            entries[1].link.as_deref(),
            Some("https://b.example/feeds/2/comments/default")
        );
    }

    #[test]
    fn test_parse_garbage_is_an_error() {
        assert!(matches!(
            parse_entries("<html><body>not a feed</body></html>"),
            Err(FetchError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_swallows_failures() {
        let stub = Arc::new(
            StubHttp::new()
                .with_page("https://ok.example/feed", &rss_feed(&[("T", "https://ok.example/1", "", None)]))
                .with_page("https://junk.example/feed", "definitely not xml")
                .with_status("https://down.example/feed", 503),
        );
        let fetcher = FeedFetcher::new(stub.clone());

        assert_eq!(fetcher.fetch("https://ok.example/feed").await.len(), 1);
        assert!(fetcher.fetch("https://junk.example/feed").await.is_empty());
        assert!(fetcher.fetch("https://down.example/feed").await.is_empty());
        assert!(fetcher.fetch("https://missing.example/feed").await.is_empty());

        // one attempt each, no transport timeout for feeds
        let requests = stub.requests();
        assert_eq!(requests.len(), 4);
        assert!(requests.iter().all(|(_, timeout)| timeout.is_none()));
    }
}
