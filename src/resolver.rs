//! YouTube handle to channel id resolution.
//!
//! YouTube publishes per-channel Atom feeds keyed by channel id, but people
//! configure channels by `@handle`. [`ProfilePageResolver`] bridges the two
//! by scraping the channel's About page for the embedded `channelId` token.
//! That is brittle by nature, so it sits behind [`ChannelResolver`] and a
//! miss is an ordinary [`Resolution::Unresolved`], never an error.

use crate::config::YoutubeSource;
use crate::http::HttpSource;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Default bound on the About page request.
pub const RESOLVE_TIMEOUT: Duration = Duration::from_secs(15);

const CHANNEL_FEED_BASE: &str = "https://www.youtube.com/feeds/videos.xml";

static CHANNEL_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""channelId":"(UC[0-9A-Za-z_-]{22})""#).expect("valid channel id regex")
});

/// Outcome of resolving a handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(String),
    /// Why the handle could not be resolved, for the warning line.
    Unresolved(String),
}

/// Maps a human handle to a stable channel id.
#[async_trait]
pub trait ChannelResolver: Send + Sync {
    async fn resolve(&self, handle: &str) -> Resolution;
}

/// Resolves handles by pattern-matching the public About page.
pub struct ProfilePageResolver {
    http: Arc<dyn HttpSource>,
    timeout: Duration,
}

impl ProfilePageResolver {
    pub fn new(http: Arc<dyn HttpSource>, timeout: Duration) -> Self {
        Self { http, timeout }
    }

    fn about_url(handle: &str) -> String {
        format!(
            "https://www.youtube.com/@{}/about",
            urlencoding::encode(handle)
        )
    }
}

#[async_trait]
impl ChannelResolver for ProfilePageResolver {
    #[instrument(level = "debug", skip(self))]
    async fn resolve(&self, handle: &str) -> Resolution {
        let url = Self::about_url(handle);
        let page = match self.http.get_text(&url, Some(self.timeout)).await {
            Ok(page) => page,
            Err(e) => return Resolution::Unresolved(e.to_string()),
        };

        match extract_channel_id(&page) {
            Some(id) => {
                debug!(%id, "Resolved channel id");
                Resolution::Resolved(id)
            }
            None => Resolution::Unresolved(format!("no channel id found on {url}")),
        }
    }
}

/// First `"channelId":"UC…"` token embedded in a page.
pub fn extract_channel_id(page: &str) -> Option<String> {
    CHANNEL_ID_RE
        .captures(page)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Channel id for a configured source: the configured id if present,
/// otherwise whatever the resolver makes of the handle.
pub async fn resolve_source(source: &YoutubeSource, resolver: &dyn ChannelResolver) -> Resolution {
    if let Some(id) = source
        .channel_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
    {
        return Resolution::Resolved(id.to_string());
    }
    match source.bare_handle() {
        Some(handle) => resolver.resolve(handle).await,
        None => Resolution::Unresolved("no channel_id or handle configured".to_string()),
    }
}

/// Atom feed URL for a channel id.
pub fn channel_feed_url(channel_id: &str) -> String {
    match Url::parse_with_params(CHANNEL_FEED_BASE, &[("channel_id", channel_id)]) {
        Ok(url) => url.to_string(),
        Err(_) => format!("{CHANNEL_FEED_BASE}?channel_id={channel_id}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::StubHttp;

    const CHANNEL_ID: &str = "UC_x5XG1OV2P6uZZ5FSM9Ttw";

    fn about_page() -> String {
        format!(
            r#"<html><script>var ytInitialData = {{"metadata":{{"channelId":"{CHANNEL_ID}","title":"Dev"}}}};</script></html>"#
        )
    }

    #[test]
    fn test_extract_channel_id() {
        assert_eq!(extract_channel_id(&about_page()).as_deref(), Some(CHANNEL_ID));
        assert_eq!(extract_channel_id(r#""channelId":"UCshort""#), None);
        assert_eq!(extract_channel_id("nothing here"), None);
    }

    #[test]
    fn test_channel_feed_url() {
        assert_eq!(
            channel_feed_url(CHANNEL_ID),
            format!("https://www.youtube.com/feeds/videos.xml?channel_id={CHANNEL_ID}")
        );
    }

    #[tokio::test]
    async fn test_resolver_matches_about_page_with_timeout() {
        let stub = Arc::new(
            StubHttp::new().with_page("https://www.youtube.com/@dev/about", &about_page()),
        );
        let resolver = ProfilePageResolver::new(stub.clone(), RESOLVE_TIMEOUT);

        assert_eq!(
            resolver.resolve("dev").await,
            Resolution::Resolved(CHANNEL_ID.to_string())
        );
        assert_eq!(
            stub.requests(),
            vec![(
                "https://www.youtube.com/@dev/about".to_string(),
                Some(Duration::from_secs(15))
            )]
        );
    }

    #[tokio::test]
    async fn test_resolver_failures_are_unresolved() {
        let stub = Arc::new(
            StubHttp::new()
                .with_page("https://www.youtube.com/@blank/about", "<html></html>")
                .with_status("https://www.youtube.com/@gone/about", 500),
        );
        let resolver = ProfilePageResolver::new(stub, RESOLVE_TIMEOUT);

        assert!(matches!(resolver.resolve("blank").await, Resolution::Unresolved(_)));
        assert!(matches!(resolver.resolve("gone").await, Resolution::Unresolved(_)));
        assert!(matches!(resolver.resolve("unknown").await, Resolution::Unresolved(_)));
    }

    #[tokio::test]
    async fn test_resolve_source_passes_configured_id_through() {
        let stub = Arc::new(StubHttp::new());
        let resolver = ProfilePageResolver::new(stub.clone(), RESOLVE_TIMEOUT);
        let source = YoutubeSource {
            channel_id: Some(CHANNEL_ID.to_string()),
            handle: Some("@dev".to_string()),
            label: None,
        };

        assert_eq!(
            resolve_source(&source, &resolver).await,
            Resolution::Resolved(CHANNEL_ID.to_string())
        );
        assert!(stub.requests().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_source_strips_at_from_handle() {
        let stub = Arc::new(
            StubHttp::new().with_page("https://www.youtube.com/@dev/about", &about_page()),
        );
        let resolver = ProfilePageResolver::new(stub, RESOLVE_TIMEOUT);
        let source = YoutubeSource {
            handle: Some("@dev".to_string()),
            ..Default::default()
        };

        assert_eq!(
            resolve_source(&source, &resolver).await,
            Resolution::Resolved(CHANNEL_ID.to_string())
        );
        assert!(matches!(
            resolve_source(&YoutubeSource::default(), &resolver).await,
            Resolution::Unresolved(_)
        ));
    }
}
