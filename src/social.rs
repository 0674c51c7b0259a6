//! Recent posts for X accounts, read through public mirror instances.
//!
//! There is no API access, so each handle is tried against an ordered list of
//! mirrors serving `{mirror}/{handle}/rss`. The first mirror returning any
//! entries wins. A handle no mirror knows about still gets an
//! [`AccountRecord`], with no posts.

use crate::clock::RunClock;
use crate::config::SocialHandle;
use crate::feeds::FeedFetcher;
use crate::models::{AccountRecord, RawEntry, SocialDocument, SocialPost};
use crate::normalize::{content_id, present};
use crate::text::strip_markup;
use tracing::{info, instrument, warn};

/// Public mirrors tried when none are configured.
pub const DEFAULT_MIRRORS: [&str; 3] = [
    "https://nitter.poast.org",
    "https://nitter.privacydev.net",
    "https://nitter.net",
];

/// Posts kept per account when no limit is configured.
pub const DEFAULT_POSTS_PER_HANDLE: usize = 5;

/// Mirror feeds prefix post titles with `"Display Name: "`.
const AUTHOR_SEPARATOR: &str = ": ";

/// Walks the mirror list for each configured handle.
pub struct MirrorFetcher {
    fetcher: FeedFetcher,
    mirrors: Vec<String>,
    limit: usize,
}

impl MirrorFetcher {
    pub fn new(fetcher: FeedFetcher, mirrors: Vec<String>, limit: usize) -> Self {
        let mirrors = mirrors
            .into_iter()
            .map(|m| m.trim().trim_end_matches('/').to_string())
            .filter(|m| !m.is_empty())
            .collect();
        Self {
            fetcher,
            mirrors,
            limit,
        }
    }

    /// Collect one record per non-empty handle, in configuration order.
    #[instrument(level = "info", skip_all, fields(handles = handles.len()))]
    pub async fn fetch_accounts(
        &self,
        handles: &[SocialHandle],
        clock: &mut RunClock,
    ) -> Vec<AccountRecord> {
        let mut accounts = Vec::with_capacity(handles.len());
        for configured in handles {
            let Some(handle) = normalize_handle(configured.handle.as_deref().unwrap_or("")) else {
                continue;
            };
            accounts.push(self.fetch_account(&handle, clock).await);
        }
        accounts
    }

    /// Run [`Self::fetch_accounts`] and stamp the result as a document.
    pub async fn build_document(
        &self,
        handles: &[SocialHandle],
        clock: &mut RunClock,
    ) -> SocialDocument {
        let accounts = self.fetch_accounts(handles, clock).await;
        SocialDocument {
            accounts,
            generated_at: clock.now(),
        }
    }

    async fn fetch_account(&self, handle: &str, clock: &mut RunClock) -> AccountRecord {
        let profile_url = profile_url(handle);
        let entries = self.first_nonempty_mirror(handle).await;

        if entries.is_empty() {
            warn!(%handle, mirrors = self.mirrors.len(), "No posts found on any mirror");
        } else {
            info!(%handle, count = entries.len().min(self.limit), "Collected posts");
        }

        let posts = entries
            .iter()
            .take(self.limit)
            .map(|entry| normalize_post(entry, &profile_url, clock))
            .collect();

        AccountRecord {
            handle: handle.to_string(),
            url: profile_url,
            posts,
        }
    }

    async fn first_nonempty_mirror(&self, handle: &str) -> Vec<RawEntry> {
        for mirror in &self.mirrors {
            let entries = self.fetcher.fetch(&mirror_feed_url(mirror, handle)).await;
            if !entries.is_empty() {
                return entries;
            }
        }
        Vec::new()
    }
}

/// Trim whitespace and leading `@`s; `None` when nothing is left.
pub fn normalize_handle(raw: &str) -> Option<String> {
    let handle = raw.trim().trim_start_matches('@');
    (!handle.is_empty()).then(|| handle.to_string())
}

pub fn profile_url(handle: &str) -> String {
    format!("https://x.com/{handle}")
}

pub fn mirror_feed_url(mirror: &str, handle: &str) -> String {
    format!("{mirror}/{handle}/rss")
}

/// Post text: stripped title, else stripped summary, minus any author prefix.
///
/// Everything up to the first `": "` is dropped, which also eats the start
/// of posts that merely contain a colon early on. Mirrors give no way to
/// tell the two apart.
pub fn post_text(entry: &RawEntry) -> String {
    let title = strip_markup(entry.title.as_deref().unwrap_or(""));
    let text = if title.is_empty() {
        strip_markup(entry.summary.as_deref().unwrap_or(""))
    } else {
        title
    };
    match text.split_once(AUTHOR_SEPARATOR) {
        Some((_, rest)) => rest.to_string(),
        None => text,
    }
}

fn normalize_post(entry: &RawEntry, profile_url: &str, clock: &mut RunClock) -> SocialPost {
    let text = post_text(entry);
    let link = present(&entry.link).unwrap_or("");
    let published = match entry.timestamp() {
        Some(ts) => ts,
        None => clock.now(),
    };

    SocialPost {
        id: content_id(&format!("{link}{text}")),
        url: if link.is_empty() {
            profile_url.to_string()
        } else {
            link.to_string()
        },
        text,
        published,
    }
}
