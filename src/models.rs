//! Data models for feed entries and the two documents published to the site.
//!
//! This module defines the core data structures used throughout the application:
//! - [`RawEntry`]: A feed entry as parsed, before normalization
//! - [`Item`]: One normalized video or article surfaced to the site
//! - [`SocialPost`] / [`AccountRecord`]: Posts collected from X mirrors
//! - [`ItemsDocument`] / [`SocialDocument`]: The JSON files written each run
//!
//! Field order on the serialized structs is the order the site expects, so
//! keep it stable when adding fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A feed entry as it comes out of the parser.
///
/// Every field is optional because real feeds omit all of them at some
/// point. The normalizer decides the fallbacks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEntry {
    pub title: Option<String>,
    /// Primary `<link>` of the entry.
    pub link: Option<String>,
    /// Secondary URL, taken from the entry id when it is itself a URL.
    pub url: Option<String>,
    pub summary: Option<String>,
    /// Full content body, or the media description on YouTube feeds.
    pub description: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

impl RawEntry {
    /// Published time, falling back to the updated time.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.published.or(self.updated)
    }
}

/// Where an [`Item`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Youtube,
    Rss,
}

/// Coarse length classification used by the site to split its columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    /// Short: a few minutes of reading or a clip of five minutes or less.
    Highlight,
    Deeper,
}

/// A normalized content record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Content hash of the URL (or title when there is no URL).
    pub id: String,
    pub title: String,
    pub url: Option<String>,
    /// Display label of the configured source.
    pub source: String,
    pub source_type: SourceType,
    pub published: DateTime<Utc>,
    /// Plain text, at most 280 characters.
    pub summary: String,
    pub read_minutes: u32,
    pub duration_sec: Option<u32>,
    pub themes: Vec<String>,
    pub bucket: Bucket,
}

/// A single post taken from an X mirror feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialPost {
    pub id: String,
    pub url: String,
    pub text: String,
    pub published: DateTime<Utc>,
}

/// All posts collected for one configured handle.
///
/// An empty `posts` list means every mirror was tried and none returned
/// anything; it is still written so the site can tell that apart from an
/// account that is not configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub handle: String,
    pub url: String,
    pub posts: Vec<SocialPost>,
}

/// Contents of `items.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemsDocument {
    pub items: Vec<Item>,
    pub generated_at: DateTime<Utc>,
}

/// Contents of `twitter_posts.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialDocument {
    pub accounts: Vec<AccountRecord>,
    pub generated_at: DateTime<Utc>,
}
