//! YAML manifests describing what to aggregate.
//!
//! Two files drive a run:
//!
//! ```yaml
//! # feeds.yml
//! youtube:
//!   - { handle: "@somechannel", label: "Some Channel" }
//!   - { channel_id: "UCxxxxxxxxxxxxxxxxxxxxxx" }
//! rss:
//!   - { feed_url: "https://example.substack.com/feed", label: "Example" }
//! websites:
//!   - { feed_url: "https://example.com/rss.xml" }
//! twitter_embeds:
//!   - { handle: "@alice" }
//! ```
//!
//! ```yaml
//! # themes.yml
//! themes:
//!   ai: [llm, "machine learning"]
//! ```
//!
//! Every section is optional and an empty file is an empty manifest.

use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Theme name to the keywords that select it.
pub type ThemeMap = BTreeMap<String, Vec<String>>;

/// A YouTube channel, given by id, by handle, or both.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct YoutubeSource {
    pub channel_id: Option<String>,
    pub handle: Option<String>,
    pub label: Option<String>,
}

impl YoutubeSource {
    /// Handle without its leading `@`, if one is configured.
    pub fn bare_handle(&self) -> Option<&str> {
        self.handle
            .as_deref()
            .map(|h| h.trim().trim_start_matches('@'))
            .filter(|h| !h.is_empty())
    }

    /// Display label: configured label, else `@handle`, else the channel id.
    pub fn display_label(&self) -> String {
        if let Some(label) = non_empty(&self.label) {
            return label.to_string();
        }
        if let Some(handle) = self.bare_handle() {
            return format!("@{handle}");
        }
        non_empty(&self.channel_id).unwrap_or("YouTube").to_string()
    }
}

/// A newsletter or website publishing an RSS/Atom feed.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct FeedSource {
    pub feed_url: Option<String>,
    pub label: Option<String>,
}

impl FeedSource {
    pub fn display_label(&self, default: &str) -> String {
        non_empty(&self.label).unwrap_or(default).to_string()
    }
}

/// An X account to mirror.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct SocialHandle {
    pub handle: Option<String>,
}

/// Contents of `feeds.yml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourcesConfig {
    #[serde(deserialize_with = "null_as_default")]
    pub youtube: Vec<YoutubeSource>,
    #[serde(deserialize_with = "null_as_default")]
    pub rss: Vec<FeedSource>,
    #[serde(deserialize_with = "null_as_default")]
    pub websites: Vec<FeedSource>,
    #[serde(deserialize_with = "null_as_default")]
    pub twitter_embeds: Vec<SocialHandle>,
}

/// Contents of `themes.yml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ThemesConfig {
    #[serde(deserialize_with = "theme_map_allowing_nulls")]
    pub themes: ThemeMap,
}

// `section:` with nothing under it parses as null.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn theme_map_allowing_nulls<'de, D>(deserializer: D) -> Result<ThemeMap, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, Option<Vec<String>>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(theme, keywords)| (theme, keywords.unwrap_or_default()))
        .collect())
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Parse a YAML manifest, treating an empty or null document as the default.
pub fn parse_yaml<T>(text: &str) -> Result<T, serde_yaml::Error>
where
    T: for<'de> Deserialize<'de> + Default,
{
    let value: serde_yaml::Value = serde_yaml::from_str(text)?;
    if value.is_null() {
        return Ok(T::default());
    }
    serde_yaml::from_value(value)
}

/// Read and parse a YAML manifest from disk.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn load_yaml<T>(path: &Path) -> Result<T, Box<dyn Error>>
where
    T: for<'de> Deserialize<'de> + Default,
{
    let text = fs::read_to_string(path).await.map_err(|e| {
        format!("failed to read {}: {e}", path.display())
    })?;
    let parsed = parse_yaml(&text).map_err(|e| format!("invalid YAML in {}: {e}", path.display()))?;
    info!("Loaded manifest");
    Ok(parsed)
}
