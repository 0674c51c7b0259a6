//! Mapping raw feed entries into site [`Item`]s.

use crate::classify::{assign_themes, classify_bucket};
use crate::config::ThemeMap;
use crate::models::{Item, RawEntry, SourceType};
use crate::text::{estimate_read_minutes, summarize};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// Stable content identifier: the first 16 bytes of a SHA-256, hex encoded.
pub fn content_id(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    hex::encode(&digest[..16])
}

/// Treat empty strings the same as missing fields.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Normalize one entry.
///
/// `fallback_now` is used as the published time when the entry has neither
/// a published nor an updated timestamp, which floats undated entries to the
/// top of the listing. Everything else is derived from the entry alone.
pub fn normalize_entry(
    raw: &RawEntry,
    source_label: &str,
    source_type: SourceType,
    themes: &ThemeMap,
    fallback_now: DateTime<Utc>,
) -> Item {
    let title = raw.title.as_deref().unwrap_or("").trim().to_string();
    let url = present(&raw.link)
        .or_else(|| present(&raw.url))
        .map(str::to_string);
    let raw_summary = present(&raw.summary)
        .or_else(|| present(&raw.description))
        .unwrap_or("");

    let published = raw.timestamp().unwrap_or(fallback_now);
    let read_minutes = estimate_read_minutes(raw_summary);
    let summary = summarize(raw_summary);
    // Generic feeds carry no playable duration.
    let duration_sec = None;

    let themes = assign_themes(&title, &summary, themes);
    let bucket = classify_bucket(duration_sec, read_minutes);

    Item {
        id: content_id(url.as_deref().unwrap_or(&title)),
        title,
        url,
        source: source_label.to_string(),
        source_type,
        published,
        summary,
        read_minutes,
        duration_sec,
        themes,
        bucket,
    }
}
