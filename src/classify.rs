//! Theme and bucket classification for normalized items.

use crate::config::ThemeMap;
use crate::models::Bucket;
use std::collections::BTreeSet;

/// Clips at or under five minutes are highlights.
pub const HIGHLIGHT_MAX_DURATION_SECS: u32 = 300;

/// Articles at or under five minutes of reading are highlights.
pub const HIGHLIGHT_MAX_READ_MINUTES: u32 = 5;

/// Assign every theme with at least one keyword occurring in the title or summary.
///
/// Matching is a case-insensitive substring test. The result is sorted and
/// free of duplicates whatever order the map iterates in.
pub fn assign_themes(title: &str, summary: &str, themes: &ThemeMap) -> Vec<String> {
    let text = format!("{title} {summary}").to_lowercase();

    themes
        .iter()
        .filter(|(_, keywords)| {
            keywords
                .iter()
                .any(|kw| text.contains(kw.to_lowercase().as_str()))
        })
        .map(|(theme, _)| theme.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Classify by duration when known, otherwise by estimated read time.
pub fn classify_bucket(duration_sec: Option<u32>, read_minutes: u32) -> Bucket {
    let short = match duration_sec {
        Some(secs) => secs <= HIGHLIGHT_MAX_DURATION_SECS,
        None => read_minutes <= HIGHLIGHT_MAX_READ_MINUTES,
    };
    if short { Bucket::Highlight } else { Bucket::Deeper }
}
