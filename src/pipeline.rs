//! The item aggregation run.
//!
//! Sources are visited in a fixed order (YouTube, newsletters, websites) and
//! every entry is normalized into an [`Item`]. A single seen-URL set spans all
//! source types, so the first source to publish a URL owns it. After every
//! source is processed the items are stably sorted newest first.
//!
//! All mutable run state lives in [`RunContext`], which the caller owns.

use crate::clock::RunClock;
use crate::config::{FeedSource, SourcesConfig, ThemeMap};
use crate::feeds::FeedFetcher;
use crate::models::{Item, ItemsDocument, SourceType};
use crate::normalize::normalize_entry;
use crate::resolver::{ChannelResolver, Resolution, channel_feed_url, resolve_source};
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

/// Mutable state of one aggregation run.
#[derive(Debug, Default)]
pub struct RunContext {
    /// Item URLs already emitted. URL-less items share the `None` key.
    seen_urls: HashSet<Option<String>>,
    items: Vec<Item>,
    clock: RunClock,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `item` unless its URL was already seen. Returns whether it was kept.
    pub fn accept(&mut self, item: Item) -> bool {
        if !self.seen_urls.insert(item.url.clone()) {
            debug!(url = ?item.url, source = %item.source, "Dropping duplicate item");
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sort newest first, ties in insertion order, and stamp the document.
    pub fn into_document(mut self) -> ItemsDocument {
        self.items.sort_by(|a, b| b.published.cmp(&a.published));
        ItemsDocument {
            items: self.items,
            generated_at: self.clock.now(),
        }
    }
}

/// Drives resolution, fetching and normalization over configured sources.
pub struct Aggregator<'a> {
    fetcher: FeedFetcher,
    resolver: &'a dyn ChannelResolver,
    themes: &'a ThemeMap,
}

impl<'a> Aggregator<'a> {
    pub fn new(fetcher: FeedFetcher, resolver: &'a dyn ChannelResolver, themes: &'a ThemeMap) -> Self {
        Self {
            fetcher,
            resolver,
            themes,
        }
    }

    /// Process every configured feed source into `ctx`.
    #[instrument(level = "info", skip_all)]
    pub async fn run(&self, sources: &SourcesConfig, ctx: &mut RunContext) {
        for source in &sources.youtube {
            let label = source.display_label();
            let channel_id = match resolve_source(source, self.resolver).await {
                Resolution::Resolved(id) => id,
                Resolution::Unresolved(reason) => {
                    warn!(
                        source = %label,
                        handle = ?source.handle,
                        %reason,
                        "Skipping YouTube source (no channel_id/handle could be resolved)"
                    );
                    continue;
                }
            };
            self.ingest_feed(&channel_feed_url(&channel_id), &label, SourceType::Youtube, ctx)
                .await;
        }

        self.ingest_feed_sources(&sources.rss, "Newsletter", ctx).await;
        self.ingest_feed_sources(&sources.websites, "Website", ctx).await;

        info!(items = ctx.item_count(), "Aggregated items from all sources");
    }

    async fn ingest_feed_sources(&self, feeds: &[FeedSource], default_label: &str, ctx: &mut RunContext) {
        for feed in feeds {
            let Some(url) = feed.feed_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) else {
                continue;
            };
            let label = feed.display_label(default_label);
            self.ingest_feed(url, &label, SourceType::Rss, ctx).await;
        }
    }

    async fn ingest_feed(&self, url: &str, label: &str, source_type: SourceType, ctx: &mut RunContext) {
        let entries = self.fetcher.fetch(url).await;
        let mut kept = 0usize;
        for entry in &entries {
            let now = ctx.clock.now();
            let item = normalize_entry(entry, label, source_type, self.themes, now);
            if ctx.accept(item) {
                kept += 1;
            }
        }
        info!(source = %label, %url, entries = entries.len(), kept, "Processed feed");
    }
}

/// Run the aggregation with a fresh context and return the finished document.
pub async fn build_items_document(
    sources: &SourcesConfig,
    themes: &ThemeMap,
    fetcher: FeedFetcher,
    resolver: &dyn ChannelResolver,
) -> ItemsDocument {
    let mut ctx = RunContext::new();
    Aggregator::new(fetcher, resolver, themes)
        .run(sources, &mut ctx)
        .await;
    ctx.into_document()
}
