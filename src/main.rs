//! # News Digest
//!
//! Batch aggregator behind a static "developer digest" site. Each run reads
//! a sources manifest and a theme manifest, pulls recent entries from YouTube
//! channels, newsletters, websites and X accounts, and writes two JSON
//! documents the site renders client-side.
//!
//! ## Usage
//!
//! ```sh
//! news_digest --feeds feeds.yml --themes themes.yml
//! ```
//!
//! ## Architecture
//!
//! 1. **Configuration**: load `feeds.yml` and `themes.yml`
//! 2. **Aggregation**: resolve YouTube handles, fetch every feed, normalize,
//!    dedupe by URL and sort newest first ([`pipeline`])
//! 3. **Social**: read recent posts per X handle through public mirrors ([`social`])
//! 4. **Output**: write `items.json` and `twitter_posts.json` ([`outputs::json`])
//!
//! Unreachable sources are logged and skipped. Only a bad manifest or an
//! unwritable output path fails the run.

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod classify;
mod cli;
mod clock;
mod config;
mod feeds;
mod http;
mod models;
mod normalize;
mod outputs;
mod pipeline;
mod resolver;
mod social;
mod text;
mod utils;

use cli::Cli;
use clock::RunClock;
use config::{SourcesConfig, ThemesConfig, load_yaml};
use feeds::FeedFetcher;
use http::ReqwestSource;
use outputs::json::write_document;
use pipeline::build_items_document;
use resolver::ProfilePageResolver;
use social::MirrorFetcher;
use utils::{ensure_writable_dir, parent_dir};

#[tokio::main(flavor = "current_thread")]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_digest starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // --- Manifests ---
    let sources: SourcesConfig = load_yaml(&args.feeds).await?;
    let themes: ThemesConfig = load_yaml(&args.themes).await?;
    info!(
        youtube = sources.youtube.len(),
        rss = sources.rss.len(),
        websites = sources.websites.len(),
        twitter_embeds = sources.twitter_embeds.len(),
        themes = themes.themes.len(),
        "Loaded configuration"
    );

    ensure_writable_dir(parent_dir(&args.items_out)).await?;
    ensure_writable_dir(parent_dir(&args.social_out)).await?;

    let http = Arc::new(ReqwestSource::new(&args.user_agent)?);
    let fetcher = FeedFetcher::new(http.clone());

    // --- Items ---
    let resolver = ProfilePageResolver::new(http, args.resolve_timeout());
    let items = build_items_document(&sources, &themes.themes, fetcher.clone(), &resolver).await;
    write_document(&items, &args.items_out).await?;
    info!(
        count = items.items.len(),
        path = %args.items_out.display(),
        "Wrote items"
    );

    // --- Social ---
    let mirrors = MirrorFetcher::new(fetcher, args.mirrors.clone(), args.posts_per_handle);
    let mut clock = RunClock::new();
    let social = mirrors.build_document(&sources.twitter_embeds, &mut clock).await;
    write_document(&social, &args.social_out).await?;
    info!(
        accounts = social.accounts.len(),
        path = %args.social_out.display(),
        "Wrote social posts"
    );

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
