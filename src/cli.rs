//! Command-line interface definitions for News Digest.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every option has a default matching the site's repository layout, and
//! each can also be supplied through an environment variable.

use crate::resolver::RESOLVE_TIMEOUT;
use crate::social::{DEFAULT_MIRRORS, DEFAULT_POSTS_PER_HANDLE};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Command-line arguments for the News Digest application.
///
/// # Examples
///
/// ```sh
/// # Run from the site repository root with the default layout
/// news_digest
///
/// # Custom manifests and mirror list
/// news_digest --feeds conf/feeds.yml --themes conf/themes.yml \
///     --mirror https://nitter.net,https://nitter.example
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Sources manifest (youtube / rss / websites / twitter_embeds)
    #[arg(short, long, env = "DIGEST_FEEDS", default_value = "feeds.yml")]
    pub feeds: PathBuf,

    /// Theme to keyword manifest
    #[arg(short, long, env = "DIGEST_THEMES", default_value = "themes.yml")]
    pub themes: PathBuf,

    /// Output path for the items document
    #[arg(short, long, env = "DIGEST_ITEMS_OUT", default_value = "docs/data/items.json")]
    pub items_out: PathBuf,

    /// Output path for the social document
    #[arg(short, long, env = "DIGEST_SOCIAL_OUT", default_value = "docs/data/twitter_posts.json")]
    pub social_out: PathBuf,

    /// X mirror base URLs, tried in order
    #[arg(long = "mirror", env = "NITTER_MIRRORS", value_delimiter = ',', default_values_t = DEFAULT_MIRRORS.map(String::from))]
    pub mirrors: Vec<String>,

    /// Posts kept per X account
    #[arg(long, env = "DIGEST_POSTS_PER_HANDLE", default_value_t = DEFAULT_POSTS_PER_HANDLE)]
    pub posts_per_handle: usize,

    /// Timeout for resolving a YouTube handle, in seconds
    #[arg(long, env = "DIGEST_RESOLVE_TIMEOUT_SECS", default_value_t = RESOLVE_TIMEOUT.as_secs())]
    pub resolve_timeout_secs: u64,

    /// User-Agent sent with every request
    #[arg(long, env = "DIGEST_USER_AGENT", default_value = "Mozilla/5.0")]
    pub user_agent: String,
}

impl Cli {
    pub fn resolve_timeout(&self) -> Duration {
        Duration::from_secs(self.resolve_timeout_secs)
    }
}
