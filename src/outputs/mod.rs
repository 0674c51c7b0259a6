//! Output generation for the documents the static site reads.
//!
//! # Output Structure
//!
//! ```text
//! docs/data/
//! ├── items.json          # normalized videos and articles, newest first
//! └── twitter_posts.json  # recent posts per configured X account
//! ```
//!
//! Both files are rewritten in full on every run.

pub mod json;
