//! HTTP transport used by every network read in a run.
//!
//! All fetching goes through the [`HttpSource`] trait so the resolver, feed
//! fetcher and mirror fetcher can be exercised against canned pages in
//! tests. [`ReqwestSource`] is the production implementation.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

/// Why a page could not be turned into something useful.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Feed parse error: {0}")]
    Parse(String),
}

/// Something that can GET a URL and hand back the body as text.
#[async_trait]
pub trait HttpSource: Send + Sync {
    /// Fetch `url`. Non-2xx responses are errors. `timeout` bounds the whole
    /// request; `None` leaves it to the transport.
    async fn get_text(&self, url: &str, timeout: Option<Duration>) -> Result<String, FetchError>;
}

/// [`HttpSource`] backed by a shared `reqwest` client.
pub struct ReqwestSource {
    client: Client,
}

impl ReqwestSource {
    pub fn new(user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpSource for ReqwestSource {
    #[instrument(level = "debug", skip(self))]
    async fn get_text(&self, url: &str, timeout: Option<Duration>) -> Result<String, FetchError> {
        let mut request = self.client.get(url);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "Fetched page");
        Ok(body)
    }
}
