//! HTTP access for review pages.
//!
//! [`PageFetcher`] is the seam between the review engine and the network;
//! [`HttpFetcher`] is the `reqwest` implementation used by the CLI.
//!
//! # Retry Strategy
//!
//! Retries are off by default (`http.max_retries = 0`). When enabled:
//! - timeouts, HTTP 429 and 5xx → retry
//! - other HTTP errors and transport errors → fail immediately
//! - backoff: 1s, 2s, 4s, 8s, 16s, 32s (capped at 2^5)

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::HttpConfig;
use crate::error::FetchError;

/// Fetches a page body by URL.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// `reqwest`-backed fetcher with connect and read timeouts.
pub struct HttpFetcher {
    client: reqwest::Client,
    max_retries: u32,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig) -> anyhow::Result<Self> {
        Ok(Self {
            client: build_client(config)?,
            max_retries: config.max_retries,
        })
    }
}

/// Shared client builder, also used by the catalog client.
pub fn build_client(config: &HttpConfig) -> anyhow::Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .connect_timeout(config.connect_timeout())
        .timeout(config.request_timeout())
        .user_agent(config.user_agent.clone())
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()?;
    Ok(client)
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        with_retries(self.max_retries, url, || async {
            debug!(url, "fetching review page");
            let response = self
                .client
                .get(url)
                .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
                .send()
                .await
                .map_err(|e| FetchError::from_reqwest(url, e))?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }

            response
                .text()
                .await
                .map_err(|e| FetchError::from_reqwest(url, e))
        })
        .await
    }
}

/// Run `attempt` up to `max_retries + 1` times with exponential backoff.
pub async fn with_retries<T, F, Fut>(
    max_retries: u32,
    url: &str,
    mut attempt: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, FetchError>>,
{
    let mut tries = 0;
    loop {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) if tries < max_retries && e.is_retryable() => {
                let delay = Duration::from_secs(1 << tries.min(5));
                warn!(url, error = %e, ?delay, "retrying request");
                tokio::time::sleep(delay).await;
                tries += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
