use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::ScrapeError;

/// Fixed-count, fixed-delay retry for timed-out requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            retries: config.detail_retries,
            delay: config.retry_delay(),
        }
    }
}

pub fn create_client(config: &Config) -> Result<Client, ScrapeError> {
    let client = ClientBuilder::new()
        .user_agent(config.user_agent.as_str())
        .timeout(config.request_timeout())
        .build()
        .map_err(|e| ScrapeError::Config(format!("cannot build HTTP client: {}", e)))?;

    Ok(client)
}

/// Single GET; non-success status is an error.
pub async fn fetch_text(client: &Client, url: &str) -> Result<String, ScrapeError> {
    debug!("GET {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| ScrapeError::Fetch { url: url.to_string(), source })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScrapeError::Status { url: url.to_string(), status });
    }

    response
        .text()
        .await
        .map_err(|source| ScrapeError::Fetch { url: url.to_string(), source })
}

/// GET with retries on timeout only. Any other failure is returned at once.
pub async fn fetch_with_retry(
    client: &Client,
    url: &str,
    policy: RetryPolicy,
) -> Result<String, ScrapeError> {
    let mut attempt = 0;

    loop {
        match fetch_text(client, url).await {
            Ok(body) => return Ok(body),
            Err(e) if e.is_timeout() && attempt < policy.retries => {
                attempt += 1;
                warn!(
                    "Timed out fetching {}; retrying in {:?} (attempt {}/{})",
                    url,
                    policy.delay,
                    attempt + 1,
                    policy.retries + 1
                );
                sleep(policy.delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
