//! HTTP fetcher implementation
//!
//! This module handles all page requests for the crawler:
//! - Building the shared HTTP client with the configured user agent
//! - One GET per page, with no retry
//! - Parsing the body into a navigable HTML document
//!
//! Error pages are still documents: a non-success status is logged and the
//! body parsed like any other. Only transport failures end the run.

use crate::config::CrawlerConfig;
use crate::{Result, ScoutError};
use reqwest::Client;
use scraper::Html;

/// Builds the HTTP client shared by every worker
///
/// Only the user agent and response decompression are configured; timeouts
/// and redirect handling are the transport defaults.
///
/// # Example
///
/// ```no_run
/// use listing_scout::config::CrawlerConfig;
/// use listing_scout::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .gzip(true)
        .brotli(true)
        .build()
        .map_err(ScoutError::Client)
}

/// Fetches the body of `url` with a single GET request
///
/// # Returns
///
/// * `Ok(String)` - The response body, whatever the status code
/// * `Err(ScoutError::Http)` - The request or body read failed
pub async fn fetch_page(client: &Client, url: &str) -> Result<String> {
    tracing::debug!("GET {}", url);

    let response = client.get(url).send().await.map_err(|source| ScoutError::Http {
        url: url.to_string(),
        source,
    })?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!("{} answered {}, parsing the error page", url, status);
    }

    // Reading the body consumes the response and releases the connection
    response.text().await.map_err(|source| ScoutError::Http {
        url: url.to_string(),
        source,
    })
}

/// Fetches `url` and parses it into an HTML document
///
/// The returned document is not `Send`; callers must not hold it across an
/// await point inside a spawned task.
pub async fn fetch_document(client: &Client, url: &str) -> Result<Html> {
    let body = fetch_page(client, url).await?;
    Ok(Html::parse_document(&body))
}
