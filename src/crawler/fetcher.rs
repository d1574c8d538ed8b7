//! HTTP fetcher implementation
//!
//! This module handles the index page request, including:
//! - Building the HTTP client with the crawler's user agent and timeout
//! - Fetching the index page and parsing it into a document tree
//! - Classifying transport and status failures

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::CrawlerError;
use reqwest::{Client, Response};
use scraper::Html;
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// The configured timeout bounds every request made with this client, both
/// the index page and each file download. There is no retry on top of it.
///
/// # Example
///
/// ```no_run
/// use tjpb_crawler::config::Config;
/// use tjpb_crawler::crawler::build_http_client;
///
/// let config = Config::default();
/// let client = build_http_client(&config.crawler, &config.user_agent).unwrap();
/// ```
pub fn build_http_client(
    crawler: &CrawlerConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(user_agent))
        .timeout(Duration::from_secs(crawler.request_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Formats the user agent: `CrawlerName/Version (+ContactURL)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{})",
        config.crawler_name, config.crawler_version, config.contact_url
    )
}

/// Fetches a URL and parses the body into an HTML document
///
/// # Errors
///
/// | Condition | Error |
/// |-----------|-------|
/// | DNS, connect, timeout, body read | `Network` |
/// | Non-2xx status | `HttpStatus` |
/// | Empty body | `HtmlParse` |
///
/// A Content-Type other than HTML is logged and parsing continues.
pub async fn fetch_document(client: &Client, url: &str) -> Result<Html, CrawlerError> {
    tracing::debug!("GET {}", url);

    let response = send_get(client, url).await?;

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !content_type.contains("text/html") {
        tracing::warn!(
            "Index page {} has Content-Type '{}', parsing as HTML anyway",
            url,
            content_type
        );
    }

    let body = response.text().await.map_err(|e| CrawlerError::Network {
        url: url.to_string(),
        source: e,
    })?;

    parse_document(&body, url)
}

/// Parses a fetched body into an HTML document
///
/// The HTML parser is error tolerant, so the only body rejected here is one
/// with no markup at all.
pub fn parse_document(body: &str, url: &str) -> Result<Html, CrawlerError> {
    if body.trim().is_empty() {
        return Err(CrawlerError::HtmlParse {
            url: url.to_string(),
            message: "empty response body".to_string(),
        });
    }

    let document = Html::parse_document(body);
    if !document.errors.is_empty() {
        tracing::debug!(
            "Parser recovered from {} markup error(s) in {}",
            document.errors.len(),
            url
        );
    }

    Ok(document)
}

/// Sends a GET request and checks the response status
///
/// Shared by the index fetch and the file downloader.
pub(crate) async fn send_get(client: &Client, url: &str) -> Result<Response, CrawlerError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| CrawlerError::Network {
            url: url.to_string(),
            source: e,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(CrawlerError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        });
    }

    Ok(response)
}
