//! Crawler module for the payroll disclosure portal
//!
//! This module contains the crawling logic, including:
//! - HTTP fetching of the index page
//! - Year-dependent link resolution
//! - Output name classification
//! - File download with cleanup on failure
//! - Overall run coordination

mod classifier;
mod coordinator;
mod downloader;
mod fetcher;
mod resolver;

pub use classifier::{classify, classify_href, Category, OutputName, OUTPUT_EXTENSION};
pub use coordinator::{plan_downloads, Coordinator, CrawlReport, PlannedDownload, SavedFile};
pub use downloader::persist;
pub use fetcher::{build_http_client, fetch_document, parse_document, user_agent_string};
pub use resolver::{resolve, LinkNode, ResolveStrategy, LAYOUT_CHANGE_YEAR};

use crate::config::Config;
use crate::period::Period;
use crate::CrawlerError;

/// Runs a complete crawl for one period
///
/// This is the main entry point for a crawl. It will:
/// 1. Build the HTTP client
/// 2. Fetch the index page
/// 3. Resolve the period's links
/// 4. Download each link under its canonical name
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `period` - Month and year to download
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Every resolved link was saved
/// * `Err(CrawlerError)` - The first failure; earlier files stay on disk
pub async fn crawl(config: Config, period: Period) -> Result<CrawlReport, CrawlerError> {
    Coordinator::new(config)?.run(period).await
}
