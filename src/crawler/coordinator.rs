//! Crawl coordinator - single period orchestration
//!
//! A run goes through these stages in order:
//! - Fetch the index page
//! - Resolve the links published for the period
//! - Classify each link and plan its output name
//! - Download each planned file, one at a time, in document order
//!
//! The first error stops the run. Files already written stay on disk.

use crate::config::{CollisionPolicy, Config};
use crate::crawler::classifier::{classify, Category, OutputName};
use crate::crawler::downloader::persist;
use crate::crawler::fetcher::{build_http_client, fetch_document};
use crate::crawler::resolver::{resolve, LinkNode};
use crate::period::Period;
use crate::CrawlerError;
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::collections::HashMap;
use std::path::PathBuf;
use url::Url;

/// A link paired with the output name it will be saved under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedDownload {
    pub link: LinkNode,
    pub category: Category,
    pub name: OutputName,
}

/// A file written by a run
#[derive(Debug, Clone)]
pub struct SavedFile {
    pub category: Category,
    pub name: OutputName,
    pub path: PathBuf,
    pub url: String,
}

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub period: Period,
    pub files: Vec<SavedFile>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    /// Wall-clock duration of the run
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    client: Client,
    base_url: Url,
    output_dir: PathBuf,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(CrawlerError)` - Base URL or HTTP client could not be set up
    pub fn new(config: Config) -> Result<Self, CrawlerError> {
        let base_url = Url::parse(&config.crawler.base_url)?;
        let client = build_http_client(&config.crawler, &config.user_agent)?;
        let output_dir = PathBuf::from(&config.crawler.output_dir);

        Ok(Self {
            config,
            client,
            base_url,
            output_dir,
        })
    }

    /// Fetches the index page and plans the downloads of a period
    ///
    /// Nothing is written to disk. Used directly for dry runs.
    pub async fn plan(&self, period: Period) -> Result<Vec<PlannedDownload>, CrawlerError> {
        tracing::info!("Fetching index page {}", self.base_url);
        let document = fetch_document(&self.client, self.base_url.as_str()).await?;

        let links = resolve(&document, &self.base_url, period)?;
        tracing::info!("Found {} link(s) for {}", links.len(), period);

        plan_downloads(links, period, self.config.crawler.collision_policy)
    }

    /// Runs a complete crawl for one period
    pub async fn run(&self, period: Period) -> Result<CrawlReport, CrawlerError> {
        let started_at = Utc::now();
        tracing::info!("Starting crawl for {}", period);

        let planned = self.plan(period).await?;

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| CrawlerError::io(&self.output_dir, e))?;

        let mut files = Vec::with_capacity(planned.len());
        for download in planned {
            let url = download.link.url.to_string();
            tracing::info!("Downloading {} ({}) from {}", download.name, download.category, url);

            let path = persist(&self.client, &url, &self.output_dir, &download.name).await?;
            tracing::info!("Saved {}", path.display());

            files.push(SavedFile {
                category: download.category,
                name: download.name,
                path,
                url,
            });
        }

        let report = CrawlReport {
            period,
            files,
            started_at,
            finished_at: Utc::now(),
        };

        tracing::info!(
            "Crawl for {} finished: {} file(s) in {}ms",
            period,
            report.files.len(),
            report.duration().num_milliseconds()
        );

        Ok(report)
    }
}

/// Classifies links and assigns final output names
///
/// Names are unique in the returned plan unless the policy is
/// [`CollisionPolicy::Overwrite`].
pub fn plan_downloads(
    links: Vec<LinkNode>,
    period: Period,
    policy: CollisionPolicy,
) -> Result<Vec<PlannedDownload>, CrawlerError> {
    let mut seen: HashMap<OutputName, usize> = HashMap::new();
    let mut planned = Vec::with_capacity(links.len());

    for link in links {
        let (category, base_name) = classify(&link, period);

        let count = seen.entry(base_name.clone()).or_insert(0);
        *count += 1;

        let name = if *count == 1 {
            base_name
        } else {
            match policy {
                CollisionPolicy::Suffix => {
                    let renamed = base_name.with_suffix(*count);
                    tracing::warn!(
                        "{} already planned, saving {} as {}",
                        base_name,
                        link.href,
                        renamed
                    );
                    renamed
                }
                CollisionPolicy::Overwrite => {
                    tracing::warn!("{} will be overwritten by {}", base_name, link.href);
                    base_name
                }
                CollisionPolicy::Error => {
                    return Err(CrawlerError::NameCollision {
                        name: base_name.to_string(),
                    });
                }
            }
        };

        planned.push(PlannedDownload {
            link,
            category,
            name,
        });
    }

    Ok(planned)
}
