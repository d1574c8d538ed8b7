//! TJPB payroll crawler
//!
//! This crate locates the payroll disclosure files published on the TJPB
//! transparency portal for a given month and year, and saves them to local
//! storage under deterministic names.

pub mod config;
pub mod crawler;
pub mod period;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error for {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("HTML parse error for {url}: {message}")]
    HtmlParse { url: String, message: String },

    #[error("Couldn't find any link for {period}")]
    NotFound { period: period::Period },

    #[error("Unexpected response status for {url}: {status} - {reason}")]
    HttpStatus {
        url: String,
        status: u16,
        reason: String,
    },

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Output name collision: {name}")]
    NameCollision { name: String },

    #[error("URL parse error: {0}")]
    Url(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

impl CrawlerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for crawler operations
pub type Result<T> = std::result::Result<T, CrawlerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{classify, crawl, Category, Coordinator, CrawlReport, LinkNode, OutputName};
pub use period::{month_label, Period};
