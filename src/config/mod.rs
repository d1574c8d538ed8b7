//! Configuration module for the crawler
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every setting has a default, so a crawl can run
//! without any file at all.
//!
//! # Example
//!
//! ```no_run
//! use tjpb_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Index page: {}", config.crawler.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CollisionPolicy, Config, CrawlerConfig, UserAgentConfig, DEFAULT_BASE_URL,
    DEFAULT_TIMEOUT_SECS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
