//! TJPB crawler main entry point
//!
//! This is the command-line interface for downloading one month of payroll
//! disclosure files.

use clap::Parser;
use std::path::PathBuf;
use tjpb_crawler::config::{load_config_with_hash, validate, Config};
use tjpb_crawler::crawler::{crawl, Coordinator};
use tjpb_crawler::period::Period;
use tracing_subscriber::EnvFilter;

/// TJPB payroll crawler
///
/// Finds the payroll files the TJPB transparency portal published for a
/// month and saves them as `remuneracoes[-category]-tjpb-MM-YYYY.pdf`.
#[derive(Parser, Debug)]
#[command(name = "tjpb-crawler")]
#[command(version)]
#[command(about = "Downloads TJPB payroll disclosure files", long_about = None)]
struct Cli {
    /// Month to download (1-12)
    #[arg(long = "mes", visible_alias = "month", value_name = "MONTH")]
    month: u32,

    /// Year to download
    #[arg(long = "ano", visible_alias = "year", value_name = "YEAR")]
    year: u32,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Directory to write files to (overrides config)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<String>,

    /// Index page URL (overrides config)
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Resolve and name the files without downloading them
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    // Both parameters are checked before any network activity
    let period = match Period::new(cli.month, cli.year) {
        Ok(period) => period,
        Err(e) => {
            tracing::error!("Invalid period: {}", e);
            return Err(e.into());
        }
    };

    let config = match load_effective_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    if cli.dry_run {
        handle_dry_run(config, period).await
    } else {
        handle_crawl(config, period).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("tjpb_crawler=info,warn"),
            1 => EnvFilter::new("tjpb_crawler=debug,info"),
            2 => EnvFilter::new("tjpb_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file if given, then applies command-line overrides
fn load_effective_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(dir) = &cli.output_dir {
        config.crawler.output_dir = dir.clone();
    }
    if let Some(url) = &cli.base_url {
        config.crawler.base_url = url.clone();
    }

    validate(&config)?;
    Ok(config)
}

/// Handles the --dry-run mode: shows what would be downloaded
async fn handle_dry_run(config: Config, period: Period) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== TJPB Crawler Dry Run ===\n");
    println!("Period: {}", period);
    println!("Index page: {}", config.crawler.base_url);
    println!("Output directory: {}", config.crawler.output_dir);
    println!(
        "Collision policy: {:?}\n",
        config.crawler.collision_policy
    );

    let output_dir = PathBuf::from(&config.crawler.output_dir);
    let coordinator = Coordinator::new(config)?;
    let planned = coordinator.plan(period).await?;

    println!("Files ({}):", planned.len());
    for download in &planned {
        println!(
            "  - {} [{}]",
            output_dir.join(download.name.file_name()).display(),
            download.category
        );
        println!("    * {}", download.link.url);
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, period: Period) -> Result<(), Box<dyn std::error::Error>> {
    match crawl(config, period).await {
        Ok(report) => {
            for file in &report.files {
                println!("{}", file.path.display());
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
