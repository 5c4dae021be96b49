//! Portico command-line entry point

use anyhow::Context;
use clap::Parser;
use portico::config::{load_config, Config};
use portico::crawler::run_crawl;
use portico::output::{load_statistics, print_run_summary, print_statistics};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Portico: a resumable archiving crawler for authenticated portals
///
/// Portico walks a design-system portal through an authenticated browser
/// session, saving every page as HTML and PDF together with its downloads
/// and images, and keeps a progress file so interrupted runs resume where
/// they stopped.
#[derive(Parser, Debug)]
#[command(name = "portico")]
#[command(version)]
#[command(about = "A resumable archiving crawler for authenticated portals", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the progress file and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(config).await?;
    }

    Ok(())
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("portico=info,warn"),
            1 => EnvFilter::new("portico=debug,info"),
            2 => EnvFilter::new("portico=trace,debug"),
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

/// Handles --dry-run: the config validated, shown as a crawl plan
fn handle_dry_run(config: &Config) {
    println!("=== Portico Dry Run ===\n");

    println!("Crawl:");
    println!("  Start URL: {}", config.crawler.start_url);
    println!("  Base URL:  {}", config.crawler.base_url);
    if config.crawler.page_budget == 0 {
        println!("  Page budget: unbounded");
    } else {
        println!("  Page budget: {}", config.crawler.page_budget);
    }
    println!("  Blocklist: {}", config.crawler.blocklist.join(", "));

    println!("\nSession:");
    match &config.session.cookies_file {
        Some(path) => println!("  Cookies: {}", path),
        None => println!("  Cookies: none (unauthenticated)"),
    }
    println!(
        "  Navigation timeout: {}s",
        config.session.navigation_timeout_secs
    );
    println!(
        "  Download timeout:   {}s",
        config.session.download_timeout_secs
    );

    println!("\nFetcher:");
    println!("  Max attempts: {}", config.fetcher.max_attempts);
    println!("  Backoff base: {}", config.fetcher.backoff_base);

    println!("\nOutput:");
    println!("  HTML:      {}", config.output.pages_dir);
    println!("  PDF:       {}", config.output.pdf_dir);
    println!("  Downloads: {}", config.output.download_dir);
    println!("  Images:    {}", config.output.image_dir);
    println!("  Progress:  {}", config.output.progress_file);
    println!("  Summary:   {}", config.output.summary_path);

    println!("\n✓ Configuration is valid");
}

/// Handles --stats: reads the progress file and prints store statistics
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let path = Path::new(&config.output.progress_file);
    println!("Progress file: {}\n", path.display());

    let entries = portico::progress::load(path)?;
    let stats = load_statistics(&entries);
    print_statistics(&stats);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    let summary = run_crawl(config).await?;
    print_run_summary(&summary);
    Ok(())
}
