mod extract;
mod models;
mod scrapers;

use clap::Parser;
use scrapers::{PortalScraper, ReaBrowserScraper, SearchParams};
use tracing::{info, Level};

/// Scrape rural land listings from realestate.com.au
#[derive(Debug, Parser)]
#[command(name = "rea-scout", version, about)]
struct Cli {
    /// Single results URL to scrape; emits one page result
    #[arg(long)]
    url: Option<String>,

    /// Region slug to search in multi-page mode
    #[arg(long, default_value = "nsw")]
    region: String,

    /// Max pages to scrape in multi-page mode
    #[arg(long, default_value_t = 5)]
    pages: usize,

    /// Run with a visible browser window
    #[arg(long)]
    no_headless: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // diagnostics on stderr; stdout carries exactly one JSON document
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let params = SearchParams {
        region: cli.region,
        max_pages: cli.pages,
        headless: !cli.no_headless,
    };

    let scraper = ReaBrowserScraper::new(params)?;

    if let Some(url) = cli.url {
        let result = scraper.scrape_page(&url);
        info!("Found {} listings", result.listings.len());
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        let summary = scraper.scrape().await?;
        info!(
            "Scraped {} listings across {} pages ({} errors)",
            summary.listings.len(),
            summary.pages_scraped,
            summary.errors.len()
        );
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}
