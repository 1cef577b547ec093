use crate::models::ScrapeSummary;
use anyhow::Result;
use async_trait::async_trait;

/// Common trait for all listing-portal scrapers
/// This allows easy addition of new sources (Domain, Farmbuy, etc) in the future
#[async_trait]
pub trait PortalScraper: Send + Sync {
    /// Run a full multi-page scrape against the source
    async fn scrape(&self) -> Result<ScrapeSummary>;

    /// Get the name of the scraper source
    fn source_name(&self) -> &'static str;
}
