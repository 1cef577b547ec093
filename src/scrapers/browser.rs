use std::collections::HashSet;
use std::ffi::OsStr;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use headless_chrome::{Browser, LaunchOptions, Tab};
use rand::Rng;
use tracing::{info, warn};

use crate::extract::page;
use crate::models::{PageResult, ScrapeSummary};
use crate::scrapers::traits::PortalScraper;
use crate::scrapers::types::SearchParams;

/// Error value for a page still behind the bot challenge after the retry
/// window. The region loop treats this as fatal and stops requesting pages.
pub const BLOCKED_ERROR: &str = "Blocked by Kasada bot protection";

const CHROME_ARGS: &[&str] = &[
    "--no-sandbox",
    "--disable-dev-shm-usage",
    "--disable-blink-features=AutomationControlled",
    "--disable-infobars",
    "--window-size=1920,1080",
    "--lang=en-AU",
    "--user-agent=Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36",
];

/// Browser-based scraper for realestate.com.au using headless Chrome.
/// The Chrome process is released when the scraper is dropped.
pub struct ReaBrowserScraper {
    browser: Browser,
    params: SearchParams,
}

impl ReaBrowserScraper {
    /// Launch Chrome with the stealth arguments the site tolerates.
    pub fn new(params: SearchParams) -> Result<Self> {
        info!("Launching Chrome (headless={})...", params.headless);

        let options = LaunchOptions::default_builder()
            .headless(params.headless)
            .args(CHROME_ARGS.iter().map(OsStr::new).collect())
            .idle_browser_timeout(Duration::from_secs(300))
            .build()
            .context("Failed to build launch options")?;

        let browser = Browser::new(options).context("Failed to launch Chrome browser")?;

        Ok(Self { browser, params })
    }

    /// Scrape a single results page. Navigation and capture failures land in
    /// the result's error slot; the run itself is not aborted.
    pub fn scrape_page(&self, url: &str) -> PageResult {
        let mut result = PageResult::empty(url);
        match self.capture_page(url) {
            Ok(Some(html)) => result = page::extract_page(url, &html),
            Ok(None) => result.error = Some(BLOCKED_ERROR.to_string()),
            Err(err) => {
                warn!("Failed to load {}: {:#}", url, err);
                result.error = Some(format!("{err:#}"));
            }
        }
        result
    }

    /// Scrape up to `max_pages` result pages for the configured region,
    /// deduplicating listings across pages by external id (first seen wins).
    pub fn scrape_region(&self) -> ScrapeSummary {
        let mut listings = Vec::new();
        let mut errors = Vec::new();
        let mut pages_scraped = 0;
        let mut seen_ids: HashSet<String> = HashSet::new();

        for page_num in 1..=self.params.max_pages {
            let url = search_url(&self.params.region, page_num);
            info!("Scraping page {}: {}", page_num, url);

            let result = self.scrape_page(&url);

            if let Some(error) = result.error {
                errors.push(format!("Page {page_num}: {error}"));
                if error.contains("Kasada") {
                    break;
                }
                continue;
            }

            info!(
                "Found {} listings on page {}",
                result.listings.len(),
                page_num
            );
            for listing in result.listings {
                if seen_ids.insert(listing.external_id.clone()) {
                    listings.push(listing);
                }
            }
            pages_scraped = page_num;

            if !result.has_more {
                info!("No more pages");
                break;
            }

            // human pacing between result pages
            random_delay(3_000, 6_000);
        }

        ScrapeSummary {
            listings,
            pages_scraped,
            errors,
            scraped_at: Utc::now(),
        }
    }

    /// Navigate to `url` and return the settled page markup, or `None` when
    /// the bot challenge never cleared: wait out the interstitial once, nudge
    /// it with a synthetic mouse move, and re-check.
    fn capture_page(&self, url: &str) -> Result<Option<String>> {
        let tab = self.browser.new_tab()?;
        tab.set_default_timeout(Duration::from_secs(60));
        tab.navigate_to(url)?;
        tab.wait_until_navigated()?;
        random_delay(2_000, 4_000);

        let html = page_source(&tab)?;
        if page::is_challenge_page(&html) {
            info!("Detected Kasada challenge, waiting...");
            thread::sleep(Duration::from_secs(10));
            dispatch_mouse_move(&tab);
            thread::sleep(Duration::from_secs(5));

            if page::is_challenge_page(&page_source(&tab)?) {
                return Ok(None);
            }
        }

        // scroll triggers lazy-loaded cards before the final capture
        scroll_page(&tab);
        random_delay(1_000, 2_000);

        Ok(Some(page_source(&tab)?))
    }
}

#[async_trait]
impl PortalScraper for ReaBrowserScraper {
    async fn scrape(&self) -> Result<ScrapeSummary> {
        Ok(self.scrape_region())
    }

    fn source_name(&self) -> &'static str {
        "rea"
    }
}

/// Search URL for rural land results in a region, newest first.
fn search_url(region: &str, page: usize) -> String {
    format!(
        "https://www.realestate.com.au/buy/property-land-acreage-rural-size-100000-in-{region}/list-{page}?activeSort=list-date"
    )
}

fn page_source(tab: &Tab) -> Result<String> {
    let result = tab
        .evaluate("document.documentElement.outerHTML", false)
        .context("Failed to capture page HTML")?;
    let html = result
        .value
        .as_ref()
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    Ok(html)
}

/// Scroll down in increments, then back to the top.
fn scroll_page(tab: &Tab) {
    for step in 1..=3 {
        let js = format!("window.scrollTo(0, document.body.scrollHeight * {step} / 4);");
        if tab.evaluate(&js, false).is_err() {
            return;
        }
        random_delay(500, 1_500);
    }
    let _ = tab.evaluate("window.scrollTo(0, 0);", false);
    thread::sleep(Duration::from_millis(500));
}

/// Synthetic mouse movement; some interstitials want user activity before
/// they resolve.
fn dispatch_mouse_move(tab: &Tab) {
    let _ = tab.evaluate(
        r#"
        document.dispatchEvent(new MouseEvent('mousemove', {
            clientX: 100 + Math.random() * 400,
            clientY: 100 + Math.random() * 300
        }));
        "#,
        false,
    );
}

/// Sleep a random interval to mimic human pacing.
fn random_delay(min_ms: u64, max_ms: u64) {
    let ms = rand::thread_rng().gen_range(min_ms..=max_ms);
    thread::sleep(Duration::from_millis(ms));
}
