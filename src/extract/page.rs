use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;
use tracing::debug;

use crate::models::PageResult;

use super::{dom, structured};

/// Signature of the bot-verification interstitial.
pub const CHALLENGE_MARKER: &str = "KPSDK";

/// A real results page always exceeds the challenge shell's size.
pub const CHALLENGE_PAGE_MAX_LEN: usize = 5_000;

/// Any one of these in the markup means another results page exists.
static NEXT_PAGE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r#"rel="next""#).unwrap(),
        Regex::new(r#"aria-label="Go to [Nn]ext [Pp]age""#).unwrap(),
        Regex::new(r#"data-testid="[^"]*next[^"]*""#).unwrap(),
    ]
});

/// True while the anti-bot interstitial is being served instead of results.
/// The caller decides whether to wait and re-check.
pub fn is_challenge_page(html: &str) -> bool {
    html.contains(CHALLENGE_MARKER) && html.len() < CHALLENGE_PAGE_MAX_LEN
}

pub fn has_next_page(html: &str) -> bool {
    NEXT_PAGE_PATTERNS.iter().any(|p| p.is_match(html))
}

/// Transform one captured page into a result: embedded payload first, anchor
/// scan as the fallback. Zero listings is a valid empty result; `error` is
/// the browser layer's slot.
pub fn extract_page(url: &str, html: &str) -> PageResult {
    let mut listings = Vec::new();

    if let Some(payload) = structured::extract_embedded_payload(html) {
        listings = structured::extract_listings(&payload);
        debug!("structured payload yielded {} listings", listings.len());
    }

    if listings.is_empty() {
        let document = Html::parse_document(html);
        listings = dom::extract_listings(&document);
        debug!("anchor scan yielded {} listings", listings.len());
    }

    PageResult {
        url: url.to_string(),
        listings,
        has_more: has_next_page(html),
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_URL: &str = "https://www.realestate.com.au/buy/in-nsw/list-1";

    #[test]
    fn challenge_is_marker_plus_small_page() {
        assert!(is_challenge_page("<html><script>KPSDK.start()</script></html>"));
        assert!(!is_challenge_page("<html>all good</html>"));

        // the marker inside a full-sized page is leftover script, not a block
        let big = format!("<html>KPSDK{}</html>", "x".repeat(CHALLENGE_PAGE_MAX_LEN));
        assert!(!is_challenge_page(&big));
    }

    #[test]
    fn any_next_marker_flags_more_pages() {
        assert!(has_next_page(r#"<link rel="next" href="/buy/list-2">"#));
        assert!(has_next_page(r#"<a aria-label="Go to Next Page">2</a>"#));
        assert!(has_next_page(r#"<a aria-label="Go to next page">2</a>"#));
        assert!(has_next_page(r#"<a data-testid="paginator-next-button">2</a>"#));
        assert!(!has_next_page(r#"<a href="/buy/list-2">2</a>"#));
    }

    #[test]
    fn structured_payload_wins_over_anchors() {
        let html = concat!(
            r#"<script>window.ArgonautExchange = "#,
            r#"{"rpiResults": {"tieredResults": [{"results": [{"id": 146113692, "prettyUrl": "/property-a-146113692"}]}]}}"#,
            r#";</script>"#,
            r#"<a href="/property-house-nsw-armidale-2350-146999999">view</a>"#,
        );
        let result = extract_page(PAGE_URL, html);
        assert_eq!(result.listings.len(), 1);
        assert_eq!(result.listings[0].external_id, "146113692");
        assert_eq!(result.error, None);
    }

    #[test]
    fn anchor_scan_runs_when_payload_is_absent() {
        let html = r#"<html><body><a href="/property-house-nsw-armidale-2350-146113693">view</a></body></html>"#;
        let result = extract_page(PAGE_URL, html);
        assert_eq!(result.listings.len(), 1);
        assert_eq!(result.listings[0].external_id, "146113693");
    }

    #[test]
    fn anchor_scan_runs_when_payload_has_no_listings() {
        let html = concat!(
            r#"<script>window.ArgonautExchange = {"resi-search": {"empty": true}};</script>"#,
            r#"<a href="/property-house-nsw-armidale-2350-146113693">view</a>"#,
        );
        let result = extract_page(PAGE_URL, html);
        assert_eq!(result.listings.len(), 1);
        assert_eq!(result.listings[0].external_id, "146113693");
    }

    #[test]
    fn zero_listings_is_a_valid_empty_result() {
        let result = extract_page(PAGE_URL, "<html><body>no results</body></html>");
        assert!(result.listings.is_empty());
        assert!(!result.has_more);
        assert_eq!(result.error, None);
    }

    #[test]
    fn extraction_is_deterministic_on_identical_markup() {
        let html = concat!(
            r#"<a href="/property-farm-nsw-uralla-2358-146113700">a</a>"#,
            r#"<a href="/property-house-nsw-armidale-2350-146113693">b</a>"#,
            r#"<link rel="next" href="/buy/list-2">"#,
        );
        let first = extract_page(PAGE_URL, html);
        let second = extract_page(PAGE_URL, html);
        assert_eq!(first, second);
        assert!(first.has_more);
        assert_eq!(first.listings[0].external_id, "146113700");
    }
}
