use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::models::Listing;

use super::listing::parse_listing;

/// Markup locations that may carry the page's hydration payload, tried in
/// order. First pattern that matches and parses as JSON wins.
static PAYLOAD_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r#"(?s)window\.ArgonautExchange\s*=\s*(\{.+?\});?\s*</script>"#).unwrap(),
        Regex::new(r#"(?s)<script[^>]*id="__NEXT_DATA__"[^>]*>(\{.+?\})</script>"#).unwrap(),
    ]
});

/// Subtrees under these keys never hold listings.
const SKIPPED_KEYS: &[&str] = &["tracking", "analytics", "meta"];

/// Hard ceiling for the structural search; traversal past it returns empty
/// regardless of content.
const MAX_SEARCH_DEPTH: usize = 10;

/// Locate and parse the embedded JSON payload in raw markup. A pattern that
/// matches but fails to parse is skipped, not an error.
pub fn extract_embedded_payload(html: &str) -> Option<Value> {
    for pattern in PAYLOAD_PATTERNS.iter() {
        if let Some(captures) = pattern.captures(html) {
            if let Ok(payload) = serde_json::from_str(&captures[1]) {
                return Some(payload);
            }
        }
    }
    None
}

/// Pull listings out of a parsed payload: the known results path first, the
/// recursive structural search when that path yields nothing.
pub fn extract_listings(payload: &Value) -> Vec<Listing> {
    let listings = tiered_results(payload);
    if listings.is_empty() {
        return search_listings(payload, 0);
    }
    listings
}

/// Known fixed path: rpiResults.tieredResults[].results[]
fn tiered_results(payload: &Value) -> Vec<Listing> {
    let mut listings = Vec::new();
    if let Some(tiers) = payload
        .pointer("/rpiResults/tieredResults")
        .and_then(Value::as_array)
    {
        for tier in tiers {
            if let Some(results) = tier.get("results").and_then(Value::as_array) {
                listings.extend(results.iter().filter_map(parse_listing));
            }
        }
    }
    listings
}

/// An object bearing an identifier plus either a canonical path or a links
/// reference is taken as a listing.
fn looks_like_listing(map: &serde_json::Map<String, Value>) -> bool {
    map.contains_key("id") && (map.contains_key("prettyUrl") || map.contains_key("_links"))
}

/// Depth-bounded walk over the payload. A confirmed listing is terminal for
/// its branch; a listing-shaped object that fails to normalize is recursed
/// into like any other node.
fn search_listings(node: &Value, depth: usize) -> Vec<Listing> {
    if depth > MAX_SEARCH_DEPTH {
        return Vec::new();
    }

    let mut listings = Vec::new();
    match node {
        Value::Object(map) => {
            if looks_like_listing(map) {
                if let Some(listing) = parse_listing(node) {
                    return vec![listing];
                }
            }
            for (key, child) in map {
                if SKIPPED_KEYS.contains(&key.as_str()) {
                    continue;
                }
                listings.extend(search_listings(child, depth + 1));
            }
        }
        Value::Array(items) => {
            for item in items {
                listings.extend(search_listings(item, depth + 1));
            }
        }
        Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null => {}
    }
    listings
}
