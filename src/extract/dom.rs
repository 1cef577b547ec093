use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::models::Listing;

use super::listing::CANONICAL_DOMAIN;

/// Anchors pointing at individual listing pages.
static LISTING_ANCHORS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"a[href*="/property-"]"#).unwrap());

/// Trailing numeric listing id of at least six digits.
static TRAILING_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-(\d{6,})$").unwrap());

static POSTCODE_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}$").unwrap());

/// Derive partial records from listing links when no structured payload is
/// present. Ids are deduplicated; order is first occurrence.
pub fn extract_listings(document: &Html) -> Vec<Listing> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut listings = Vec::new();

    for anchor in document.select(&LISTING_ANCHORS) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(captures) = TRAILING_ID.captures(href) else {
            continue;
        };
        let id = captures[1].to_string();
        if !seen.insert(id.clone()) {
            continue;
        }

        let mut listing = Listing::new(id);
        listing.url = Some(if href.starts_with('/') {
            format!("{CANONICAL_DOMAIN}{href}")
        } else {
            href.to_string()
        });
        enrich_from_slug(&mut listing, href);
        listings.push(listing);
    }

    listings
}

/// The slug ends `...-suburb-state-postcode-id`: scan it for a four-digit
/// token and take the token before it as the suburb. A hint, not a guarantee.
fn enrich_from_slug(listing: &mut Listing, href: &str) {
    let slug = href.rsplit('/').next().unwrap_or(href);
    let parts: Vec<&str> = slug.split('-').collect();
    if parts.len() < 4 {
        return;
    }
    for (i, part) in parts[..parts.len() - 1].iter().enumerate() {
        if POSTCODE_TOKEN.is_match(part) {
            listing.postcode = Some((*part).to_string());
            if i > 0 {
                listing.suburb = Some(title_case(&parts[i - 1].replace('+', " ")));
            }
            break;
        }
    }
}

/// First letter of every alphabetic run uppercased, the rest lowercased.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(body: &str) -> Html {
        Html::parse_document(&format!("<html><body>{body}</body></html>"))
    }

    #[test]
    fn listing_anchor_yields_minimal_record() {
        let doc = document(
            r#"<a href="https://www.realestate.com.au/property-acreage-nsw-moonbi-2353-146113692">view</a>"#,
        );
        let listings = extract_listings(&doc);
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].external_id, "146113692");
        assert_eq!(
            listings[0].url.as_deref(),
            Some("https://www.realestate.com.au/property-acreage-nsw-moonbi-2353-146113692")
        );
        assert_eq!(listings[0].state, "NSW");
        assert_eq!(listings[0].postcode.as_deref(), Some("2353"));
        assert_eq!(listings[0].suburb.as_deref(), Some("Moonbi"));
    }

    #[test]
    fn relative_hrefs_are_prefixed() {
        let doc = document(r#"<a href="/property-house-nsw-armidale-2350-146113693">view</a>"#);
        let listings = extract_listings(&doc);
        assert_eq!(
            listings[0].url.as_deref(),
            Some("https://www.realestate.com.au/property-house-nsw-armidale-2350-146113693")
        );
    }

    #[test]
    fn duplicate_ids_keep_first_occurrence() {
        let doc = document(concat!(
            r#"<a href="/property-house-nsw-armidale-2350-146113693">photo</a>"#,
            r#"<a href="/property-house-nsw-armidale-2350-146113693">caption</a>"#,
            r#"<a href="/property-farm-nsw-uralla-2358-146113700">other</a>"#,
        ));
        let listings = extract_listings(&doc);
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].external_id, "146113693");
        assert_eq!(listings[1].external_id, "146113700");
    }

    #[test]
    fn short_ids_are_rejected() {
        let doc = document(r#"<a href="/property-house-nsw-armidale-12345">view</a>"#);
        assert!(extract_listings(&doc).is_empty());
    }

    #[test]
    fn non_listing_anchors_are_ignored() {
        let doc = document(concat!(
            r#"<a href="/buy/in-nsw/list-2">next</a>"#,
            r#"<a href="/news/market-update-146113699">news</a>"#,
        ));
        // the news link lacks the listing path marker
        assert!(extract_listings(&doc).is_empty());
    }

    #[test]
    fn plus_joined_suburbs_become_spaced_title_case() {
        let doc =
            document(r#"<a href="/property-land-nsw-coffs+harbour-2450-146113701">view</a>"#);
        let listings = extract_listings(&doc);
        assert_eq!(listings[0].suburb.as_deref(), Some("Coffs Harbour"));
        assert_eq!(listings[0].postcode.as_deref(), Some("2450"));
    }

    #[test]
    fn leading_postcode_token_leaves_suburb_absent() {
        let doc = document(r#"<a href="/property-land/2350-lot-4-146113704">view</a>"#);
        let listings = extract_listings(&doc);
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].postcode.as_deref(), Some("2350"));
        assert_eq!(listings[0].suburb, None);
    }

    #[test]
    fn slug_without_postcode_token_stays_minimal() {
        let doc = document(r#"<a href="/property-house-nsw-armidale-146113694">view</a>"#);
        let listings = extract_listings(&doc);
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].postcode, None);
        assert_eq!(listings[0].suburb, None);
    }
}
