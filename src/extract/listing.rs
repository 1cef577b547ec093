use serde_json::Value;

use crate::models::Listing;

use super::land_size::parse_land_size;

/// Canonical domain prefixed onto relative listing paths.
pub const CANONICAL_DOMAIN: &str = "https://www.realestate.com.au";

/// Map one raw listing object of unknown shape into the canonical record.
/// Every nested lookup is guarded and independent: a missing or wrong-typed
/// sub-structure leaves that field absent. Only a usable identifier is
/// mandatory; without one the candidate is dropped.
pub fn parse_listing(data: &Value) -> Option<Listing> {
    let external_id = data
        .get("id")
        .and_then(id_string)
        .or_else(|| data.get("listingId").and_then(id_string))?;

    let mut listing = Listing::new(external_id);

    if let Some(pretty) = data.get("prettyUrl").and_then(Value::as_str) {
        listing.url = Some(if pretty.starts_with('/') {
            format!("{CANONICAL_DOMAIN}{pretty}")
        } else {
            pretty.to_string()
        });
    } else if let Some(href) = data
        .pointer("/_links/canonical/href")
        .and_then(Value::as_str)
    {
        listing.url = Some(href.to_string());
    }

    if let Some(addr) = data.get("address").and_then(Value::as_object) {
        if let Some(display) = addr.get("display").and_then(Value::as_object) {
            listing.address = display
                .get("shortAddress")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .or_else(|| display.get("fullAddress").and_then(Value::as_str))
                .map(str::to_string);
        }
        listing.suburb = addr.get("suburb").and_then(text_field);
        listing.postcode = addr.get("postcode").and_then(text_field);
        if let Some(state) = addr.get("state").and_then(Value::as_str) {
            listing.state = state.to_string();
        }
        if let Some(location) = addr.get("location").and_then(Value::as_object) {
            listing.latitude = location.get("latitude").and_then(float_field);
            listing.longitude = location.get("longitude").and_then(float_field);
        }
    }

    listing.price_text = data
        .pointer("/price/display")
        .and_then(Value::as_str)
        .map(str::to_string);

    if let Some(features) = data.get("generalFeatures").and_then(Value::as_object) {
        listing.bedrooms = features
            .get("bedrooms")
            .and_then(|f| f.get("value"))
            .and_then(int_field);
        listing.bathrooms = features
            .get("bathrooms")
            .and_then(|f| f.get("value"))
            .and_then(int_field);
    }

    listing.land_size_sqm = data
        .pointer("/propertySizes/land/displayValue")
        .and_then(Value::as_str)
        .and_then(parse_land_size);

    if let Some(kind) = data.get("propertyType").and_then(Value::as_str) {
        listing.property_type = kind.to_string();
    }

    if let Some(media) = data.get("media").and_then(Value::as_array) {
        let images: Vec<String> = media.iter().filter_map(image_url).collect();
        if !images.is_empty() {
            listing.images = Some(images);
        }
    }

    Some(listing)
}

/// Identifier as a non-empty string. Zero and the empty string count as no
/// identifier, so the `listingId` fallback still gets a chance.
fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

fn text_field(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn float_field(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn int_field(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Photo URL from one media entry. Entries with no declared type count as
/// photos; `url` is preferred over `imageUrl`.
fn image_url(item: &Value) -> Option<String> {
    let entry = item.as_object()?;
    match entry.get("type").and_then(Value::as_str) {
        Some("photo") | Some("image") | None => {}
        Some(_) => return None,
    }
    entry
        .get("url")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .or_else(|| entry.get("imageUrl").and_then(Value::as_str))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
