use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Region code assumed when a listing does not carry one.
pub const DEFAULT_STATE: &str = "NSW";

/// Category assigned to listings without an explicit property type.
pub const DEFAULT_PROPERTY_TYPE: &str = "rural";

/// Source of the property listing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Rea,
}

/// Canonical property record. Everything beyond the identifier is
/// best-effort: absent fields are omitted from the serialized output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    pub external_id: String,
    pub source: Source,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suburb: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub land_size_sqm: Option<f64>,
    pub property_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

impl Listing {
    /// Minimal record carrying only the identifier and the defaults.
    pub fn new(external_id: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            source: Source::Rea,
            url: None,
            address: None,
            suburb: None,
            postcode: None,
            state: DEFAULT_STATE.to_string(),
            latitude: None,
            longitude: None,
            price_text: None,
            bedrooms: None,
            bathrooms: None,
            land_size_sqm: None,
            property_type: DEFAULT_PROPERTY_TYPE.to_string(),
            images: None,
        }
    }
}

/// Outcome of one results-page fetch. `error` is serialized even when null so
/// downstream consumers always see the slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageResult {
    pub url: String,
    pub listings: Vec<Listing>,
    pub has_more: bool,
    pub error: Option<String>,
}

impl PageResult {
    pub fn empty(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            listings: Vec::new(),
            has_more: false,
            error: None,
        }
    }
}

/// Aggregate of a multi-page region scrape, deduplicated by external id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeSummary {
    pub listings: Vec<Listing>,
    pub pages_scraped: usize,
    pub errors: Vec<String>,
    pub scraped_at: DateTime<Utc>,
}
