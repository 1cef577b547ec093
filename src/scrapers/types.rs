use serde::{Deserialize, Serialize};

/// Search parameters for a region scrape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParams {
    /// Region slug used in the search URL (e.g. "nsw")
    pub region: String,
    /// Maximum number of result pages to visit
    pub max_pages: usize,
    /// Run the browser without a visible window
    pub headless: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            region: "nsw".to_string(),
            max_pages: 5,
            headless: true,
        }
    }
}
