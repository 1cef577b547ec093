pub mod browser;
pub mod traits;
pub mod types;

pub use browser::ReaBrowserScraper;
pub use traits::PortalScraper;
pub use types::SearchParams;
