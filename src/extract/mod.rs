//! Page-to-records extraction core. Pure and deterministic per call: given
//! the same markup it returns the same records, so everything here is
//! unit-testable without a browser.

pub mod dom;
pub mod land_size;
pub mod listing;
pub mod page;
pub mod structured;
