//! Social core: follow graph, engagement counters, and feed composition
//! over the embedded store. Every operation takes the acting/viewing
//! user as an explicit parameter — there is no ambient session state.

pub mod accounts;
pub mod engagement;
pub mod error;
pub mod feed;
pub mod graph;
pub mod messaging;

pub use error::{Result, SocialError};

use pix_types::api::Page;

/// Upper bound on page sizes, mirroring what a mobile client can
/// usefully render in one fetch.
pub(crate) const MAX_PAGE: u32 = 100;

/// Reject non-positive limits, cap oversized ones.
pub(crate) fn check_page(page: Page) -> Result<Page> {
    if page.limit == 0 {
        return Err(SocialError::invalid("limit must be positive"));
    }
    Ok(Page::new(page.limit.min(MAX_PAGE), page.offset))
}

/// Reject a zero limit, cap oversized ones.
pub(crate) fn check_limit(limit: u32) -> Result<u32> {
    if limit == 0 {
        return Err(SocialError::invalid("limit must be positive"));
    }
    Ok(limit.min(MAX_PAGE))
}
