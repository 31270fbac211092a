use anyhow::Result;

use super::models::CatalogTrack;

/// Free-text track search against a music catalog.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait CatalogSearch: Send + Sync {
    /// Run `query` (field filters such as `track:` and `artist:` allowed),
    /// returning at most `limit` tracks available in `market`, best first.
    fn search_tracks(&self, query: &str, limit: u32, market: &str) -> Result<Vec<CatalogTrack>>;
}
