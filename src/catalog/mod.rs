//! Music catalog search and song pair resolution.

mod client;
mod models;
mod resolver;
mod search;
pub mod similarity;

pub use client::{CatalogClientSettings, CatalogError, SpotifyCatalogClient, DEFAULT_API_BASE};
pub use models::{CatalogAlbum, CatalogArtist, CatalogImage, CatalogTrack, TrackRecord};
pub use resolver::{
    strip_punctuation, CatalogResolver, ResolutionResult, ResolverSettings, SearchQuery,
};
#[cfg(any(test, feature = "mock"))]
pub use search::MockCatalogSearch;
pub use search::CatalogSearch;
