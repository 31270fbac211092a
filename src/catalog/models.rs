//! Catalog track shapes: what the search API returns and what the pipeline
//! hands back to callers.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogArtist {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogImage {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct CatalogAlbum {
    #[serde(default)]
    pub images: Vec<CatalogImage>,
}

/// A track as returned by the catalog search endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogTrack {
    pub id: String,
    pub uri: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<CatalogArtist>,
    #[serde(default)]
    pub album: CatalogAlbum,
    #[serde(default)]
    pub preview_url: Option<String>,
}

impl CatalogTrack {
    /// Names of the contributing artists, in catalog order.
    pub fn artist_names(&self) -> impl Iterator<Item = &str> {
        self.artists.iter().map(|a| a.name.as_str())
    }
}

#[derive(Deserialize)]
pub(crate) struct SearchResponse {
    pub tracks: Option<TrackPage>,
}

#[derive(Deserialize)]
pub(crate) struct TrackPage {
    #[serde(default)]
    pub items: Vec<CatalogTrack>,
}

/// A resolved catalog track, flattened for output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub uri: String,
    pub name: String,
    /// Artist names joined with ", ".
    pub artist: String,
    /// First album image URL, empty when the album has none.
    pub image: String,
    pub id: String,
    pub preview_url: Option<String>,
}

impl From<&CatalogTrack> for TrackRecord {
    fn from(track: &CatalogTrack) -> Self {
        Self {
            uri: track.uri.clone(),
            name: track.name.clone(),
            artist: track.artist_names().collect::<Vec<_>>().join(", "),
            image: track
                .album
                .images
                .first()
                .map(|image| image.url.clone())
                .unwrap_or_default(),
            id: track.id.clone(),
            preview_url: track.preview_url.clone(),
        }
    }
}

impl std::fmt::Display for TrackRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {} ({})", self.name, self.artist, self.uri)
    }
}
