//! Blocking client for the Spotify Web API track search.
//!
//! Requests are spaced by a configurable minimum interval.

use anyhow::Result;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

use super::models::{CatalogTrack, SearchResponse};
use super::search::CatalogSearch;

pub const DEFAULT_API_BASE: &str = "https://api.spotify.com/v1";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog rejected the access token")]
    Unauthorized,

    #[error("Catalog rate limit reached (retry after {0:?} seconds)")]
    RateLimited(Option<u64>),

    #[error("Catalog search failed with status {0}")]
    Status(u16),

    #[error("Catalog request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Connection settings of [`SpotifyCatalogClient`].
#[derive(Debug, Clone)]
pub struct CatalogClientSettings {
    pub api_base: String,
    pub access_token: String,
    pub timeout: Duration,
    pub min_request_interval: Duration,
}

impl CatalogClientSettings {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            access_token: access_token.into(),
            timeout: Duration::from_secs(30),
            min_request_interval: Duration::from_millis(100),
        }
    }
}

pub struct SpotifyCatalogClient {
    client: Client,
    api_base: String,
    access_token: String,
    min_request_interval: Duration,
    last_request: Mutex<Instant>,
}

impl SpotifyCatalogClient {
    pub fn new(settings: CatalogClientSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("playlist-ocr/", env!("CARGO_PKG_VERSION")))
            .timeout(settings.timeout)
            .build()?;

        let last_request = Instant::now()
            .checked_sub(settings.min_request_interval)
            .unwrap_or_else(Instant::now);

        Ok(Self {
            client,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            access_token: settings.access_token,
            min_request_interval: settings.min_request_interval,
            last_request: Mutex::new(last_request),
        })
    }

    fn rate_limit(&self) {
        let mut last = self
            .last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let elapsed = last.elapsed();
        if elapsed < self.min_request_interval {
            std::thread::sleep(self.min_request_interval - elapsed);
        }
        *last = Instant::now();
    }

    fn search_url(&self, query: &str, limit: u32, market: &str) -> String {
        format!(
            "{}/search?q={}&type=track&limit={}&market={}",
            self.api_base,
            urlencoding::encode(query),
            limit,
            urlencoding::encode(market)
        )
    }
}

/// Map a non-success response to its [`CatalogError`].
fn status_error(status: StatusCode, headers: &HeaderMap) -> CatalogError {
    match status {
        StatusCode::UNAUTHORIZED => CatalogError::Unauthorized,
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = headers
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok());
            CatalogError::RateLimited(retry_after)
        }
        other => CatalogError::Status(other.as_u16()),
    }
}

impl CatalogSearch for SpotifyCatalogClient {
    fn search_tracks(&self, query: &str, limit: u32, market: &str) -> Result<Vec<CatalogTrack>> {
        self.rate_limit();

        let url = self.search_url(query, limit, market);
        debug!("Catalog search: {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .map_err(CatalogError::from)?;

        if !response.status().is_success() {
            return Err(status_error(response.status(), response.headers()).into());
        }

        let body: SearchResponse = response.json().map_err(CatalogError::from)?;
        Ok(body.tracks.map(|page| page.items).unwrap_or_default())
    }
}
