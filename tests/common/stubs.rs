use anyhow::Result;
use image::GrayImage;
use std::sync::{Arc, Mutex};

use playlist_ocr::catalog::{CatalogSearch, CatalogTrack};
use playlist_ocr::ocr::{OcrEngine, OcrError, PageSegMode};

/// OCR engine reading a fixed text per screenshot.
///
/// Screenshots are told apart by their (uniform) gray level, which survives
/// normalization; the page with the nearest level is returned.
pub struct ScriptedOcrEngine {
    pages: Vec<(u8, String)>,
    modes: Arc<Mutex<Vec<PageSegMode>>>,
}

#[allow(dead_code)]
impl ScriptedOcrEngine {
    pub fn new(pages: &[(u8, &str)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(level, text)| (*level, text.to_string()))
                .collect(),
            modes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared log of the layouts requested, in call order. Stays readable
    /// after the engine is handed to an importer.
    pub fn mode_log(&self) -> Arc<Mutex<Vec<PageSegMode>>> {
        Arc::clone(&self.modes)
    }
}

impl OcrEngine for ScriptedOcrEngine {
    fn recognize(&self, image: &GrayImage, mode: PageSegMode) -> Result<String, OcrError> {
        self.modes.lock().unwrap().push(mode);

        let (width, height) = image.dimensions();
        let level = image.get_pixel(width / 2, height / 2).0[0];
        self.pages
            .iter()
            .min_by_key(|(page_level, _)| (*page_level as i16 - level as i16).abs())
            .map(|(_, text)| text.clone())
            .ok_or_else(|| OcrError::EngineFailed("no scripted page".to_string()))
    }
}

/// In-memory catalog: a track matches a query when the query, stripped of
/// field filters and quotes, contains the track name.
pub struct FakeCatalog {
    tracks: Vec<CatalogTrack>,
    queries: Mutex<Vec<String>>,
    failing: bool,
}

#[allow(dead_code)]
impl FakeCatalog {
    pub fn new(tracks: Vec<CatalogTrack>) -> Self {
        Self {
            tracks,
            queries: Mutex::new(Vec::new()),
            failing: false,
        }
    }

    /// A catalog whose every search fails.
    pub fn unreachable() -> Self {
        Self {
            tracks: Vec::new(),
            queries: Mutex::new(Vec::new()),
            failing: true,
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl CatalogSearch for FakeCatalog {
    fn search_tracks(&self, query: &str, limit: u32, _market: &str) -> Result<Vec<CatalogTrack>> {
        self.queries.lock().unwrap().push(query.to_string());
        if self.failing {
            anyhow::bail!("catalog unreachable");
        }

        let terms = query
            .replace("track:", "")
            .replace("artist:", "")
            .replace('"', "")
            .to_lowercase();
        Ok(self
            .tracks
            .iter()
            .filter(|track| terms.contains(&track.name.to_lowercase()))
            .take(limit as usize)
            .cloned()
            .collect())
    }
}
