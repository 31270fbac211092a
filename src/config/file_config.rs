use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub fidelity: Option<String>,
    pub staging_dir: Option<String>,
    pub max_uploads: Option<usize>,
    pub max_upload_bytes: Option<u64>,

    // Per-stage sections
    pub normalizer: Option<NormalizerConfig>,
    pub ocr: Option<OcrConfig>,
    pub pairing: Option<PairingConfig>,
    pub catalog: Option<CatalogConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct NormalizerConfig {
    pub target_width: Option<u32>,
    pub contrast: Option<f32>,
    pub sharpness: Option<f32>,
    /// Defaults to on for enhanced fidelity, off for simple.
    pub median_filter: Option<bool>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct OcrConfig {
    pub tesseract_cmd: Option<String>,
    pub language: Option<String>,
    pub min_text_len: Option<usize>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct PairingConfig {
    pub artist_length_ratio: Option<f64>,
    pub min_artist_len: Option<usize>,
    pub min_song_only_len: Option<usize>,
    pub extra_excluded_labels: Vec<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct CatalogConfig {
    pub api_base: Option<String>,
    pub access_token: Option<String>,
    pub market: Option<String>,
    pub result_limit: Option<u32>,
    pub timeout_sec: Option<u64>,
    pub min_request_interval_ms: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
