mod file_config;

pub use file_config::{CatalogConfig, FileConfig, NormalizerConfig, OcrConfig, PairingConfig};

use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::{CatalogClientSettings, ResolverSettings, DEFAULT_API_BASE};
use crate::imaging::NormalizeSettings;
use crate::ocr::{TesseractCli, DEFAULT_MIN_TEXT_LEN};
use crate::pipeline::{StagingArea, DEFAULT_MAX_FILE_BYTES, MAX_UPLOADS};
use crate::text::{LineClassifier, PairingThresholds, SongPairExtractor};
use crate::Fidelity;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub fidelity: Fidelity,
    pub access_token: Option<String>,
    pub staging_dir: Option<PathBuf>,
    pub tesseract_cmd: Option<String>,
    pub market: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    // Core settings
    pub fidelity: Fidelity,
    pub staging_dir: PathBuf,
    pub max_uploads: usize,
    pub max_upload_bytes: u64,

    // Per-stage settings (with defaults)
    pub normalizer: NormalizeSettings,
    pub ocr: OcrSettings,
    pub pairing: PairingSettings,
    pub catalog: CatalogSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OcrSettings {
    pub tesseract_cmd: String,
    pub language: String,
    pub min_text_len: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PairingSettings {
    pub thresholds: PairingThresholds,
    pub extra_excluded_labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSettings {
    pub api_base: String,
    pub access_token: Option<String>,
    pub market: String,
    pub result_limit: u32,
    pub timeout_sec: u64,
    pub min_request_interval_ms: u64,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let fidelity = match file.fidelity {
            Some(s) => match parse_fidelity(&s) {
                Some(fidelity) => fidelity,
                None => bail!("Unknown fidelity {:?}, expected simple or enhanced", s),
            },
            None => cli.fidelity,
        };

        let staging_dir = file
            .staging_dir
            .map(PathBuf::from)
            .or_else(|| cli.staging_dir.clone())
            .unwrap_or_else(|| std::env::temp_dir().join("playlist-ocr"));

        let max_uploads = file.max_uploads.unwrap_or(MAX_UPLOADS);
        if max_uploads == 0 || max_uploads > MAX_UPLOADS {
            bail!(
                "max_uploads must be between 1 and {}, got {}",
                MAX_UPLOADS,
                max_uploads
            );
        }
        let max_upload_bytes = file.max_upload_bytes.unwrap_or(DEFAULT_MAX_FILE_BYTES);

        // Normalizer settings - merge file config with defaults
        let norm_file = file.normalizer.unwrap_or_default();
        let norm_defaults = NormalizeSettings::default();
        let median_filter = norm_file
            .median_filter
            .unwrap_or(fidelity == Fidelity::Enhanced);
        let normalizer = NormalizeSettings {
            target_width: norm_file.target_width.unwrap_or(norm_defaults.target_width),
            contrast: norm_file.contrast.unwrap_or(norm_defaults.contrast),
            sharpness: norm_file.sharpness.unwrap_or(norm_defaults.sharpness),
            median_radius: if median_filter {
                norm_defaults.median_radius.or(Some(1))
            } else {
                None
            },
        };
        if normalizer.target_width == 0 {
            bail!("normalizer.target_width must be greater than 0");
        }
        if normalizer.contrast < 0.0 || normalizer.sharpness < 0.0 {
            bail!("normalizer enhancement factors must not be negative");
        }

        let ocr_file = file.ocr.unwrap_or_default();
        let ocr = OcrSettings {
            tesseract_cmd: ocr_file
                .tesseract_cmd
                .or_else(|| cli.tesseract_cmd.clone())
                .unwrap_or_else(|| "tesseract".to_string()),
            language: ocr_file.language.unwrap_or_else(|| "eng".to_string()),
            min_text_len: ocr_file.min_text_len.unwrap_or(DEFAULT_MIN_TEXT_LEN),
        };

        let pairing_file = file.pairing.unwrap_or_default();
        let pairing_defaults = PairingThresholds::default();
        let pairing = PairingSettings {
            thresholds: PairingThresholds {
                artist_length_ratio: pairing_file
                    .artist_length_ratio
                    .unwrap_or(pairing_defaults.artist_length_ratio),
                min_artist_len: pairing_file
                    .min_artist_len
                    .unwrap_or(pairing_defaults.min_artist_len),
                min_song_only_len: pairing_file
                    .min_song_only_len
                    .unwrap_or(pairing_defaults.min_song_only_len),
                function_words: pairing_defaults.function_words,
            },
            extra_excluded_labels: pairing_file.extra_excluded_labels,
        };
        if pairing.thresholds.artist_length_ratio <= 0.0 {
            bail!("pairing.artist_length_ratio must be greater than 0");
        }

        let catalog_file = file.catalog.unwrap_or_default();
        let catalog = CatalogSettings {
            api_base: catalog_file
                .api_base
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            access_token: catalog_file
                .access_token
                .or_else(|| cli.access_token.clone()),
            market: catalog_file
                .market
                .or_else(|| cli.market.clone())
                .unwrap_or_else(|| "US".to_string()),
            result_limit: catalog_file.result_limit.unwrap_or(10),
            timeout_sec: catalog_file.timeout_sec.unwrap_or(30),
            min_request_interval_ms: catalog_file.min_request_interval_ms.unwrap_or(100),
        };

        Ok(Self {
            fidelity,
            staging_dir,
            max_uploads,
            max_upload_bytes,
            normalizer,
            ocr,
            pairing,
            catalog,
        })
    }

    pub fn staging_area(&self) -> StagingArea {
        StagingArea::new(&self.staging_dir, self.max_upload_bytes)
    }

    pub fn tesseract(&self) -> TesseractCli {
        TesseractCli::new(&self.ocr.tesseract_cmd, &self.ocr.language)
    }

    pub fn pair_extractor(&self) -> SongPairExtractor {
        SongPairExtractor::new(
            LineClassifier::new(&self.pairing.extra_excluded_labels),
            self.pairing.thresholds.clone(),
        )
    }

    pub fn resolver_settings(&self) -> ResolverSettings {
        ResolverSettings {
            fidelity: self.fidelity,
            limit: self.catalog.result_limit,
            market: self.catalog.market.clone(),
        }
    }

    /// Settings for the catalog client. Fails when no access token was
    /// configured.
    pub fn catalog_client_settings(&self) -> Result<CatalogClientSettings> {
        let access_token = match &self.catalog.access_token {
            Some(token) if !token.trim().is_empty() => token.trim().to_string(),
            _ => bail!(
                "A catalog access token is required, pass --access-token or set catalog.access_token"
            ),
        };
        Ok(CatalogClientSettings {
            api_base: self.catalog.api_base.clone(),
            access_token,
            timeout: Duration::from_secs(self.catalog.timeout_sec),
            min_request_interval: Duration::from_millis(self.catalog.min_request_interval_ms),
        })
    }
}

/// Uses clap's ValueEnum trait for parsing.
fn parse_fidelity(s: &str) -> Option<Fidelity> {
    Fidelity::from_str(s, true).ok()
}
