//! A batch of screenshots, from uploaded bytes to resolved catalog tracks.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::staging::{StagingArea, StagingError};
use crate::catalog::{CatalogResolver, CatalogSearch, ResolutionResult, TrackRecord};
use crate::config::AppConfig;
use crate::imaging::{ImageDecodeError, ImageNormalizer};
use crate::ocr::{OcrEngine, OcrExtractor};
use crate::text::{dedup_pairs, SongPair, SongPairExtractor};

/// Most images accepted in one batch.
pub const MAX_UPLOADS: usize = 10;

/// Errors that abort a whole batch.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("No files in batch")]
    NoFiles,

    #[error("Too many uploads: {0} (max: {1})")]
    TooManyUploads(usize, usize),

    #[error("Staging error: {0}")]
    Staging(#[from] StagingError),
}

/// An uploaded screenshot, still encoded.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    /// Read an upload from disk, named after the file.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Ok(Self { filename, bytes })
    }
}

/// Outcome of a batch. `found` and `not_found` partition the
/// `total_extracted` deduplicated pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchOutput {
    pub found: Vec<TrackRecord>,
    pub not_found: Vec<SongPair>,
    pub total_extracted: usize,
}

impl BatchOutput {
    fn new(resolution: ResolutionResult, total_extracted: usize) -> Self {
        Self {
            found: resolution.found,
            not_found: resolution.not_found,
            total_extracted,
        }
    }
}

/// Runs the whole screenshot pipeline: staging, normalization, OCR, pairing,
/// deduplication and catalog resolution.
pub struct PlaylistImporter {
    normalizer: ImageNormalizer,
    ocr: OcrExtractor,
    pairs: SongPairExtractor,
    resolver: CatalogResolver,
    staging: StagingArea,
    max_uploads: usize,
}

impl PlaylistImporter {
    pub fn new(
        normalizer: ImageNormalizer,
        ocr: OcrExtractor,
        pairs: SongPairExtractor,
        resolver: CatalogResolver,
        staging: StagingArea,
    ) -> Self {
        Self {
            normalizer,
            ocr,
            pairs,
            resolver,
            staging,
            max_uploads: MAX_UPLOADS,
        }
    }

    /// Accept at most `max_uploads` images per batch (capped at
    /// [`MAX_UPLOADS`]).
    pub fn with_max_uploads(mut self, max_uploads: usize) -> Self {
        self.max_uploads = max_uploads.min(MAX_UPLOADS);
        self
    }

    pub fn from_config(config: &AppConfig, engine: Box<dyn OcrEngine>) -> Self {
        Self::new(
            ImageNormalizer::new(config.normalizer.clone()),
            OcrExtractor::new(engine, config.fidelity).with_min_text_len(config.ocr.min_text_len),
            config.pair_extractor(),
            CatalogResolver::new(config.resolver_settings()),
            config.staging_area(),
        )
        .with_max_uploads(config.max_uploads)
    }

    pub fn resolver(&self) -> &CatalogResolver {
        &self.resolver
    }

    /// Song pairs of a single image file, in reading order.
    pub fn pairs_from_image(&self, path: &Path) -> Result<Vec<SongPair>, ImageDecodeError> {
        let image = self.normalizer.normalize_file(path)?;
        let text = self.ocr.extract(&image);
        Ok(self.pairs.extract(&text))
    }

    /// Stage the uploads and pool the deduplicated pairs of every readable
    /// image. Uploads that are too large, badly named or fail to decode are
    /// skipped; only an I/O failure of the staging area aborts the batch.
    ///
    /// Staged files are removed before returning, on every path.
    pub fn extract_pairs(&self, uploads: &[Upload]) -> Result<Vec<SongPair>, BatchError> {
        if uploads.is_empty() {
            return Err(BatchError::NoFiles);
        }
        if uploads.len() > self.max_uploads {
            return Err(BatchError::TooManyUploads(uploads.len(), self.max_uploads));
        }

        let mut batch = self.staging.begin_batch()?;
        let mut staged = Vec::with_capacity(uploads.len());
        for upload in uploads {
            match batch.stage(&upload.filename, &upload.bytes) {
                Ok(path) => staged.push((upload, path)),
                Err(StagingError::Io(err)) => return Err(StagingError::Io(err).into()),
                Err(err) => warn!("Skipping {}: {}", upload.filename, err),
            }
        }
        info!("Staged {} images in {:?}", staged.len(), batch.dir());

        let mut pooled = Vec::new();
        for (upload, path) in &staged {
            match self.pairs_from_image(path) {
                Ok(pairs) => {
                    debug!("{} pairs from {}", pairs.len(), upload.filename);
                    pooled.extend(pairs);
                }
                Err(err) => warn!("Skipping {}: {}", upload.filename, err),
            }
        }

        let pairs = dedup_pairs(pooled);
        info!("Extracted {} unique pairs", pairs.len());
        Ok(pairs)
    }

    /// Extract the pairs of a batch and resolve them against the catalog.
    pub fn process_batch(
        &self,
        uploads: &[Upload],
        search: &dyn CatalogSearch,
    ) -> Result<BatchOutput, BatchError> {
        let pairs = self.extract_pairs(uploads)?;
        let resolution = self.resolver.resolve_all(&pairs, search);
        Ok(BatchOutput::new(resolution, pairs.len()))
    }
}
