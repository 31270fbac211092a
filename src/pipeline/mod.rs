//! Batch processing of uploaded screenshots.

mod batch;
mod staging;

pub use batch::{BatchError, BatchOutput, PlaylistImporter, Upload, MAX_UPLOADS};
pub use staging::{
    sanitize_filename, StagedBatch, StagingArea, StagingError, DEFAULT_MAX_FILE_BYTES,
};
