//! Temporary on-disk staging of uploaded screenshots.
//!
//! Each batch gets its own directory, removed when the [`StagedBatch`] is
//! dropped, whether processing succeeded or not.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

/// Errors that can occur while staging uploads.
#[derive(Debug, Error)]
pub enum StagingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("File too large: {0} bytes (max: {1})")]
    FileTooLarge(u64, u64),
}

pub const DEFAULT_MAX_FILE_BYTES: u64 = 20 * 1024 * 1024;

/// Root directory under which batch directories are created.
#[derive(Debug, Clone)]
pub struct StagingArea {
    root: PathBuf,
    max_file_bytes: u64,
}

impl StagingArea {
    pub fn new(root: impl Into<PathBuf>, max_file_bytes: u64) -> Self {
        Self {
            root: root.into(),
            max_file_bytes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create a fresh, uniquely named directory for one batch.
    pub fn begin_batch(&self) -> Result<StagedBatch, StagingError> {
        let dir = self.root.join(Uuid::new_v4().to_string());
        fs::create_dir_all(&dir)?;
        debug!("Created staging directory {:?}", dir);
        Ok(StagedBatch {
            dir,
            max_file_bytes: self.max_file_bytes,
            files: Vec::new(),
        })
    }
}

/// One batch's staged files. The directory is deleted on drop.
#[derive(Debug)]
pub struct StagedBatch {
    dir: PathBuf,
    max_file_bytes: u64,
    files: Vec<PathBuf>,
}

impl StagedBatch {
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Staged file paths, in staging order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Write an upload into the batch directory.
    ///
    /// Files are prefixed with their position so uploads sharing a name do
    /// not overwrite each other.
    pub fn stage(&mut self, filename: &str, data: &[u8]) -> Result<PathBuf, StagingError> {
        let size = data.len() as u64;
        if size > self.max_file_bytes {
            return Err(StagingError::FileTooLarge(size, self.max_file_bytes));
        }

        let safe_filename = sanitize_filename(filename)?;
        let path = self
            .dir
            .join(format!("{:02}_{}", self.files.len(), safe_filename));
        fs::write(&path, data)?;

        self.files.push(path.clone());
        Ok(path)
    }
}

impl Drop for StagedBatch {
    fn drop(&mut self) {
        if !self.dir.exists() {
            return;
        }
        match fs::remove_dir_all(&self.dir) {
            Ok(()) => debug!("Removed staging directory {:?}", self.dir),
            Err(err) => warn!("Failed to remove staging directory {:?}: {}", self.dir, err),
        }
    }
}

/// Keep only the final path component of `filename`, rejecting hidden files
/// and replacing characters that are reserved on common filesystems.
pub fn sanitize_filename(filename: &str) -> Result<String, StagingError> {
    // Clients may send Windows paths
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);

    if name.is_empty() || name.contains('\0') || name.starts_with('.') {
        return Err(StagingError::InvalidFilename(filename.to_string()));
    }

    Ok(name
        .chars()
        .map(|c| match c {
            ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect())
}
