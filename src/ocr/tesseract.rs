//! OCR through the `tesseract` command line tool.

use image::{GrayImage, ImageFormat};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::debug;

use super::engine::{OcrEngine, OcrError, PageSegMode};

/// Runs the `tesseract` executable on a temporary PNG of the image.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    /// Path or name of the executable.
    command: PathBuf,
    /// Language(s) to recognize, e.g. "eng" or "eng+ita".
    language: String,
}

impl TesseractCli {
    pub fn new(command: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            language: language.into(),
        }
    }

    /// Check the executable can be launched, returning its version banner.
    pub fn version(&self) -> Result<String, OcrError> {
        let output = Command::new(&self.command)
            .arg("--version")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::EngineFailed(stderr.to_string()));
        }

        // Older releases print the banner on stderr
        let banner = if output.stdout.is_empty() {
            output.stderr
        } else {
            output.stdout
        };
        Ok(String::from_utf8_lossy(&banner)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string())
    }

    fn build_args(&self, mode: PageSegMode) -> Vec<String> {
        let mut args = vec![
            "stdout".to_string(),
            "-l".to_string(),
            self.language.clone(),
            "--oem".to_string(),
            "3".to_string(),
        ];
        // Auto is the engine default and needs no flag
        if mode != PageSegMode::Auto {
            args.push("--psm".to_string());
            args.push(mode.code().to_string());
        }
        args
    }
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self::new("tesseract", "eng")
    }
}

impl OcrEngine for TesseractCli {
    fn recognize(&self, image: &GrayImage, mode: PageSegMode) -> Result<String, OcrError> {
        let input = tempfile::Builder::new()
            .prefix("playlist-ocr-")
            .suffix(".png")
            .tempfile()?;
        image.save_with_format(input.path(), ImageFormat::Png)?;

        let args = self.build_args(mode);
        debug!("Running {:?} {:?} on {:?}", self.command, args, input.path());

        let output = Command::new(&self.command)
            .arg(input.path())
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::EngineFailed(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
