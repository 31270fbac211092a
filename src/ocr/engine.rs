use image::GrayImage;
use thiserror::Error;

/// Errors an OCR engine can report for a single recognition attempt.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not encode image for the OCR engine: {0}")]
    Encode(#[from] image::ImageError),

    #[error("OCR engine failed: {0}")]
    EngineFailed(String),
}

/// Assumed layout of the text in the image.
///
/// Values follow Tesseract's page segmentation modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSegMode {
    /// Fully automatic page segmentation, the engine default.
    Auto,
    /// A single column of text of variable sizes.
    SingleColumn,
    /// A single uniform block of text. Suits lists of short UI labels.
    UniformBlock,
    /// A single text line.
    SingleLine,
}

impl PageSegMode {
    /// The engine's numeric code for this mode.
    pub fn code(&self) -> u8 {
        match self {
            Self::Auto => 3,
            Self::SingleColumn => 4,
            Self::UniformBlock => 6,
            Self::SingleLine => 7,
        }
    }
}

impl std::fmt::Display for PageSegMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} (psm {})", self, self.code())
    }
}

/// A text recognition capability.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait OcrEngine: Send + Sync {
    /// Recognize the text of `image`, assuming the given layout.
    /// Lines of the returned text are separated by `\n`.
    fn recognize(&self, image: &GrayImage, mode: PageSegMode) -> Result<String, OcrError>;
}
