//! Text recognition over normalized screenshots.

mod engine;
mod extractor;
mod tesseract;

#[cfg(any(test, feature = "mock"))]
pub use engine::MockOcrEngine;
pub use engine::{OcrEngine, OcrError, PageSegMode};
pub use extractor::{readable_line_count, OcrExtractor, DEFAULT_MIN_TEXT_LEN, MULTI_PASS_MODES};
pub use tesseract::TesseractCli;
