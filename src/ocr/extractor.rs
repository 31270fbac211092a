use image::GrayImage;
use tracing::{debug, warn};

use super::engine::{OcrEngine, PageSegMode};
use crate::Fidelity;

/// Layouts tried by the multi-pass strategy, in order.
pub const MULTI_PASS_MODES: &[PageSegMode] = &[
    PageSegMode::Auto,
    PageSegMode::UniformBlock,
    PageSegMode::SingleColumn,
    PageSegMode::SingleLine,
];

/// A line counts as readable when its trimmed length exceeds this.
const READABLE_LINE_MIN_LEN: usize = 3;

/// Default minimum trimmed length of a single-pass result before retrying.
pub const DEFAULT_MIN_TEXT_LEN: usize = 10;

/// Runs one or more OCR passes over a normalized image and keeps the most
/// useful text.
///
/// Never fails: an engine error in a pass counts as an empty result.
pub struct OcrExtractor {
    engine: Box<dyn OcrEngine>,
    fidelity: Fidelity,
    min_text_len: usize,
}

impl OcrExtractor {
    pub fn new(engine: Box<dyn OcrEngine>, fidelity: Fidelity) -> Self {
        Self {
            engine,
            fidelity,
            min_text_len: DEFAULT_MIN_TEXT_LEN,
        }
    }

    /// Minimum trimmed length under which a single-pass result is retried.
    pub fn with_min_text_len(mut self, min_text_len: usize) -> Self {
        self.min_text_len = min_text_len;
        self
    }

    pub fn extract(&self, image: &GrayImage) -> String {
        let text = match self.fidelity {
            Fidelity::Simple => self.extract_single_pass(image),
            Fidelity::Enhanced => self.extract_multi_pass(image),
        };
        debug!("Selected OCR text ({} chars):\n{}", text.len(), text);
        text
    }

    /// Uniform-block pass, retried once in automatic mode if it read almost
    /// nothing. The longer (trimmed) of the two results wins.
    fn extract_single_pass(&self, image: &GrayImage) -> String {
        let first = self.recognize(image, PageSegMode::UniformBlock);
        if first.trim().chars().count() >= self.min_text_len {
            return first;
        }

        debug!(
            "Uniform block pass returned {} chars, retrying in automatic mode",
            first.trim().chars().count()
        );
        let retry = self.recognize(image, PageSegMode::Auto);
        if retry.trim().chars().count() > first.trim().chars().count() {
            retry
        } else {
            first
        }
    }

    /// Every layout in [`MULTI_PASS_MODES`]; the text with the most readable
    /// lines wins, earlier passes winning ties.
    fn extract_multi_pass(&self, image: &GrayImage) -> String {
        let mut best: Option<(usize, String)> = None;

        for mode in MULTI_PASS_MODES {
            let text = self.recognize(image, *mode);
            let score = readable_line_count(&text);
            debug!("OCR pass {} found {} readable lines", mode, score);

            match &best {
                Some((best_score, _)) if *best_score >= score => {}
                _ => best = Some((score, text)),
            }
        }

        best.map(|(_, text)| text).unwrap_or_default()
    }

    fn recognize(&self, image: &GrayImage, mode: PageSegMode) -> String {
        match self.engine.recognize(image, mode) {
            Ok(text) => text,
            Err(err) => {
                warn!("OCR pass {} failed: {}", mode, err);
                String::new()
            }
        }
    }
}

/// Number of lines whose trimmed length exceeds three characters.
pub fn readable_line_count(text: &str) -> usize {
    text.split('\n')
        .filter(|line| line.trim().chars().count() > READABLE_LINE_MIN_LEN)
        .count()
}
