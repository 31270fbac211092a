//! Image preprocessing ahead of OCR.

pub mod enhance;
mod normalizer;

pub use normalizer::{ImageDecodeError, ImageNormalizer, NormalizeSettings};
