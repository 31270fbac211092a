//! Reads playlist screenshots and finds their songs in a music catalog.
//!
//! Screenshots are normalized for OCR, recognized, turned into
//! (song, artist) pairs and resolved against the catalog search API.

pub mod catalog;
pub mod config;
mod fidelity;
pub mod imaging;
pub mod ocr;
pub mod pipeline;
pub mod text;

pub use fidelity::Fidelity;
