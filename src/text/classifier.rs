//! Song/artist label plausibility filter.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

use super::cleaner::UI_GLYPHS;

/// Interface labels that are never a song title or an artist name.
/// Compared case-insensitively against the whole (trimmed) line.
pub const INTERFACE_LABELS: &[&str] = &[
    // Navigation
    "home",
    "search",
    "library",
    "create",
    "your library",
    // Actions
    "add",
    "remove",
    "download",
    "share",
    // Media types
    "video",
    "audio",
    "playlist",
    // Collections
    "liked songs",
    "add songs",
];

lazy_static! {
    static ref BARE_NUMBER: Regex =
        Regex::new(r"^\d+$").expect("Invalid Regex, this should be fixed at runtime.");
    static ref BARE_TIME: Regex =
        Regex::new(r"^\d{1,2}:\d{2}$").expect("Invalid Regex, this should be fixed at runtime.");
}

/// Decides whether a cleaned line can be a song or artist label.
///
/// This is a heuristic filter: a line passing it is only a candidate.
#[derive(Debug, Clone)]
pub struct LineClassifier {
    excluded_labels: HashSet<String>,
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new(std::iter::empty::<&str>())
    }
}

impl LineClassifier {
    /// Create a classifier excluding the built-in interface labels plus
    /// `extra_labels` (e.g. the owner name shown in a playlist header).
    pub fn new<I, S>(extra_labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let excluded_labels = INTERFACE_LABELS
            .iter()
            .map(|label| label.to_string())
            .chain(
                extra_labels
                    .into_iter()
                    .map(|label| label.as_ref().trim().to_lowercase())
                    .filter(|label| !label.is_empty()),
            )
            .collect();
        Self { excluded_labels }
    }

    /// Returns true if `text` is plausibly a song title or an artist name.
    pub fn is_candidate_label(&self, text: &str) -> bool {
        let text = text.trim();
        if text.chars().count() < 2 {
            return false;
        }

        if self.excluded_labels.contains(&text.to_lowercase()) {
            return false;
        }

        if BARE_NUMBER.is_match(text) || BARE_TIME.is_match(text) {
            return false;
        }

        // Only icons and bullets (possibly separated by spaces)
        !text
            .chars()
            .all(|c| UI_GLYPHS.contains(&c) || c.is_whitespace())
    }
}
