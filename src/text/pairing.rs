//! Reconstruction of (song, artist) pairs from recognized text lines.
//!
//! The only positional signal available is line order. Each accepted line
//! is tried against three tiers, in order:
//!
//! 1. an in-line separator (`Song - Artist`, `Song by Artist`, ...);
//! 2. the following line taken as the artist, when it looks like one;
//! 3. the line alone as a song with no known artist.
//!
//! A single forward cursor walks the lines, never backtracking.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use super::classifier::LineClassifier;
use super::cleaner::clean_line;

/// In-line separators, highest priority first.
pub const SEPARATORS: &[&str] = &[
    " - ", " – ", " by ", " | ", " feat. ", " feat ", " ft. ", " ft ", " & ",
];

/// Words that rarely appear in artist names but often in titles.
pub const FUNCTION_WORDS: &[&str] = &[
    "the", "and", "of", "in", "to", "a", "an", "with", "for", "on", "at", "by",
];

lazy_static! {
    static ref FEATURING_PREFIX: Regex = Regex::new(r"(?i)^(?:feat\.|ft\.|featuring\b|with\b)\s*")
        .expect("Invalid Regex, this should be fixed at runtime.");
    static ref LEADING_DIGIT: Regex =
        Regex::new(r"^\d").expect("Invalid Regex, this should be fixed at runtime.");
}

/// A candidate song with its artist, as read from a screenshot.
///
/// An empty `artist` means no artist could be determined.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SongPair {
    pub song: String,
    pub artist: String,
}

impl SongPair {
    pub fn new(song: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            song: song.into(),
            artist: artist.into(),
        }
    }

    pub fn has_artist(&self) -> bool {
        !self.artist.is_empty()
    }
}

impl std::fmt::Display for SongPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.has_artist() {
            write!(f, "'{}' by '{}'", self.song, self.artist)
        } else {
            write!(f, "'{}'", self.song)
        }
    }
}

/// Tunable thresholds of the line-pairing heuristics.
///
/// The defaults were picked empirically on phone screenshots; none of them
/// is a hard contract.
#[derive(Debug, Clone, PartialEq)]
pub struct PairingThresholds {
    /// The next line is only an artist candidate if it is shorter than the
    /// current line times this ratio.
    pub artist_length_ratio: f64,
    /// The next line must be longer than this to be taken as an artist.
    pub min_artist_len: usize,
    /// A line without artist must be longer than this to be kept as a song.
    pub min_song_only_len: usize,
    /// Whole words (lower-case) that disqualify a line as an artist name.
    pub function_words: Vec<String>,
}

impl Default for PairingThresholds {
    fn default() -> Self {
        Self {
            artist_length_ratio: 1.5,
            min_artist_len: 2,
            min_song_only_len: 3,
            function_words: FUNCTION_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

/// Turns the recognized text of one screenshot into song pairs.
#[derive(Debug, Clone)]
pub struct SongPairExtractor {
    classifier: LineClassifier,
    thresholds: PairingThresholds,
    function_words: HashSet<String>,
}

impl Default for SongPairExtractor {
    fn default() -> Self {
        Self::new(LineClassifier::default(), PairingThresholds::default())
    }
}

impl SongPairExtractor {
    pub fn new(classifier: LineClassifier, thresholds: PairingThresholds) -> Self {
        let function_words = thresholds
            .function_words
            .iter()
            .map(|w| w.to_lowercase())
            .collect();
        Self {
            classifier,
            thresholds,
            function_words,
        }
    }

    pub fn thresholds(&self) -> &PairingThresholds {
        &self.thresholds
    }

    /// Clean and classify every line of `text`, keeping the candidate labels
    /// in their original order.
    pub fn candidate_lines(&self, text: &str) -> Vec<String> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(clean_line)
            .filter(|line| self.classifier.is_candidate_label(line))
            .collect()
    }

    /// Extract the song pairs contained in the recognized text of one image.
    ///
    /// Pairs come out in line order; duplicates are kept.
    pub fn extract(&self, text: &str) -> Vec<SongPair> {
        let lines = self.candidate_lines(text);
        for (i, line) in lines.iter().enumerate() {
            debug!("cleaned line {}: '{}'", i, line);
        }

        let pairs = self.pair_lines(&lines);
        for (i, pair) in pairs.iter().enumerate() {
            debug!("extracted pair {}: {}", i, pair);
        }
        pairs
    }

    /// Run the three pairing tiers over already cleaned lines.
    pub fn pair_lines(&self, lines: &[String]) -> Vec<SongPair> {
        let mut pairs = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            let current = lines[i].as_str();

            if !self.classifier.is_candidate_label(current) {
                i += 1;
                continue;
            }

            if let Some(pair) = split_on_separator(current) {
                pairs.push(pair);
                i += 1;
                continue;
            }

            if let Some(next) = lines.get(i + 1) {
                if self.classifier.is_candidate_label(next) && self.looks_like_artist(current, next)
                {
                    pairs.push(SongPair::new(current, next.as_str()));
                    i += 2;
                    continue;
                }
            }

            if char_len(current) > self.thresholds.min_song_only_len {
                pairs.push(SongPair::new(current, ""));
            }
            i += 1;
        }

        pairs
    }

    /// Whether `candidate`, the line right after `song`, reads like an artist.
    fn looks_like_artist(&self, song: &str, candidate: &str) -> bool {
        let candidate_len = char_len(candidate);
        let max_len = char_len(song) as f64 * self.thresholds.artist_length_ratio;

        (candidate_len as f64) < max_len
            && candidate_len > self.thresholds.min_artist_len
            && !self.contains_function_word(candidate)
            && !LEADING_DIGIT.is_match(candidate)
    }

    /// A leading "The" is allowed: band names start with it all the time.
    fn contains_function_word(&self, text: &str) -> bool {
        text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|word| !word.is_empty())
            .enumerate()
            .filter(|(i, word)| !(*i == 0 && word.eq_ignore_ascii_case("the")))
            .any(|(_, word)| self.function_words.contains(&word.to_lowercase()))
    }
}

/// Split `line` on the first separator (by priority) that yields a pair
/// with both sides longer than one character.
fn split_on_separator(line: &str) -> Option<SongPair> {
    SEPARATORS.iter().find_map(|separator| {
        let (song, artist) = line.split_once(separator)?;
        let song = song.trim();
        let artist = FEATURING_PREFIX.replace(artist.trim(), "");
        let artist = artist.trim();

        if char_len(song) > 1 && char_len(artist) > 1 {
            Some(SongPair::new(song, artist))
        } else {
            None
        }
    })
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Pool pairs from several images, dropping exact duplicates.
///
/// Pairs hold cleaned text, so two readings of the same row that differed
/// only by UI noise are merged. First occurrences keep their order.
pub fn dedup_pairs<I>(pairs: I) -> Vec<SongPair>
where
    I: IntoIterator<Item = SongPair>,
{
    let mut seen = HashSet::new();
    pairs
        .into_iter()
        .filter(|pair| seen.insert(pair.clone()))
        .collect()
}
