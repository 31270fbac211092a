//! Resolve song pairs to catalog tracks through a ladder of search queries,
//! from the most to the least specific.

use anyhow::{bail, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::models::{CatalogTrack, TrackRecord};
use super::search::CatalogSearch;
use super::similarity::word_similarity;
use crate::text::SongPair;
use crate::Fidelity;

/// Minimum word similarity for a catalog name to match the searched song.
const NAME_SIMILARITY_THRESHOLD: f64 = 0.7;

/// Songs longer than this (in characters) and with more than
/// [`PARTIAL_QUERY_MIN_WORDS`] words also get a query on their first words.
const PARTIAL_QUERY_MIN_CHARS: usize = 20;
const PARTIAL_QUERY_MIN_WORDS: usize = 3;
const PARTIAL_QUERY_WORDS: usize = 3;

lazy_static! {
    static ref NON_WORD: Regex =
        Regex::new(r"[^\w\s]").expect("Invalid Regex, this should be fixed at runtime.");
}

/// Drop every character that is neither a word character nor whitespace,
/// then trim.
pub fn strip_punctuation(text: &str) -> String {
    NON_WORD.replace_all(text, "").trim().to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    /// `track:"<song>" artist:"<artist>"`, the only query whose top result is
    /// accepted even when no candidate verifies.
    pub exact_dual_field: bool,
}

impl SearchQuery {
    fn new(text: String) -> Self {
        Self {
            text,
            exact_dual_field: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolverSettings {
    pub fidelity: Fidelity,
    /// Results requested per query.
    pub limit: u32,
    pub market: String,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            fidelity: Fidelity::default(),
            limit: 10,
            market: "US".to_string(),
        }
    }
}

/// Pairs split by whether a catalog track was found for them. Every input
/// pair lands in exactly one of the two lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolutionResult {
    pub found: Vec<TrackRecord>,
    pub not_found: Vec<SongPair>,
}

#[derive(Debug, Clone, Default)]
pub struct CatalogResolver {
    settings: ResolverSettings,
}

impl CatalogResolver {
    pub fn new(settings: ResolverSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Queries to try for an already cleaned song and artist, in order.
    pub fn query_strategies(&self, song: &str, artist: &str) -> Vec<SearchQuery> {
        let enhanced = self.settings.fidelity == Fidelity::Enhanced;
        let mut queries = Vec::new();

        if song.is_empty() {
            return queries;
        }

        if !artist.is_empty() {
            queries.push(SearchQuery {
                text: format!("track:\"{}\" artist:\"{}\"", song, artist),
                exact_dual_field: true,
            });
            queries.push(SearchQuery::new(format!(
                "track:{} artist:{}",
                song, artist
            )));
            queries.push(SearchQuery::new(format!("{} {}", song, artist)));
        }

        if enhanced {
            queries.push(SearchQuery::new(format!("track:\"{}\"", song)));
        } else {
            queries.push(SearchQuery::new(format!("track:{}", song)));
        }
        queries.push(SearchQuery::new(song.to_string()));

        if enhanced && song.chars().count() > PARTIAL_QUERY_MIN_CHARS {
            let words: Vec<&str> = song.split_whitespace().collect();
            if words.len() > PARTIAL_QUERY_MIN_WORDS {
                queries.push(SearchQuery::new(format!(
                    "track:{}",
                    words[..PARTIAL_QUERY_WORDS].join(" ")
                )));
            }
        }

        queries
    }

    /// Find the catalog track for `pair`, or `None` once every query is
    /// exhausted. Search failures are logged and the next query is tried.
    pub fn resolve(&self, pair: &SongPair, search: &dyn CatalogSearch) -> Option<TrackRecord> {
        let song = strip_punctuation(&pair.song);
        let artist = strip_punctuation(&pair.artist);

        for query in self.query_strategies(&song, &artist) {
            debug!("Trying catalog query '{}'", query.text);
            let tracks =
                match search.search_tracks(&query.text, self.settings.limit, &self.settings.market)
                {
                    Ok(tracks) => tracks,
                    Err(err) => {
                        warn!("Catalog query '{}' failed: {:#}", query.text, err);
                        continue;
                    }
                };

            if let Some(track) = self.pick(&query, &tracks, &song, &artist) {
                debug!("Matched {} to '{}' ({})", pair, track.name, track.uri);
                return Some(TrackRecord::from(track));
            }
        }

        debug!("No catalog match for {}", pair);
        None
    }

    fn pick<'a>(
        &self,
        query: &SearchQuery,
        tracks: &'a [CatalogTrack],
        song: &str,
        artist: &str,
    ) -> Option<&'a CatalogTrack> {
        match self.settings.fidelity {
            Fidelity::Simple => tracks.first(),
            Fidelity::Enhanced => tracks
                .iter()
                .find(|track| is_verified_match(track, song, artist))
                .or_else(|| {
                    if query.exact_dual_field {
                        tracks.first()
                    } else {
                        None
                    }
                }),
        }
    }

    /// Resolve every pair in order, splitting them into found tracks and
    /// unmatched pairs.
    pub fn resolve_all(&self, pairs: &[SongPair], search: &dyn CatalogSearch) -> ResolutionResult {
        let mut result = ResolutionResult::default();
        for pair in pairs {
            match self.resolve(pair, search) {
                Some(track) => result.found.push(track),
                None => result.not_found.push(pair.clone()),
            }
        }
        info!(
            "Resolved {} of {} pairs against the catalog",
            result.found.len(),
            pairs.len()
        );
        result
    }

    /// A single free-text search, results formatted as-is.
    pub fn search_manual(
        &self,
        query: &str,
        search: &dyn CatalogSearch,
    ) -> Result<Vec<TrackRecord>> {
        let query = query.trim();
        if query.is_empty() {
            bail!("No query provided");
        }
        let tracks = search.search_tracks(query, self.settings.limit, &self.settings.market)?;
        Ok(tracks.iter().map(TrackRecord::from).collect())
    }
}

/// Name matches by substring (either way) or word similarity; the artist, if
/// one was searched for, must match one of the track's artists by substring.
fn is_verified_match(track: &CatalogTrack, song: &str, artist: &str) -> bool {
    let song = song.to_lowercase();
    let artist = artist.to_lowercase();
    let name = track.name.to_lowercase();

    let name_match = name.contains(&song)
        || song.contains(&name)
        || word_similarity(&song, &name) > NAME_SIMILARITY_THRESHOLD;

    let artist_match = artist.is_empty()
        || track.artist_names().any(|candidate| {
            let candidate = candidate.to_lowercase();
            candidate.contains(&artist) || artist.contains(&candidate)
        });

    name_match && artist_match
}
