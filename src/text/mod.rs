//! From raw recognized text to song pairs.

pub mod classifier;
pub mod cleaner;
pub mod pairing;

pub use classifier::LineClassifier;
pub use cleaner::clean_line;
pub use pairing::{dedup_pairs, PairingThresholds, SongPair, SongPairExtractor};
