// Segmentation rules. The engine runs them in order:
// - header_detection.rs: split at section, article, enumerator and topical headers
// - sentence_chunking.rs: paragraph/sentence fallback and the short-fragment filter
// - keywords.rs: word-start keyword matching shared with the classifier and scorer

pub mod engine;
pub mod header_detection;
pub mod keywords;
pub mod sentence_chunking;

pub use engine::*;
pub use header_detection::HeaderSplitRule;
pub use keywords::KeywordSet;
pub use sentence_chunking::{split_by_sentences, NoiseFilterRule, SentenceFallbackRule};
