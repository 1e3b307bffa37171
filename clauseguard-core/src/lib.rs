// ClauseGuard Core Library
//
// Splits legal documents into clauses, classifies them and scores contract risk
// with explainable heuristics. Main interface is `DocumentProcessor`.

pub mod types;
pub mod error;
pub mod config;
pub mod normalizer;
pub mod rules;
pub mod segmenter;
pub mod classifier;
pub mod risk;
pub mod aggregator;
pub mod processor;
pub mod extractors;
pub mod cache;
pub mod storage;
pub mod enrichment;

// Re-export main types and functions for easy use
pub use types::*;
pub use error::{AnalysisError, CacheError, ConfigError, EnrichmentError, ExtractionError, ScoringError};
pub use config::AnalysisConfig;
pub use processor::DocumentProcessor;
pub use classifier::ClauseClassifier;
pub use risk::RiskScorer;
pub use aggregator::{aggregate, distribution, RiskAggregator};
pub use normalizer::normalize;
pub use segmenter::segment;
pub use extractors::{CompositeExtractor, PlainTextExtractor, TextExtractor};
pub use storage::{EnrichmentCache, FileCache, MemoryCache, NoOpCache};
pub use enrichment::{CancellationToken, EnrichmentRunner, EnrichmentService, PatternSimplifier};

#[cfg(feature = "pdf")]
pub use extractors::PdfExtractor;

use std::sync::LazyLock;

static DEFAULT_PROCESSOR: LazyLock<DocumentProcessor> = LazyLock::new(DocumentProcessor::default);

/// Classify and score one piece of text with the default configuration.
pub fn classify_and_score(text: &str) -> Clause {
    DEFAULT_PROCESSOR.classify_and_score(text, None, 1)
}

/// Analyze text with the default configuration.
pub fn analyze_text(text: &str) -> Result<DocumentReport, AnalysisError> {
    DEFAULT_PROCESSOR.analyze_text(text, None)
}
