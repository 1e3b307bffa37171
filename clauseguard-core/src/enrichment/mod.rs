//! Optional enrichment of scored clauses: plain-language rewrites,
//! explanations and translations from a pluggable service.
//!
//! Enrichment only ever adds the `enrichment` overlay to a clause. Scoring
//! never waits on it and a failing service leaves the report untouched.

pub mod runner;
pub mod service;
pub mod simplifier;

pub use runner::{CancellationToken, EnrichmentRunner, EnrichmentStats, FixedDelayLimiter};
pub use service::{EnrichmentRequest, EnrichmentService};
pub use simplifier::PatternSimplifier;
