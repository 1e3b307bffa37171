use crate::config::EnrichmentConfig;
use crate::error::EnrichmentError;
use crate::types::{ClauseType, Enrichment};

/// What the caller wants back from a service for one clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentRequest {
    pub simplify: bool,
    pub explain: bool,
    /// Translate into this language when set
    pub target_language: Option<String>,
}

impl From<&EnrichmentConfig> for EnrichmentRequest {
    fn from(config: &EnrichmentConfig) -> Self {
        Self {
            simplify: config.simplify,
            explain: config.explain,
            target_language: config.target_language.clone(),
        }
    }
}

/// A simplification/translation backend.
///
/// Implementations receive their settings through their constructor and must
/// not read environment state on their own. Calls may be slow or fail; the
/// runner bounds them with a timeout and a rate limit.
pub trait EnrichmentService: Send + Sync {
    fn enrich(
        &self,
        text: &str,
        clause_type: ClauseType,
        request: &EnrichmentRequest,
    ) -> Result<Enrichment, EnrichmentError>;

    /// Service name, recorded as the enrichment method and part of the cache key
    fn name(&self) -> &str;
}
