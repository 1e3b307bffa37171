use crate::types::Enrichment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Version constants for cache invalidation
pub mod versions {
    pub const CLAUSEGUARD_VERSION: &str = "0.1.0";
    /// Bump when enrichment output for the same text may change
    pub const ENRICHMENT_VERSION: &str = "1.0.0";
}

/// Enrichment cache key: exact clause text + service + target language
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct EnrichmentCacheKey {
    pub text_hash: String,
    pub service: String,
    pub language: Option<String>,
    pub enrichment_version: String,
}

impl EnrichmentCacheKey {
    pub fn new(text: &str, service: &str, language: Option<&str>) -> Self {
        Self {
            text_hash: hash_text(text),
            service: service.to_string(),
            language: language.map(str::to_string),
            enrichment_version: versions::ENRICHMENT_VERSION.to_string(),
        }
    }

    /// Compute cache key hash for storage
    pub fn to_cache_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.text_hash);
        hasher.update(&self.service);
        hasher.update(self.language.as_deref().unwrap_or(""));
        hasher.update(&self.enrichment_version);
        format!("{:x}", hasher.finalize())
    }
}

/// Cached enrichment with metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrichmentCacheValue {
    pub enrichment: Enrichment,
    pub created_at: DateTime<Utc>,
    pub cache_version: String,
}

impl EnrichmentCacheValue {
    pub fn new(enrichment: Enrichment) -> Self {
        Self {
            enrichment,
            created_at: Utc::now(),
            cache_version: versions::CLAUSEGUARD_VERSION.to_string(),
        }
    }
}

/// SHA-256 of the exact clause text.
pub fn hash_text(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}
