use crate::cache::{EnrichmentCacheKey, EnrichmentCacheValue};
use crate::error::CacheError;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Storage abstraction for enrichment results.
///
/// Owned by the caller and injected into the enrichment runner; the core keeps
/// no process-wide cache of its own.
pub trait EnrichmentCache: Send + Sync {
    fn get(&self, key: &EnrichmentCacheKey) -> Result<Option<EnrichmentCacheValue>, CacheError>;
    fn put(&self, key: &EnrichmentCacheKey, value: &EnrichmentCacheValue) -> Result<(), CacheError>;
}

/// In-memory cache for a single session
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, EnrichmentCacheValue>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EnrichmentCache for MemoryCache {
    fn get(&self, key: &EnrichmentCacheKey) -> Result<Option<EnrichmentCacheValue>, CacheError> {
        let entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        Ok(entries.get(&key.to_cache_hash()).cloned())
    }

    fn put(&self, key: &EnrichmentCacheKey, value: &EnrichmentCacheValue) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        entries.insert(key.to_cache_hash(), value.clone());
        Ok(())
    }
}

/// File-based cache: one JSON file per entry in a local directory
pub struct FileCache {
    cache_dir: PathBuf,
}

impl FileCache {
    pub fn new(cache_dir: impl AsRef<Path>) -> Result<Self, CacheError> {
        let cache_dir = cache_dir.as_ref().join("enrichment");
        // Ensure cache directory exists
        fs::create_dir_all(&cache_dir).map_err(|source| CacheError::Io {
            path: cache_dir.clone(),
            source,
        })?;
        Ok(Self { cache_dir })
    }

    fn entry_path(&self, key: &EnrichmentCacheKey) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key.to_cache_hash()))
    }
}

impl EnrichmentCache for FileCache {
    fn get(&self, key: &EnrichmentCacheKey) -> Result<Option<EnrichmentCacheValue>, CacheError> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let json_str = fs::read_to_string(&path).map_err(|source| CacheError::Io { path, source })?;
        Ok(Some(serde_json::from_str(&json_str)?))
    }

    fn put(&self, key: &EnrichmentCacheKey, value: &EnrichmentCacheValue) -> Result<(), CacheError> {
        let path = self.entry_path(key);
        let json_str = serde_json::to_string_pretty(value)?;
        fs::write(&path, json_str).map_err(|source| CacheError::Io { path, source })?;
        Ok(())
    }
}

/// No-op cache that never stores anything
pub struct NoOpCache;

impl EnrichmentCache for NoOpCache {
    fn get(&self, _key: &EnrichmentCacheKey) -> Result<Option<EnrichmentCacheValue>, CacheError> {
        Ok(None)
    }

    fn put(&self, _key: &EnrichmentCacheKey, _value: &EnrichmentCacheValue) -> Result<(), CacheError> {
        Ok(())
    }
}
