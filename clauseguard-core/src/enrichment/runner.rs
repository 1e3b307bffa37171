use super::service::{EnrichmentRequest, EnrichmentService};
use crate::cache::{EnrichmentCacheKey, EnrichmentCacheValue};
use crate::config::EnrichmentConfig;
use crate::error::EnrichmentError;
use crate::storage::EnrichmentCache;
use crate::types::{Clause, ClauseType, Enrichment};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

// Longest single sleep while waiting on the rate limiter, so cancellation is noticed promptly
const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Cooperative cancellation flag shared between the caller and a running batch.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Enforces a minimum interval between successive service calls.
#[derive(Debug)]
pub struct FixedDelayLimiter {
    min_interval: Duration,
    last_call: Option<Instant>,
}

impl FixedDelayLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: None,
        }
    }

    /// Block until the next call is allowed. Returns `Cancelled` if the token
    /// fires while waiting.
    pub fn wait(&mut self, cancel: &CancellationToken) -> Result<(), EnrichmentError> {
        if let Some(last) = self.last_call {
            let ready_at = last + self.min_interval;
            loop {
                if cancel.is_cancelled() {
                    return Err(EnrichmentError::Cancelled);
                }
                let now = Instant::now();
                if now >= ready_at {
                    break;
                }
                thread::sleep((ready_at - now).min(CANCEL_POLL_INTERVAL));
            }
        }
        self.last_call = Some(Instant::now());
        Ok(())
    }
}

/// Per-batch enrichment outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentStats {
    /// Enriched by a fresh service call
    pub enriched: usize,
    /// Enriched from the cache
    pub cached: usize,
    pub failed: usize,
    /// Already enriched or blank
    pub skipped: usize,
    pub cancelled: bool,
}

impl EnrichmentStats {
    /// `Err(Cancelled)` when the batch stopped early.
    pub fn into_result(self) -> Result<Self, EnrichmentError> {
        if self.cancelled {
            Err(EnrichmentError::Cancelled)
        } else {
            Ok(self)
        }
    }
}

/// Drives an enrichment service over a list of clauses with caching, rate
/// limiting, a per-call timeout and cancellation.
pub struct EnrichmentRunner<'a> {
    service: Arc<dyn EnrichmentService>,
    cache: &'a dyn EnrichmentCache,
    request: EnrichmentRequest,
    timeout: Duration,
    limiter: FixedDelayLimiter,
}

impl<'a> EnrichmentRunner<'a> {
    pub fn new(
        service: Arc<dyn EnrichmentService>,
        cache: &'a dyn EnrichmentCache,
        config: &EnrichmentConfig,
    ) -> Self {
        Self {
            service,
            cache,
            request: EnrichmentRequest::from(config),
            timeout: Duration::from_millis(config.timeout_ms),
            limiter: FixedDelayLimiter::new(Duration::from_millis(config.min_request_interval_ms)),
        }
    }

    /// Enrich clauses in order. Clauses enriched before a cancellation keep
    /// their overlay; failures are logged and leave the clause unchanged.
    pub fn enrich_clauses(&mut self, clauses: &mut [Clause], cancel: &CancellationToken) -> EnrichmentStats {
        let mut stats = EnrichmentStats::default();

        for clause in clauses.iter_mut() {
            if cancel.is_cancelled() {
                stats.cancelled = true;
                break;
            }
            if clause.enrichment.is_some() || clause.text.trim().is_empty() {
                stats.skipped += 1;
                continue;
            }

            let key = EnrichmentCacheKey::new(
                &clause.text,
                self.service.name(),
                self.request.target_language.as_deref(),
            );
            if let Some(cached) = self.lookup(&key) {
                clause.enrichment = Some(cached.enrichment);
                stats.cached += 1;
                continue;
            }

            if let Err(e) = self.limiter.wait(cancel) {
                tracing::debug!(error = %e, "stopped while waiting on rate limiter");
                stats.cancelled = true;
                break;
            }

            match self.call_with_timeout(&clause.text, clause.clause_type) {
                Ok(enrichment) if !enrichment.is_empty() => {
                    if let Err(e) = self.cache.put(&key, &EnrichmentCacheValue::new(enrichment.clone())) {
                        tracing::warn!(error = %e, "failed to store enrichment in cache");
                    }
                    clause.enrichment = Some(enrichment);
                    stats.enriched += 1;
                }
                Ok(_) => {
                    tracing::warn!(clause_id = clause.id, service = self.service.name(), "service returned an empty enrichment");
                    stats.failed += 1;
                }
                Err(EnrichmentError::Cancelled) => {
                    stats.cancelled = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!(clause_id = clause.id, service = self.service.name(), error = %e, "enrichment failed");
                    stats.failed += 1;
                }
            }
        }

        tracing::info!(
            enriched = stats.enriched,
            cached = stats.cached,
            failed = stats.failed,
            skipped = stats.skipped,
            cancelled = stats.cancelled,
            "enrichment finished"
        );
        stats
    }

    fn lookup(&self, key: &EnrichmentCacheKey) -> Option<EnrichmentCacheValue> {
        match self.cache.get(key) {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!(error = %e, "enrichment cache read failed, treating as miss");
                None
            }
        }
    }

    /// Runs the service on a worker thread. A call that outlives the timeout is
    /// abandoned; its result is dropped when it eventually arrives.
    fn call_with_timeout(&self, text: &str, clause_type: ClauseType) -> Result<Enrichment, EnrichmentError> {
        let service = Arc::clone(&self.service);
        let request = self.request.clone();
        let text = text.to_string();
        let (tx, rx) = mpsc::channel();

        thread::Builder::new()
            .name("clauseguard-enrich".to_string())
            .spawn(move || {
                let _ = tx.send(service.enrich(&text, clause_type, &request));
            })
            .map_err(|e| EnrichmentError::Other(format!("failed to spawn enrichment worker: {e}")))?;

        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(EnrichmentError::Timeout(self.timeout)),
            Err(RecvTimeoutError::Disconnected) => {
                Err(EnrichmentError::Other("enrichment worker exited without a result".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::PatternSimplifier;
    use crate::storage::MemoryCache;
    use crate::types::{Importance, RiskAssessment};
    use std::sync::atomic::AtomicUsize;

    fn clauses(texts: &[&str]) -> Vec<Clause> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                Clause::new(i + 1, text, ClauseType::General, Importance::Low, RiskAssessment::degraded("test"))
            })
            .collect()
    }

    fn fast_config() -> EnrichmentConfig {
        EnrichmentConfig {
            enabled: true,
            timeout_ms: 1_000,
            min_request_interval_ms: 0,
            ..EnrichmentConfig::default()
        }
    }

    struct CountingService {
        calls: AtomicUsize,
    }

    impl EnrichmentService for CountingService {
        fn enrich(&self, text: &str, _: ClauseType, _: &EnrichmentRequest) -> Result<Enrichment, EnrichmentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Enrichment {
                simplified: Some(text.to_uppercase()),
                method: "counting".to_string(),
                ..Enrichment::default()
            })
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    #[test]
    fn test_limiter_enforces_interval() {
        let mut limiter = FixedDelayLimiter::new(Duration::from_millis(60));
        let token = CancellationToken::new();
        let start = Instant::now();
        limiter.wait(&token).unwrap();
        limiter.wait(&token).unwrap();
        assert!(start.elapsed() >= Duration::from_millis(60));
    }

    #[test]
    fn test_limiter_observes_cancellation() {
        let mut limiter = FixedDelayLimiter::new(Duration::from_secs(60));
        let token = CancellationToken::new();
        limiter.wait(&token).unwrap();
        token.cancel();
        assert_eq!(limiter.wait(&token), Err(EnrichmentError::Cancelled));
    }

    #[test]
    fn test_simplifier_enriches_every_clause() {
        let cache = MemoryCache::new();
        let mut runner = EnrichmentRunner::new(Arc::new(PatternSimplifier::new()), &cache, &fast_config());
        let mut batch = clauses(&["The party shall pay.", "   ", "Prior to delivery the Buyer may inspect."]);
        let stats = runner.enrich_clauses(&mut batch, &CancellationToken::new());

        assert_eq!(stats.enriched, 2);
        assert_eq!(stats.skipped, 1);
        assert_eq!(cache.len(), 2);
        assert!(batch[1].enrichment.is_none());
        assert_eq!(
            batch[2].enrichment.as_ref().and_then(|e| e.simplified.as_deref()),
            Some("Before delivery the Buyer can inspect.")
        );
    }

    #[test]
    fn test_second_run_hits_cache() {
        let cache = MemoryCache::new();
        let service = Arc::new(CountingService { calls: AtomicUsize::new(0) });
        let mut batch = clauses(&["first clause", "second clause"]);
        EnrichmentRunner::new(service.clone(), &cache, &fast_config())
            .enrich_clauses(&mut batch, &CancellationToken::new());

        let mut again = clauses(&["first clause", "second clause"]);
        let stats = EnrichmentRunner::new(service.clone(), &cache, &fast_config())
            .enrich_clauses(&mut again, &CancellationToken::new());
        assert_eq!(stats.cached, 2);
        assert_eq!(stats.enriched, 0);
        assert_eq!(service.calls.load(Ordering::SeqCst), 2);
        assert_eq!(again[0].enrichment, batch[0].enrichment);
    }

    #[test]
    fn test_cancelled_before_start() {
        let cache = MemoryCache::new();
        let token = CancellationToken::new();
        token.cancel();
        let mut batch = clauses(&["first clause"]);
        let stats = EnrichmentRunner::new(Arc::new(PatternSimplifier::new()), &cache, &fast_config())
            .enrich_clauses(&mut batch, &token);
        assert!(stats.cancelled);
        assert!(batch[0].enrichment.is_none());
        assert_eq!(stats.into_result(), Err(EnrichmentError::Cancelled));
    }
}
