use crate::aggregator::RiskAggregator;
use crate::classifier::ClauseClassifier;
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, ConfigError};
use crate::extractors::TextExtractor;
use crate::normalizer::TextNormalizer;
use crate::rules::Fragment;
use crate::segmenter::Segmenter;
use crate::risk::RiskScorer;
use crate::types::*;
use chrono::Utc;
use rayon::prelude::*;
use std::path::Path;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Captured intermediate outputs of normalization and segmentation.
/// Used for diagnostics: lets you inspect where each clause boundary came from.
#[derive(Debug, Clone)]
pub struct PipelineStages {
    pub normalized: String,
    pub fragments: Vec<Fragment>,
}

/// Simple profiler that collects timings for pipeline steps
pub struct StepProfiler {
    enabled: bool,
    timings: Vec<(String, Duration)>,
}

impl StepProfiler {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            timings: Vec::new(),
        }
    }

    pub fn time_step<F, R>(&mut self, step_name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if !self.enabled {
            return f();
        }

        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        self.timings.push((step_name.to_string(), elapsed));
        tracing::debug!(step = step_name, elapsed_ms = elapsed.as_millis() as u64, "step finished");

        result
    }

    pub fn timings(&self) -> &[(String, Duration)] {
        &self.timings
    }

    pub fn log_summary(&self) {
        if !self.enabled || self.timings.is_empty() {
            return;
        }

        let total: Duration = self.timings.iter().map(|(_, d)| *d).sum();
        for (step, duration) in &self.timings {
            let percentage = if total.is_zero() {
                0.0
            } else {
                (duration.as_secs_f64() / total.as_secs_f64()) * 100.0
            };
            tracing::info!(
                step = step.as_str(),
                elapsed_ms = duration.as_millis() as u64,
                share = format!("{percentage:.1}%"),
                "profile"
            );
        }
        tracing::info!(total_ms = total.as_millis() as u64, "profile total");
    }
}

/// Runs the full analysis pipeline: normalize, segment, classify, score, aggregate.
///
/// All rule sets are compiled once at construction; the processor itself is
/// immutable afterwards and can be shared across threads.
pub struct DocumentProcessor {
    config: AnalysisConfig,
    config_fingerprint: String,
    normalizer: TextNormalizer,
    segmenter: Segmenter,
    classifier: ClauseClassifier,
    scorer: RiskScorer,
    aggregator: RiskAggregator,
}

impl DocumentProcessor {
    pub fn new(config: AnalysisConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config_fingerprint: config.fingerprint()?,
            normalizer: TextNormalizer::new(config.normalizer.clone()),
            segmenter: Segmenter::new(&config.segmentation)?,
            classifier: ClauseClassifier::new(&config.classification)?,
            scorer: RiskScorer::new(&config.scoring)?,
            aggregator: RiskAggregator::new(
                config.aggregation.clone(),
                config.scoring.thresholds.clone(),
            ),
            config,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn config_fingerprint(&self) -> &str {
        &self.config_fingerprint
    }

    pub fn normalize(&self, raw: &str) -> String {
        self.normalizer.normalize(raw)
    }

    /// Normalize, then segment. Empty when nothing survives the noise filter.
    pub fn segment(&self, text: &str) -> Vec<String> {
        self.segmenter.segment(&self.normalizer.normalize(text))
    }

    pub fn segment_with_stages(&self, text: &str) -> PipelineStages {
        let normalized = self.normalizer.normalize(text);
        let fragments = self.segmenter.segment_fragments(&normalized);
        PipelineStages {
            normalized,
            fragments,
        }
    }

    /// Build one scored clause. `precomputed` skips the classifier when the
    /// type and importance are already known.
    pub fn classify_and_score(
        &self,
        text: &str,
        precomputed: Option<(ClauseType, Importance)>,
        id: usize,
    ) -> Clause {
        let text = text.trim();
        let (clause_type, importance) = precomputed.unwrap_or_else(|| self.classifier.classify(text));
        let risk = self.scorer.assess(text, clause_type, importance);
        Clause::new(id, text, clause_type, importance, risk)
    }

    /// Segment and score. Never returns an empty list: when segmentation finds
    /// nothing, the whole input becomes one general/medium clause. The flag
    /// reports whether that fallback was used.
    pub fn build_clauses(&self, text: &str) -> (Vec<Clause>, bool) {
        self.build_clauses_profiled(text, &mut StepProfiler::new(false))
    }

    fn build_clauses_profiled(&self, text: &str, profiler: &mut StepProfiler) -> (Vec<Clause>, bool) {
        let normalized = profiler.time_step("Normalize", || self.normalizer.normalize(text));
        let fragments = profiler.time_step("Segment", || self.segmenter.segment(&normalized));

        if fragments.is_empty() {
            tracing::debug!("segmentation produced no clauses, using whole document");
            let risk = self.scorer.assess(text, ClauseType::General, Importance::Medium);
            return (vec![Clause::whole_document(text, risk)], true);
        }

        let clauses = profiler.time_step("Classify & Score", || {
            if self.config.processing.parallel {
                fragments
                    .par_iter()
                    .enumerate()
                    .map(|(i, fragment)| self.classify_and_score(fragment, None, i + 1))
                    .collect()
            } else {
                fragments
                    .iter()
                    .enumerate()
                    .map(|(i, fragment)| self.classify_and_score(fragment, None, i + 1))
                    .collect()
            }
        });
        (clauses, false)
    }

    /// Full analysis of already-extracted text.
    pub fn analyze_text(&self, text: &str, source: Option<&str>) -> Result<DocumentReport, AnalysisError> {
        if text.trim().is_empty() {
            return Err(AnalysisError::NoText);
        }

        let start_time = Instant::now();
        let mut profiler = StepProfiler::new(self.config.processing.profile);

        let (clauses, used_fallback_clause) = self.build_clauses_profiled(text, &mut profiler);
        let (summary, distribution) = profiler.time_step("Aggregate", || {
            (
                self.aggregator.aggregate(&clauses),
                self.aggregator.distribution(&clauses),
            )
        });

        profiler.log_summary();
        tracing::info!(
            source = source.unwrap_or("<text>"),
            clauses = clauses.len(),
            overall_risk = %summary.overall_risk,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "document analyzed"
        );

        Ok(DocumentReport {
            schema_version: SCHEMA_VERSION.to_string(),
            document_id: Uuid::new_v4(),
            source: source.map(str::to_string),
            analyzed_at: Utc::now(),
            config_fingerprint: self.config_fingerprint.clone(),
            used_fallback_clause,
            clauses,
            summary,
            distribution,
        })
    }

    /// Extract text with `extractor`, then analyze it. An extraction that
    /// yields only whitespace is `NoText`.
    pub fn analyze_file(&self, path: &Path, extractor: &dyn TextExtractor) -> Result<DocumentReport, AnalysisError> {
        tracing::info!(path = %path.display(), extractor = extractor.name(), "analyzing file");
        let text = extractor.extract(path)?;
        self.analyze_text(&text, Some(&path.display().to_string()))
    }
}

impl Default for DocumentProcessor {
    fn default() -> Self {
        Self::new(AnalysisConfig::default()).expect("default analysis config is valid")
    }
}
