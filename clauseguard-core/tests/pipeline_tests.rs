//! End-to-end pipeline tests.
//!
//! Drive the public API the way a caller would: raw text in, report out.
//! Per-stage behavior is covered by the unit tests next to each module;
//! these assert the properties that only hold across the whole pipeline:
//!
//! - Worked contracts: segmentation, labels and verdicts on known inputs
//! - Structural invariants: ordering, coverage, counts, determinism
//! - Enrichment: caching, cancellation and failure isolation
//! - Configuration: YAML overrides and rejection of bad rules

use clauseguard_core::config::AnalysisConfig;
use clauseguard_core::enrichment::{
    CancellationToken, EnrichmentRequest, EnrichmentRunner, EnrichmentService, PatternSimplifier,
};
use clauseguard_core::extractors::{CompositeExtractor, PlainTextExtractor};
use clauseguard_core::storage::{FileCache, MemoryCache, NoOpCache};
use clauseguard_core::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Fixtures
// ============================================================================

const NUMBERED_CONTRACT: &str = "1. LIABILITY: The Contractor shall be liable for unlimited damages. \
    2. TERMINATION: This agreement may be terminated with 30 days notice. \
    3. WARRANTY: Standard warranties apply as per industry practice.";

const SERVICE_AGREEMENT: &str = "SERVICE AGREEMENT\n\
    Page 1 of 2\n\
    SECTION 1 The Supplier shall deliver the services described in Schedule A with reasonable care.\n\
    SECTION 2 The Customer shall pay each invoice within thirty days of receipt of the invoice.\n\
    Page 2 of 2\n\
    SECTION 3 Either party may terminate this agreement on sixty days written notice to the other.\n\
    SECTION 4 This agreement is governed by the laws of the State of New York and its courts.";

fn processor() -> DocumentProcessor {
    DocumentProcessor::default()
}

fn fast_enrichment() -> config::EnrichmentConfig {
    config::EnrichmentConfig {
        enabled: true,
        timeout_ms: 1_000,
        min_request_interval_ms: 0,
        ..config::EnrichmentConfig::default()
    }
}

fn scored(id: usize, level: RiskLevel, score: u32) -> Clause {
    let risk = RiskAssessment {
        risk_level: level,
        risk_score: score,
        risk_factors: Vec::new(),
        warnings: Vec::new(),
        recommendations: Vec::new(),
        color: level.color(),
    };
    Clause::new(id, "clause body text", ClauseType::General, Importance::Low, risk)
}

// ============================================================================
// Worked contracts
// ============================================================================

mod worked_contracts {
    use super::*;

    #[test]
    fn numbered_contract_yields_three_labelled_clauses() {
        let report = processor().analyze_text(NUMBERED_CONTRACT, None).unwrap();
        assert!(!report.used_fallback_clause);
        assert_eq!(report.clauses.len(), 3);

        let liability = &report.clauses[0];
        assert_eq!(liability.clause_type, ClauseType::Liability);
        assert_eq!(liability.importance, Importance::High);
        assert_eq!(liability.risk_level(), RiskLevel::High);
        assert!(liability.risk.risk_factors.contains(&"Unlimited Liability".to_string()));

        let termination = &report.clauses[1];
        assert_eq!(termination.clause_type, ClauseType::Termination);
        assert!(matches!(termination.risk_level(), RiskLevel::Medium | RiskLevel::Low));

        assert_eq!(report.clauses[2].clause_type, ClauseType::Warranty);
        assert_eq!(report.summary.overall_risk, RiskLevel::High);
        assert_eq!(report.summary.overall_color, RiskColor::Red);
    }

    #[test]
    fn plain_definition_is_general_and_low() {
        let clause = classify_and_score("standard business day definitions apply");
        assert_eq!(clause.clause_type, ClauseType::General);
        assert_eq!(clause.importance, Importance::Low);
        assert_eq!(clause.risk_score(), 0);
        assert_eq!(clause.risk_level(), RiskLevel::Low);
        assert!(clause.risk.warnings.is_empty());
    }

    #[test]
    fn broad_indemnity_scores_each_signal_once() {
        let clause = classify_and_score(
            "The Supplier shall indemnify the Customer from all losses and hold harmless the Customer at all times.",
        );
        assert_eq!(clause.clause_type, ClauseType::Liability);
        assert_eq!(clause.importance, Importance::High);
        // pattern 30 + two high-risk keywords 40 + liability 20 + high importance 15
        assert_eq!(clause.risk_score(), 105);
        assert_eq!(
            clause.risk.risk_factors,
            vec!["Broad Indemnity", "Indemnify", "Hold Harmless"]
        );
        assert_eq!(clause.risk.warnings.len(), 3);
    }

    #[test]
    fn empty_text_segments_to_nothing_and_falls_back_to_one_clause() {
        assert!(segment("").is_empty());

        let (clauses, used_fallback) = processor().build_clauses("");
        assert!(used_fallback);
        assert_eq!(clauses.len(), 1);
        assert_eq!(clauses[0].id, 1);
        assert_eq!(clauses[0].text, "");
        assert_eq!(clauses[0].clause_type, ClauseType::General);
        assert_eq!(clauses[0].importance, Importance::Medium);
    }

    #[test]
    fn one_high_clause_decides_the_batch() {
        let mut clauses = vec![scored(1, RiskLevel::High, 55)];
        clauses.push(scored(2, RiskLevel::Medium, 30));
        clauses.push(scored(3, RiskLevel::Medium, 25));
        clauses.extend((4..=10).map(|id| scored(id, RiskLevel::Low, id as u32)));

        let summary = aggregate(&clauses);
        let expected = (55 + 30 + 25 + (4..=10).sum::<u32>()) as f64 / 10.0;
        assert_eq!(summary.average_risk_score, expected);
        assert_eq!(summary.high_risk_count, 1);
        assert_eq!(summary.medium_risk_count, 2);
        assert_eq!(summary.low_risk_count, 7);
        assert_eq!(summary.overall_risk, RiskLevel::High);
    }

    #[test]
    fn pagination_noise_is_stripped_before_segmentation() {
        let report = processor().analyze_text(SERVICE_AGREEMENT, Some("agreement.txt")).unwrap();
        assert_eq!(report.clauses.len(), 4);
        for clause in &report.clauses {
            assert!(!clause.text.contains("Page 1 of 2"));
            assert!(!clause.text.contains("Page 2 of 2"));
        }
        assert!(report.clauses[0].text.starts_with("SECTION 1"));
        assert_eq!(report.clauses[1].clause_type, ClauseType::Financial);
        assert_eq!(report.clauses[2].clause_type, ClauseType::Termination);
        assert_eq!(report.clauses[3].clause_type, ClauseType::DisputeResolution);
    }
}

// ============================================================================
// Structural invariants
// ============================================================================

mod invariants {
    use super::*;

    #[test]
    fn clauses_are_ordered_and_cover_normalized_text() {
        let processor = processor();
        let normalized = processor.normalize(SERVICE_AGREEMENT);
        let report = processor.analyze_text(SERVICE_AGREEMENT, None).unwrap();

        let mut cursor = 0;
        for (i, clause) in report.clauses.iter().enumerate() {
            assert_eq!(clause.id, i + 1);
            let offset = normalized[cursor..]
                .find(clause.text.as_str())
                .expect("clause text is a slice of the normalized document, in order");
            cursor += offset + clause.text.len();
        }
    }

    #[test]
    fn every_clause_is_longer_than_the_noise_floor() {
        let report = processor().analyze_text(SERVICE_AGREEMENT, None).unwrap();
        assert!(report.clauses.iter().all(|c| c.text.trim().chars().count() > 50));
    }

    #[test]
    fn analysis_is_deterministic() {
        let processor = processor();
        let first = processor.analyze_text(NUMBERED_CONTRACT, None).unwrap();
        let second = processor.analyze_text(NUMBERED_CONTRACT, None).unwrap();
        assert_eq!(first.clauses, second.clauses);
        assert_eq!(first.summary, second.summary);
        assert_eq!(first.config_fingerprint, second.config_fingerprint);
        assert_ne!(first.document_id, second.document_id);
    }

    #[test]
    fn level_counts_add_up() {
        let report = processor().analyze_text(SERVICE_AGREEMENT, None).unwrap();
        let summary = &report.summary;
        assert_eq!(
            summary.high_risk_count + summary.medium_risk_count + summary.low_risk_count,
            summary.total_clauses
        );
        assert_eq!(report.distribution.total_clauses, summary.total_clauses);
    }

    #[test]
    fn protective_language_never_goes_negative() {
        let clause = classify_and_score(
            "The parties agree to mutual and reciprocal obligations with reasonable notice and a grace period.",
        );
        assert_eq!(clause.risk_level(), RiskLevel::Low);
        assert!(clause.risk_score() < 25);
    }

    #[test]
    fn adding_a_high_clause_never_lowers_the_verdict() {
        let base: Vec<Clause> = (1..=5).map(|id| scored(id, RiskLevel::Low, 5)).collect();
        let before = aggregate(&base).overall_risk;

        let mut worse = base.clone();
        worse.push(scored(6, RiskLevel::High, 80));
        let after = aggregate(&worse).overall_risk;

        assert!(after >= before);
        assert_eq!(after, RiskLevel::High);
    }

    #[test]
    fn report_serializes_to_json() {
        let report = processor().analyze_text(NUMBERED_CONTRACT, Some("contract.txt")).unwrap();
        let json = report.to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["schema_version"], SCHEMA_VERSION);
        assert_eq!(value["clauses"].as_array().unwrap().len(), 3);
        assert_eq!(value["summary"]["overall_risk"], "high");
    }
}

// ============================================================================
// Files
// ============================================================================

mod files {
    use super::*;

    #[test]
    fn analyze_plain_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contract.txt");
        std::fs::write(&path, NUMBERED_CONTRACT).unwrap();

        let report = processor()
            .analyze_file(&path, &CompositeExtractor::with_defaults())
            .unwrap();
        assert_eq!(report.clauses.len(), 3);
        assert!(report.source.unwrap().ends_with("contract.txt"));
    }

    #[test]
    fn empty_file_is_no_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.txt");
        std::fs::write(&path, "  \n\n ").unwrap();

        let result = processor().analyze_file(&path, &PlainTextExtractor::new());
        assert!(matches!(result, Err(AnalysisError::NoText)));
    }

    #[test]
    fn unsupported_extension_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contract.docx");
        std::fs::write(&path, "binary").unwrap();

        let result = processor().analyze_file(&path, &CompositeExtractor::with_defaults());
        assert!(matches!(
            result,
            Err(AnalysisError::Extraction(ExtractionError::UnsupportedFormat(_)))
        ));
    }
}

// ============================================================================
// Enrichment
// ============================================================================

mod enrichment {
    use super::*;

    struct FailingService;

    impl EnrichmentService for FailingService {
        fn enrich(&self, _: &str, _: ClauseType, _: &EnrichmentRequest) -> Result<Enrichment, EnrichmentError> {
            Err(EnrichmentError::ServiceUnavailable("offline".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct SlowService {
        delay: Duration,
        calls: AtomicUsize,
    }

    impl EnrichmentService for SlowService {
        fn enrich(&self, text: &str, _: ClauseType, _: &EnrichmentRequest) -> Result<Enrichment, EnrichmentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(self.delay);
            Ok(Enrichment {
                simplified: Some(text.to_string()),
                method: "slow".to_string(),
                ..Enrichment::default()
            })
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    #[test]
    fn enrichment_adds_overlay_without_touching_scores() {
        let mut report = processor().analyze_text(NUMBERED_CONTRACT, None).unwrap();
        let before = report.clauses.clone();

        let cache = MemoryCache::new();
        let stats = EnrichmentRunner::new(Arc::new(PatternSimplifier::new()), &cache, &fast_enrichment())
            .enrich_clauses(&mut report.clauses, &CancellationToken::new());

        assert_eq!(stats.enriched, 3);
        for (enriched, original) in report.clauses.iter().zip(&before) {
            assert!(enriched.enrichment.is_some());
            assert_eq!(enriched.text, original.text);
            assert_eq!(enriched.risk, original.risk);
            assert_eq!(enriched.clause_type, original.clause_type);
        }
    }

    #[test]
    fn file_cache_serves_the_second_run() {
        let dir = tempfile::tempdir().unwrap();
        let service = Arc::new(SlowService {
            delay: Duration::from_millis(1),
            calls: AtomicUsize::new(0),
        });

        let report = processor().analyze_text(NUMBERED_CONTRACT, None).unwrap();
        let mut first = report.clauses.clone();
        let cache = FileCache::new(dir.path()).unwrap();
        EnrichmentRunner::new(service.clone(), &cache, &fast_enrichment())
            .enrich_clauses(&mut first, &CancellationToken::new());

        let mut second = report.clauses.clone();
        let reopened = FileCache::new(dir.path()).unwrap();
        let stats = EnrichmentRunner::new(service.clone(), &reopened, &fast_enrichment())
            .enrich_clauses(&mut second, &CancellationToken::new());

        assert_eq!(stats.cached, 3);
        assert_eq!(service.calls.load(Ordering::SeqCst), 3);
        assert_eq!(first, second);
    }

    #[test]
    fn failing_service_leaves_clauses_unchanged() {
        let mut report = processor().analyze_text(NUMBERED_CONTRACT, None).unwrap();
        let before = report.clauses.clone();

        let stats = EnrichmentRunner::new(Arc::new(FailingService), &NoOpCache, &fast_enrichment())
            .enrich_clauses(&mut report.clauses, &CancellationToken::new());

        assert_eq!(stats.failed, 3);
        assert_eq!(report.clauses, before);
        assert!(stats.into_result().is_ok());
    }

    #[test]
    fn slow_service_times_out_per_clause() {
        let mut report = processor().analyze_text(NUMBERED_CONTRACT, None).unwrap();
        let config = config::EnrichmentConfig {
            timeout_ms: 20,
            ..fast_enrichment()
        };
        let service = Arc::new(SlowService {
            delay: Duration::from_millis(300),
            calls: AtomicUsize::new(0),
        });

        let stats = EnrichmentRunner::new(service, &NoOpCache, &config)
            .enrich_clauses(&mut report.clauses[..1], &CancellationToken::new());

        assert_eq!(stats.failed, 1);
        assert!(report.clauses[0].enrichment.is_none());
    }

    #[test]
    fn cancellation_keeps_completed_overlays() {
        let mut report = processor().analyze_text(NUMBERED_CONTRACT, None).unwrap();
        let config = config::EnrichmentConfig {
            min_request_interval_ms: 60_000,
            ..fast_enrichment()
        };
        let token = CancellationToken::new();
        let canceller = token.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(100));
            canceller.cancel();
        });

        let stats = EnrichmentRunner::new(Arc::new(PatternSimplifier::new()), &NoOpCache, &config)
            .enrich_clauses(&mut report.clauses, &token);
        handle.join().unwrap();

        // the first call goes through, the second waits on the limiter until cancelled
        assert!(stats.cancelled);
        assert_eq!(stats.enriched, 1);
        assert!(report.clauses[0].enrichment.is_some());
        assert!(report.clauses[1].enrichment.is_none());
        assert!(report.clauses[2].enrichment.is_none());
    }
}

// ============================================================================
// Configuration
// ============================================================================

mod configuration {
    use super::*;

    #[test]
    fn yaml_round_trip_keeps_fingerprint() {
        let config = AnalysisConfig::default();
        let yaml = config.to_yaml().unwrap();
        let reloaded = AnalysisConfig::from_yaml(&yaml).unwrap();
        assert_eq!(reloaded, config);
        assert_eq!(reloaded.fingerprint().unwrap(), config.fingerprint().unwrap());
    }

    #[test]
    fn partial_yaml_overrides_thresholds() {
        let config = AnalysisConfig::from_yaml("scoring:\n  thresholds:\n    high: 200\n    medium: 100\n").unwrap();
        let processor = DocumentProcessor::new(config).unwrap();
        let report = processor.analyze_text(NUMBERED_CONTRACT, None).unwrap();
        assert!(report.clauses.iter().all(|c| c.risk_level() == RiskLevel::Low));
        assert_ne!(report.config_fingerprint, super::processor().config_fingerprint());
    }

    #[test]
    fn invalid_regex_is_rejected_at_construction() {
        let yaml = "scoring:\n  patterns:\n    - name: broken\n      pattern: \"(unclosed\"\n      warning: never used\n";
        let config = AnalysisConfig::from_yaml(yaml).unwrap();
        assert!(matches!(
            DocumentProcessor::new(config),
            Err(ConfigError::InvalidPattern { ref name, .. }) if name == "broken"
        ));
    }

    #[test]
    fn inverted_thresholds_fail_validation() {
        let result = AnalysisConfig::from_yaml("scoring:\n  thresholds:\n    high: 10\n    medium: 40\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_config_file_falls_back_to_defaults() {
        let config = AnalysisConfig::load_with_fallback(Some(std::path::Path::new("/nonexistent/clauseguard.yaml")));
        assert_eq!(config, AnalysisConfig::default());
    }
}
