use crate::config::SegmentationConfig;
use crate::error::ConfigError;
use serde::Serialize;
use std::time::Instant;

use super::header_detection::HeaderSplitRule;
use super::sentence_chunking::{NoiseFilterRule, SentenceFallbackRule};

/// Where a fragment boundary came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentOrigin {
    /// The whole input, before any rule ran
    Document,
    /// Text ahead of the first header
    Preamble,
    /// Opened by the named header pattern
    Header(String),
    /// A blank-line separated paragraph
    Paragraph,
    /// Sentences re-accumulated from an overlong paragraph
    SentenceChunk,
}

/// A candidate clause: a slice of the segmented text plus its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fragment {
    pub text: String,
    pub origin: FragmentOrigin,
}

impl Fragment {
    pub fn new(text: impl Into<String>, origin: FragmentOrigin) -> Self {
        Self {
            text: text.into(),
            origin,
        }
    }

    pub fn trimmed_len(&self) -> usize {
        self.text.trim().chars().count()
    }
}

// Sequential rule pipeline infrastructure
pub trait SegmentRule: Send + Sync {
    /// `source` is the full text being segmented; rules that re-split from
    /// scratch read it instead of the incoming fragments.
    fn apply(&self, source: &str, fragments: Vec<Fragment>) -> Vec<Fragment>;
    fn name(&self) -> &str;
}

/// Runs the segmentation rules in order over one text.
pub struct RuleEngine {
    rules: Vec<Box<dyn SegmentRule>>,
}

impl RuleEngine {
    /// Header split, then paragraph/sentence fallback, then the noise filter.
    pub fn new(config: &SegmentationConfig) -> Result<Self, ConfigError> {
        let rules: Vec<Box<dyn SegmentRule>> = vec![
            Box::new(HeaderSplitRule::new(&config.header_patterns)?),
            Box::new(SentenceFallbackRule::new(config)),
            Box::new(NoiseFilterRule::new(config.min_clause_chars)),
        ];
        Ok(Self { rules })
    }

    pub fn with_rules(rules: Vec<Box<dyn SegmentRule>>) -> Self {
        Self { rules }
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn apply_rules(&self, text: &str) -> Vec<Fragment> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let mut fragments = vec![Fragment::new(text, FragmentOrigin::Document)];
        for rule in &self.rules {
            let rule_start = Instant::now();
            fragments = rule.apply(text, fragments);
            tracing::trace!(
                rule = rule.name(),
                fragments = fragments.len(),
                elapsed_us = rule_start.elapsed().as_micros() as u64,
                "segmentation rule applied"
            );
        }
        fragments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SplitOnPipe;

    impl SegmentRule for SplitOnPipe {
        fn apply(&self, _source: &str, fragments: Vec<Fragment>) -> Vec<Fragment> {
            fragments
                .into_iter()
                .flat_map(|f| {
                    f.text
                        .split('|')
                        .map(|part| Fragment::new(part, FragmentOrigin::Paragraph))
                        .collect::<Vec<_>>()
                })
                .collect()
        }

        fn name(&self) -> &str {
            "SplitOnPipe"
        }
    }

    #[test]
    fn test_default_rule_order() {
        let engine = RuleEngine::new(&SegmentationConfig::default()).unwrap();
        assert_eq!(
            engine.rule_names(),
            vec!["HeaderSplit", "SentenceFallback", "NoiseFilter"]
        );
    }

    #[test]
    fn test_custom_rules_run_in_sequence() {
        let engine = RuleEngine::with_rules(vec![
            Box::new(SplitOnPipe),
            Box::new(NoiseFilterRule::new(3)),
        ]);
        let fragments = engine.apply_rules("alpha|ok|gamma");
        let texts: Vec<_> = fragments.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, vec!["alpha", "gamma"]);
    }

    #[test]
    fn test_blank_input_yields_nothing() {
        let engine = RuleEngine::new(&SegmentationConfig::default()).unwrap();
        assert!(engine.apply_rules("").is_empty());
        assert!(engine.apply_rules("   \n ").is_empty());
    }
}
