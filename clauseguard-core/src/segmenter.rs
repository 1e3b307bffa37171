use crate::config::SegmentationConfig;
use crate::error::ConfigError;
use crate::rules::{Fragment, RuleEngine};
use std::sync::LazyLock;

static DEFAULT_SEGMENTER: LazyLock<Segmenter> =
    LazyLock::new(|| Segmenter::new(&SegmentationConfig::default()).unwrap());

/// Splits normalized text into clause-sized fragments in document order.
pub struct Segmenter {
    engine: RuleEngine,
}

impl Segmenter {
    pub fn new(config: &SegmentationConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            engine: RuleEngine::new(config)?,
        })
    }

    pub fn segment(&self, text: &str) -> Vec<String> {
        self.segment_fragments(text)
            .into_iter()
            .map(|fragment| fragment.text)
            .collect()
    }

    /// Like `segment`, keeping where each boundary came from.
    pub fn segment_fragments(&self, text: &str) -> Vec<Fragment> {
        let fragments = self.engine.apply_rules(text);
        tracing::debug!(clauses = fragments.len(), "segmented text");
        fragments
    }
}

/// Segment with the default header patterns and length limits.
/// The input is not normalized first.
pub fn segment(text: &str) -> Vec<String> {
    DEFAULT_SEGMENTER.segment(text)
}
