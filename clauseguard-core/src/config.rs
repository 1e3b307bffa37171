use crate::error::ConfigError;
use crate::types::ClauseType;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Top-level configuration for one analysis run.
///
/// Every section has a default, so a YAML file only needs to list the
/// values it overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub normalizer: NormalizerConfig,
    #[serde(default)]
    pub segmentation: SegmentationConfig,
    #[serde(default)]
    pub classification: ClassificationConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub aggregation: AggregationConfig,
    #[serde(default)]
    pub processing: ProcessingConfig,
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
}

// ===== NORMALIZER =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Remove "Page N of M" footers
    #[serde(default = "default_true")]
    pub strip_page_markers: bool,
    /// Remove lines that contain nothing but a number
    #[serde(default = "default_true")]
    pub strip_line_numbers: bool,
    /// Put a line break between a sentence terminator and a following capital
    #[serde(default = "default_true")]
    pub mark_sentence_breaks: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            strip_page_markers: true,
            strip_line_numbers: true,
            mark_sentence_breaks: true,
        }
    }
}

// ===== SEGMENTATION =====

/// How a header match is accepted as a clause boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderKind {
    /// SECTION 3, ARTICLE 2, CLAUSE 7
    Formal,
    /// 1. (a) A. (1): only at a line start or after a sentence terminator
    Positional,
    /// WHEREAS, NOW THEREFORE, IN WITNESS WHEREOF
    Anchor,
    /// Bare category words such as TERMINATION
    Topical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderPatternConfig {
    pub name: String,
    pub pattern: String,
    pub kind: HeaderKind,
    #[serde(default)]
    pub case_sensitive: bool,
}

impl HeaderPatternConfig {
    fn new(name: &str, pattern: &str, kind: HeaderKind) -> Self {
        Self {
            name: name.to_string(),
            pattern: pattern.to_string(),
            kind,
            case_sensitive: false,
        }
    }
}

fn default_header_patterns() -> Vec<HeaderPatternConfig> {
    use HeaderKind::*;
    vec![
        HeaderPatternConfig::new("section", r"\b(?:SECTION|SEC\.)\s+\d+", Formal),
        HeaderPatternConfig::new("article", r"\b(?:ARTICLE|ART\.)\s+\d+", Formal),
        HeaderPatternConfig::new("clause", r"\bCLAUSE\s+\d+", Formal),
        HeaderPatternConfig::new("numbered", r"\d+\.\s+", Positional),
        HeaderPatternConfig::new("parenthesized_number", r"\(\d+\)\s+", Positional),
        HeaderPatternConfig::new("lettered", r"[A-Z]\.\s+", Positional),
        HeaderPatternConfig::new("parenthesized_letter", r"\([a-z]\)\s+", Positional),
        HeaderPatternConfig::new("whereas", r"\bWHEREAS,", Anchor),
        HeaderPatternConfig::new("now_therefore", r"\bNOW THEREFORE,", Anchor),
        HeaderPatternConfig::new("in_witness_whereof", r"\bIN WITNESS WHEREOF\b", Anchor),
        HeaderPatternConfig::new("termination", r"\bTERMINATION\b", Topical),
        HeaderPatternConfig::new("liability", r"\bLIABILITY\b", Topical),
        HeaderPatternConfig::new("warranty", r"\bWARRANTY\b", Topical),
        HeaderPatternConfig::new("confidentiality", r"\bCONFIDENTIALITY\b", Topical),
        HeaderPatternConfig::new("intellectual_property", r"\bINTELLECTUAL PROPERTY\b", Topical),
        HeaderPatternConfig::new("payment", r"\bPAYMENT\b", Topical),
        HeaderPatternConfig::new("dispute_resolution", r"\bDISPUTE RESOLUTION\b", Topical),
    ]
}

fn default_min_clause_chars() -> usize {
    50 // fragments at or below this trimmed length are page noise
}

fn default_paragraph_split_chars() -> usize {
    500 // longer paragraphs get re-chunked by sentence
}

fn default_chunk_target_chars() -> usize {
    300
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentationConfig {
    /// Header patterns, in the order they are tried
    #[serde(default = "default_header_patterns")]
    pub header_patterns: Vec<HeaderPatternConfig>,
    /// Fragments must be strictly longer than this (trimmed, in characters)
    #[serde(default = "default_min_clause_chars")]
    pub min_clause_chars: usize,
    #[serde(default = "default_paragraph_split_chars")]
    pub paragraph_split_chars: usize,
    #[serde(default = "default_chunk_target_chars")]
    pub chunk_target_chars: usize,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            header_patterns: default_header_patterns(),
            min_clause_chars: default_min_clause_chars(),
            paragraph_split_chars: default_paragraph_split_chars(),
            chunk_target_chars: default_chunk_target_chars(),
        }
    }
}

// ===== CLASSIFICATION =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryKeywords {
    pub clause_type: ClauseType,
    pub keywords: Vec<String>,
}

fn default_categories() -> Vec<CategoryKeywords> {
    let category = |clause_type, keywords: &[&str]| CategoryKeywords {
        clause_type,
        keywords: strings(keywords),
    };
    vec![
        category(
            ClauseType::Liability,
            &[
                "liability", "liable", "damages", "indemnify", "indemnification",
                "hold harmless", "limitation of liability", "exclude liability",
            ],
        ),
        category(
            ClauseType::Termination,
            &[
                "termination", "terminate", "end", "expire", "dissolution", "breach",
                "default", "cancel", "cancellation",
            ],
        ),
        category(
            ClauseType::Warranty,
            &[
                "warranty", "warrant", "guarantee", "representation", "covenant",
                "assurance", "promise",
            ],
        ),
        category(
            ClauseType::Financial,
            &[
                "payment", "fee", "cost", "price", "compensation", "billing", "invoice",
                "salary", "wage", "money",
            ],
        ),
        category(
            ClauseType::Confidentiality,
            &[
                "confidential", "confidentiality", "non-disclosure", "nda", "proprietary",
                "trade secret", "secret information",
            ],
        ),
        category(
            ClauseType::IntellectualProperty,
            &[
                "intellectual property", "copyright", "patent", "trademark", "trade mark",
                "proprietary rights", "work for hire",
            ],
        ),
        category(
            ClauseType::DisputeResolution,
            &[
                "dispute", "arbitration", "mediation", "court", "jurisdiction",
                "governing law", "venue", "litigation",
            ],
        ),
    ]
}

fn default_high_importance() -> Vec<String> {
    strings(&[
        "shall", "must", "required", "mandatory", "obligation", "liable", "responsible",
        "penalty", "breach", "default",
    ])
}

fn default_medium_importance() -> Vec<String> {
    strings(&[
        "should", "may", "can", "will", "agree", "covenant", "undertake", "consent",
        "approve",
    ])
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationConfig {
    /// Category keyword lists; list order is the tie-break order
    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryKeywords>,
    #[serde(default = "default_high_importance")]
    pub high_importance_keywords: Vec<String>,
    #[serde(default = "default_medium_importance")]
    pub medium_importance_keywords: Vec<String>,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            high_importance_keywords: default_high_importance(),
            medium_importance_keywords: default_medium_importance(),
        }
    }
}

// ===== SCORING =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskPatternConfig {
    pub name: String,
    pub pattern: String,
    /// Canonical warning emitted when the pattern matches
    pub warning: String,
}

fn default_risk_patterns() -> Vec<RiskPatternConfig> {
    let pattern = |name: &str, pattern: &str, warning: &str| RiskPatternConfig {
        name: name.to_string(),
        pattern: pattern.to_string(),
        warning: warning.to_string(),
    };
    vec![
        pattern(
            "unlimited_liability",
            r"unlimited.*liability|liability.*unlimited",
            "This clause may expose you to unlimited financial liability.",
        ),
        pattern(
            "personal_guarantee",
            r"personal.*guarantee|guarantee.*personal",
            "You may be personally responsible for obligations.",
        ),
        pattern(
            "broad_indemnity",
            r"indemnify.*from.*all|indemnify.*against.*any",
            "You may have to pay for legal costs and damages of the other party.",
        ),
        pattern(
            "automatic_renewal",
            r"automatic.*renew|renew.*automatic",
            "This agreement may renew automatically without your action.",
        ),
        pattern(
            "broad_termination",
            r"terminate.*convenience|terminate.*reason",
            "The other party can terminate this agreement easily.",
        ),
        pattern(
            "ip_assignment",
            r"assign.*intellectual.*property|intellectual.*property.*assign",
            "You may be giving up rights to your intellectual property.",
        ),
        pattern(
            "non_compete",
            r"non.compete|restraint.*trade|compete.*restrict",
            "This may restrict your ability to work in your field.",
        ),
        pattern(
            "waiver_rights",
            r"waive.*right|waive.*claim|waive.*defense",
            "You may be giving up important legal rights.",
        ),
        pattern(
            "liquidated_damages",
            r"liquidated.*damage|damage.*liquidated",
            "You may owe predetermined damages regardless of actual harm.",
        ),
        pattern(
            "attorney_fees",
            r"attorney.*fee|legal.*fee.*prevailing",
            "You may have to pay the other party's legal fees if you lose.",
        ),
    ]
}

fn default_high_risk_keywords() -> Vec<String> {
    strings(&[
        "unlimited liability", "personal guarantee", "liquidated damages",
        "punitive damages", "attorney fees", "indemnify", "hold harmless", "waive",
        "disclaim", "exclude", "limitation of liability", "force majeure", "act of god",
        "material breach", "immediate termination", "without notice", "sole discretion",
        "binding arbitration", "class action waiver", "jury trial waiver",
        "automatic renewal", "perpetual", "irrevocable", "intellectual property assignment",
        "work for hire", "non-compete", "restraint of trade", "liquidation preference",
    ])
}

fn default_medium_risk_keywords() -> Vec<String> {
    strings(&[
        "reasonable efforts", "best efforts", "material adverse effect",
        "commercially reasonable", "industry standard", "good faith",
        "confidential information", "proprietary", "trade secrets", "warranty",
        "representation", "covenant", "undertaking", "cure period", "notice period",
        "governing law", "jurisdiction", "venue", "dispute resolution", "modification",
        "amendment", "assignment", "delegation", "severability", "entire agreement",
        "merger clause",
    ])
}

fn default_protective_keywords() -> Vec<String> {
    strings(&[
        "mutual", "reciprocal", "both parties", "either party", "reasonable notice",
        "written consent", "prior approval", "cure right", "grace period", "mitigation",
        "proportionate", "equitable", "fair market value",
    ])
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub pattern: i64,
    pub high_risk_keyword: i64,
    pub medium_risk_keyword: i64,
    /// Usually negative: protective language lowers the score
    pub protective_keyword: i64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            pattern: 30,
            high_risk_keyword: 20,
            medium_risk_keyword: 10,
            protective_keyword: -5,
        }
    }
}

fn default_type_adjustments() -> BTreeMap<ClauseType, i64> {
    BTreeMap::from([
        (ClauseType::Liability, 20),
        (ClauseType::Termination, 15),
        (ClauseType::Warranty, 10),
        (ClauseType::IntellectualProperty, 15),
        (ClauseType::Financial, 10),
        (ClauseType::DisputeResolution, 10),
        (ClauseType::Confidentiality, 5),
        (ClauseType::General, 0),
    ])
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportanceAdjustments {
    pub high: i64,
    pub medium: i64,
    pub low: i64,
}

impl Default for ImportanceAdjustments {
    fn default() -> Self {
        Self {
            high: 15,
            medium: 5,
            low: 0,
        }
    }
}

/// Score cut-offs, applied after flooring at 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    pub high: u32,
    pub medium: u32,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            high: 50,
            medium: 25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorRecommendation {
    pub factor: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationConfig {
    pub high: Vec<String>,
    pub medium: Vec<String>,
    #[serde(default)]
    pub low: Vec<String>,
    pub by_type: BTreeMap<ClauseType, Vec<String>>,
    pub by_factor: Vec<FactorRecommendation>,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        let by_type = BTreeMap::from([
            (
                ClauseType::Liability,
                strings(&[
                    "Try to limit liability to direct damages only.",
                    "Request mutual liability limitations.",
                    "Ensure adequate insurance coverage.",
                ]),
            ),
            (
                ClauseType::Termination,
                strings(&[
                    "Request reasonable notice periods.",
                    "Ensure you have similar termination rights.",
                    "Clarify what happens to your data and work product.",
                ]),
            ),
            (
                ClauseType::Warranty,
                strings(&[
                    "Ensure warranties are reasonable and achievable.",
                    "Request mutual warranty disclaimers.",
                    "Limit warranty periods to reasonable timeframes.",
                ]),
            ),
            (
                ClauseType::IntellectualProperty,
                strings(&[
                    "Clarify ownership of existing vs. new intellectual property.",
                    "Retain rights to your pre-existing IP.",
                    "Ensure you can use your work for portfolio/reference purposes.",
                ]),
            ),
            (
                ClauseType::Financial,
                strings(&[
                    "Ensure payment terms are clearly defined.",
                    "Request protection against late payment penalties.",
                    "Clarify expense reimbursement procedures.",
                ]),
            ),
            (
                ClauseType::Confidentiality,
                strings(&[
                    "Clarify exactly which information is treated as confidential.",
                    "Limit the confidentiality period to a reasonable timeframe.",
                ]),
            ),
            (
                ClauseType::DisputeResolution,
                strings(&[
                    "Check where disputes will be heard and which law applies.",
                    "Ask whether mediation is required before arbitration or court.",
                ]),
            ),
        ]);
        let factor = |factor: &str, recommendation: &str| FactorRecommendation {
            factor: factor.to_string(),
            recommendation: recommendation.to_string(),
        };
        Self {
            high: strings(&[
                "Consider consulting with a lawyer before agreeing to this clause.",
                "Try to negotiate more favorable terms.",
            ]),
            medium: strings(&[
                "Review this clause carefully and understand its implications.",
                "Consider asking for clarifications or modifications.",
            ]),
            low: Vec::new(),
            by_type,
            by_factor: vec![
                factor("Unlimited Liability", "Request a liability cap or limitation."),
                factor(
                    "Personal Guarantee",
                    "Try to limit personal guarantees to corporate obligations only.",
                ),
                factor("Non Compete", "Negotiate reasonable geographic and time limitations."),
                factor(
                    "Broad Indemnity",
                    "Limit indemnity to claims caused by your own negligence or breach.",
                ),
                factor(
                    "Automatic Renewal",
                    "Ask for a renewal reminder and a simple way to opt out.",
                ),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_risk_patterns")]
    pub patterns: Vec<RiskPatternConfig>,
    #[serde(default = "default_high_risk_keywords")]
    pub high_risk_keywords: Vec<String>,
    #[serde(default = "default_medium_risk_keywords")]
    pub medium_risk_keywords: Vec<String>,
    #[serde(default = "default_protective_keywords")]
    pub protective_keywords: Vec<String>,
    #[serde(default)]
    pub weights: ScoringWeights,
    #[serde(default = "default_type_adjustments")]
    pub type_adjustments: BTreeMap<ClauseType, i64>,
    #[serde(default)]
    pub importance_adjustments: ImportanceAdjustments,
    #[serde(default)]
    pub thresholds: RiskThresholds,
    #[serde(default)]
    pub recommendations: RecommendationConfig,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            patterns: default_risk_patterns(),
            high_risk_keywords: default_high_risk_keywords(),
            medium_risk_keywords: default_medium_risk_keywords(),
            protective_keywords: default_protective_keywords(),
            weights: ScoringWeights::default(),
            type_adjustments: default_type_adjustments(),
            importance_adjustments: ImportanceAdjustments::default(),
            thresholds: RiskThresholds::default(),
            recommendations: RecommendationConfig::default(),
        }
    }
}

// ===== AGGREGATION =====

fn default_medium_share() -> f64 {
    0.3
}

fn default_top_factor_count() -> usize {
    5
}

fn default_max_critical_warnings() -> usize {
    10
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Share of medium-risk clauses above which the document is medium risk
    #[serde(default = "default_medium_share")]
    pub medium_share: f64,
    #[serde(default = "default_top_factor_count")]
    pub top_factor_count: usize,
    #[serde(default = "default_max_critical_warnings")]
    pub max_critical_warnings: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            medium_share: default_medium_share(),
            top_factor_count: default_top_factor_count(),
            max_critical_warnings: default_max_critical_warnings(),
        }
    }
}

// ===== PROCESSING & ENRICHMENT =====

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Score clauses on the rayon thread pool
    #[serde(default)]
    pub parallel: bool,
    /// Log per-stage timings
    #[serde(default)]
    pub profile: bool,
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_min_request_interval_ms() -> u64 {
    1_000 // one call per second against the same endpoint
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub simplify: bool,
    #[serde(default = "default_true")]
    pub explain: bool,
    /// Translate into this language when set (e.g. "es")
    #[serde(default)]
    pub target_language: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Fixed delay enforced between successive service calls
    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            simplify: true,
            explain: true,
            target_language: None,
            timeout_ms: default_timeout_ms(),
            min_request_interval_ms: default_min_request_interval_ms(),
        }
    }
}

impl AnalysisConfig {
    /// Load config from file path
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: AnalysisConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config with fallback to default
    pub fn load_with_fallback(path: Option<&Path>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|e| {
                tracing::warn!(path = %p.display(), error = %e, "failed to load config, using defaults");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// SHA-256 over the JSON form; stamped on reports so results can be traced
    /// back to the exact rule set that produced them.
    pub fn fingerprint(&self) -> Result<String, ConfigError> {
        let json = serde_json::to_string(self)?;
        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        Ok(format!("{:x}", hasher.finalize()))
    }

    /// Reject values the pipeline cannot work with. Regex compilation errors
    /// are reported separately when the rule sets are built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let seg = &self.segmentation;
        if seg.chunk_target_chars == 0 {
            return Err(ConfigError::Invalid(
                "segmentation.chunk_target_chars must be positive".to_string(),
            ));
        }
        if seg.paragraph_split_chars < seg.chunk_target_chars {
            return Err(ConfigError::Invalid(format!(
                "segmentation.paragraph_split_chars ({}) must be >= chunk_target_chars ({})",
                seg.paragraph_split_chars, seg.chunk_target_chars
            )));
        }

        let mut seen = Vec::new();
        for category in &self.classification.categories {
            if category.clause_type == ClauseType::General {
                return Err(ConfigError::Invalid(
                    "classification.categories cannot include 'general'".to_string(),
                ));
            }
            if seen.contains(&category.clause_type) {
                return Err(ConfigError::Invalid(format!(
                    "classification.categories lists '{}' twice",
                    category.clause_type
                )));
            }
            seen.push(category.clause_type);
        }

        let thresholds = &self.scoring.thresholds;
        if thresholds.medium > thresholds.high {
            return Err(ConfigError::Invalid(format!(
                "scoring.thresholds.medium ({}) must not exceed high ({})",
                thresholds.medium, thresholds.high
            )));
        }

        if !(0.0..=1.0).contains(&self.aggregation.medium_share) {
            return Err(ConfigError::Invalid(
                "aggregation.medium_share must be between 0 and 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        AnalysisConfig::default().validate().unwrap();
    }

    #[test]
    fn test_yaml_roundtrip_preserves_config() {
        let config = AnalysisConfig::default();
        let yaml = config.to_yaml().unwrap();
        let parsed = AnalysisConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = r#"
scoring:
  thresholds:
    high: 60
    medium: 30
processing:
  parallel: true
"#;
        let config = AnalysisConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.scoring.thresholds.high, 60);
        assert!(config.processing.parallel);
        assert_eq!(config.segmentation.min_clause_chars, 50);
        assert_eq!(config.scoring.patterns.len(), 10);
        assert_eq!(config.classification.categories.len(), 7);
    }

    #[test]
    fn test_validate_rejects_general_category() {
        let mut config = AnalysisConfig::default();
        config.classification.categories.push(CategoryKeywords {
            clause_type: ClauseType::General,
            keywords: vec!["misc".to_string()],
        });
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_inverted_thresholds() {
        let mut config = AnalysisConfig::default();
        config.scoring.thresholds = RiskThresholds { high: 20, medium: 40 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_fingerprint_tracks_changes() {
        let base = AnalysisConfig::default();
        let mut tuned = AnalysisConfig::default();
        tuned.scoring.weights.pattern = 35;
        assert_eq!(base.fingerprint().unwrap(), AnalysisConfig::default().fingerprint().unwrap());
        assert_ne!(base.fingerprint().unwrap(), tuned.fingerprint().unwrap());
    }

    #[test]
    fn test_load_with_fallback_on_missing_file() {
        let config = AnalysisConfig::load_with_fallback(Some(Path::new("/nonexistent/rules.yaml")));
        assert_eq!(config, AnalysisConfig::default());
    }
}
