use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

pub type DocumentId = Uuid;

/// The schema version stamped on every report.
/// Bump this when the output shape changes.
pub const SCHEMA_VERSION: &str = "0.1.0";

// ===== CLAUSE LABELS =====

/// Category assigned to a clause by keyword scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClauseType {
    Liability,
    Termination,
    Warranty,
    Financial,
    Confidentiality,
    IntellectualProperty,
    DisputeResolution,
    General,
}

impl ClauseType {
    /// Every keyword-bearing category, in tie-break order.
    pub const CATEGORIES: [ClauseType; 7] = [
        ClauseType::Liability,
        ClauseType::Termination,
        ClauseType::Warranty,
        ClauseType::Financial,
        ClauseType::Confidentiality,
        ClauseType::IntellectualProperty,
        ClauseType::DisputeResolution,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Liability => "liability",
            Self::Termination => "termination",
            Self::Warranty => "warranty",
            Self::Financial => "financial",
            Self::Confidentiality => "confidentiality",
            Self::IntellectualProperty => "intellectual_property",
            Self::DisputeResolution => "dispute_resolution",
            Self::General => "general",
        }
    }

    /// Human-readable label ("Intellectual Property").
    pub fn label(&self) -> String {
        title_case(&self.as_str().replace('_', " "))
    }
}

impl fmt::Display for ClauseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Obligation strength of a clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    High,
    Medium,
    Low,
}

impl Importance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity bucket for a clause or a whole document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn color(&self) -> RiskColor {
        match self {
            Self::Low => RiskColor::Green,
            Self::Medium => RiskColor::Orange,
            Self::High => RiskColor::Red,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display color paired with a risk level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskColor {
    Green,
    Orange,
    Red,
}

impl RiskColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Orange => "orange",
            Self::Red => "red",
        }
    }
}

// ===== PER-CLAUSE RESULTS =====

/// Outcome of scoring one clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_level: RiskLevel,
    /// Sum of signal weights, floored at 0
    pub risk_score: u32,
    /// Matched pattern and keyword names, deduplicated in match order
    pub risk_factors: Vec<String>,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
    pub color: RiskColor,
}

impl RiskAssessment {
    /// Low-confidence result used when scoring a clause fails.
    pub fn degraded(reason: &str) -> Self {
        Self {
            risk_level: RiskLevel::Low,
            risk_score: 0,
            risk_factors: Vec::new(),
            warnings: vec![format!("Risk analysis failed for this clause: {reason}")],
            recommendations: Vec::new(),
            color: RiskLevel::Low.color(),
        }
    }
}

/// Optional overlay added by an enrichment service.
/// Every field may be absent; the core never reads them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Enrichment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simplified: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    /// Target language of `translated`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Name of the service that produced this overlay
    pub method: String,
}

impl Enrichment {
    pub fn is_empty(&self) -> bool {
        self.simplified.is_none()
            && self.translated.is_none()
            && self.explanation.is_none()
            && self.recommendation.is_none()
    }
}

/// The atomic unit of analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    /// 1-based position in reading order
    pub id: usize,
    pub text: String,
    pub original: String,
    #[serde(rename = "type")]
    pub clause_type: ClauseType,
    pub importance: Importance,
    #[serde(flatten)]
    pub risk: RiskAssessment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<Enrichment>,
}

impl Clause {
    pub fn new(
        id: usize,
        text: &str,
        clause_type: ClauseType,
        importance: Importance,
        risk: RiskAssessment,
    ) -> Self {
        let text = text.trim().to_string();
        Self {
            id,
            original: text.clone(),
            text,
            clause_type,
            importance,
            risk,
            enrichment: None,
        }
    }

    /// Single clause covering a whole document that segmentation could not split.
    /// Keeps the text exactly as given, even when empty.
    pub fn whole_document(text: &str, risk: RiskAssessment) -> Self {
        Self {
            id: 1,
            text: text.to_string(),
            original: text.to_string(),
            clause_type: ClauseType::General,
            importance: Importance::Medium,
            risk,
            enrichment: None,
        }
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.risk.risk_level
    }

    pub fn risk_score(&self) -> u32 {
        self.risk.risk_score
    }
}

// ===== DOCUMENT-LEVEL RESULTS =====

/// Aggregate risk over all clauses of one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRiskSummary {
    pub overall_risk: RiskLevel,
    pub overall_color: RiskColor,
    pub total_clauses: usize,
    pub high_risk_count: usize,
    pub medium_risk_count: usize,
    pub low_risk_count: usize,
    /// Exact mean of clause scores; 0.0 for an empty document
    pub average_risk_score: f64,
    pub top_risk_factors: Vec<String>,
    pub critical_warnings: Vec<String>,
    pub recommendation: String,
}

/// How clauses spread over types and importance levels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClauseDistribution {
    pub total_clauses: usize,
    pub by_type: BTreeMap<ClauseType, usize>,
    pub by_importance: BTreeMap<Importance, usize>,
    /// Percentage of clauses per type, rounded to one decimal
    pub type_distribution: BTreeMap<ClauseType, f64>,
}

/// Full output of one document-processing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentReport {
    pub schema_version: String,
    pub document_id: DocumentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub analyzed_at: DateTime<Utc>,
    /// SHA-256 of the analysis configuration used for this run
    pub config_fingerprint: String,
    /// True when segmentation produced nothing and the whole text became one clause
    pub used_fallback_clause: bool,
    pub clauses: Vec<Clause>,
    pub summary: DocumentRiskSummary,
    pub distribution: ClauseDistribution,
}

impl DocumentReport {
    pub fn high_risk_clauses(&self) -> impl Iterator<Item = &Clause> {
        self.clauses
            .iter()
            .filter(|clause| clause.risk_level() == RiskLevel::High)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Uppercase every letter that does not follow another letter, lowercase the rest.
/// "non-compete" becomes "Non-Compete", "broad indemnity" becomes "Broad Indemnity".
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }
    out
}
