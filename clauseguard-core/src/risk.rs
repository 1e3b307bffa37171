use crate::config::{RecommendationConfig, RiskThresholds, ScoringConfig};
use crate::error::{ConfigError, ScoringError};
use crate::rules::KeywordSet;
use crate::types::{title_case, ClauseType, Importance, RiskAssessment, RiskLevel};
use regex::{Regex, RegexBuilder};

struct RiskPattern {
    factor: String,
    regex: Regex,
    warning: String,
}

/// Additive, explainable risk scoring for a single clause.
pub struct RiskScorer {
    patterns: Vec<RiskPattern>,
    high_risk: KeywordSet,
    medium_risk: KeywordSet,
    protective: KeywordSet,
    config: ScoringConfig,
}

/// Running score plus the evidence collected so far.
#[derive(Default)]
struct ScoreSheet {
    score: i64,
    factors: Vec<String>,
    warnings: Vec<String>,
}

impl ScoreSheet {
    fn add(&mut self, delta: i64, stage: &'static str) -> Result<(), ScoringError> {
        self.score = self
            .score
            .checked_add(delta)
            .ok_or(ScoringError::Overflow { stage })?;
        Ok(())
    }

    fn add_factor(&mut self, factor: String) {
        push_unique(&mut self.factors, factor);
    }
}

fn push_unique(items: &mut Vec<String>, item: String) {
    if !items.contains(&item) {
        items.push(item);
    }
}

fn keyword_set(name: &str, keywords: &[String]) -> Result<KeywordSet, ConfigError> {
    KeywordSet::new(keywords).map_err(|source| ConfigError::InvalidPattern {
        name: name.to_string(),
        source,
    })
}

impl RiskScorer {
    pub fn new(config: &ScoringConfig) -> Result<Self, ConfigError> {
        let patterns = config
            .patterns
            .iter()
            .map(|p| {
                let regex = RegexBuilder::new(&p.pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| ConfigError::InvalidPattern {
                        name: p.name.clone(),
                        source,
                    })?;
                Ok(RiskPattern {
                    factor: title_case(&p.name.replace('_', " ")),
                    regex,
                    warning: p.warning.clone(),
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(Self {
            patterns,
            high_risk: keyword_set("scoring.high_risk_keywords", &config.high_risk_keywords)?,
            medium_risk: keyword_set("scoring.medium_risk_keywords", &config.medium_risk_keywords)?,
            protective: keyword_set("scoring.protective_keywords", &config.protective_keywords)?,
            config: config.clone(),
        })
    }

    /// Score a clause. Any scoring failure is logged and replaced by a
    /// low-risk assessment carrying a single explanatory warning.
    pub fn assess(&self, text: &str, clause_type: ClauseType, importance: Importance) -> RiskAssessment {
        match self.try_assess(text, clause_type, importance) {
            Ok(assessment) => assessment,
            Err(e) => {
                tracing::warn!(error = %e, %clause_type, "risk scoring failed, using degraded assessment");
                RiskAssessment::degraded(&e.to_string())
            }
        }
    }

    pub fn try_assess(
        &self,
        text: &str,
        clause_type: ClauseType,
        importance: Importance,
    ) -> Result<RiskAssessment, ScoringError> {
        let weights = &self.config.weights;
        let mut sheet = ScoreSheet::default();

        for pattern in &self.patterns {
            if pattern.regex.is_match(text) {
                sheet.add(weights.pattern, "pattern")?;
                sheet.add_factor(pattern.factor.clone());
                push_unique(&mut sheet.warnings, pattern.warning.clone());
            }
        }

        for keyword in self.high_risk.matches(text) {
            sheet.add(weights.high_risk_keyword, "high-risk keyword")?;
            sheet.add_factor(title_case(keyword));
            push_unique(
                &mut sheet.warnings,
                format!("Contains high-risk term: '{keyword}'"),
            );
        }

        for _ in self.medium_risk.matches(text) {
            sheet.add(weights.medium_risk_keyword, "medium-risk keyword")?;
        }

        for _ in self.protective.matches(text) {
            sheet.add(weights.protective_keyword, "protective keyword")?;
        }

        let type_adjustment = self
            .config
            .type_adjustments
            .get(&clause_type)
            .copied()
            .unwrap_or(0);
        sheet.add(type_adjustment, "type adjustment")?;

        let importance_adjustments = &self.config.importance_adjustments;
        let importance_adjustment = match importance {
            Importance::High => importance_adjustments.high,
            Importance::Medium => importance_adjustments.medium,
            Importance::Low => importance_adjustments.low,
        };
        sheet.add(importance_adjustment, "importance adjustment")?;

        // Floor before thresholding
        let risk_score = u32::try_from(sheet.score.max(0)).map_err(|_| ScoringError::Overflow {
            stage: "final score",
        })?;
        let risk_level = level_for(risk_score, &self.config.thresholds);
        let recommendations = recommendations_for(
            &self.config.recommendations,
            risk_level,
            clause_type,
            &sheet.factors,
        );

        Ok(RiskAssessment {
            risk_level,
            risk_score,
            risk_factors: sheet.factors,
            warnings: sheet.warnings,
            recommendations,
            color: risk_level.color(),
        })
    }
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::new(&ScoringConfig::default()).expect("default risk patterns compile")
    }
}

pub fn level_for(score: u32, thresholds: &RiskThresholds) -> RiskLevel {
    if score >= thresholds.high {
        RiskLevel::High
    } else if score >= thresholds.medium {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Level advice first, then type advice, then one-liners for specific factors.
fn recommendations_for(
    table: &RecommendationConfig,
    level: RiskLevel,
    clause_type: ClauseType,
    factors: &[String],
) -> Vec<String> {
    let mut out = Vec::new();
    let level_advice = match level {
        RiskLevel::High => &table.high,
        RiskLevel::Medium => &table.medium,
        RiskLevel::Low => &table.low,
    };
    for advice in level_advice {
        push_unique(&mut out, advice.clone());
    }
    for advice in table.by_type.get(&clause_type).into_iter().flatten() {
        push_unique(&mut out, advice.clone());
    }
    for factor in factors {
        for entry in table.by_factor.iter().filter(|entry| &entry.factor == factor) {
            push_unique(&mut out, entry.recommendation.clone());
        }
    }
    out
}
