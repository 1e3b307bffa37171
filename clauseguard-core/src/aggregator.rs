use crate::config::{AggregationConfig, RiskThresholds};
use crate::types::{Clause, ClauseDistribution, DocumentRiskSummary, RiskLevel};
use std::collections::BTreeMap;

/// Rolls clause assessments up into a document verdict.
#[derive(Debug, Clone, Default)]
pub struct RiskAggregator {
    config: AggregationConfig,
    thresholds: RiskThresholds,
}

impl RiskAggregator {
    pub fn new(config: AggregationConfig, thresholds: RiskThresholds) -> Self {
        Self { config, thresholds }
    }

    pub fn aggregate(&self, clauses: &[Clause]) -> DocumentRiskSummary {
        let total = clauses.len();
        let count = |level: RiskLevel| clauses.iter().filter(|c| c.risk_level() == level).count();
        let high = count(RiskLevel::High);
        let medium = count(RiskLevel::Medium);
        let low = count(RiskLevel::Low);

        let average = if total == 0 {
            0.0
        } else {
            clauses.iter().map(|c| f64::from(c.risk_score())).sum::<f64>() / total as f64
        };

        let overall = if high > 0 || average >= f64::from(self.thresholds.high) {
            RiskLevel::High
        } else if medium as f64 > self.config.medium_share * total as f64
            || average >= f64::from(self.thresholds.medium)
        {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        };

        DocumentRiskSummary {
            overall_risk: overall,
            overall_color: overall.color(),
            total_clauses: total,
            high_risk_count: high,
            medium_risk_count: medium,
            low_risk_count: low,
            average_risk_score: average,
            top_risk_factors: self.top_factors(clauses),
            critical_warnings: self.critical_warnings(clauses),
            recommendation: document_recommendation(overall, high, total),
        }
    }

    /// Most frequent factors; ties keep first-seen order.
    fn top_factors(&self, clauses: &[Clause]) -> Vec<String> {
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for factor in clauses.iter().flat_map(|c| c.risk.risk_factors.iter()) {
            match counts.iter_mut().find(|(name, _)| *name == factor.as_str()) {
                Some((_, n)) => *n += 1,
                None => counts.push((factor.as_str(), 1)),
            }
        }
        // sort_by is stable
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
            .into_iter()
            .take(self.config.top_factor_count)
            .map(|(name, _)| name.to_string())
            .collect()
    }

    fn critical_warnings(&self, clauses: &[Clause]) -> Vec<String> {
        let mut warnings: Vec<String> = Vec::new();
        for warning in clauses.iter().flat_map(|c| c.risk.warnings.iter()) {
            if warnings.len() >= self.config.max_critical_warnings {
                break;
            }
            if !warnings.contains(warning) {
                warnings.push(warning.clone());
            }
        }
        warnings
    }

    pub fn distribution(&self, clauses: &[Clause]) -> ClauseDistribution {
        distribution(clauses)
    }
}

fn document_recommendation(overall: RiskLevel, high: usize, total: usize) -> String {
    match overall {
        RiskLevel::High => format!(
            "This document contains {high} high-risk clause(s) out of {total} total. \
             Review the flagged warnings and consider consulting a lawyer before signing."
        ),
        RiskLevel::Medium => "This document has moderate risk. Review the highlighted clauses \
             and ask for clarification on any terms you do not understand."
            .to_string(),
        RiskLevel::Low => "This document appears to have low risk overall. Read it carefully \
             and ask about any clause you want to understand better."
            .to_string(),
    }
}

/// Document summary with default thresholds.
pub fn aggregate(clauses: &[Clause]) -> DocumentRiskSummary {
    RiskAggregator::default().aggregate(clauses)
}

/// Clause counts per type and importance, plus type percentages to one decimal.
pub fn distribution(clauses: &[Clause]) -> ClauseDistribution {
    let total = clauses.len();
    let mut by_type = BTreeMap::new();
    let mut by_importance = BTreeMap::new();
    for clause in clauses {
        *by_type.entry(clause.clause_type).or_insert(0) += 1;
        *by_importance.entry(clause.importance).or_insert(0) += 1;
    }

    let type_distribution = by_type
        .iter()
        .map(|(clause_type, count)| {
            let pct = *count as f64 / total as f64 * 100.0;
            (*clause_type, (pct * 10.0).round() / 10.0)
        })
        .collect();

    ClauseDistribution {
        total_clauses: total,
        by_type,
        by_importance,
        type_distribution,
    }
}
