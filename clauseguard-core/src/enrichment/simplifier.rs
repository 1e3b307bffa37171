use super::service::{EnrichmentRequest, EnrichmentService};
use crate::error::EnrichmentError;
use crate::types::{ClauseType, Enrichment};
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

const REPLACEMENTS: &[(&str, &str)] = &[
    ("heretofore", "until now"),
    ("hereinafter", "from now on"),
    ("whereas", "since"),
    ("pursuant to", "following"),
    ("notwithstanding", "even though"),
    ("aforementioned", "mentioned above"),
    ("subsequent to", "after"),
    ("prior to", "before"),
    ("in the event that", "if"),
    ("for the purpose of", "to"),
    ("with respect to", "about"),
    ("in accordance with", "following"),
    ("terminate", "end"),
    ("commence", "start"),
    ("constitute", "make"),
    ("obtain", "get"),
    ("provide", "give"),
    ("utilize", "use"),
    ("endeavor", "try"),
    ("sufficient", "enough"),
    ("additional", "extra"),
    ("modification", "change"),
    ("notification", "notice"),
    ("compensation", "payment"),
    ("obligations", "things you must do"),
    ("representations", "claims"),
    ("warranties", "promises"),
    ("indemnification", "paying for someone else's problems"),
    ("force majeure", "things no one can control"),
    ("liability", "responsibility for problems"),
    ("breach", "breaking the rules"),
    ("covenant", "promise"),
    ("consideration", "payment"),
    ("execute", "sign"),
    ("party", "person or company"),
    ("shall", "must"),
    ("may", "can"),
];

const STRUCTURE_REWRITES: &[(&str, &str)] = &[
    (" which ", " that "),
    (" wherein ", " where "),
    (" whereby ", " by which "),
];

// One alternation, longest phrase first, so multi-word phrases win and no
// replacement is rewritten twice
static REPLACEMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    let mut phrases: Vec<&str> = REPLACEMENTS.iter().map(|(from, _)| *from).collect();
    phrases.sort_by_key(|phrase| std::cmp::Reverse(phrase.len()));
    let alternation = phrases
        .iter()
        .map(|phrase| regex::escape(phrase))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).unwrap()
});

static REPLACEMENT_TABLE: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| REPLACEMENTS.iter().copied().collect());

/// Offline simplifier: phrase substitution plus canned explanations.
///
/// Used when no remote service is configured, and as a safe default in tests.
/// It does not translate.
#[derive(Debug, Clone, Default)]
pub struct PatternSimplifier;

impl PatternSimplifier {
    pub fn new() -> Self {
        Self
    }

    pub fn simplify(&self, text: &str) -> String {
        let replaced = REPLACEMENT_REGEX.replace_all(text, |caps: &Captures| {
            let matched = &caps[0];
            let lower = matched.to_lowercase();
            let replacement = REPLACEMENT_TABLE.get(lower.as_str()).copied().unwrap_or(matched);
            match_leading_case(matched, replacement)
        });

        replaced
            .split(". ")
            .map(|sentence| {
                STRUCTURE_REWRITES
                    .iter()
                    .fold(sentence.to_string(), |acc, (from, to)| acc.replace(from, to))
            })
            .collect::<Vec<_>>()
            .join(". ")
    }

    pub fn explain(&self, text: &str, clause_type: ClauseType) -> String {
        let mut explanation = base_explanation(clause_type).to_string();
        let lower = text.to_lowercase();
        if lower.contains("unlimited") || lower.contains("without limit") {
            explanation.push_str("\nWarning: This clause may expose you to unlimited financial risk.");
        } else if lower.contains("automatic") && clause_type == ClauseType::Termination {
            explanation.push_str("\nNote: This agreement may renew automatically unless you take action.");
        } else if lower.contains("shall") || lower.contains("must") {
            explanation.push_str("\nImportant: This creates mandatory obligations you must fulfill.");
        }
        explanation
    }

    pub fn recommend(&self, clause_type: ClauseType) -> &'static str {
        match clause_type {
            ClauseType::Liability => "Ask a lawyer if you might have to pay money if something goes wrong.",
            ClauseType::Warranty => "Make sure you can do what you promise.",
            ClauseType::Termination => "Understand how to end this agreement.",
            ClauseType::Financial => "Check all payment amounts and dates.",
            ClauseType::Confidentiality => "Be careful about sharing information.",
            ClauseType::IntellectualProperty => "Know who owns what you create.",
            ClauseType::DisputeResolution => "Understand how problems will be solved.",
            ClauseType::General => "Read this carefully and ask questions if confused.",
        }
    }
}

fn base_explanation(clause_type: ClauseType) -> &'static str {
    match clause_type {
        ClauseType::Liability => "This clause determines who is responsible for damages or losses if something goes wrong.\nIt affects your financial risk and legal protection in the agreement.",
        ClauseType::Warranty => "This is a promise or guarantee about the quality, performance, or condition of something.\nIf the warranty is broken, you may have the right to compensation or repair.",
        ClauseType::Termination => "This clause explains the conditions and procedures for ending the agreement.\nIt covers when, how, and what happens after the contract is terminated.",
        ClauseType::Financial => "This section deals with money matters including payments, fees, costs, and financial obligations.\nIt determines how much you pay, when you pay, and what happens if you miss payments.",
        ClauseType::Confidentiality => "This requires you to keep certain information private and not share it with others.\nBreaking confidentiality could result in legal consequences or financial penalties.",
        ClauseType::IntellectualProperty => "This determines who owns ideas, inventions, creative works, or other intellectual property.\nIt affects your rights to use, modify, or profit from intellectual property.",
        ClauseType::DisputeResolution => "This explains how disagreements or conflicts will be handled if they arise.\nIt may require mediation, arbitration, or specify which courts can hear disputes.",
        ClauseType::General => "This clause contains basic rules and conditions that apply to the overall agreement.\nIt helps define the framework and general obligations for both parties.",
    }
}

/// Capitalize the replacement when the replaced word started with a capital.
fn match_leading_case(original: &str, replacement: &str) -> String {
    let starts_upper = original.chars().next().is_some_and(char::is_uppercase);
    if !starts_upper {
        return replacement.to_string();
    }
    let mut chars = replacement.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl EnrichmentService for PatternSimplifier {
    fn enrich(
        &self,
        text: &str,
        clause_type: ClauseType,
        request: &EnrichmentRequest,
    ) -> Result<Enrichment, EnrichmentError> {
        if request.target_language.is_some() {
            tracing::debug!("pattern simplifier does not translate; skipping translation");
        }
        Ok(Enrichment {
            simplified: request.simplify.then(|| self.simplify(text)),
            translated: None,
            explanation: request.explain.then(|| self.explain(text, clause_type)),
            recommendation: Some(self.recommend(clause_type).to_string()),
            language: None,
            method: self.name().to_string(),
        })
    }

    fn name(&self) -> &str {
        "pattern-simplifier"
    }
}
