use crate::config::ClassificationConfig;
use crate::error::ConfigError;
use crate::rules::KeywordSet;
use crate::types::{ClauseType, Importance};

/// Assigns a clause type and importance level from keyword evidence.
pub struct ClauseClassifier {
    // Category order is the tie-break order
    categories: Vec<(ClauseType, KeywordSet)>,
    high_importance: KeywordSet,
    medium_importance: KeywordSet,
}

fn keyword_set(name: &str, keywords: &[String]) -> Result<KeywordSet, ConfigError> {
    KeywordSet::new(keywords).map_err(|source| ConfigError::InvalidPattern {
        name: name.to_string(),
        source,
    })
}

impl ClauseClassifier {
    pub fn new(config: &ClassificationConfig) -> Result<Self, ConfigError> {
        let categories = config
            .categories
            .iter()
            .map(|category| {
                let name = format!("classification.{}", category.clause_type);
                Ok((category.clause_type, keyword_set(&name, &category.keywords)?))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(Self {
            categories,
            high_importance: keyword_set("importance.high", &config.high_importance_keywords)?,
            medium_importance: keyword_set("importance.medium", &config.medium_importance_keywords)?,
        })
    }

    pub fn classify(&self, text: &str) -> (ClauseType, Importance) {
        (self.clause_type(text), self.importance(text))
    }

    /// Category with the strictly highest number of distinct keywords present.
    pub fn clause_type(&self, text: &str) -> ClauseType {
        let mut best = ClauseType::General;
        let mut best_count = 0;
        for (clause_type, keywords) in &self.categories {
            let count = keywords.count(text);
            if count > best_count {
                best = *clause_type;
                best_count = count;
            }
        }
        best
    }

    pub fn importance(&self, text: &str) -> Importance {
        if self.high_importance.any(text) {
            Importance::High
        } else if self.medium_importance.any(text) {
            Importance::Medium
        } else {
            Importance::Low
        }
    }
}

impl Default for ClauseClassifier {
    fn default() -> Self {
        Self::new(&ClassificationConfig::default()).expect("default keyword lists are valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CategoryKeywords;

    #[test]
    fn test_liability_clause() {
        let classifier = ClauseClassifier::default();
        let (clause_type, importance) =
            classifier.classify("1. LIABILITY: The Contractor shall be liable for unlimited damages.");
        assert_eq!(clause_type, ClauseType::Liability);
        assert_eq!(importance, Importance::High);
    }

    #[test]
    fn test_no_keywords_is_general_low() {
        let classifier = ClauseClassifier::default();
        assert_eq!(
            classifier.classify("standard business day definitions apply"),
            (ClauseType::General, Importance::Low)
        );
    }

    #[test]
    fn test_tie_goes_to_first_listed_category() {
        let classifier = ClauseClassifier::default();
        // one liability keyword, one financial keyword
        let (clause_type, _) = classifier.classify("damages are added to the invoice");
        assert_eq!(clause_type, ClauseType::Liability);
    }

    #[test]
    fn test_keyword_counted_once_per_category() {
        let classifier = ClauseClassifier::default();
        // "payment" three times is still one financial keyword; two dispute keywords win
        let text = "payment payment payment under the governing law of the chosen court";
        assert_eq!(classifier.clause_type(text), ClauseType::DisputeResolution);
    }

    #[test]
    fn test_importance_levels() {
        let classifier = ClauseClassifier::default();
        assert_eq!(classifier.importance("The Buyer must pay"), Importance::High);
        assert_eq!(classifier.importance("The Buyer may pay"), Importance::Medium);
        assert_eq!(classifier.importance("Payment terms follow"), Importance::Low);
    }

    #[test]
    fn test_custom_category_order() {
        let config = ClassificationConfig {
            categories: vec![
                CategoryKeywords {
                    clause_type: ClauseType::Financial,
                    keywords: vec!["invoice".to_string()],
                },
                CategoryKeywords {
                    clause_type: ClauseType::Liability,
                    keywords: vec!["damages".to_string()],
                },
            ],
            ..ClassificationConfig::default()
        };
        let classifier = ClauseClassifier::new(&config).unwrap();
        assert_eq!(
            classifier.clause_type("damages are added to the invoice"),
            ClauseType::Financial
        );
    }
}
