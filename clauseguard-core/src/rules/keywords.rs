use regex::{RegexSet, RegexSetBuilder};

/// A list of keywords matched case-insensitively at word starts.
///
/// "terminate" matches "terminated" but "end" does not match "Vendor" and
/// "nda" does not match "standard". Each keyword is reported at most once no
/// matter how often it occurs.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    keywords: Vec<String>,
    set: RegexSet,
}

impl KeywordSet {
    pub fn new(keywords: &[String]) -> Result<Self, regex::Error> {
        let patterns: Vec<String> = keywords
            .iter()
            .map(|kw| format!(r"\b{}", regex::escape(&kw.to_lowercase())))
            .collect();
        let set = RegexSetBuilder::new(&patterns)
            .case_insensitive(true)
            .build()?;
        Ok(Self {
            keywords: keywords.to_vec(),
            set,
        })
    }

    /// Matched keywords in list order.
    pub fn matches<'a>(&'a self, text: &str) -> Vec<&'a str> {
        self.set
            .matches(text)
            .into_iter()
            .map(|idx| self.keywords[idx].as_str())
            .collect()
    }

    /// Number of distinct keywords present.
    pub fn count(&self, text: &str) -> usize {
        self.set.matches(text).iter().count()
    }

    pub fn any(&self, text: &str) -> bool {
        self.set.is_match(text)
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &[&str]) -> KeywordSet {
        let words: Vec<String> = words.iter().map(|w| w.to_string()).collect();
        KeywordSet::new(&words).unwrap()
    }

    #[test]
    fn test_matches_at_word_start_only() {
        let kws = set(&["end", "nda", "terminate"]);
        assert!(kws.matches("The Vendor uses standard terms").is_empty());
        assert_eq!(kws.matches("This may be terminated at the end"), vec!["end", "terminate"]);
    }

    #[test]
    fn test_case_insensitive_and_counted_once() {
        let kws = set(&["hold harmless", "indemnify"]);
        let text = "INDEMNIFY and indemnify and Hold Harmless";
        assert_eq!(kws.count(text), 2);
        assert_eq!(kws.matches(text), vec!["hold harmless", "indemnify"]);
    }

    #[test]
    fn test_keywords_with_punctuation() {
        let kws = set(&["non-compete", "act of god"]);
        assert!(kws.any("a strict Non-Compete applies"));
        assert!(!kws.any("non compete"));
    }

    #[test]
    fn test_empty_set_matches_nothing() {
        let kws = set(&[]);
        assert!(kws.is_empty());
        assert_eq!(kws.count("anything at all"), 0);
    }
}
