use crate::config::NormalizerConfig;
use regex::Regex;
use std::sync::LazyLock;

static PAGE_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bpage\s+\d+\s+of\s+\d+\b").unwrap());

// A line holding nothing but a number (page or line numbering in scans)
static BARE_NUMBER_LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*\d+[ \t]*$").unwrap());

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static SENTENCE_BREAK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([.!?]) ([A-Z])").unwrap());

// "1", "(2)", "a", "(b)": enumerators whose trailing dot is not a sentence end
static ENUMERATOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(?(?:\d+|[A-Za-z])\)?$").unwrap());

/// Cleans raw extracted text before segmentation.
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    config: NormalizerConfig,
}

impl TextNormalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Strip page artifacts, collapse whitespace, and put each sentence that
    /// starts with a capital letter on its own line. Never fails.
    pub fn normalize(&self, raw: &str) -> String {
        if raw.trim().is_empty() {
            return String::new();
        }

        let mut text = raw.to_string();
        if self.config.strip_page_markers {
            text = PAGE_MARKER_REGEX.replace_all(&text, " ").into_owned();
        }
        if self.config.strip_line_numbers {
            text = BARE_NUMBER_LINE_REGEX.replace_all(&text, "").into_owned();
        }

        let collapsed = WHITESPACE_REGEX.replace_all(&text, " ");
        let collapsed = collapsed.trim();

        if self.config.mark_sentence_breaks {
            mark_sentence_breaks(collapsed)
        } else {
            collapsed.to_string()
        }
    }
}

/// Free-function form with default settings.
pub fn normalize(raw: &str) -> String {
    TextNormalizer::default().normalize(raw)
}

fn mark_sentence_breaks(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for caps in SENTENCE_BREAK_REGEX.captures_iter(text) {
        let Some(punct) = caps.get(1) else {
            continue;
        };
        let preceding_token = text[..punct.start()]
            .rsplit(' ')
            .next()
            .unwrap_or_default();
        if ENUMERATOR_REGEX.is_match(preceding_token) {
            // "1. LIABILITY" keeps its header on one line
            continue;
        }
        // Replace only the single space between punctuation and capital
        let space_at = punct.end();
        out.push_str(&text[last..space_at]);
        out.push('\n');
        last = space_at + 1;
    }
    out.push_str(&text[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_whitespace_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("  \n\t "), "");
    }

    #[test]
    fn test_strips_page_markers() {
        let text = normalize("The Buyer shall pay. page 3 of 12 the rest follows");
        assert!(!text.to_lowercase().contains("page 3 of 12"));
        assert!(text.contains("the rest follows"));
    }

    #[test]
    fn test_strips_bare_number_lines() {
        let text = normalize("first line of the agreement\n 17 \nsecond line with 30 days");
        assert_eq!(text, "first line of the agreement second line with 30 days");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize("a\t\tb\n\n  c"), "a b c");
    }

    #[test]
    fn test_marks_sentence_breaks() {
        let text = normalize("The term ends. The Buyer pays! Why? Because.");
        assert_eq!(text, "The term ends.\nThe Buyer pays!\nWhy?\nBecause.");
    }

    #[test]
    fn test_enumerators_stay_with_their_header() {
        let text = normalize("1. LIABILITY: The Contractor is liable. 2. TERMINATION: Ends.");
        assert_eq!(text, "1. LIABILITY: The Contractor is liable. 2. TERMINATION: Ends.");
        let text = normalize("(a) Scope. B. Other");
        assert_eq!(text, "(a) Scope.\nB. Other");
    }

    #[test]
    fn test_lowercase_continuation_is_not_split() {
        assert_eq!(normalize("approx. ten days"), "approx. ten days");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let raw = "SECTION 1 Scope. The Vendor shall deliver.\n\n Page 1 of 2 \n SECTION 2 Fees.";
        let once = normalize(raw);
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_config_disables_sentence_breaks() {
        let normalizer = TextNormalizer::new(NormalizerConfig {
            mark_sentence_breaks: false,
            ..NormalizerConfig::default()
        });
        assert_eq!(normalizer.normalize("One. Two."), "One. Two.");
    }
}
