use super::engine::{Fragment, FragmentOrigin, SegmentRule};
use crate::config::SegmentationConfig;
use regex::Regex;
use std::sync::LazyLock;

static PARAGRAPH_BREAK_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

static SENTENCE_END_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]\s+").unwrap());

/// Fallback for text without usable headers: one fragment per paragraph, with
/// overlong paragraphs re-chunked by sentence.
pub struct SentenceFallbackRule {
    paragraph_split_chars: usize,
    chunk_target_chars: usize,
}

impl SentenceFallbackRule {
    pub fn new(config: &SegmentationConfig) -> Self {
        Self {
            paragraph_split_chars: config.paragraph_split_chars,
            chunk_target_chars: config.chunk_target_chars,
        }
    }

    fn split_paragraphs(&self, text: &str) -> Vec<Fragment> {
        let mut fragments = Vec::new();
        for paragraph in PARAGRAPH_BREAK_REGEX.split(text) {
            if paragraph.chars().count() > self.paragraph_split_chars {
                fragments.extend(
                    self.chunk_sentences(paragraph)
                        .into_iter()
                        .map(|chunk| Fragment::new(chunk, FragmentOrigin::SentenceChunk)),
                );
            } else {
                fragments.push(Fragment::new(paragraph.trim(), FragmentOrigin::Paragraph));
            }
        }
        fragments
    }

    /// Greedily packs sentences into chunks, flushing before a sentence would
    /// push the chunk past the target length.
    fn chunk_sentences(&self, paragraph: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut current_len = 0;

        for sentence in split_by_sentences(paragraph) {
            let sentence_len = sentence.chars().count();
            if current_len + sentence_len > self.chunk_target_chars && !current.is_empty() {
                chunks.push(current.trim().to_string());
                current.clear();
                current_len = 0;
            }
            current.push_str(sentence);
            current.push(' ');
            current_len += sentence_len + 1;
        }

        if !current.trim().is_empty() {
            chunks.push(current.trim().to_string());
        }
        chunks
    }
}

/// Splits after `.`, `!` or `?` followed by whitespace; the punctuation stays
/// with its sentence.
pub fn split_by_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut last = 0;
    for m in SENTENCE_END_REGEX.find_iter(text) {
        let sentence = text[last..m.start() + 1].trim();
        if !sentence.is_empty() {
            sentences.push(sentence);
        }
        last = m.end();
    }
    let tail = text[last..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

impl SegmentRule for SentenceFallbackRule {
    fn apply(&self, source: &str, fragments: Vec<Fragment>) -> Vec<Fragment> {
        if fragments.len() > 1 {
            return fragments;
        }
        tracing::debug!("no clause headers found, falling back to paragraphs and sentences");
        self.split_paragraphs(source)
    }

    fn name(&self) -> &str {
        "SentenceFallback"
    }
}

/// Drops fragments too short to be a clause (page furniture, stray headings).
pub struct NoiseFilterRule {
    min_chars: usize,
}

impl NoiseFilterRule {
    pub fn new(min_chars: usize) -> Self {
        Self { min_chars }
    }
}

impl SegmentRule for NoiseFilterRule {
    fn apply(&self, _source: &str, fragments: Vec<Fragment>) -> Vec<Fragment> {
        let before = fragments.len();
        let kept: Vec<Fragment> = fragments
            .into_iter()
            .filter(|f| f.trimmed_len() > self.min_chars)
            .collect();
        if kept.len() < before {
            tracing::debug!(dropped = before - kept.len(), "dropped short fragments");
        }
        kept
    }

    fn name(&self) -> &str {
        "NoiseFilter"
    }
}
