use super::engine::{Fragment, FragmentOrigin, SegmentRule};
use crate::config::{HeaderKind, HeaderPatternConfig};
use crate::error::ConfigError;
use regex::{Regex, RegexBuilder};

// Punctuation allowed between two headers that still count as one header ("1. LIABILITY:")
const HEADER_JOINERS: &[char] = &[':', ';', '.', ',', '-'];
// Punctuation after which a positional marker may open a clause
const SENTENCE_ENDERS: &[char] = &['.', '!', '?', ';', ':'];

#[derive(Debug, Clone)]
struct CompiledHeader {
    name: String,
    regex: Regex,
    kind: HeaderKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeaderMatch<'a> {
    start: usize,
    end: usize,
    name: &'a str,
}

/// Splits text at clause headers. The header stays at the start of the clause
/// it opens, and the text ahead of the first header becomes a preamble fragment.
pub struct HeaderSplitRule {
    headers: Vec<CompiledHeader>,
}

impl HeaderSplitRule {
    pub fn new(patterns: &[HeaderPatternConfig]) -> Result<Self, ConfigError> {
        let headers = patterns
            .iter()
            .map(|p| {
                let regex = RegexBuilder::new(&p.pattern)
                    .case_insensitive(!p.case_sensitive)
                    .multi_line(true)
                    .build()
                    .map_err(|source| ConfigError::InvalidPattern {
                        name: p.name.clone(),
                        source,
                    })?;
                Ok(CompiledHeader {
                    name: p.name.clone(),
                    regex,
                    kind: p.kind,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(Self { headers })
    }

    fn find_headers<'a>(&'a self, text: &str) -> Vec<HeaderMatch<'a>> {
        let mut matches: Vec<HeaderMatch> = self
            .headers
            .iter()
            .flat_map(|header| {
                header
                    .regex
                    .find_iter(text)
                    .filter(|m| m.end() > m.start())
                    .filter(|m| header.kind != HeaderKind::Positional || opens_clause(text, m.start()))
                    .map(|m| HeaderMatch {
                        start: m.start(),
                        end: m.end(),
                        name: header.name.as_str(),
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        matches.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
        matches
    }

    /// Start offsets of clause boundaries, with the name of the opening header.
    /// Overlapping or back-to-back headers collapse into the first one.
    fn boundaries<'a>(&'a self, text: &str) -> Vec<(usize, &'a str)> {
        let mut boundaries = Vec::new();
        let mut group_end: Option<usize> = None;

        for m in self.find_headers(text) {
            let joins_previous = match group_end {
                Some(end) if m.start <= end => true,
                Some(end) => text[end..m.start]
                    .chars()
                    .all(|c| c.is_whitespace() || HEADER_JOINERS.contains(&c)),
                None => false,
            };

            if joins_previous {
                group_end = group_end.map(|end| end.max(m.end));
            } else {
                boundaries.push((m.start, m.name));
                group_end = Some(m.end);
            }
        }
        boundaries
    }

    fn split(&self, text: &str) -> Vec<Fragment> {
        let boundaries = self.boundaries(text);
        if boundaries.is_empty() {
            return vec![Fragment::new(text, FragmentOrigin::Document)];
        }

        let mut fragments = Vec::with_capacity(boundaries.len() + 1);
        let preamble = &text[..boundaries[0].0];
        if !preamble.trim().is_empty() {
            fragments.push(Fragment::new(preamble, FragmentOrigin::Preamble));
        }
        for (i, (start, name)) in boundaries.iter().enumerate() {
            let end = boundaries.get(i + 1).map_or(text.len(), |(next, _)| *next);
            fragments.push(Fragment::new(
                &text[*start..end],
                FragmentOrigin::Header(name.to_string()),
            ));
        }
        fragments
    }
}

/// Positional markers ("1.", "(a)") only open a clause at a line start or
/// right after sentence-ending punctuation and whitespace.
fn opens_clause(text: &str, start: usize) -> bool {
    let before = &text[..start];
    let line_prefix = before.rsplit('\n').next().unwrap_or_default();
    if line_prefix.trim().is_empty() {
        return true;
    }

    let trimmed = before.trim_end();
    trimmed.len() < before.len()
        && trimmed
            .chars()
            .next_back()
            .is_some_and(|c| SENTENCE_ENDERS.contains(&c))
}

impl SegmentRule for HeaderSplitRule {
    fn apply(&self, _source: &str, fragments: Vec<Fragment>) -> Vec<Fragment> {
        fragments
            .into_iter()
            .flat_map(|fragment| match fragment.origin {
                FragmentOrigin::Document => self.split(&fragment.text),
                _ => vec![fragment],
            })
            .collect()
    }

    fn name(&self) -> &str {
        "HeaderSplit"
    }
}
