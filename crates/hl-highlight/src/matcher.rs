//! Case-insensitive literal phrase matching.

use hl_core::HighlightError;
use hl_core::HighlightResult;
use regex::Regex;
use regex::RegexBuilder;

use crate::render::mark_up;

/// One occurrence of a phrase: byte range into the searched text plus the
/// index of the phrase in the configured list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
    pub phrase: usize,
}

/// Phrase list compiled into a single leftmost-first alternation.
///
/// Every phrase is escaped so it is matched literally, and gets its own
/// capture group so a match can be traced back to the phrase that produced
/// it. Matching is substring-based, so a phrase inside a longer word counts.
#[derive(Debug, Clone)]
pub struct PhraseMatcher {
    pattern: Option<Regex>,
}

impl PhraseMatcher {
    pub fn new<S: AsRef<str>>(phrases: &[S]) -> HighlightResult<Self> {
        if phrases.is_empty() {
            return Ok(Self { pattern: None });
        }

        let mut source = String::new();
        for (index, phrase) in phrases.iter().enumerate() {
            let phrase = phrase.as_ref();
            if phrase.is_empty() {
                return Err(HighlightError::new(
                    "highlight.empty_phrase",
                    format!("phrase #{index} is empty and would match everywhere"),
                ));
            }

            if index > 0 {
                source.push('|');
            }
            source.push('(');
            source.push_str(&regex::escape(phrase));
            source.push(')');
        }

        let pattern = RegexBuilder::new(&source)
            .case_insensitive(true)
            .build()
            .map_err(|error| {
                let code = match error {
                    regex::Error::CompiledTooBig(_) => "highlight.pattern_too_large",
                    _ => "highlight.invalid_pattern",
                };
                HighlightError::new(
                    code,
                    format!("failed compiling {} phrases: {error}", phrases.len()),
                )
            })?;

        Ok(Self {
            pattern: Some(pattern),
        })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(text))
    }

    /// Non-overlapping occurrences in position order.
    ///
    /// At any position the leftmost match wins; among phrases starting at the
    /// same offset the one listed first wins.
    pub fn find_spans(&self, text: &str) -> Vec<MatchSpan> {
        let Some(pattern) = &self.pattern else {
            return Vec::new();
        };

        pattern
            .captures_iter(text)
            .filter_map(|captures| {
                let whole = captures.get(0)?;
                let phrase = (1..captures.len()).find(|group| captures.get(*group).is_some())?;
                Some(MatchSpan {
                    start: whole.start(),
                    end: whole.end(),
                    phrase: phrase - 1,
                })
            })
            .collect()
    }

    /// Marked-up replacement for `text`, or `None` when no phrase occurs in it.
    pub fn find_and_mark(&self, text: &str, style: &str) -> Option<String> {
        if !self.is_match(text) {
            return None;
        }

        let spans = self.find_spans(text);
        if spans.is_empty() {
            return None;
        }

        Some(mark_up(text, &spans, style))
    }
}
