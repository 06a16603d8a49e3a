// WHY: Sentence segmentation over raw text with decimal-, abbreviation- and ellipsis-aware boundaries
// Spans borrow from the source text so they cannot outlive the text version they index

use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::OnceLock;
use tracing::debug;

pub mod abbreviations;
pub mod normalization;

// Re-export core types
pub use abbreviations::{AbbreviationChecker, AbbreviationConfig};
pub use normalization::{
    normalize_for_speech, normalize_sentence, normalize_sentence_into, speech_chunk, SpeechChunk,
};

/// Configuration for sentence boundary detection rules
#[derive(Debug, Clone)]
pub struct SentenceBoundaryRules {
    /// End punctuation characters that can terminate a sentence
    pub end_punctuation: Vec<char>,
    /// Closing quotes and brackets absorbed into the sentence after its terminator
    pub trailing_closers: Vec<char>,
    /// Opening quotes and brackets stripped from the front of an abbreviation token
    pub opening_marks: Vec<char>,
}

impl Default for SentenceBoundaryRules {
    fn default() -> Self {
        Self {
            end_punctuation: vec!['.', '!', '?'],
            trailing_closers: vec!['"', '\'', ')', ']', '}'],
            opening_marks: vec!['(', '"', '\'', '['],
        }
    }
}

impl SentenceBoundaryRules {
    fn is_end_punctuation(&self, ch: char) -> bool {
        self.end_punctuation.contains(&ch)
    }

    fn is_trailing_closer(&self, ch: char) -> bool {
        self.trailing_closers.contains(&ch)
    }
}

/// One sentence as a byte range into the source text
///
/// `text` is always `&source[start..end]`; it is a convenience view, never edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SentenceSpan<'a> {
    pub start: usize,
    pub end: usize,
    pub text: &'a str,
}

impl<'a> SentenceSpan<'a> {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Whether `offset` falls inside `[start, end)`
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Copy the span out of the source text's lifetime
    pub fn into_owned(self) -> SentenceSpanOwned {
        SentenceSpanOwned {
            start: self.start,
            end: self.end,
            text: self.text.to_string(),
        }
    }
}

/// Owned variant for callers that store spans apart from the text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceSpanOwned {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl SentenceSpanOwned {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Main sentence detector: boundary rules plus abbreviation dictionaries
#[derive(Debug, Clone)]
pub struct SentenceDetector {
    rules: SentenceBoundaryRules,
    abbreviations: AbbreviationChecker,
}

impl SentenceDetector {
    /// Create new sentence detector with custom rules
    pub fn new(rules: SentenceBoundaryRules, abbreviations: AbbreviationChecker) -> Self {
        Self { rules, abbreviations }
    }

    /// Create sentence detector with default rules and dictionaries
    pub fn with_default_rules() -> Self {
        Self::new(SentenceBoundaryRules::default(), AbbreviationChecker::new())
    }

    /// Default rules with dictionaries built from a loaded config
    pub fn with_abbreviations(config: &AbbreviationConfig) -> Self {
        Self::new(SentenceBoundaryRules::default(), AbbreviationChecker::from_config(config))
    }

    pub fn rules(&self) -> &SentenceBoundaryRules {
        &self.rules
    }

    /// Split `text` into ordered, non-overlapping sentence spans
    ///
    /// Single left-to-right scan. Blank input yields no spans. Never fails.
    pub fn detect_sentences<'a>(&self, text: &'a str) -> Vec<SentenceSpan<'a>> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let mut spans = Vec::new();
        let mut start = 0;
        let mut i = 0;

        while i < text.len() {
            let Some(ch) = text[i..].chars().next() else {
                break;
            };
            if !self.rules.is_end_punctuation(ch) {
                i += ch.len_utf8();
                continue;
            }
            if ch == '.' && self.dot_continues_sentence(text, i) {
                i += 1;
                continue;
            }

            let end = self.sentence_end(text, i, ch);
            if let Some(span) = trimmed_span(text, start, end) {
                spans.push(span);
            }
            start = end;
            i = end;
        }

        if start < text.len() {
            if let Some(span) = trimmed_span(text, start, text.len()) {
                spans.push(span);
            }
        }

        if spans.is_empty() {
            spans.push(fallback_span(text));
        }

        debug!(sentences = spans.len(), bytes = text.len(), "Segmented text");
        spans
    }

    /// Decimal, abbreviation and ellipsis-continuation checks, first match wins
    fn dot_continues_sentence(&self, text: &str, idx: usize) -> bool {
        is_decimal(text, idx)
            || self.abbreviations.is_abbreviation_at(text, idx, &self.rules)
            || is_ellipsis_continuation(text, idx)
    }

    /// End of the sentence closed by `terminator` at `idx`: the rest of a dot run,
    /// then any closing quotes and brackets
    fn sentence_end(&self, text: &str, idx: usize, terminator: char) -> usize {
        let bytes = text.as_bytes();
        let mut end = idx + terminator.len_utf8();
        if terminator == '.' {
            while bytes.get(end) == Some(&b'.') {
                end += 1;
            }
        }
        while let Some(ch) = text[end..].chars().next() {
            if !self.rules.is_trailing_closer(ch) {
                break;
            }
            end += ch.len_utf8();
        }
        end
    }
}

impl Default for SentenceDetector {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

static DEFAULT_DETECTOR: OnceLock<SentenceDetector> = OnceLock::new();

/// Segment with the built-in rules and dictionaries
///
/// The default detector is built on first use and shared across threads.
pub fn segment(text: &str) -> Vec<SentenceSpan<'_>> {
    DEFAULT_DETECTOR
        .get_or_init(SentenceDetector::with_default_rules)
        .detect_sentences(text)
}

/// A digit on both sides of the dot, e.g. `3.14`
fn is_decimal(text: &str, idx: usize) -> bool {
    let bytes = text.as_bytes();
    idx > 0
        && bytes[idx - 1].is_ascii_digit()
        && bytes.get(idx + 1).is_some_and(u8::is_ascii_digit)
}

/// Part of a run of three or more dots followed by lowercase text or a digit
fn is_ellipsis_continuation(text: &str, idx: usize) -> bool {
    let bytes = text.as_bytes();
    let mut left = idx;
    while left > 0 && bytes[left - 1] == b'.' {
        left -= 1;
    }
    let mut right = idx;
    while bytes.get(right + 1) == Some(&b'.') {
        right += 1;
    }
    if right - left + 1 < 3 {
        return false;
    }
    abbreviations::next_non_whitespace(text, right + 1)
        .is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
}

/// `text[start..end]` with leading whitespace dropped, or `None` if blank
fn trimmed_span(text: &str, start: usize, end: usize) -> Option<SentenceSpan<'_>> {
    let raw = &text[start..end];
    let trimmed = raw.trim_start();
    if trimmed.is_empty() {
        return None;
    }
    let start = start + (raw.len() - trimmed.len());
    Some(SentenceSpan {
        start,
        end,
        text: trimmed,
    })
}

/// Whole-text span used when a non-blank scan produced nothing.
///
/// NOTE: deliberately untrimmed, unlike every other span; downstream readers
/// may depend on the whole text coming back verbatim.
fn fallback_span(text: &str) -> SentenceSpan<'_> {
    debug!(bytes = text.len(), "No sentence spans found, using whole text");
    SentenceSpan {
        start: 0,
        end: text.len(),
        text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts<'a>(spans: &[SentenceSpan<'a>]) -> Vec<&'a str> {
        spans.iter().map(|s| s.text).collect()
    }

    #[test]
    fn test_basic_sentences() {
        let detector = SentenceDetector::with_default_rules();
        let text = "Hello world. This is a test! How are you?";
        let spans = detector.detect_sentences(text);

        assert_eq!(texts(&spans), vec!["Hello world.", "This is a test!", "How are you?"]);
        assert_eq!(spans[1].range(), 13..28);
        for span in &spans {
            assert_eq!(&text[span.range()], span.text);
        }
    }

    #[test]
    fn test_blank_input_yields_nothing() {
        assert!(segment("").is_empty());
        assert!(segment(" \n\t ").is_empty());
    }

    #[test]
    fn test_fallback_span_is_untrimmed() {
        let span = fallback_span("  \n");
        assert_eq!(span.start, 0);
        assert_eq!(span.end, 3);
        assert_eq!(span.text, "  \n");
    }

    #[test]
    fn test_trimmed_span_skips_leading_whitespace() {
        let text = "One.  Two.";
        let span = trimmed_span(text, 4, text.len()).unwrap();
        assert_eq!(span.start, 6);
        assert_eq!(span.text, "Two.");
        assert!(trimmed_span(text, 4, 6).is_none());
    }

    #[test]
    fn test_decimal_detection() {
        assert!(is_decimal("3.14", 1));
        assert!(!is_decimal("3.x", 1));
        assert!(!is_decimal(".5", 0));
        assert!(!is_decimal("5.", 1));
    }

    #[test]
    fn test_ellipsis_continuation_detection() {
        let text = "Wait... maybe";
        assert!(is_ellipsis_continuation(text, 4));
        assert!(is_ellipsis_continuation(text, 6));
        assert!(is_ellipsis_continuation("Wait... 5 more", 4));
        assert!(!is_ellipsis_continuation("Wait... Then", 4));
        assert!(!is_ellipsis_continuation("Wait.. maybe", 4));
    }

    #[test]
    fn test_terminal_ellipsis_absorbed() {
        let spans = segment("It faded... Then silence.");
        assert_eq!(texts(&spans), vec!["It faded...", "Then silence."]);
    }

    #[test]
    fn test_multibyte_text_keeps_char_boundaries() {
        let text = "Café déjà vu. Ça va? Oui.";
        let spans = segment(text);
        assert_eq!(texts(&spans), vec!["Café déjà vu.", "Ça va?", "Oui."]);
        for span in &spans {
            assert!(text.is_char_boundary(span.start));
            assert!(text.is_char_boundary(span.end));
        }
    }

    #[test]
    fn test_custom_closers() {
        let rules = SentenceBoundaryRules {
            trailing_closers: vec!['\u{201D}'],
            ..SentenceBoundaryRules::default()
        };
        let detector = SentenceDetector::new(rules, AbbreviationChecker::new());
        assert_eq!(detector.rules().trailing_closers, vec!['\u{201D}']);
        let spans = detector.detect_sentences("He said \u{201C}Go.\u{201D} We went.");
        assert_eq!(texts(&spans), vec!["He said \u{201C}Go.\u{201D}", "We went."]);
    }

    #[test]
    fn test_into_owned_preserves_span() {
        let spans = segment("First. Second.");
        let owned = spans[1].into_owned();
        assert_eq!(owned.range(), 7..14);
        assert_eq!(owned.text, "Second.");
    }
}
