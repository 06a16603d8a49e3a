// WHY: Sentence stepping and highlight selection shared by every reader front end
// Pure functions over spans and offsets; the caller owns timers and playback state

use serde::Serialize;
use std::ops::Range;
use std::time::{Duration, Instant};

use crate::position::{paragraph_range_at, sentence_index_for, word_range_at};
use crate::sentence_detector::SentenceSpan;

/// A second "previous" within this window restarts the current sentence
pub const DOUBLE_BACK_WINDOW: Duration = Duration::from_millis(560);

/// Whether a back command at `now` repeats the one at `last` quickly enough
pub fn is_quick_double_back(last: Option<Instant>, now: Instant) -> bool {
    last.is_some_and(|last| now.saturating_duration_since(last) < DOUBLE_BACK_WINDOW)
}

/// Target of a "next sentence" command
///
/// While playing, steps from the sentence being read; otherwise from the
/// sentence under the cursor. Stays on the last sentence at the end.
pub fn next_sentence_index(
    spans: &[SentenceSpan<'_>],
    text: &str,
    cursor: usize,
    playing: Option<usize>,
) -> Option<usize> {
    let last = spans.len().checked_sub(1)?;
    let current = playing.unwrap_or_else(|| sentence_index_for(spans, text, cursor));
    Some(current.saturating_add(1).min(last))
}

/// Target of a "previous sentence" command
///
/// A quick double-back restarts the current sentence instead of stepping back.
pub fn previous_sentence_index(
    spans: &[SentenceSpan<'_>],
    text: &str,
    cursor: usize,
    playing: Option<usize>,
    quick_double_back: bool,
) -> Option<usize> {
    let last = spans.len().checked_sub(1)?;
    let current = playing
        .unwrap_or_else(|| sentence_index_for(spans, text, cursor))
        .min(last);
    if quick_double_back {
        Some(current)
    } else {
        Some(current.saturating_sub(1))
    }
}

/// Selection to show after jumping to `span`: its first word, or a caret at its start
pub fn selection_for_sentence(text: &str, span: &SentenceSpan<'_>) -> Range<usize> {
    let word = word_range_at(text, span.start);
    if word.is_empty() {
        span.start..span.start
    } else {
        word
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Word,
    Sentence,
    Paragraph,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Highlight {
    pub range: Range<usize>,
    pub granularity: Granularity,
}

/// What to highlight for a progress report at `offset`
///
/// Word first; if there is no word, the sentence being read; failing that the
/// paragraph around the offset.
pub fn resolve_highlight(
    spans: &[SentenceSpan<'_>],
    text: &str,
    offset: usize,
    sentence_index: usize,
) -> Highlight {
    let word = word_range_at(text, offset);
    if !word.is_empty() {
        return Highlight {
            range: word,
            granularity: Granularity::Word,
        };
    }
    if let Some(span) = spans.get(sentence_index) {
        return Highlight {
            range: span.range(),
            granularity: Granularity::Sentence,
        };
    }
    Highlight {
        range: paragraph_range_at(text, offset),
        granularity: Granularity::Paragraph,
    }
}
