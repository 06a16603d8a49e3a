// WHY: Resolve a byte offset to the sentence, word or paragraph containing it
// Queries run against cached spans and raw text; nothing here re-segments

use std::ops::Range;

use crate::sentence_detector::SentenceSpan;

/// Index of the sentence containing the UTF-8 byte offset `offset`
///
/// Char or UTF-16 indices from a speech engine must be converted to byte
/// offsets first.
///
/// Binary search over spans sorted by `start`. An offset in the whitespace gap
/// between two sentences resolves to the *next* sentence, and one past the last
/// sentence to the last. An empty span list resolves to 0, so callers must
/// still bounds-check before indexing.
pub fn sentence_index_for(spans: &[SentenceSpan<'_>], text: &str, offset: usize) -> usize {
    if spans.is_empty() {
        return 0;
    }
    let at = offset.min(text.len());

    let mut lo = 0;
    let mut hi = spans.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let span = &spans[mid];
        if at < span.start {
            hi = mid;
        } else if at >= span.end {
            lo = mid + 1;
        } else {
            return mid;
        }
    }
    lo.min(spans.len() - 1)
}

/// ASCII letters, digits, apostrophe and hyphen
pub fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'\'' || byte == b'-'
}

/// Byte range of the word at byte offset `offset`, or of the nearest word if there is none
///
/// Looks forward first, then backward. An empty range means the text has no
/// word characters at all.
pub fn word_range_at(text: &str, offset: usize) -> Range<usize> {
    let bytes = text.as_bytes();
    if bytes.is_empty() {
        return 0..0;
    }
    let idx = offset.min(bytes.len() - 1);

    let anchor = if is_word_byte(bytes[idx]) {
        idx
    } else if let Some(pos) = bytes[idx + 1..].iter().position(|&b| is_word_byte(b)) {
        idx + 1 + pos
    } else if let Some(pos) = bytes[..idx].iter().rposition(|&b| is_word_byte(b)) {
        pos
    } else {
        return 0..0;
    };

    let mut start = anchor;
    while start > 0 && is_word_byte(bytes[start - 1]) {
        start -= 1;
    }
    let mut end = anchor + 1;
    while end < bytes.len() && is_word_byte(bytes[end]) {
        end += 1;
    }
    start..end
}

/// Byte range of the paragraph around byte offset `offset`, whitespace trimmed
///
/// Paragraphs are separated by a blank line (`"\n\n"`).
pub fn paragraph_range_at(text: &str, offset: usize) -> Range<usize> {
    let bytes = text.as_bytes();
    if bytes.is_empty() {
        return 0..0;
    }
    let at = offset.min(bytes.len());

    let start = (1..at)
        .rev()
        .find(|&i| bytes[i] == b'\n' && bytes[i - 1] == b'\n')
        .map_or(0, |i| i + 1);
    let end = (at..bytes.len().saturating_sub(1))
        .find(|&i| bytes[i] == b'\n' && bytes[i + 1] == b'\n')
        .unwrap_or(bytes.len());

    let raw = &text[start..end];
    let trimmed_start = start + (raw.len() - raw.trim_start().len());
    let trimmed_end = (start + raw.trim_end().len()).max(trimmed_start);
    trimmed_start..trimmed_end
}

/// Largest char boundary at or below `offset`, clamped to the text
pub(crate) fn floor_char_boundary(text: &str, offset: usize) -> usize {
    let mut at = offset.min(text.len());
    while !text.is_char_boundary(at) {
        at -= 1;
    }
    at
}
