// WHY: Text shaping for display and for speech engines, kept apart from boundary detection
// Speech normalization must not shift offsets, so progress reports map straight back to the source

use crate::position::floor_char_boundary;

use super::SentenceSpan;

/// Normalize sentence by collapsing every whitespace run (including \r\n) to one space
pub fn normalize_sentence(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    normalize_sentence_into(text, &mut result);
    result
}

/// Normalize sentence into supplied buffer to avoid allocation
/// WHY: enables buffer reuse when printing many sentences
pub fn normalize_sentence_into(text: &str, buffer: &mut String) {
    buffer.clear();
    buffer.reserve(text.len());

    let mut prev_was_space = true;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !prev_was_space {
                buffer.push(' ');
                prev_was_space = true;
            }
        } else {
            buffer.push(ch);
            prev_was_space = false;
        }
    }

    if buffer.ends_with(' ') {
        buffer.pop();
    }
}

/// Replace straight and curly double quotes with spaces, byte length unchanged
///
/// Speech engines tend to read quote marks aloud or stumble on them. Each quote
/// becomes as many spaces as it had UTF-8 bytes, so an offset reported against
/// the result is also a valid offset into the input.
pub fn normalize_for_speech(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '"' | '\u{201C}' | '\u{201D}' => {
                for _ in 0..ch.len_utf8() {
                    result.push(' ');
                }
            }
            _ => result.push(ch),
        }
    }
    result
}

/// The part of a sentence handed to a speech engine, and where it sits in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechChunk {
    /// Byte offset of the chunk in the source text
    pub start: usize,
    /// Speech-normalized chunk, same byte length as the source slice
    pub text: String,
}

impl SpeechChunk {
    /// Map an offset reported against the chunk back into the source text
    pub fn to_source_offset(&self, local: usize) -> usize {
        self.start + local.min(self.text.len())
    }
}

/// Build the chunk to speak for `span`, resuming at `from` if it lies inside the span
///
/// Returns `None` when nothing but whitespace is left to speak.
pub fn speech_chunk(text: &str, span: &SentenceSpan<'_>, from: usize) -> Option<SpeechChunk> {
    let start = floor_char_boundary(text, from.max(span.start).min(span.end));
    let slice = &text[start..span.end];
    if slice.trim().is_empty() {
        return None;
    }
    Some(SpeechChunk {
        start,
        text: normalize_for_speech(slice),
    })
}
