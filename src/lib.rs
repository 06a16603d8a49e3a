pub mod sentence_detector;
pub mod position;
pub mod navigation;
pub mod reading_stats;
pub mod reader;

// Re-export main types for convenient access
pub use sentence_detector::{
    segment, AbbreviationChecker, AbbreviationConfig, SentenceBoundaryRules, SentenceDetector,
    SentenceSpan, SentenceSpanOwned,
};

// Re-export position queries used by readers and highlighters
pub use position::{paragraph_range_at, sentence_index_for, word_range_at};

pub use navigation::{resolve_highlight, Granularity, Highlight};
