// WHY: Word count and read-aloud time estimate shown next to the text

use regex_automata::meta::Regex;
use std::sync::LazyLock;

/// Speaking rates a reader may offer, as multiples of normal speed
pub const SPEED_OPTIONS: &[f64] = &[1.0, 1.2, 1.5, 1.8, 2.0];

pub const DEFAULT_RATE: f64 = 1.5;

/// Words per minute at rate 1.0
pub const BASE_WPM: f64 = 180.0;

/// ASCII word characters plus apostrophe and hyphen, anchored on ASCII word boundaries
static WORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u:\b)[0-9A-Za-z_'-]+(?-u:\b)").expect("valid regex")
});

pub fn word_count(text: &str) -> usize {
    WORD_PATTERN.find_iter(text).count()
}

pub fn is_supported_rate(rate: f64) -> bool {
    SPEED_OPTIONS.contains(&rate)
}

/// Seconds needed to read `words` aloud at `rate`, rounded
pub fn estimate_read_seconds(words: usize, rate: f64) -> u64 {
    if words == 0 {
        return 0;
    }
    let wpm = BASE_WPM * rate.max(0.1);
    (words as f64 / wpm * 60.0).round() as u64
}

/// `42s`, `3m 5s` or `1h 12m`
pub fn format_duration(total_seconds: u64) -> String {
    if total_seconds >= 3600 {
        let hours = total_seconds / 3600;
        let minutes = ((total_seconds % 3600) as f64 / 60.0).round() as u64;
        if minutes == 60 {
            return format!("{}h 0m", hours + 1);
        }
        return format!("{hours}h {minutes}m");
    }
    if total_seconds >= 60 {
        return format!("{}m {}s", total_seconds / 60, total_seconds % 60);
    }
    format!("{total_seconds}s")
}

/// e.g. `"120 words ~ 27s"`
pub fn summary_line(words: usize, rate: f64) -> String {
    let label = if words == 1 { "word" } else { "words" };
    let seconds = estimate_read_seconds(words, rate);
    format!("{words} {label} ~ {}", format_duration(seconds))
}
