// WHY: Abbreviation dictionaries and the local-context test that keeps a dot from ending a sentence
// Dictionaries are data, not control flow, so they can be extended from a TOML file

use anyhow::{bail, Context, Result};
use regex_automata::meta::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

use super::SentenceBoundaryRules;

/// Titles that precede a name and never end a sentence in practice
pub const TITLE_ABBREVIATIONS: &[&str] = &[
    "mr.", "mrs.", "ms.", "dr.", "prof.", "sr.", "jr.", "st."
];

/// Abbreviations that only continue a sentence when lowercase text or a digit follows
pub const COMMON_ABBREVIATIONS: &[&str] = &[
    "etc.", "no.", "fig.", "e.g.", "i.e.", "u.k.", "u.s.",
    "a.m.", "p.m.", "inc.", "ltd.", "co.", "corp.", "vs."
];

/// Single lowercase letter and dot, e.g. the "a." of "A. Smith" once lowercased
static SINGLE_INITIAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]\.$").expect("valid regex"));

/// Two or more letter-dot pairs, e.g. "u.s." or "e.g."
static INITIALISM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[a-z]\.){2,}$").expect("valid regex"));

/// Extra abbreviation entries loaded from a TOML file
///
/// ```toml
/// extend_defaults = true
/// title = ["capt.", "gen."]
/// common = ["approx.", "dept."]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AbbreviationConfig {
    /// Keep the built-in tables and add these entries on top
    pub extend_defaults: bool,
    pub title: Vec<String>,
    pub common: Vec<String>,
}

impl Default for AbbreviationConfig {
    fn default() -> Self {
        Self {
            extend_defaults: true,
            title: Vec::new(),
            common: Vec::new(),
        }
    }
}

impl AbbreviationConfig {
    /// Parse and validate a TOML dictionary
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(source).context("Invalid abbreviation dictionary")?;
        config.title = normalize_entries(&config.title, "title")?;
        config.common = normalize_entries(&config.common, "common")?;
        Ok(config)
    }

    /// Load a TOML dictionary from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read abbreviation dictionary {}", path.display()))?;
        Self::from_toml_str(&source)
            .with_context(|| format!("Failed to load abbreviation dictionary {}", path.display()))
    }
}

// Entries are matched against lowercased tokens, so store them lowercased
fn normalize_entries(entries: &[String], table: &str) -> Result<Vec<String>> {
    entries
        .iter()
        .map(|entry| {
            let entry = entry.trim().to_lowercase();
            if !entry.ends_with('.') || entry.len() < 2 {
                bail!("{table} abbreviation {entry:?} must be a word ending with '.'");
            }
            if entry.chars().any(char::is_whitespace) {
                bail!("{table} abbreviation {entry:?} must not contain whitespace");
            }
            Ok(entry)
        })
        .collect()
}

/// Decides whether a dot closes an abbreviation rather than a sentence
#[derive(Debug, Clone)]
pub struct AbbreviationChecker {
    title_abbreviations: HashSet<String>,
    common_abbreviations: HashSet<String>,
}

impl AbbreviationChecker {
    /// Create new abbreviation checker with default abbreviation sets
    pub fn new() -> Self {
        Self {
            title_abbreviations: TITLE_ABBREVIATIONS.iter().map(|s| s.to_string()).collect(),
            common_abbreviations: COMMON_ABBREVIATIONS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Build a checker from a loaded dictionary
    pub fn from_config(config: &AbbreviationConfig) -> Self {
        let mut checker = if config.extend_defaults {
            Self::new()
        } else {
            Self {
                title_abbreviations: HashSet::new(),
                common_abbreviations: HashSet::new(),
            }
        };
        checker.title_abbreviations.extend(config.title.iter().cloned());
        checker.common_abbreviations.extend(config.common.iter().cloned());
        debug!(
            titles = checker.title_abbreviations.len(),
            common = checker.common_abbreviations.len(),
            "Built abbreviation checker from config"
        );
        checker
    }

    /// Check if a lowercased token is a title abbreviation
    pub fn is_title_abbreviation(&self, token: &str) -> bool {
        self.title_abbreviations.contains(token)
    }

    /// Check if a lowercased token is a common abbreviation
    pub fn is_common_abbreviation(&self, token: &str) -> bool {
        self.common_abbreviations.contains(token)
    }

    /// Whether the dot at byte `idx` belongs to an abbreviation
    ///
    /// Looks only at the token ending at the dot and the next non-whitespace
    /// character. `idx` must point at a `.` in `text`.
    pub fn is_abbreviation_at(&self, text: &str, idx: usize, rules: &SentenceBoundaryRules) -> bool {
        let token = token_before(text, idx, &rules.opening_marks).to_lowercase();
        if token.is_empty() {
            return false;
        }

        let next = next_non_whitespace(text, idx + 1);
        let continues_lowercase = next.is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit());

        if self.is_title_abbreviation(&token) {
            return true;
        }
        if SINGLE_INITIAL.is_match(token.as_str())
            && text[idx + 1..].chars().next().is_some_and(|c| c.is_ascii_uppercase())
        {
            return true;
        }
        if INITIALISM.is_match(token.as_str()) || self.is_common_abbreviation(&token) {
            return continues_lowercase;
        }
        // New sentences start capitalized
        next.is_some_and(|c| c.is_ascii_lowercase())
    }
}

impl Default for AbbreviationChecker {
    fn default() -> Self {
        Self::new()
    }
}

/// The non-whitespace run ending at and including `idx`, opening marks stripped
fn token_before<'a>(text: &'a str, idx: usize, opening_marks: &[char]) -> &'a str {
    let head = &text[..=idx];
    let from = head
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map_or(0, |(pos, c)| pos + c.len_utf8());
    head[from..].trim_start_matches(|c| opening_marks.contains(&c))
}

/// First non-whitespace character at or after byte `from`
pub(crate) fn next_non_whitespace(text: &str, from: usize) -> Option<char> {
    text.get(from..)?.chars().find(|c| !c.is_whitespace())
}
