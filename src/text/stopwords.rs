//! Stop-word removal.

use crate::error::Result;
use std::collections::HashSet;
use std::path::Path;

/// A fixed set of tokens to drop from token sequences.
///
/// Matching is exact and case-sensitive; the pipeline lowercases text before
/// tokenization, so lists are expected in lowercase. Multi-syllable entries
/// written with spaces ("bởi vì") are stored in token form ("bởi_vì").
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a newline-delimited list: lines are trimmed, blank lines ignored.
    pub fn from_lines(content: &str) -> Self {
        content.lines().collect()
    }

    /// Load a newline-delimited stop-word file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_lines(&content))
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    /// Drop every token present in the set, preserving order.
    pub fn filter(&self, tokens: Vec<String>) -> Vec<String> {
        tokens.into_iter().filter(|t| !self.contains(t)).collect()
    }

    /// Multi-syllable entries, in token form. A segmenter must know these
    /// as compounds for them to ever match.
    pub fn compounds(&self) -> impl Iterator<Item = &str> + '_ {
        self.words
            .iter()
            .map(String::as_str)
            .filter(|w| w.contains('_'))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for StopWords {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let words = iter
            .into_iter()
            .filter_map(|w| {
                let w = w.as_ref().trim();
                if w.is_empty() {
                    None
                } else {
                    Some(w.split_whitespace().collect::<Vec<_>>().join("_"))
                }
            })
            .collect();
        StopWords { words }
    }
}
