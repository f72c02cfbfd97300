//! Label indexing by frequency rank.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How label indices are assigned at fit time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelOrder {
    /// Most frequent label gets index 0; ties broken alphabetically
    #[default]
    FrequencyDesc,
    /// Least frequent label gets index 0; ties broken alphabetically
    FrequencyAsc,
    AlphabetAsc,
    AlphabetDesc,
}

/// Maps string labels to dense integer indices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelIndexer {
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl LabelIndexer {
    /// Rank the distinct labels of `labels` according to `order`.
    pub fn fit<S: AsRef<str>>(labels: &[S], order: LabelOrder) -> Result<Self> {
        if labels.is_empty() {
            return Err(Error::EmptyDataset("no labels to index"));
        }

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for label in labels {
            *counts.entry(label.as_ref()).or_insert(0) += 1;
        }

        let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
        match order {
            LabelOrder::FrequencyDesc => {
                ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)))
            }
            LabelOrder::FrequencyAsc => {
                ranked.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)))
            }
            LabelOrder::AlphabetAsc => ranked.sort_by(|a, b| a.0.cmp(b.0)),
            LabelOrder::AlphabetDesc => ranked.sort_by(|a, b| b.0.cmp(a.0)),
        }

        let labels: Vec<String> = ranked.into_iter().map(|(l, _)| l.to_string()).collect();
        let index = labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.clone(), i))
            .collect();
        Ok(LabelIndexer { labels, index })
    }

    /// Index of a label seen at fit time.
    pub fn index_of(&self, label: &str) -> Result<usize> {
        self.index
            .get(label)
            .copied()
            .ok_or_else(|| Error::UnknownLabel(label.to_string()))
    }

    /// Labels in index order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_rank() {
        let labels = ["negative", "positive", "positive", "neutral", "positive", "negative"];
        let idx = LabelIndexer::fit(&labels, LabelOrder::FrequencyDesc).unwrap();
        assert_eq!(idx.labels(), &["positive", "negative", "neutral"]);
        assert_eq!(idx.index_of("positive").unwrap(), 0);
        assert_eq!(idx.index_of("neutral").unwrap(), 2);
    }

    #[test]
    fn test_ties_broken_alphabetically() {
        let labels = ["positive", "neutral", "negative"];
        let desc = LabelIndexer::fit(&labels, LabelOrder::FrequencyDesc).unwrap();
        assert_eq!(desc.labels(), &["negative", "neutral", "positive"]);

        let asc = LabelIndexer::fit(&["b", "a", "a"], LabelOrder::FrequencyAsc).unwrap();
        assert_eq!(asc.labels(), &["b", "a"]);
    }

    #[test]
    fn test_alphabet_orders() {
        let labels = ["b", "c", "a", "a"];
        let asc = LabelIndexer::fit(&labels, LabelOrder::AlphabetAsc).unwrap();
        assert_eq!(asc.labels(), &["a", "b", "c"]);
        let desc = LabelIndexer::fit(&labels, LabelOrder::AlphabetDesc).unwrap();
        assert_eq!(desc.labels(), &["c", "b", "a"]);
    }

    #[test]
    fn test_unknown_label() {
        let idx = LabelIndexer::fit(&["positive"], LabelOrder::FrequencyDesc).unwrap();
        assert!(matches!(idx.index_of("neutral"), Err(Error::UnknownLabel(_))));
        let empty: [&str; 0] = [];
        assert!(LabelIndexer::fit(&empty, LabelOrder::FrequencyDesc).is_err());
    }
}
