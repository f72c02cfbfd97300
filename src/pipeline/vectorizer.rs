//! Count vectorization and inverse-document-frequency weighting.
//!
//! The two stages are fitted separately: [`CountVectorizer`] learns the
//! vocabulary from token sequences, [`Idf`] learns document frequencies from
//! the resulting count vectors.

use super::sparse::SparseVector;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Maps token sequences to count vectors over a fitted vocabulary.
///
/// This implementation:
/// - Orders the vocabulary by corpus term count, descending
/// - Breaks count ties by token, ascending, so fitting is deterministic
/// - Optionally caps the vocabulary and drops rare terms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountVectorizer {
    /// Token to feature index mapping
    pub vocabulary: HashMap<String, usize>,
    /// Feature index to token
    pub terms: Vec<String>,
    /// Maximum number of terms to keep (`None` keeps all)
    pub max_vocab: Option<usize>,
    /// Minimum number of documents a term must appear in
    pub min_df: usize,
}

impl CountVectorizer {
    /// Create an unfitted vectorizer.
    ///
    /// # Arguments
    ///
    /// * `max_vocab` - Vocabulary cap, `None` for unbounded
    /// * `min_df` - Minimum document frequency (values below 1 act as 1)
    pub fn new(max_vocab: Option<usize>, min_df: usize) -> Self {
        CountVectorizer {
            vocabulary: HashMap::new(),
            terms: Vec::new(),
            max_vocab,
            min_df: min_df.max(1),
        }
    }

    /// Fit the vocabulary on tokenized documents.
    ///
    /// # Arguments
    ///
    /// * `documents` - One token sequence per document
    pub fn fit(&mut self, documents: &[Vec<String>]) {
        let mut term_count: HashMap<&str, usize> = HashMap::new();
        let mut doc_count: HashMap<&str, usize> = HashMap::new();

        for doc in documents {
            let unique: HashSet<&str> = doc.iter().map(String::as_str).collect();
            for term in unique {
                *doc_count.entry(term).or_insert(0) += 1;
            }
            for term in doc {
                *term_count.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(&str, usize)> = term_count
            .into_iter()
            .filter(|(term, _)| doc_count.get(term).copied().unwrap_or(0) >= self.min_df)
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        if let Some(cap) = self.max_vocab {
            ranked.truncate(cap);
        }

        self.terms = ranked.into_iter().map(|(t, _)| t.to_string()).collect();
        self.vocabulary = self
            .terms
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.clone(), idx))
            .collect();
    }

    /// Number of fitted terms, i.e. the output dimension.
    pub fn dim(&self) -> usize {
        self.terms.len()
    }

    /// Count in-vocabulary tokens. Unknown tokens are dropped.
    pub fn transform(&self, tokens: &[String]) -> SparseVector {
        let pairs = tokens
            .iter()
            .filter_map(|t| self.vocabulary.get(t).map(|&idx| (idx, 1.0)))
            .collect();
        SparseVector::from_pairs(self.dim(), pairs)
    }
}

/// Inverse document frequency weights.
///
/// `idf(t) = ln((n_docs + 1) / (df(t) + 1))`, so a term present in every
/// document gets weight zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Idf {
    pub idf: Vec<f64>,
    pub n_docs: usize,
}

impl Idf {
    /// Learn document frequencies from count vectors of dimension `dim`.
    pub fn fit(counts: &[SparseVector], dim: usize) -> Self {
        let mut doc_freq = vec![0usize; dim];
        for vector in counts {
            for (idx, value) in vector.iter() {
                if value > 0.0 && idx < dim {
                    doc_freq[idx] += 1;
                }
            }
        }

        let n = counts.len() as f64;
        let idf = doc_freq
            .iter()
            .map(|&df| ((n + 1.0) / (df as f64 + 1.0)).ln())
            .collect();

        Idf {
            idf,
            n_docs: counts.len(),
        }
    }

    /// Rescale a count vector by the fitted weights.
    pub fn transform(&self, counts: &SparseVector) -> SparseVector {
        counts.map_values(|idx, value| value * self.idf.get(idx).copied().unwrap_or(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(words: &[&str]) -> Vec<String> {
        words.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_vocabulary_ordered_by_frequency_then_token() {
        let docs = vec![doc(&["tốt", "đẹp", "tốt"]), doc(&["đẹp", "rẻ", "tốt"]), doc(&["an"])];
        let mut cv = CountVectorizer::new(None, 1);
        cv.fit(&docs);
        // tốt: 3, đẹp: 2, then an/rẻ tie at 1 and sort by token
        assert_eq!(cv.terms, vec!["tốt", "đẹp", "an", "rẻ"]);
        assert_eq!(cv.vocabulary["tốt"], 0);
    }

    #[test]
    fn test_transform_counts_and_drops_unknown() {
        let mut cv = CountVectorizer::new(None, 1);
        cv.fit(&[doc(&["a", "b", "a"])]);
        let v = cv.transform(&doc(&["a", "a", "zzz", "b"]));
        assert_eq!(v.dim(), 2);
        assert_eq!(v.get(cv.vocabulary["a"]), 2.0);
        assert_eq!(v.get(cv.vocabulary["b"]), 1.0);

        let unknown = cv.transform(&doc(&["zzz"]));
        assert!(unknown.is_zero());
        assert_eq!(unknown.dim(), 2);
    }

    #[test]
    fn test_cap_and_min_df() {
        let docs = vec![doc(&["x", "x", "x", "y"]), doc(&["y", "z"])];
        let mut capped = CountVectorizer::new(Some(1), 1);
        capped.fit(&docs);
        assert_eq!(capped.terms, vec!["x"]);

        let mut min_df = CountVectorizer::new(None, 2);
        min_df.fit(&docs);
        assert_eq!(min_df.terms, vec!["y"]);
    }

    #[test]
    fn test_idf_weights() {
        let counts = vec![
            SparseVector::from_pairs(2, vec![(0, 1.0), (1, 2.0)]),
            SparseVector::from_pairs(2, vec![(0, 1.0)]),
            SparseVector::from_pairs(2, vec![(0, 3.0)]),
        ];
        let idf = Idf::fit(&counts, 2);
        assert!((idf.idf[0] - 0.0).abs() < 1e-12);
        assert!((idf.idf[1] - (4.0f64 / 2.0).ln()).abs() < 1e-12);

        let weighted = idf.transform(&counts[0]);
        assert!((weighted.get(1) - 2.0 * (2.0f64).ln()).abs() < 1e-12);
        assert_eq!(weighted.get(0), 0.0);
    }
}
