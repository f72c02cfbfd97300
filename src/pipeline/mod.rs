//! Two-phase feature pipeline.
//!
//! [`FeaturePipeline::fit`] learns everything that depends on the corpus
//! (vocabulary, IDF weights, label ranking) and returns an immutable
//! [`FittedPipeline`]. [`FittedPipeline::transform`] then turns any set of
//! labeled reviews into a [`FeatureTable`].
//!
//! Stages, in order:
//!
//! 1. lowercase
//! 2. word segmentation ([`Segmenter`])
//! 3. stop-word removal ([`StopWords`])
//! 4. count vectorization ([`CountVectorizer`])
//! 5. IDF weighting ([`Idf`])
//! 6. assembly ([`VectorAssembler`])
//! 7. label indexing ([`LabelIndexer`])
//!
//! Every table carries the [`FitId`] of the fit that produced it, and models
//! refuse tables from a different fit.

pub mod assembler;
pub mod indexer;
pub mod sparse;
pub mod vectorizer;

pub use assembler::VectorAssembler;
pub use indexer::{LabelIndexer, LabelOrder};
pub use sparse::SparseVector;
pub use vectorizer::{CountVectorizer, Idf};

use crate::data::LabeledReview;
use crate::error::{Error, Result};
use crate::text::{Segmenter, StopWords};
use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Fingerprint of a fitted vocabulary and label mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FitId(pub u64);

impl fmt::Display for FitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// One row of model input: encoded label and feature vector.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub label: usize,
    pub features: SparseVector,
}

/// Feature/label table produced by a single pipeline fit.
#[derive(Debug, Clone)]
pub struct FeatureTable {
    pub fit_id: FitId,
    /// Feature dimension
    pub dim: usize,
    /// Label names in index order
    pub labels: Vec<String>,
    pub rows: Vec<FeatureRow>,
    /// Rows whose feature vector is entirely zero
    pub zero_rows: usize,
}

impl FeatureTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn n_classes(&self) -> usize {
        self.labels.len()
    }

    /// Row count per label index.
    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.labels.len()];
        for row in &self.rows {
            counts[row.label] += 1;
        }
        counts
    }

    pub fn label_name(&self, index: usize) -> &str {
        self.labels.get(index).map(String::as_str).unwrap_or("?")
    }

    /// A table with the same fit metadata and the given rows.
    pub fn with_rows(&self, rows: Vec<FeatureRow>) -> FeatureTable {
        let zero_rows = rows.iter().filter(|r| r.features.is_zero()).count();
        FeatureTable {
            fit_id: self.fit_id,
            dim: self.dim,
            labels: self.labels.clone(),
            rows,
            zero_rows,
        }
    }

    /// Labels of every row, in row order.
    pub fn label_column(&self) -> Vec<usize> {
        self.rows.iter().map(|r| r.label).collect()
    }
}

/// Unfitted pipeline: stateless stages plus vectorizer settings.
pub struct FeaturePipeline {
    segmenter: Arc<dyn Segmenter>,
    stop_words: StopWords,
    max_vocab: Option<usize>,
    min_df: usize,
    label_order: LabelOrder,
}

impl FeaturePipeline {
    pub fn new(segmenter: impl Segmenter + 'static, stop_words: StopWords) -> Self {
        FeaturePipeline {
            segmenter: Arc::new(segmenter),
            stop_words,
            max_vocab: None,
            min_df: 1,
            label_order: LabelOrder::default(),
        }
    }

    pub fn with_max_vocab(mut self, max_vocab: Option<usize>) -> Self {
        self.max_vocab = max_vocab;
        self
    }

    pub fn with_min_df(mut self, min_df: usize) -> Self {
        self.min_df = min_df;
        self
    }

    pub fn with_label_order(mut self, order: LabelOrder) -> Self {
        self.label_order = order;
        self
    }

    /// Lowercase, segment and drop stop words.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        tokenize_with(self.segmenter.as_ref(), &self.stop_words, text)
    }

    /// Fit vocabulary, IDF weights and label ranking on `corpus`.
    pub fn fit(&self, corpus: &[LabeledReview]) -> Result<FittedPipeline> {
        if corpus.is_empty() {
            return Err(Error::EmptyDataset("cannot fit the feature pipeline on zero rows"));
        }

        let documents: Vec<Vec<String>> = corpus.iter().map(|r| self.tokenize(&r.text)).collect();

        let mut vectorizer = CountVectorizer::new(self.max_vocab, self.min_df);
        vectorizer.fit(&documents);
        if vectorizer.dim() == 0 {
            return Err(Error::EmptyVocabulary);
        }

        let counts: Vec<SparseVector> = documents.iter().map(|d| vectorizer.transform(d)).collect();
        let idf = Idf::fit(&counts, vectorizer.dim());
        let assembler = VectorAssembler::new(vec![vectorizer.dim()]);

        let sentiments: Vec<&str> = corpus.iter().map(|r| r.sentiment.as_str()).collect();
        let labels = LabelIndexer::fit(&sentiments, self.label_order)?;

        let fit_id = fingerprint(&vectorizer.terms, labels.labels());

        tracing::info!(
            vocabulary = vectorizer.dim(),
            documents = corpus.len(),
            labels = ?labels.labels(),
            fit_id = %fit_id,
            "Fitted feature pipeline"
        );

        Ok(FittedPipeline {
            segmenter: Arc::clone(&self.segmenter),
            stop_words: self.stop_words.clone(),
            vectorizer,
            idf,
            assembler,
            labels,
            fit_id,
        })
    }
}

/// Immutable result of [`FeaturePipeline::fit`].
pub struct FittedPipeline {
    segmenter: Arc<dyn Segmenter>,
    stop_words: StopWords,
    vectorizer: CountVectorizer,
    idf: Idf,
    assembler: VectorAssembler,
    labels: LabelIndexer,
    fit_id: FitId,
}

impl FittedPipeline {
    pub fn fit_id(&self) -> FitId {
        self.fit_id
    }

    pub fn dim(&self) -> usize {
        self.assembler.output_dim()
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vectorizer.terms
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf.idf
    }

    pub fn labels(&self) -> &[String] {
        self.labels.labels()
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        tokenize_with(self.segmenter.as_ref(), &self.stop_words, text)
    }

    /// Feature vector for a single text.
    pub fn transform_text(&self, text: &str) -> Result<SparseVector> {
        let counts = self.vectorizer.transform(&self.tokenize(text));
        let weighted = self.idf.transform(&counts);
        self.assembler.assemble(&[&weighted])
    }

    /// Encode `records` into a feature table.
    ///
    /// No row is dropped: a review with no in-vocabulary token becomes an
    /// all-zero vector and is counted in [`FeatureTable::zero_rows`].
    pub fn transform(&self, records: &[LabeledReview]) -> Result<FeatureTable> {
        let rows = records
            .iter()
            .map(|r| {
                Ok(FeatureRow {
                    label: self.labels.index_of(r.sentiment.as_str())?,
                    features: self.transform_text(&r.text)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let zero_rows = rows.iter().filter(|r| r.features.is_zero()).count();
        if zero_rows > 0 {
            tracing::warn!(
                "{} of {} rows have no in-vocabulary tokens and map to the zero vector",
                zero_rows,
                rows.len()
            );
        }

        Ok(FeatureTable {
            fit_id: self.fit_id,
            dim: self.dim(),
            labels: self.labels.labels().to_vec(),
            rows,
            zero_rows,
        })
    }
}

fn tokenize_with(segmenter: &dyn Segmenter, stop_words: &StopWords, text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    stop_words.filter(segmenter.segment(&lower))
}

fn fingerprint(terms: &[String], labels: &[String]) -> FitId {
    let mut hasher = DefaultHasher::new();
    terms.hash(&mut hasher);
    labels.hash(&mut hasher);
    FitId(hasher.finish())
}
