//! Error types for the sentiment pipeline.

use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading data, fitting the feature pipeline,
/// training classifiers or evaluating them.
#[derive(Debug, Error)]
pub enum Error {
    /// Underlying I/O failure (data file, stop words, dictionary, report).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The review file could not be parsed as delimited text.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The configuration file is not valid TOML for [`crate::Config`].
    #[error("configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Report serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A text-cleaning pattern failed to compile.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// A required column is absent from the header row.
    #[error("column `{0}` not found in header")]
    MissingColumn(String),

    /// Star ratings are only defined on 1..=5.
    #[error("star rating {0} is outside 1..=5")]
    RatingOutOfRange(i64),

    /// A stage received no rows to work with.
    #[error("empty dataset: {0}")]
    EmptyDataset(&'static str),

    /// Every token was filtered out, so there is nothing to vectorize.
    #[error("vocabulary is empty after tokenization and stop-word removal")]
    EmptyVocabulary,

    /// A label was not seen when the label index was fitted.
    #[error("label `{0}` was not seen when the label index was fitted")]
    UnknownLabel(String),

    /// A class has no training rows, so no oversampling ratio exists for it.
    #[error("class `{0}` has no rows in the training set")]
    MissingClass(String),

    /// Vector or batch lengths disagree.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// A model or table was produced by a different pipeline fit.
    #[error("features come from pipeline fit {got:016x}, model was trained on fit {expected:016x}")]
    FitMismatch { expected: u64, got: u64 },

    /// Multinomial naive Bayes needs non-negative feature values.
    #[error("naive Bayes requires non-negative features, found {value} at column {column}")]
    NegativeFeature { column: usize, value: f64 },

    /// Metrics cannot be computed over zero predictions.
    #[error("cannot evaluate an empty prediction set")]
    EmptyEvaluation,

    /// A configuration value is out of its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
