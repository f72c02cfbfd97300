//! Configuration structures for the sentiment experiment.
//!
//! This module provides strongly-typed configuration loaded from TOML. Every
//! section and field has a default, so a partial file (or none at all) is
//! valid.

use crate::classifiers::{LogisticRegression, NaiveBayes, RandomForest};
use crate::error::{Error, Result};
use crate::pipeline::LabelOrder;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Data loading configuration
    pub data: DataConfig,
    /// Word segmentation configuration
    pub tokenizer: TokenizerConfig,
    /// Vectorizer and label indexing configuration
    pub features: FeaturesConfig,
    pub logistic_regression: LogisticRegression,
    pub naive_bayes: NaiveBayes,
    pub random_forest: RandomForest,
    /// Oversampling configuration
    pub rebalance: RebalanceConfig,
}

/// Data loading configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Path to the review CSV file
    pub csv_path: String,
    /// Newline-delimited stop-word list; no stop words when unset
    pub stopwords_path: Option<String>,
    /// Header of the review text column
    pub text_column: String,
    /// Header of the star rating column
    pub rating_column: String,
    /// Rows whose trimmed text is shorter than this are dropped
    pub min_text_chars: usize,
    /// Train/holdout split ratio (e.g., 0.7 = 70% train, 30% holdout)
    pub train_split: f64,
    /// Split seed; a fresh seed is drawn and logged when unset
    pub seed: Option<u64>,
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            csv_path: "data/Danh_gia.csv".to_string(),
            stopwords_path: Some("files/vietnamese-stopwords.txt".to_string()),
            text_column: "noi_dung_binh_luan".to_string(),
            rating_column: "so_sao".to_string(),
            min_text_chars: 1,
            train_split: 0.7,
            seed: None,
        }
    }
}

/// Word segmentation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    /// Extra compound words, one per line
    pub dictionary_path: Option<String>,
    /// Longest compound, in syllables, the segmenter tries to match
    pub max_compound_syllables: usize,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        TokenizerConfig {
            dictionary_path: None,
            max_compound_syllables: 4,
        }
    }
}

/// Vectorizer and label indexing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesConfig {
    /// Keep only the most frequent terms; unbounded when unset
    pub max_vocab: Option<usize>,
    /// Minimum number of documents a term must appear in
    pub min_df: usize,
    pub label_order: LabelOrder,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        FeaturesConfig {
            max_vocab: None,
            min_df: 1,
            label_order: LabelOrder::FrequencyDesc,
        }
    }
}

/// Oversampling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RebalanceConfig {
    /// Retrain every model on an oversampled training set
    pub enabled: bool,
}

impl Default for RebalanceConfig {
    fn default() -> Self {
        RebalanceConfig { enabled: true }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// Returns `Ok(Config)` if the file can be read, parsed and validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let split = self.data.train_split;
        if !(split > 0.0 && split < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "data.train_split must be in (0, 1), got {}",
                split
            )));
        }
        if self.tokenizer.max_compound_syllables == 0 {
            return Err(Error::InvalidConfig(
                "tokenizer.max_compound_syllables must be at least 1".to_string(),
            ));
        }
        if self.features.max_vocab == Some(0) {
            return Err(Error::InvalidConfig(
                "features.max_vocab must be at least 1 when set".to_string(),
            ));
        }
        if self.logistic_regression.reg_param < 0.0 || self.logistic_regression.learning_rate <= 0.0
        {
            return Err(Error::InvalidConfig(
                "logistic_regression needs reg_param >= 0 and learning_rate > 0".to_string(),
            ));
        }
        if self.naive_bayes.smoothing < 0.0 {
            return Err(Error::InvalidConfig(
                "naive_bayes.smoothing must be >= 0".to_string(),
            ));
        }
        if self.random_forest.num_trees == 0 || self.random_forest.max_bins < 2 {
            return Err(Error::InvalidConfig(
                "random_forest needs num_trees >= 1 and max_bins >= 2".to_string(),
            ));
        }
        Ok(())
    }
}
