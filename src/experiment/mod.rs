//! Sentiment model comparison experiment.
//!
//! Sequences the library into one comparison run:
//!
//! 1. load the review CSV and derive a sentiment from each star rating
//! 2. drop null and empty rows
//! 3. fit the feature pipeline (segmentation, stop words, counts, IDF)
//! 4. split 70/30 into training and holdout sets
//! 5. train and score logistic regression, naive Bayes and a random forest
//! 6. oversample minority classes in the training set and repeat step 5
//! 7. print a before/after comparison table
//!
//! ## Usage
//!
//! ```bash
//! vn-sentiment run --data data/Danh_gia.csv --stopwords files/vietnamese-stopwords.txt --seed 42
//! vn-sentiment stats --data data/Danh_gia.csv
//! vn-sentiment tokenize "Sản phẩm rất tốt, giao hàng nhanh"
//! ```
//!
//! ## Configuration
//!
//! Every value has a default; a `config.toml` only needs the keys it changes:
//!
//! ```toml
//! [data]
//! csv_path = "data/Danh_gia.csv"
//! stopwords_path = "files/vietnamese-stopwords.txt"
//! train_split = 0.7
//! seed = 42
//!
//! [features]
//! max_vocab = 20000
//! label_order = "frequency_desc"
//!
//! [random_forest]
//! num_trees = 50
//! max_depth = 5
//!
//! [rebalance]
//! enabled = true
//! ```
//!
//! ## Module Structure
//!
//! - [`config`] - Configuration structures and loading
//! - [`train`] - The end-to-end run
//! - [`evaluate`] - Per-model scoring and console reporting
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod evaluate;
pub mod train;

pub use cli::{run_cli, Cli};
pub use config::Config;
pub use evaluate::{ExperimentReport, ModelResult};
pub use train::run_experiment;
