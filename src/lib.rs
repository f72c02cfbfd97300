//! # vn-sentiment - Vietnamese review sentiment classification
//!
//! Predicts the sentiment (positive, negative, neutral) of Vietnamese product
//! reviews from their text and compares three classical classifiers, before
//! and after oversampling the minority classes.
//!
//! ## Pipeline
//!
//! - **Labeling**: star rating `>= 4` is positive, `<= 2` negative, `3` neutral
//! - **Features**: word segmentation, stop-word removal, term counts, IDF
//! - **Models**: logistic regression, multinomial naive Bayes, random forest
//! - **Metrics**: accuracy plus support-weighted precision, recall and F1
//! - **Rebalancing**: minority rows duplicated `floor(majority / count)` times
//!
//! ## Quick Start
//!
//! ```no_run
//! use vn_sentiment::{run_experiment, Config};
//!
//! fn main() -> vn_sentiment::Result<()> {
//!     let mut config = Config::default();
//!     config.data.csv_path = "data/Danh_gia.csv".to_string();
//!     config.data.seed = Some(42);
//!
//!     let report = run_experiment(&config)?;
//!     for result in &report.baseline {
//!         println!("{}: F1 {:.3}", result.model, result.metrics.weighted_f1);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Using the Pieces Directly
//!
//! ```no_run
//! use vn_sentiment::classifiers::{Classifier, Model, NaiveBayes};
//! use vn_sentiment::text::{StopWords, VietnameseSegmenter};
//! use vn_sentiment::{clean, evaluate, label_reviews, load_reviews, random_split, FeaturePipeline};
//!
//! # fn main() -> vn_sentiment::Result<()> {
//! let (reviews, _) = load_reviews("data/Danh_gia.csv", "noi_dung_binh_luan", "so_sao")?;
//! let (records, _) = clean(label_reviews(reviews)?, 1);
//!
//! let pipeline = FeaturePipeline::new(
//!     VietnameseSegmenter::new(4)?,
//!     StopWords::from_file("files/vietnamese-stopwords.txt")?,
//! );
//! let fitted = pipeline.fit(&records)?;
//! let table = fitted.transform(&records)?;
//! let (train, test) = random_split(&table, 0.7, 42)?;
//!
//! let model = NaiveBayes::default().fit(&train)?;
//! let metrics = evaluate(&model.predict_table(&test)?, &test.label_column())?;
//! println!("{}", metrics);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`data`] - CSV ingestion, rating labels, cleaning
//! - [`text`] - Vietnamese word segmentation and stop words
//! - [`pipeline`] - Fit/transform feature pipeline and feature tables
//! - [`split`] - Seeded train/holdout split
//! - [`classifiers`] - The three classifiers
//! - [`metrics`] - Evaluation
//! - [`rebalance`] - Minority oversampling
//! - [`experiment`] - Configuration, end-to-end run, CLI

pub mod classifiers;
pub mod data;
pub mod error;
pub mod experiment;
pub mod metrics;
pub mod pipeline;
pub mod rebalance;
pub mod split;
pub mod text;

pub use data::{
    clean, label_rating, label_reviews, load_reviews, sentiment_summary, LabeledReview, Review,
    Sentiment,
};
pub use error::{Error, Result};
pub use experiment::{run_experiment, Config, ExperimentReport};
pub use metrics::{evaluate, ConfusionMatrix, Metrics};
pub use pipeline::{FeaturePipeline, FeatureTable, FittedPipeline, SparseVector};
pub use rebalance::{oversample, RebalanceReport};
pub use split::random_split;
