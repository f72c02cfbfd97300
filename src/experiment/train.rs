//! End-to-end experiment: load, label, clean, vectorize, split, train three
//! classifiers, evaluate, oversample and train again.

use super::config::Config;
use super::evaluate::{
    evaluate_classifier, print_class_counts, print_comparison, print_summary, ExperimentReport,
    ModelResult,
};
use crate::classifiers::Classifier;
use crate::data::{
    clean, label_reviews, load_reviews, sentiment_summary, CleaningReport, LabeledReview,
    LoadReport,
};
use crate::error::Result;
use crate::pipeline::{FeaturePipeline, FeatureTable};
use crate::rebalance::oversample;
use crate::split::{draw_seed, random_split};
use crate::text::{StopWords, VietnameseSegmenter};

/// Build the unfitted feature pipeline described by `config`.
///
/// Loads the stop-word list and the extra compound dictionary when they are
/// configured.
pub fn build_pipeline(config: &Config) -> Result<FeaturePipeline> {
    let mut segmenter = VietnameseSegmenter::new(config.tokenizer.max_compound_syllables)?;
    if let Some(path) = &config.tokenizer.dictionary_path {
        let added = segmenter.load_dictionary(path)?;
        tracing::info!("Loaded {} compound words from {}", added, path);
    }

    let stop_words = match &config.data.stopwords_path {
        Some(path) => {
            let words = StopWords::from_file(path)?;
            tracing::info!("Loaded {} stop words from {}", words.len(), path);
            words
        }
        None => StopWords::new(),
    };
    // Multi-syllable stop words only match once the segmenter joins them.
    for compound in stop_words.compounds() {
        segmenter.add_compound(compound);
    }

    Ok(FeaturePipeline::new(segmenter, stop_words)
        .with_max_vocab(config.features.max_vocab)
        .with_min_df(config.features.min_df)
        .with_label_order(config.features.label_order))
}

/// Load, label and clean the configured review file.
pub fn load_corpus(config: &Config) -> Result<(Vec<LabeledReview>, LoadReport, CleaningReport)> {
    let data = &config.data;
    let (reviews, load) = load_reviews(&data.csv_path, &data.text_column, &data.rating_column)?;
    tracing::info!(
        rows = load.rows_read,
        kept = reviews.len(),
        "Loaded reviews from {}",
        data.csv_path
    );

    let labeled = label_reviews(reviews)?;
    let (records, cleaning) = clean(labeled, data.min_text_chars);
    tracing::info!(
        empty = cleaning.empty_text,
        short = cleaning.short_text,
        kept = cleaning.kept,
        "Cleaned reviews"
    );
    Ok((records, load, cleaning))
}

/// Run the full comparison described by `config`.
///
/// # Arguments
///
/// * `config` - Validated experiment configuration
///
/// # Returns
///
/// The measurements of the run; the same numbers are printed as the run
/// progresses.
pub fn run_experiment(config: &Config) -> Result<ExperimentReport> {
    config.validate()?;

    println!("===================================================================");
    println!("Vietnamese review sentiment: model comparison");
    println!("===================================================================\n");

    let (records, load, cleaning) = load_corpus(config)?;
    println!(
        "Loaded {} rows ({} null, {} malformed rating), {} after cleaning\n",
        load.rows_read, load.null_rows, load.malformed_ratings, cleaning.kept
    );

    let summary = sentiment_summary(&records);
    print_summary(&summary);

    let pipeline = build_pipeline(config)?;
    let fitted = pipeline.fit(&records)?;
    let table = fitted.transform(&records)?;
    println!(
        "\nVocabulary: {} terms, labels: {:?}",
        fitted.dim(),
        fitted.labels()
    );
    print_class_counts("Label counts", &table);

    let seed = match config.data.seed {
        Some(seed) => seed,
        None => {
            let seed = draw_seed();
            tracing::info!(seed, "No split seed configured, drew one");
            seed
        }
    };
    let (train, test) = random_split(&table, config.data.train_split, seed)?;
    println!(
        "\nTrain: {} rows, holdout: {} rows (seed {})",
        train.len(),
        test.len(),
        seed
    );
    print_class_counts("Training set", &train);
    print_class_counts("Holdout set", &test);

    let classifiers: [&dyn Classifier; 3] = [
        &config.logistic_regression,
        &config.naive_bayes,
        &config.random_forest,
    ];

    println!("\n--- Original training set ---");
    let baseline = train_all(&classifiers, &train, &test)?;

    let (rebalance, rebalanced) = if config.rebalance.enabled {
        let (balanced, report) = oversample(&train)?;
        println!("\n--- Oversampled training set ---");
        report.print();
        print_class_counts("Oversampled training set", &balanced);
        let results = train_all(&classifiers, &balanced, &test)?;
        (Some(report), results)
    } else {
        (None, Vec::new())
    };

    print_comparison(&baseline, &rebalanced);

    Ok(ExperimentReport {
        seed,
        load,
        cleaning,
        summary,
        fit_id: fitted.fit_id().to_string(),
        vocabulary_size: fitted.dim(),
        labels: fitted.labels().to_vec(),
        train_rows: train.len(),
        test_rows: test.len(),
        train_counts: train.class_counts(),
        test_counts: test.class_counts(),
        zero_rows: table.zero_rows,
        baseline,
        rebalance,
        rebalanced,
    })
}

fn train_all(
    classifiers: &[&dyn Classifier],
    train: &FeatureTable,
    test: &FeatureTable,
) -> Result<Vec<ModelResult>> {
    classifiers
        .iter()
        .map(|c| evaluate_classifier(*c, train, test))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_compound_stop_words_are_removed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stopwords.txt");
        std::fs::write(&path, "bởi vì\ntuy nhiên\n").unwrap();

        let mut config = Config::default();
        config.data.stopwords_path = Some(path.to_string_lossy().into_owned());
        let pipeline = build_pipeline(&config).unwrap();

        assert_eq!(
            pipeline.tokenize("Tuy nhiên tôi thích bởi vì thơm"),
            vec!["tôi", "thích", "thơm"]
        );
    }

    #[test]
    fn test_no_stop_words_keeps_every_token() {
        let mut config = Config::default();
        config.data.stopwords_path = None;
        let pipeline = build_pipeline(&config).unwrap();
        assert_eq!(pipeline.tokenize("bởi vì thơm"), vec!["bởi", "vì", "thơm"]);
    }
}
