//! Model evaluation and results reporting.

use crate::classifiers::Classifier;
use crate::data::{CleaningReport, LoadReport, SentimentSummary};
use crate::error::Result;
use crate::metrics::{evaluate, prediction_counts, ConfusionMatrix, Metrics};
use crate::pipeline::FeatureTable;
use crate::rebalance::RebalanceReport;
use serde::Serialize;
use std::path::Path;
use std::time::Instant;

/// Holdout results of one trained model.
#[derive(Debug, Clone, Serialize)]
pub struct ModelResult {
    pub model: String,
    /// Wall-clock fit time
    pub training_secs: f64,
    pub metrics: Metrics,
    /// Holdout rows per predicted label index
    pub prediction_counts: Vec<usize>,
    pub confusion: ConfusionMatrix,
}

/// Everything a run measured, in the order it was measured.
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentReport {
    pub seed: u64,
    pub load: LoadReport,
    pub cleaning: CleaningReport,
    pub summary: Vec<SentimentSummary>,
    pub fit_id: String,
    pub vocabulary_size: usize,
    /// Label names in index order
    pub labels: Vec<String>,
    pub train_rows: usize,
    pub test_rows: usize,
    /// Per-label row counts, in label index order
    pub train_counts: Vec<usize>,
    pub test_counts: Vec<usize>,
    /// Rows mapped to the zero vector, train and holdout combined
    pub zero_rows: usize,
    pub baseline: Vec<ModelResult>,
    pub rebalance: Option<RebalanceReport>,
    pub rebalanced: Vec<ModelResult>,
}

impl ExperimentReport {
    /// Write the report as pretty-printed JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        tracing::info!("Report written to {}", path.as_ref().display());
        Ok(())
    }
}

/// Fit `classifier` on `train`, score it on `test` and print the results.
///
/// # Arguments
///
/// * `classifier` - Hyperparameters of the model to train
/// * `train` - Training table
/// * `test` - Holdout table from the same pipeline fit
pub fn evaluate_classifier(
    classifier: &dyn Classifier,
    train: &FeatureTable,
    test: &FeatureTable,
) -> Result<ModelResult> {
    println!("\n{}", classifier.name());

    let start = Instant::now();
    let model = classifier.fit(train)?;
    let training_secs = start.elapsed().as_secs_f64();

    let truth = test.label_column();
    let predictions = model.predict_table(test)?;
    let metrics = evaluate(&predictions, &truth)?;
    let confusion = ConfusionMatrix::new(&predictions, &truth, test.n_classes())?;
    let counts = prediction_counts(&predictions, test.n_classes());

    println!("  Predictions:");
    for (label, count) in counts.iter().enumerate() {
        println!("    {:<10} {:>7}", test.label_name(label), count);
    }
    println!("  Label x prediction:");
    confusion.print(&test.labels);
    println!("  {}", metrics);
    println!("  Training time: {:.2}s", training_secs);

    tracing::info!(
        model = classifier.name(),
        accuracy = metrics.accuracy,
        f1 = metrics.weighted_f1,
        "Evaluated model"
    );

    Ok(ModelResult {
        model: classifier.name().to_string(),
        training_secs,
        metrics,
        prediction_counts: counts,
        confusion,
    })
}

/// Print row counts per label of a feature table.
pub fn print_class_counts(title: &str, table: &FeatureTable) {
    println!("\n{} ({} rows):", title, table.len());
    for (label, count) in table.class_counts().iter().enumerate() {
        println!("  {:<10} {:>7}", table.label_name(label), count);
    }
}

/// Print count and mean text length per sentiment.
pub fn print_summary(summary: &[SentimentSummary]) {
    println!("  {:<10} {:>7} {:>12}", "sentiment", "count", "mean length");
    for s in summary {
        println!(
            "  {:<10} {:>7} {:>12.1}",
            s.sentiment.as_str(),
            s.count,
            s.mean_length
        );
    }
}

/// Print the before/after comparison table.
pub fn print_comparison(baseline: &[ModelResult], rebalanced: &[ModelResult]) {
    println!("\n===================================================================");
    println!("Model comparison");
    println!("===================================================================\n");
    println!(
        "| {:<20} | {:<12} | {:>8} | {:>9} | {:>8} | {:>8} | {:>8} |",
        "Model", "Training set", "Accuracy", "Precision", "Recall", "F1", "Time (s)"
    );
    println!(
        "|{:-<22}|{:-<14}|{:-<10}|{:-<11}|{:-<10}|{:-<10}|{:-<10}|",
        "", "", "", "", "", "", ""
    );
    let rows = baseline
        .iter()
        .map(|r| (r, "original"))
        .chain(rebalanced.iter().map(|r| (r, "oversampled")));
    for (r, set) in rows {
        let m = &r.metrics;
        println!(
            "| {:<20} | {:<12} | {:>8.4} | {:>9.4} | {:>8.4} | {:>8.4} | {:>8.2} |",
            r.model,
            set,
            m.accuracy,
            m.weighted_precision,
            m.weighted_recall,
            m.weighted_f1,
            r.training_secs
        );
    }
    println!();
}
