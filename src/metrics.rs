//! Multiclass evaluation: accuracy, weighted precision/recall/F1 and
//! confusion counts.

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;

/// Holdout metrics for one model.
///
/// The weighted scores average per-class values by each class's share of
/// the true labels, so a class absent from `truth` contributes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    pub accuracy: f64,
    pub weighted_precision: f64,
    pub weighted_recall: f64,
    pub weighted_f1: f64,
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Accuracy: {:.4}, Precision: {:.4}, Recall: {:.4}, F1: {:.4}",
            self.accuracy, self.weighted_precision, self.weighted_recall, self.weighted_f1
        )
    }
}

/// `counts[label][prediction]` over label indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    pub counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    /// Build a `n_classes x n_classes` matrix, growing it if an index
    /// outside the range shows up.
    pub fn new(predictions: &[usize], truth: &[usize], n_classes: usize) -> Result<Self> {
        if predictions.len() != truth.len() {
            return Err(Error::DimensionMismatch {
                expected: truth.len(),
                got: predictions.len(),
            });
        }
        let size = predictions
            .iter()
            .chain(truth)
            .map(|&i| i + 1)
            .max()
            .unwrap_or(0)
            .max(n_classes);
        let mut counts = vec![vec![0; size]; size];
        for (&p, &t) in predictions.iter().zip(truth) {
            counts[t][p] += 1;
        }
        Ok(ConfusionMatrix { counts })
    }

    pub fn n_classes(&self) -> usize {
        self.counts.len()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Rows whose true label is `class`.
    pub fn support(&self, class: usize) -> usize {
        self.counts[class].iter().sum()
    }

    /// Rows predicted as `class`.
    pub fn predicted(&self, class: usize) -> usize {
        self.counts.iter().map(|row| row[class]).sum()
    }

    pub fn correct(&self, class: usize) -> usize {
        self.counts[class][class]
    }

    /// Non-zero `(label, prediction, count)` cells, label-major.
    pub fn cells(&self) -> Vec<(usize, usize, usize)> {
        let mut cells = Vec::new();
        for (label, row) in self.counts.iter().enumerate() {
            for (prediction, &count) in row.iter().enumerate() {
                if count > 0 {
                    cells.push((label, prediction, count));
                }
            }
        }
        cells
    }

    /// Metrics derived from the matrix.
    pub fn metrics(&self) -> Result<Metrics> {
        let total = self.total();
        if total == 0 {
            return Err(Error::EmptyEvaluation);
        }
        let n = total as f64;

        let mut correct = 0usize;
        let mut precision = 0.0;
        let mut recall = 0.0;
        let mut f1 = 0.0;
        for class in 0..self.n_classes() {
            let support = self.support(class);
            correct += self.correct(class);
            if support == 0 {
                continue;
            }
            let weight = support as f64 / n;
            let tp = self.correct(class) as f64;
            let predicted = self.predicted(class);
            let p = if predicted == 0 { 0.0 } else { tp / predicted as f64 };
            let r = tp / support as f64;
            let f = if p + r == 0.0 { 0.0 } else { 2.0 * p * r / (p + r) };
            precision += weight * p;
            recall += weight * r;
            f1 += weight * f;
        }

        Ok(Metrics {
            accuracy: correct as f64 / n,
            weighted_precision: precision,
            weighted_recall: recall,
            weighted_f1: f1,
        })
    }

    /// Print `label | prediction | count` rows with label names.
    pub fn print(&self, labels: &[String]) {
        let name = |i: usize| labels.get(i).map(String::as_str).unwrap_or("?");
        println!("  {:<10} {:<12} {:>7}", "label", "prediction", "count");
        for (label, prediction, count) in self.cells() {
            println!(
                "  {:<10} {:<12} {:>7}",
                name(label),
                name(prediction),
                count
            );
        }
    }
}

/// Accuracy plus weighted precision, recall and F1 of `predictions`
/// against `truth`.
///
/// # Arguments
///
/// * `predictions` - Predicted label indices
/// * `truth` - True label indices, same length as `predictions`
pub fn evaluate(predictions: &[usize], truth: &[usize]) -> Result<Metrics> {
    if truth.is_empty() && predictions.is_empty() {
        return Err(Error::EmptyEvaluation);
    }
    ConfusionMatrix::new(predictions, truth, 0)?.metrics()
}

/// Number of rows assigned to each label index.
pub fn prediction_counts(predictions: &[usize], n_classes: usize) -> Vec<usize> {
    let size = predictions
        .iter()
        .map(|&p| p + 1)
        .max()
        .unwrap_or(0)
        .max(n_classes);
    let mut counts = vec![0; size];
    for &p in predictions {
        counts[p] += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_perfect_predictions() {
        let truth = vec![0, 1, 2, 0, 1];
        let m = evaluate(&truth, &truth).unwrap();
        assert_eq!(m.accuracy, 1.0);
        assert_eq!(m.weighted_precision, 1.0);
        assert_eq!(m.weighted_recall, 1.0);
        assert_eq!(m.weighted_f1, 1.0);
    }

    #[test]
    fn test_weighted_scores() {
        // Class 0: support 3, predicted [0, 0, 1]; class 1: support 1, predicted [1].
        let truth = vec![0, 0, 0, 1];
        let pred = vec![0, 0, 1, 1];
        let m = evaluate(&pred, &truth).unwrap();

        assert!(close(m.accuracy, 0.75));
        // p0 = 1, p1 = 0.5
        assert!(close(m.weighted_precision, 0.75 * 1.0 + 0.25 * 0.5));
        // r0 = 2/3, r1 = 1
        assert!(close(m.weighted_recall, 0.75));
        let f0 = 2.0 * 1.0 * (2.0 / 3.0) / (1.0 + 2.0 / 3.0);
        let f1 = 2.0 * 0.5 * 1.0 / 1.5;
        assert!(close(m.weighted_f1, 0.75 * f0 + 0.25 * f1));
    }

    #[test]
    fn test_weighted_recall_equals_accuracy() {
        let truth = vec![0, 1, 2, 2, 1, 0, 0];
        let pred = vec![0, 2, 2, 1, 1, 0, 1];
        let m = evaluate(&pred, &truth).unwrap();
        assert!(close(m.weighted_recall, m.accuracy));
    }

    #[test]
    fn test_class_never_predicted_has_zero_precision() {
        let truth = vec![0, 1];
        let pred = vec![0, 0];
        let m = evaluate(&pred, &truth).unwrap();
        assert!(close(m.weighted_precision, 0.5 * 0.5));
        assert!((0.0..=1.0).contains(&m.weighted_f1));
    }

    #[test]
    fn test_prediction_only_class_gets_no_weight() {
        // Class 2 never appears in truth.
        let truth = vec![0, 0, 1];
        let pred = vec![0, 2, 1];
        let m = evaluate(&pred, &truth).unwrap();
        assert!(close(m.accuracy, 2.0 / 3.0));
        assert!(close(m.weighted_precision, 1.0));
    }

    #[test]
    fn test_empty_and_mismatched_inputs() {
        assert!(matches!(evaluate(&[], &[]), Err(Error::EmptyEvaluation)));
        assert!(matches!(
            evaluate(&[0], &[0, 1]),
            Err(Error::DimensionMismatch { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn test_confusion_cells_and_counts() {
        let truth = vec![0, 0, 1, 2];
        let pred = vec![0, 1, 1, 1];
        let cm = ConfusionMatrix::new(&pred, &truth, 3).unwrap();
        assert_eq!(cm.cells(), vec![(0, 0, 1), (0, 1, 1), (1, 1, 1), (2, 1, 1)]);
        assert_eq!(cm.support(0), 2);
        assert_eq!(cm.predicted(1), 3);
        assert_eq!(prediction_counts(&pred, 3), vec![1, 3, 0]);
    }
}
