//! Minority-class oversampling.

use crate::error::{Error, Result};
use crate::pipeline::{FeatureRow, FeatureTable};
use serde::Serialize;

/// Class counts before and after oversampling.
#[derive(Debug, Clone, Serialize)]
pub struct RebalanceReport {
    /// Label index of the majority class
    pub majority: usize,
    /// `(label, count before, duplication ratio, count after)` per class
    pub classes: Vec<ClassResample>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassResample {
    pub label: String,
    pub before: usize,
    pub ratio: usize,
    pub after: usize,
}

impl RebalanceReport {
    pub fn print(&self) {
        println!("  {:<10} {:>8} {:>6} {:>8}", "label", "before", "ratio", "after");
        for c in &self.classes {
            println!(
                "  {:<10} {:>8} {:>6} {:>8}",
                c.label, c.before, c.ratio, c.after
            );
        }
    }
}

/// Duplicate minority-class rows toward the majority count.
///
/// The majority class is the most frequent label (lowest index on ties) and
/// is left untouched. Every row of each other class is emitted
/// `floor(majority / count)` times, so the class ends with `ratio * count`
/// rows. Row order is majority rows first, then the other classes by index.
///
/// # Errors
///
/// `MissingClass` if a label known to the fit has no training rows.
pub fn oversample(train: &FeatureTable) -> Result<(FeatureTable, RebalanceReport)> {
    if train.is_empty() {
        return Err(Error::EmptyDataset("cannot rebalance an empty training set"));
    }

    let counts = train.class_counts();
    if let Some(missing) = counts.iter().position(|&c| c == 0) {
        return Err(Error::MissingClass(train.label_name(missing).to_string()));
    }

    let mut majority = 0;
    for (label, &count) in counts.iter().enumerate() {
        if count > counts[majority] {
            majority = label;
        }
    }
    if majority != 0 {
        tracing::warn!(
            "Majority class is `{}` (index {}), not the first indexed label",
            train.label_name(majority),
            majority
        );
    }

    let mut rows: Vec<FeatureRow> = Vec::new();
    let mut classes = Vec::with_capacity(counts.len());
    let order = std::iter::once(majority).chain((0..counts.len()).filter(|&l| l != majority));
    for label in order {
        let ratio = if label == majority {
            1
        } else {
            counts[majority] / counts[label]
        };
        for row in train.rows.iter().filter(|r| r.label == label) {
            for _ in 0..ratio {
                rows.push(row.clone());
            }
        }
        classes.push(ClassResample {
            label: train.label_name(label).to_string(),
            before: counts[label],
            ratio,
            after: ratio * counts[label],
        });
    }
    classes.sort_by_key(|c| train.labels.iter().position(|l| *l == c.label));

    tracing::info!(
        before = train.len(),
        after = rows.len(),
        "Oversampled minority classes"
    );

    Ok((train.with_rows(rows), RebalanceReport { majority, classes }))
}
