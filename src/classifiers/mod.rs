//! Classifiers over [`FeatureTable`]s.
//!
//! Every classifier implements [`Classifier`]: hyperparameters live in the
//! classifier value, [`Classifier::fit`] consumes a training table and returns
//! a trained [`Model`]. Models remember which pipeline fit produced their
//! training data and refuse to score tables from any other fit.
//!
//! - [`LogisticRegression`] - multinomial softmax regression with L2 penalty
//! - [`NaiveBayes`] - multinomial naive Bayes with additive smoothing
//! - [`RandomForest`] - bagged Gini decision trees, probability-averaged vote

pub mod decision_tree;
pub mod logistic;
pub mod naive_bayes;
pub mod random_forest;

pub use logistic::{LogisticRegression, LogisticRegressionModel};
pub use naive_bayes::{NaiveBayes, NaiveBayesModel};
pub use random_forest::{RandomForest, RandomForestModel};

use crate::error::{Error, Result};
use crate::pipeline::{FeatureTable, FitId, SparseVector};

/// A trained model bound to one pipeline fit.
pub trait Model: Send + Sync {
    /// Fit the model's training features came from.
    fn fit_id(&self) -> FitId;

    /// Feature dimension the model expects.
    fn dim(&self) -> usize;

    /// Predicted label index for one feature vector.
    fn predict(&self, features: &SparseVector) -> usize;

    /// Predict every row of `table`.
    fn predict_table(&self, table: &FeatureTable) -> Result<Vec<usize>> {
        if table.fit_id != self.fit_id() {
            return Err(Error::FitMismatch {
                expected: self.fit_id().0,
                got: table.fit_id.0,
            });
        }
        if table.dim != self.dim() {
            return Err(Error::DimensionMismatch {
                expected: self.dim(),
                got: table.dim,
            });
        }
        Ok(table.rows.iter().map(|r| self.predict(&r.features)).collect())
    }
}

/// A trainable classification strategy.
pub trait Classifier: Send + Sync {
    /// Short display name, e.g. "Logistic Regression".
    fn name(&self) -> &str;

    fn fit(&self, train: &FeatureTable) -> Result<Box<dyn Model>>;
}

fn ensure_trainable(train: &FeatureTable) -> Result<()> {
    if train.is_empty() {
        return Err(Error::EmptyDataset("training set has no rows"));
    }
    if train.n_classes() == 0 {
        return Err(Error::EmptyDataset("training set has no label mapping"));
    }
    Ok(())
}

/// Index of the largest score; the lowest index wins ties.
pub(crate) fn argmax(scores: &[f64]) -> usize {
    let mut best = 0;
    for (i, &s) in scores.iter().enumerate() {
        if s > scores[best] {
            best = i;
        }
    }
    best
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_prefers_first_on_ties() {
        assert_eq!(argmax(&[0.2, 0.5, 0.5]), 1);
        assert_eq!(argmax(&[1.0, 1.0]), 0);
        assert_eq!(argmax(&[]), 0);
    }

    #[test]
    fn test_models_reject_foreign_tables() {
        let table = test_support::separable_table(5);
        let model = NaiveBayes::default().fit(&table).unwrap();

        let mut foreign = table.clone();
        foreign.fit_id = FitId(8);
        assert!(matches!(
            model.predict_table(&foreign),
            Err(Error::FitMismatch { .. })
        ));

        let mut wider = table.clone();
        wider.dim = 7;
        assert!(matches!(
            model.predict_table(&wider),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_all_classifiers_learn_separable_data() {
        let table = test_support::separable_table(20);
        let classifiers: Vec<Box<dyn Classifier>> = vec![
            Box::new(LogisticRegression::default()),
            Box::new(NaiveBayes::default()),
            Box::new(RandomForest::default()),
        ];
        for classifier in &classifiers {
            let model = classifier.fit(&table).unwrap();
            let pred = model.predict_table(&table).unwrap();
            let acc = test_support::accuracy(&pred, &table.label_column());
            assert!(acc > 0.95, "{} accuracy {}", classifier.name(), acc);
        }
    }
}
