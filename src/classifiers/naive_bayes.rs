//! Multinomial naive Bayes.

use super::{argmax, ensure_trainable, Classifier, Model};
use crate::error::{Error, Result};
use crate::pipeline::{FeatureTable, FitId, SparseVector};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Naive Bayes hyperparameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NaiveBayes {
    /// Additive (Laplace) smoothing
    pub smoothing: f64,
}

impl Default for NaiveBayes {
    fn default() -> Self {
        NaiveBayes { smoothing: 1.0 }
    }
}

/// Trained naive Bayes parameters.
#[derive(Debug, Clone)]
pub struct NaiveBayesModel {
    fit_id: FitId,
    /// `ln P(class)`
    pub log_prior: Array1<f64>,
    /// `ln P(feature | class)`, class by feature
    pub log_theta: Array2<f64>,
}

impl Model for NaiveBayesModel {
    fn fit_id(&self) -> FitId {
        self.fit_id
    }

    fn dim(&self) -> usize {
        self.log_theta.ncols()
    }

    fn predict(&self, features: &SparseVector) -> usize {
        let scores: Vec<f64> = (0..self.log_prior.len())
            .map(|c| {
                self.log_prior[c]
                    + features
                        .iter()
                        .filter(|&(j, _)| j < self.dim())
                        .map(|(j, x)| x * self.log_theta[[c, j]])
                        .sum::<f64>()
            })
            .collect();
        argmax(&scores)
    }
}

impl Classifier for NaiveBayes {
    fn name(&self) -> &str {
        "Naive Bayes"
    }

    fn fit(&self, train: &FeatureTable) -> Result<Box<dyn Model>> {
        Ok(Box::new(self.train(train)?))
    }
}

impl NaiveBayes {
    /// Train and return the concrete model type.
    ///
    /// Priors are `ln((n_c + a) / (n + a * K))` and conditionals
    /// `ln((sum_c x_j + a) / (sum_c x + a * d))` with smoothing `a`.
    pub fn train(&self, train: &FeatureTable) -> Result<NaiveBayesModel> {
        ensure_trainable(train)?;
        if self.smoothing < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "naive Bayes smoothing must be >= 0, got {}",
                self.smoothing
            )));
        }

        let k = train.n_classes();
        let d = train.dim;
        let a = self.smoothing;

        let mut feature_sums = Array2::<f64>::zeros((k, d));
        for row in &train.rows {
            for (j, x) in row.features.iter() {
                if x < 0.0 {
                    return Err(Error::NegativeFeature { column: j, value: x });
                }
                feature_sums[[row.label, j]] += x;
            }
        }

        let counts = train.class_counts();
        let n = train.len() as f64;
        let log_prior = Array1::from_iter(
            counts
                .iter()
                .map(|&c| ((c as f64 + a) / (n + a * k as f64)).ln()),
        );

        let mut log_theta = Array2::<f64>::zeros((k, d));
        for c in 0..k {
            let total: f64 = feature_sums.row(c).sum();
            let denom = (total + a * d as f64).ln();
            for j in 0..d {
                log_theta[[c, j]] = (feature_sums[[c, j]] + a).ln() - denom;
            }
        }

        Ok(NaiveBayesModel {
            fit_id: train.fit_id,
            log_prior,
            log_theta,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::test_support::separable_table;
    use crate::pipeline::FeatureRow;

    #[test]
    fn test_conditionals_are_distributions() {
        let table = separable_table(6);
        let model = NaiveBayes::default().train(&table).unwrap();
        for c in 0..3 {
            let total: f64 = model.log_theta.row(c).iter().map(|l| l.exp()).sum();
            assert!((total - 1.0).abs() < 1e-9);
        }
        let prior_total: f64 = model.log_prior.iter().map(|l| l.exp()).sum();
        assert!((prior_total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_vector_falls_back_to_prior() {
        let mut table = separable_table(4);
        // Make class 1 the most frequent.
        let extra = table.rows[1].clone();
        table.rows.push(extra.clone());
        table.rows.push(extra);
        let model = NaiveBayes::default().train(&table).unwrap();
        assert_eq!(model.predict(&SparseVector::zeros(6)), 1);
    }

    #[test]
    fn test_negative_features_rejected() {
        let mut table = separable_table(2);
        table.rows.push(FeatureRow {
            label: 0,
            features: SparseVector::from_pairs(6, vec![(0, -1.0)]),
        });
        let err = NaiveBayes::default().train(&table).unwrap_err();
        assert!(matches!(err, Error::NegativeFeature { column: 0, .. }));
    }
}
