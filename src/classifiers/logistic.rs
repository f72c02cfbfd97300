//! Multinomial logistic regression.
//!
//! Softmax regression trained by full-batch gradient descent on the mean
//! cross-entropy plus an L2 penalty `0.5 * reg_param * ||W||^2`. Intercepts
//! are not penalised. With `standardize` set, each feature is scaled by its
//! standard deviation during training; the learned weights are mapped back so
//! the model scores raw feature vectors.

use super::{argmax, ensure_trainable, Classifier, Model};
use crate::error::{Error, Result};
use crate::pipeline::{FeatureTable, FitId, SparseVector};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

const MIN_STEP: f64 = 1e-10;

/// Logistic regression hyperparameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticRegression {
    /// Maximum gradient steps
    pub max_iter: usize,
    /// L2 regularization strength
    pub reg_param: f64,
    /// Initial step size; halved while a step would increase the loss
    pub learning_rate: f64,
    /// Stop when the loss changes by less than this between steps
    pub tolerance: f64,
    /// Scale features to unit variance while training
    pub standardize: bool,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        LogisticRegression {
            max_iter: 20,
            reg_param: 0.3,
            learning_rate: 1.0,
            tolerance: 1e-6,
            standardize: true,
        }
    }
}

/// Trained logistic regression weights.
#[derive(Debug, Clone)]
pub struct LogisticRegressionModel {
    fit_id: FitId,
    /// Class by feature weights over raw features
    pub weights: Array2<f64>,
    pub intercepts: Array1<f64>,
    /// Objective value at the start and after each accepted step
    pub loss_history: Vec<f64>,
}

impl LogisticRegressionModel {
    /// Class probabilities for one feature vector.
    pub fn predict_proba(&self, features: &SparseVector) -> Vec<f64> {
        let scores = scores(&self.weights, &self.intercepts, features.iter());
        softmax(&scores)
    }
}

impl Model for LogisticRegressionModel {
    fn fit_id(&self) -> FitId {
        self.fit_id
    }

    fn dim(&self) -> usize {
        self.weights.ncols()
    }

    fn predict(&self, features: &SparseVector) -> usize {
        argmax(&scores(&self.weights, &self.intercepts, features.iter()))
    }
}

impl Classifier for LogisticRegression {
    fn name(&self) -> &str {
        "Logistic Regression"
    }

    fn fit(&self, train: &FeatureTable) -> Result<Box<dyn Model>> {
        Ok(Box::new(self.train(train)?))
    }
}

impl LogisticRegression {
    /// Train and return the concrete model type.
    pub fn train(&self, train: &FeatureTable) -> Result<LogisticRegressionModel> {
        ensure_trainable(train)?;
        if self.reg_param < 0.0 || self.learning_rate <= 0.0 {
            return Err(Error::InvalidConfig(
                "logistic regression needs reg_param >= 0 and learning_rate > 0".to_string(),
            ));
        }

        let n = train.len() as f64;
        let k = train.n_classes();
        let d = train.dim;
        let inv_std = if self.standardize {
            inverse_std(train)
        } else {
            vec![1.0; d]
        };

        let mut weights = Array2::<f64>::zeros((k, d));
        let mut intercepts = Array1::from_vec(log_priors(train));
        let mut step = self.learning_rate;

        let (mut loss, mut grad_w, mut grad_b) =
            objective(train, &weights, &intercepts, &inv_std, self.reg_param, n);
        let mut loss_history = vec![loss];

        for iter in 0..self.max_iter {
            // Backtrack until the step does not increase the objective.
            let accepted = loop {
                let mut cand_w = weights.clone();
                let mut cand_b = intercepts.clone();
                cand_w.scaled_add(-step, &grad_w);
                cand_b.scaled_add(-step, &grad_b);
                let (cand_loss, gw, gb) =
                    objective(train, &cand_w, &cand_b, &inv_std, self.reg_param, n);
                if cand_loss <= loss {
                    break Some((cand_w, cand_b, cand_loss, gw, gb));
                }
                step *= 0.5;
                if step < MIN_STEP {
                    break None;
                }
            };

            let Some((w, b, new_loss, gw, gb)) = accepted else {
                tracing::debug!("No descent step found at iteration {}", iter);
                break;
            };
            let change = loss - new_loss;
            weights = w;
            intercepts = b;
            loss = new_loss;
            grad_w = gw;
            grad_b = gb;
            loss_history.push(loss);
            tracing::debug!(iter, loss, step, "logistic regression step");

            if change < self.tolerance {
                tracing::debug!("Converged at iteration {}", iter);
                break;
            }
        }

        // Fold the scaling into the weights so prediction uses raw features.
        for mut row in weights.rows_mut() {
            for (w, &s) in row.iter_mut().zip(&inv_std) {
                *w *= s;
            }
        }

        Ok(LogisticRegressionModel {
            fit_id: train.fit_id,
            weights,
            intercepts,
            loss_history,
        })
    }
}

/// Mean cross-entropy plus penalty, and its gradients, in scaled space.
fn objective(
    train: &FeatureTable,
    weights: &Array2<f64>,
    intercepts: &Array1<f64>,
    inv_std: &[f64],
    reg: f64,
    n: f64,
) -> (f64, Array2<f64>, Array1<f64>) {
    let k = weights.nrows();
    let mut grad_w = Array2::<f64>::zeros(weights.raw_dim());
    let mut grad_b = Array1::<f64>::zeros(k);
    let mut loss = 0.0;

    for row in &train.rows {
        let scaled = row.features.iter().map(|(j, v)| (j, v * inv_std[j]));
        let probs = softmax(&scores(weights, intercepts, scaled.clone()));
        loss -= probs[row.label].max(1e-300).ln();

        for (c, &p) in probs.iter().enumerate() {
            let diff = p - if c == row.label { 1.0 } else { 0.0 };
            grad_b[c] += diff;
            for (j, x) in scaled.clone() {
                grad_w[[c, j]] += diff * x;
            }
        }
    }

    loss /= n;
    grad_w /= n;
    grad_b /= n;

    loss += 0.5 * reg * weights.iter().map(|w| w * w).sum::<f64>();
    grad_w.scaled_add(reg, weights);

    (loss, grad_w, grad_b)
}

fn scores(
    weights: &Array2<f64>,
    intercepts: &Array1<f64>,
    features: impl Iterator<Item = (usize, f64)> + Clone,
) -> Vec<f64> {
    (0..weights.nrows())
        .map(|c| {
            intercepts[c]
                + features
                    .clone()
                    .filter(|&(j, _)| j < weights.ncols())
                    .map(|(j, x)| weights[[c, j]] * x)
                    .sum::<f64>()
        })
        .collect()
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Log class priors, used to initialise intercepts.
fn log_priors(train: &FeatureTable) -> Vec<f64> {
    let n = train.len() as f64;
    train
        .class_counts()
        .iter()
        .map(|&c| ((c as f64 + 1.0) / (n + train.n_classes() as f64)).ln())
        .collect()
}

/// `1 / std` per column (sample standard deviation), zero for constant columns.
fn inverse_std(train: &FeatureTable) -> Vec<f64> {
    let d = train.dim;
    let n = train.len() as f64;
    let mut sum = vec![0.0; d];
    let mut sum_sq = vec![0.0; d];
    for row in &train.rows {
        for (j, v) in row.features.iter() {
            sum[j] += v;
            sum_sq[j] += v * v;
        }
    }

    (0..d)
        .map(|j| {
            if n < 2.0 {
                return 1.0;
            }
            let mean = sum[j] / n;
            let var = ((sum_sq[j] - n * mean * mean) / (n - 1.0)).max(0.0);
            if var > 0.0 {
                1.0 / var.sqrt()
            } else {
                0.0
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::test_support::{accuracy, separable_table};

    #[test]
    fn test_loss_decreases() {
        let table = separable_table(10);
        let model = LogisticRegression::default().train(&table).unwrap();
        let first = model.loss_history[0];
        let last = *model.loss_history.last().unwrap();
        assert!(last < first, "loss went from {} to {}", first, last);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let table = separable_table(10);
        let model = LogisticRegression::default().train(&table).unwrap();
        let probs = model.predict_proba(&table.rows[0].features);
        assert_eq!(probs.len(), 3);
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_without_standardization() {
        let table = separable_table(10);
        let lr = LogisticRegression {
            standardize: false,
            max_iter: 50,
            ..Default::default()
        };
        let model = lr.train(&table).unwrap();
        let pred = model.predict_table(&table).unwrap();
        assert!(accuracy(&pred, &table.label_column()) > 0.95);
    }

    #[test]
    fn test_stronger_penalty_shrinks_weights() {
        let table = separable_table(10);
        let norm = |m: &LogisticRegressionModel| m.weights.iter().map(|w| w * w).sum::<f64>();
        let weak = LogisticRegression {
            reg_param: 0.01,
            ..Default::default()
        }
        .train(&table)
        .unwrap();
        let strong = LogisticRegression {
            reg_param: 5.0,
            ..Default::default()
        }
        .train(&table)
        .unwrap();
        assert!(norm(&strong) < norm(&weak));
    }

    #[test]
    fn test_invalid_hyperparameters() {
        let table = separable_table(2);
        let lr = LogisticRegression {
            learning_rate: 0.0,
            ..Default::default()
        };
        assert!(matches!(lr.train(&table), Err(Error::InvalidConfig(_))));
    }
}
