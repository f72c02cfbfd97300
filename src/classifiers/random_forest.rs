//! Random forest of Gini decision trees.

use super::decision_tree::{DecisionTree, SplitCandidates, TreeBuilder};
use super::{argmax, ensure_trainable, Classifier, Model};
use crate::error::{Error, Result};
use crate::pipeline::{FeatureTable, FitId, SparseVector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Random forest hyperparameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomForest {
    /// Number of trees in the forest
    pub num_trees: usize,
    /// Maximum depth of each tree
    pub max_depth: usize,
    /// Maximum number of bins used to discretise each feature
    pub max_bins: usize,
    /// Minimum (bootstrap-weighted) rows on each side of a split
    pub min_instances_per_node: usize,
    /// Tree `i` is grown from seed `seed + i`
    pub seed: u64,
}

impl Default for RandomForest {
    fn default() -> Self {
        RandomForest {
            num_trees: 50,
            max_depth: 5,
            max_bins: 64,
            min_instances_per_node: 1,
            seed: 42,
        }
    }
}

/// Trained forest.
#[derive(Debug, Clone)]
pub struct RandomForestModel {
    fit_id: FitId,
    dim: usize,
    n_classes: usize,
    pub trees: Vec<DecisionTree>,
}

impl RandomForestModel {
    /// Class probabilities averaged over all trees.
    pub fn predict_proba(&self, features: &SparseVector) -> Vec<f64> {
        let mut probs = vec![0.0; self.n_classes];
        for tree in &self.trees {
            for (acc, p) in probs.iter_mut().zip(tree.predict_proba(features)) {
                *acc += p;
            }
        }
        let n = self.trees.len().max(1) as f64;
        probs.iter_mut().for_each(|p| *p /= n);
        probs
    }
}

impl Model for RandomForestModel {
    fn fit_id(&self) -> FitId {
        self.fit_id
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn predict(&self, features: &SparseVector) -> usize {
        argmax(&self.predict_proba(features))
    }
}

impl Classifier for RandomForest {
    fn name(&self) -> &str {
        "Random Forest"
    }

    fn fit(&self, train: &FeatureTable) -> Result<Box<dyn Model>> {
        Ok(Box::new(self.train(train)?))
    }
}

impl RandomForest {
    /// Train and return the concrete model type.
    ///
    /// Each tree sees a bootstrap sample of the rows and considers
    /// `ceil(sqrt(dim))` randomly chosen features at every node.
    pub fn train(&self, train: &FeatureTable) -> Result<RandomForestModel> {
        ensure_trainable(train)?;
        if self.num_trees == 0 || self.max_bins < 2 {
            return Err(Error::InvalidConfig(
                "random forest needs num_trees >= 1 and max_bins >= 2".to_string(),
            ));
        }

        let n = train.len();
        let features_per_node = (train.dim as f64).sqrt().ceil() as usize;
        let candidates = SplitCandidates::compute(train, self.max_bins);
        tracing::debug!(
            trees = self.num_trees,
            features_per_node,
            "growing random forest"
        );

        let trees: Vec<DecisionTree> = (0..self.num_trees)
            .into_par_iter()
            .map(|i| {
                let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(i as u64));
                let mut weights = vec![0.0; n];
                for _ in 0..n {
                    weights[rng.gen_range(0..n)] += 1.0;
                }
                TreeBuilder::new(
                    train,
                    &candidates,
                    weights,
                    self.max_depth,
                    self.min_instances_per_node,
                    features_per_node,
                )
                .build(&mut rng)
            })
            .collect();

        Ok(RandomForestModel {
            fit_id: train.fit_id,
            dim: train.dim,
            n_classes: train.n_classes(),
            trees,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::test_support::separable_table;

    #[test]
    fn test_same_seed_same_forest() {
        let table = separable_table(10);
        let forest = RandomForest {
            num_trees: 5,
            ..Default::default()
        };
        let a = forest.train(&table).unwrap();
        let b = forest.train(&table).unwrap();
        for row in &table.rows {
            assert_eq!(a.predict_proba(&row.features), b.predict_proba(&row.features));
        }
    }

    #[test]
    fn test_probabilities_are_averaged() {
        let table = separable_table(10);
        let model = RandomForest {
            num_trees: 7,
            ..Default::default()
        }
        .train(&table)
        .unwrap();
        assert_eq!(model.trees.len(), 7);
        let probs = model.predict_proba(&table.rows[4].features);
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_depth_is_bounded() {
        let table = separable_table(10);
        let model = RandomForest {
            num_trees: 3,
            max_depth: 1,
            ..Default::default()
        }
        .train(&table)
        .unwrap();
        assert!(model.trees.iter().all(|t| t.depth() <= 1));
    }

    #[test]
    fn test_zero_trees_rejected() {
        let table = separable_table(2);
        let forest = RandomForest {
            num_trees: 0,
            ..Default::default()
        };
        assert!(matches!(forest.train(&table), Err(Error::InvalidConfig(_))));
    }
}
