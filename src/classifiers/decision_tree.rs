//! Gini decision trees over binned sparse features.
//!
//! Trees are grown by [`TreeBuilder`] from a shared [`SplitCandidates`]
//! table: every feature has at most `max_bins - 1` thresholds, computed once
//! for the whole forest. Rows carry integer weights so bootstrap duplicates
//! are counted without copying rows.

use crate::pipeline::{FeatureTable, SparseVector};
use rand::rngs::StdRng;
use rand::seq::index::sample;

/// Tree node.
#[derive(Debug, Clone)]
pub enum TreeNode {
    Leaf {
        /// Class probabilities (weighted class frequencies)
        probs: Vec<f64>,
    },
    Split {
        feature: usize,
        threshold: f64,
        /// Rows with `x[feature] <= threshold`
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

/// A fitted classification tree.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    root: TreeNode,
}

impl DecisionTree {
    /// Class probabilities at the leaf `features` falls into.
    pub fn predict_proba(&self, features: &SparseVector) -> &[f64] {
        let mut node = &self.root;
        loop {
            match node {
                TreeNode::Leaf { probs } => return probs,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if features.get(*feature) <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    pub fn depth(&self) -> usize {
        fn depth(node: &TreeNode) -> usize {
            match node {
                TreeNode::Leaf { .. } => 0,
                TreeNode::Split { left, right, .. } => 1 + depth(left).max(depth(right)),
            }
        }
        depth(&self.root)
    }

    pub fn n_leaves(&self) -> usize {
        fn leaves(node: &TreeNode) -> usize {
            match node {
                TreeNode::Leaf { .. } => 1,
                TreeNode::Split { left, right, .. } => leaves(left) + leaves(right),
            }
        }
        leaves(&self.root)
    }
}

/// Per-feature split thresholds and column-major non-zero entries.
pub struct SplitCandidates {
    /// Ascending thresholds per feature; empty when the feature is constant
    pub thresholds: Vec<Vec<f64>>,
    /// `(row, value)` pairs per feature
    columns: Vec<Vec<(usize, f64)>>,
}

impl SplitCandidates {
    /// Compute up to `max_bins - 1` thresholds per feature.
    ///
    /// Features with at most `max_bins` distinct values split at the
    /// midpoints between consecutive values; others split at approximate
    /// quantiles.
    pub fn compute(table: &FeatureTable, max_bins: usize) -> Self {
        let n = table.len();
        let mut columns: Vec<Vec<(usize, f64)>> = vec![Vec::new(); table.dim];
        for (r, row) in table.rows.iter().enumerate() {
            for (j, v) in row.features.iter() {
                columns[j].push((r, v));
            }
        }

        let max_bins = max_bins.max(2);
        let thresholds = columns
            .iter()
            .map(|col| {
                let mut values: Vec<f64> = col.iter().map(|&(_, v)| v).collect();
                values.sort_by(|a, b| a.total_cmp(b));

                // Distinct values with their counts; implicit zeros included.
                let mut distinct: Vec<(f64, usize)> = Vec::new();
                let zeros = n - col.len();
                let mut zero_pending = zeros > 0;
                for v in values {
                    if zero_pending && v > 0.0 {
                        distinct.push((0.0, zeros));
                        zero_pending = false;
                    }
                    match distinct.last_mut() {
                        Some((last, count)) if *last == v => *count += 1,
                        _ => distinct.push((v, 1)),
                    }
                }
                if zero_pending {
                    distinct.push((0.0, zeros));
                }
                thresholds_for(&distinct, n, max_bins)
            })
            .collect();

        SplitCandidates { thresholds, columns }
    }
}

fn thresholds_for(distinct: &[(f64, usize)], n: usize, max_bins: usize) -> Vec<f64> {
    if distinct.len() < 2 {
        return Vec::new();
    }
    let midpoint = |i: usize| (distinct[i].0 + distinct[i + 1].0) / 2.0;

    if distinct.len() <= max_bins {
        return (0..distinct.len() - 1).map(midpoint).collect();
    }

    let stride = n as f64 / max_bins as f64;
    let mut out = Vec::with_capacity(max_bins - 1);
    let mut cumulative = 0usize;
    let mut next_target = stride;
    for i in 0..distinct.len() - 1 {
        cumulative += distinct[i].1;
        if cumulative as f64 >= next_target {
            out.push(midpoint(i));
            while next_target <= cumulative as f64 {
                next_target += stride;
            }
            if out.len() == max_bins - 1 {
                break;
            }
        }
    }
    out
}

/// Grows one tree from a weighted view of the training table.
pub struct TreeBuilder<'a> {
    table: &'a FeatureTable,
    candidates: &'a SplitCandidates,
    /// Bootstrap multiplicity of each row
    weights: Vec<f64>,
    max_depth: usize,
    min_instances: f64,
    features_per_node: usize,
    /// Node stamp per row, used to test node membership in O(1)
    stamp: Vec<usize>,
    next_stamp: usize,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(
        table: &'a FeatureTable,
        candidates: &'a SplitCandidates,
        weights: Vec<f64>,
        max_depth: usize,
        min_instances: usize,
        features_per_node: usize,
    ) -> Self {
        TreeBuilder {
            table,
            candidates,
            weights,
            max_depth,
            min_instances: min_instances.max(1) as f64,
            features_per_node: features_per_node.clamp(1, table.dim.max(1)),
            stamp: vec![0; table.len()],
            next_stamp: 0,
        }
    }

    pub fn build(mut self, rng: &mut StdRng) -> DecisionTree {
        let rows: Vec<usize> = (0..self.table.len())
            .filter(|&r| self.weights[r] > 0.0)
            .collect();
        let root = self.grow(&rows, 0, rng);
        DecisionTree { root }
    }

    fn class_totals(&self, rows: &[usize]) -> Vec<f64> {
        let mut totals = vec![0.0; self.table.n_classes()];
        for &r in rows {
            totals[self.table.rows[r].label] += self.weights[r];
        }
        totals
    }

    fn grow(&mut self, rows: &[usize], depth: usize, rng: &mut StdRng) -> TreeNode {
        let totals = self.class_totals(rows);
        let weight: f64 = totals.iter().sum();
        let impurity = gini(&totals, weight);

        if depth >= self.max_depth || impurity <= 1e-12 || weight < 2.0 * self.min_instances {
            return leaf(totals, weight);
        }

        let Some((feature, threshold)) = self.best_split(rows, &totals, weight, impurity, rng) else {
            return leaf(totals, weight);
        };

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
            .iter()
            .copied()
            .partition(|&r| self.table.rows[r].features.get(feature) <= threshold);

        let left = self.grow(&left_rows, depth + 1, rng);
        let right = self.grow(&right_rows, depth + 1, rng);
        TreeNode::Split {
            feature,
            threshold,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn best_split(
        &mut self,
        rows: &[usize],
        totals: &[f64],
        weight: f64,
        impurity: f64,
        rng: &mut StdRng,
    ) -> Option<(usize, f64)> {
        if self.table.dim == 0 {
            return None;
        }
        self.next_stamp += 1;
        let stamp = self.next_stamp;
        for &r in rows {
            self.stamp[r] = stamp;
        }

        let k = totals.len();
        let dim = self.table.dim;
        let mut best: Option<(usize, f64)> = None;
        let mut best_gain = 0.0;

        for feature in sample(rng, dim, self.features_per_node).into_iter() {
            let thresholds = &self.candidates.thresholds[feature];
            if thresholds.is_empty() {
                continue;
            }

            // hist[bin * k + class]; every node row starts in the zero bin and
            // non-zero entries are moved to their own bin.
            let bins = thresholds.len() + 1;
            let mut hist = vec![0.0; bins * k];
            let zero_bin = bin_of(thresholds, 0.0);
            for (c, &t) in totals.iter().enumerate() {
                hist[zero_bin * k + c] = t;
            }
            for &(r, v) in &self.candidates.columns[feature] {
                if self.stamp[r] != stamp {
                    continue;
                }
                let c = self.table.rows[r].label;
                let w = self.weights[r];
                let b = bin_of(thresholds, v);
                hist[zero_bin * k + c] -= w;
                hist[b * k + c] += w;
            }

            let mut left = vec![0.0; k];
            for (split, &threshold) in thresholds.iter().enumerate() {
                for c in 0..k {
                    left[c] += hist[split * k + c];
                }
                let left_weight: f64 = left.iter().sum();
                let right_weight = weight - left_weight;
                if left_weight < self.min_instances || right_weight < self.min_instances {
                    continue;
                }
                let right: Vec<f64> = totals.iter().zip(&left).map(|(t, l)| t - l).collect();
                let child = (left_weight * gini(&left, left_weight)
                    + right_weight * gini(&right, right_weight))
                    / weight;
                let gain = impurity - child;
                if gain > best_gain + 1e-12 {
                    best_gain = gain;
                    best = Some((feature, threshold));
                }
            }
        }
        best
    }
}

/// Index of the first threshold `>= value`, or `thresholds.len()`.
fn bin_of(thresholds: &[f64], value: f64) -> usize {
    thresholds.partition_point(|&t| t < value)
}

fn gini(counts: &[f64], total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    1.0 - counts.iter().map(|&c| (c / total).powi(2)).sum::<f64>()
}

fn leaf(totals: Vec<f64>, weight: f64) -> TreeNode {
    let probs = if weight > 0.0 {
        totals.iter().map(|t| t / weight).collect()
    } else {
        vec![1.0 / totals.len().max(1) as f64; totals.len()]
    };
    TreeNode::Leaf { probs }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::test_support::separable_table;
    use rand::SeedableRng;

    #[test]
    fn test_thresholds_include_implicit_zeros() {
        let table = separable_table(3);
        let candidates = SplitCandidates::compute(&table, 64);
        // Column 1 holds 1.0 for class 0 rows and 0 elsewhere.
        assert_eq!(candidates.thresholds[1], vec![0.5]);
        // Column 0 holds 0, 1, 2, 3.
        assert_eq!(candidates.thresholds[0], vec![0.5, 1.5, 2.5]);
    }

    #[test]
    fn test_quantile_thresholds_are_bounded() {
        let distinct: Vec<(f64, usize)> = (0..100).map(|v| (v as f64, 1)).collect();
        let t = thresholds_for(&distinct, 100, 8);
        assert!(t.len() <= 7);
        assert!(t.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_bin_of() {
        let t = [0.5, 1.5];
        assert_eq!(bin_of(&t, 0.0), 0);
        assert_eq!(bin_of(&t, 0.5), 0);
        assert_eq!(bin_of(&t, 1.0), 1);
        assert_eq!(bin_of(&t, 9.0), 2);
    }

    #[test]
    fn test_full_tree_fits_separable_data() {
        let table = separable_table(5);
        let candidates = SplitCandidates::compute(&table, 64);
        let weights = vec![1.0; table.len()];
        let mut rng = StdRng::seed_from_u64(3);
        let tree = TreeBuilder::new(&table, &candidates, weights, 5, 1, table.dim).build(&mut rng);

        assert!(tree.depth() <= 5);
        for row in &table.rows {
            let probs = tree.predict_proba(&row.features);
            assert_eq!(crate::classifiers::argmax(probs), row.label);
        }
    }

    #[test]
    fn test_depth_zero_is_prior_leaf() {
        let table = separable_table(2);
        let candidates = SplitCandidates::compute(&table, 64);
        let weights = vec![1.0; table.len()];
        let mut rng = StdRng::seed_from_u64(0);
        let tree = TreeBuilder::new(&table, &candidates, weights, 0, 1, 6).build(&mut rng);
        assert_eq!(tree.n_leaves(), 1);
        let probs = tree.predict_proba(&SparseVector::zeros(6));
        assert!(probs.iter().all(|p| (p - 1.0 / 3.0).abs() < 1e-12));
    }
}
