//! Sparse feature vectors.

use serde::{Deserialize, Serialize};

/// A fixed-dimension vector storing only its non-zero entries.
///
/// `indices` is strictly increasing and every index is below `dim`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    dim: usize,
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl SparseVector {
    /// An all-zero vector of the given dimension.
    pub fn zeros(dim: usize) -> Self {
        SparseVector {
            dim,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Build from `(index, value)` pairs in any order.
    ///
    /// Duplicate indices are summed; entries at or beyond `dim` and explicit
    /// zeros are dropped.
    pub fn from_pairs(dim: usize, mut pairs: Vec<(usize, f64)>) -> Self {
        pairs.sort_by_key(|&(i, _)| i);
        let mut indices: Vec<usize> = Vec::with_capacity(pairs.len());
        let mut values: Vec<f64> = Vec::with_capacity(pairs.len());
        for (i, v) in pairs {
            if i >= dim {
                continue;
            }
            match indices.last() {
                Some(&last) if last == i => {
                    if let Some(acc) = values.last_mut() {
                        *acc += v;
                    }
                }
                _ => {
                    indices.push(i);
                    values.push(v);
                }
            }
        }

        let (indices, values) = indices
            .into_iter()
            .zip(values)
            .filter(|&(_, v)| v != 0.0)
            .unzip();
        SparseVector { dim, indices, values }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|&v| v == 0.0)
    }

    /// Value at `index`, zero when not stored.
    pub fn get(&self, index: usize) -> f64 {
        match self.indices.binary_search(&index) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + Clone + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Apply `f(index, value)` to every stored entry.
    pub fn map_values(&self, f: impl Fn(usize, f64) -> f64) -> SparseVector {
        let pairs = self.iter().map(|(i, v)| (i, f(i, v))).collect();
        SparseVector::from_pairs(self.dim, pairs)
    }

    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.dim];
        for (i, v) in self.iter() {
            dense[i] = v;
        }
        dense
    }
}
