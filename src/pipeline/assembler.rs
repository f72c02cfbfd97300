//! Feature assembly.

use super::sparse::SparseVector;
use crate::error::{Error, Result};

/// Concatenates several feature blocks into the single vector consumed by
/// classifiers. Block `k` occupies the index range after blocks `0..k`.
#[derive(Debug, Clone)]
pub struct VectorAssembler {
    dims: Vec<usize>,
}

impl VectorAssembler {
    pub fn new(dims: Vec<usize>) -> Self {
        VectorAssembler { dims }
    }

    pub fn output_dim(&self) -> usize {
        self.dims.iter().sum()
    }

    pub fn assemble(&self, blocks: &[&SparseVector]) -> Result<SparseVector> {
        if blocks.len() != self.dims.len() {
            return Err(Error::DimensionMismatch {
                expected: self.dims.len(),
                got: blocks.len(),
            });
        }

        let mut pairs = Vec::with_capacity(blocks.iter().map(|b| b.nnz()).sum());
        let mut offset = 0;
        for (block, &dim) in blocks.iter().zip(&self.dims) {
            if block.dim() != dim {
                return Err(Error::DimensionMismatch {
                    expected: dim,
                    got: block.dim(),
                });
            }
            pairs.extend(block.iter().map(|(i, v)| (offset + i, v)));
            offset += dim;
        }
        Ok(SparseVector::from_pairs(offset, pairs))
    }
}
