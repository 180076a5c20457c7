//! Bit-packed boolean matrices
//!
//! A [`BitsetMatrix`] records only whether each cell of a matrix is non-zero.
//! Bits are stored row-major in `u64` words, every row padded to a whole
//! number of words so a row starts at `row * words_per_row`. Multiplying two
//! boolean matrices yields the exact non-zero structure of the numeric
//! product, which is what the exact estimator counts.

pub mod kernel;
#[cfg(test)]
mod reference;

use rayon::prelude::*;
use spest_core::{EstimError, MatrixBlock, MatrixCharacteristics, Result};
use tracing::debug;

use crate::config::EstimatorConfig;

/// Bits per storage word
pub const WORD_BITS: usize = u64::BITS as usize;

/// Boolean existence matrix packed into 64-bit words
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitsetMatrix {
    nrows: usize,
    ncols: usize,
    words_per_row: usize,
    data: Vec<u64>,
    /// Number of set bits
    nnz: u64,
}

impl BitsetMatrix {
    /// Create an all-zero boolean matrix
    pub fn new(nrows: usize, ncols: usize) -> Self {
        let words_per_row = ncols.div_ceil(WORD_BITS);
        Self {
            nrows,
            ncols,
            words_per_row,
            data: vec![0; nrows * words_per_row],
            nnz: 0,
        }
    }

    /// Build the existence pattern of a concrete matrix
    ///
    /// The non-zero count is taken from `block.nnz()` rather than recounted.
    /// Sources with more than `config.build_parallel_threshold` non-zeros are
    /// built by several rayon tasks, each owning a disjoint range of rows.
    pub fn from_block<B: MatrixBlock + ?Sized>(block: &B, config: &EstimatorConfig) -> Self {
        let (nrows, ncols) = block.dimensions();
        let mut matrix = Self::new(nrows, ncols);
        if block.is_empty() || matrix.data.is_empty() {
            return matrix;
        }

        let wpr = matrix.words_per_row;
        let parallel = config.parallel_build(block.nnz());
        if parallel {
            let rows_per_task = nrows.div_ceil(config.parallel_tasks(nrows));
            matrix
                .data
                .par_chunks_mut(rows_per_task * wpr)
                .enumerate()
                .for_each(|(task, words)| build_rows(block, words, task * rows_per_task, wpr));
        } else {
            build_rows(block, &mut matrix.data, 0, wpr);
        }
        matrix.nnz = block.nnz();

        debug!(
            rows = nrows,
            cols = ncols,
            nnz = matrix.nnz,
            parallel,
            "built boolean matrix"
        );
        matrix
    }

    /// Number of rows
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Number of set bits
    pub fn nnz(&self) -> u64 {
        self.nnz
    }

    /// Number of storage words per row
    pub fn words_per_row(&self) -> usize {
        self.words_per_row
    }

    /// Size and sparsity descriptor of this pattern
    pub fn characteristics(&self) -> MatrixCharacteristics {
        MatrixCharacteristics::new(self.nrows as u64, self.ncols as u64, self.nnz)
    }

    /// Fraction of set bits
    pub fn sparsity(&self) -> f64 {
        self.characteristics().sparsity()
    }

    /// Check whether the cell at (row, col) is non-zero
    ///
    /// Out-of-bounds positions report `false`.
    pub fn get(&self, row: usize, col: usize) -> bool {
        if row >= self.nrows || col >= self.ncols {
            return false;
        }
        kernel::test_bit(self.row_words(row), col)
    }

    /// Packed words of a row
    pub fn row_words(&self, row: usize) -> &[u64] {
        let start = row * self.words_per_row;
        &self.data[start..start + self.words_per_row]
    }

    /// Count set bits by scanning all words
    ///
    /// Equals [`nnz`](Self::nnz) whenever the source matrix declared an
    /// accurate non-zero count.
    pub fn count_ones(&self) -> u64 {
        kernel::popcount(&self.data)
    }

    /// Iterator over the positions of all set bits in row-major order
    pub fn iter_set(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.nrows).flat_map(move |row| {
            let words = self.row_words(row);
            words.iter().enumerate().flat_map(move |(w, &word)| {
                let mut bits = word;
                std::iter::from_fn(move || {
                    if bits == 0 {
                        return None;
                    }
                    let bit = bits.trailing_zeros() as usize;
                    bits &= bits - 1;
                    Some((row, w * WORD_BITS + bit))
                })
            })
        })
    }

    /// Boolean matrix product `self x other`
    ///
    /// Bit (i, j) of the result is set iff some `t` has both `self(i, t)` and
    /// `other(t, j)` set. The result carries its exact set-bit count.
    pub fn multiply(&self, other: &BitsetMatrix, config: &EstimatorConfig) -> Result<BitsetMatrix> {
        if self.ncols != other.nrows {
            return Err(EstimError::DimensionMismatch {
                expected: self.ncols as u64,
                found: other.nrows as u64,
            });
        }

        let mut out = BitsetMatrix::new(self.nrows, other.ncols);
        if self.nnz == 0 || other.nnz == 0 || out.data.is_empty() {
            return Ok(out);
        }

        let cells = (self.nrows as u64 * self.ncols as u64)
            .saturating_add(other.nrows as u64 * other.ncols as u64);
        let parallel = config.parallel_multiply(cells);
        let wpr = out.words_per_row;
        out.nnz = if parallel {
            let rows_per_task = self.nrows.div_ceil(config.parallel_tasks(self.nrows));
            out.data
                .par_chunks_mut(rows_per_task * wpr)
                .enumerate()
                .map(|(task, words)| {
                    kernel::multiply_rows(self, other, words, task * rows_per_task, config)
                })
                .sum()
        } else {
            kernel::multiply_rows(self, other, &mut out.data, 0, config)
        };

        debug!(
            rows = out.nrows,
            cols = out.ncols,
            shared = self.ncols,
            nnz = out.nnz,
            parallel,
            "multiplied boolean matrices"
        );
        Ok(out)
    }
}

/// Set the bits of consecutive source rows starting at `first_row`
fn build_rows<B: MatrixBlock + ?Sized>(block: &B, words: &mut [u64], first_row: usize, wpr: usize) {
    for (offset, row_words) in words.chunks_mut(wpr).enumerate() {
        let row = block.row(first_row + offset);
        if row.is_trivially_empty() {
            continue;
        }
        row.for_each_nonzero(|col| kernel::set_bit(row_words, col));
    }
}
