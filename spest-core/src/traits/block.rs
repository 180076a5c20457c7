//! Row-oriented matrix access trait
//!
//! This module defines the iteration contract over non-zero positions that
//! boolean matrix construction relies on. Pure interfaces, no implementations.

use crate::MatrixCharacteristics;

/// Non-zero layout of a single matrix row
///
/// Sparse rows list the column indices of their non-zeros. Dense rows expose
/// every value of the row and are scanned against zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowView<'a> {
    /// Column indices of the non-zero cells
    Sparse(&'a [usize]),
    /// All values of the row in column order
    Dense(&'a [f64]),
}

impl<'a> RowView<'a> {
    /// Visit the column index of every non-zero cell in the row
    pub fn for_each_nonzero<F: FnMut(usize)>(&self, mut f: F) {
        match self {
            RowView::Sparse(indices) => indices.iter().for_each(|&col| f(col)),
            RowView::Dense(values) => values
                .iter()
                .enumerate()
                .filter(|(_, &value)| value != 0.0)
                .for_each(|(col, _)| f(col)),
        }
    }

    /// Whether the row is known to contain no non-zeros without scanning
    pub fn is_trivially_empty(&self) -> bool {
        match self {
            RowView::Sparse(indices) => indices.is_empty(),
            RowView::Dense(values) => values.is_empty(),
        }
    }
}

/// Concrete matrix that the boolean matrix kernel can be built from
///
/// Implementations must be `Sync` so rows can be read from several worker
/// threads at once.
pub trait MatrixBlock: Sync {
    /// Get matrix dimensions as (rows, cols)
    fn dimensions(&self) -> (usize, usize);

    /// Get the declared number of non-zero elements
    ///
    /// Boolean matrix construction trusts this value instead of recounting.
    fn nnz(&self) -> u64;

    /// Get the non-zero layout of a row
    fn row(&self, row: usize) -> RowView<'_>;

    /// Whether the matrix has no non-zero elements
    fn is_empty(&self) -> bool {
        self.nnz() == 0
    }

    /// Size and sparsity descriptor of this matrix
    fn characteristics(&self) -> MatrixCharacteristics {
        let (rows, cols) = self.dimensions();
        MatrixCharacteristics::new(rows as u64, cols as u64, self.nnz())
    }

    /// Fraction of non-zero cells
    fn sparsity(&self) -> f64 {
        self.characteristics().sparsity()
    }
}
