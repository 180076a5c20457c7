//! In-memory matrix blocks
//!
//! Minimal sparse (CSR) and dense row-major matrices implementing
//! [`MatrixBlock`], so the estimators can be driven without an external
//! storage layer.

use spest_core::{MatrixBlock, RowView};

/// Compressed sparse row matrix
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    nrows: usize,
    ncols: usize,
    /// Start offset of each row in `col_idx`, plus the total at the end
    row_ptr: Vec<usize>,
    /// Column index of each stored value, sorted within a row
    col_idx: Vec<usize>,
    values: Vec<f64>,
}

impl CsrMatrix {
    /// Create an all-zero matrix
    pub fn empty(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            row_ptr: vec![0; nrows + 1],
            col_idx: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Build from `(row, col, value)` triplets
    ///
    /// Duplicate positions are summed and explicit zeros are dropped.
    ///
    /// # Panics
    ///
    /// Panics if a triplet lies outside `nrows x ncols`.
    pub fn from_triplets(nrows: usize, ncols: usize, triplets: &[(usize, usize, f64)]) -> Self {
        let mut sorted = triplets.to_vec();
        for &(row, col, _) in &sorted {
            assert!(
                row < nrows && col < ncols,
                "triplet ({row}, {col}) outside {nrows}x{ncols} matrix"
            );
        }
        sorted.sort_by_key(|&(row, col, _)| (row, col));

        // Merge duplicates
        let mut merged: Vec<(usize, usize, f64)> = Vec::with_capacity(sorted.len());
        for (row, col, value) in sorted {
            match merged.last_mut() {
                Some(last) if last.0 == row && last.1 == col => last.2 += value,
                _ => merged.push((row, col, value)),
            }
        }

        let mut row_ptr = vec![0usize; nrows + 1];
        let mut col_idx = Vec::with_capacity(merged.len());
        let mut values = Vec::with_capacity(merged.len());
        for (row, col, value) in merged.into_iter().filter(|&(_, _, v)| v != 0.0) {
            row_ptr[row + 1] += 1;
            col_idx.push(col);
            values.push(value);
        }
        for row in 0..nrows {
            row_ptr[row + 1] += row_ptr[row];
        }

        Self {
            nrows,
            ncols,
            row_ptr,
            col_idx,
            values,
        }
    }

    /// Build from a boolean existence pattern, storing ones
    pub fn from_pattern(nrows: usize, ncols: usize, positions: &[(usize, usize)]) -> Self {
        let triplets: Vec<_> = positions.iter().map(|&(r, c)| (r, c, 1.0)).collect();
        let mut matrix = Self::from_triplets(nrows, ncols, &triplets);
        // Duplicates were summed; the pattern only cares about existence
        matrix.values.iter_mut().for_each(|v| *v = 1.0);
        matrix
    }

    /// Get the value at a position, `None` if not stored
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.nrows {
            return None;
        }
        let (start, end) = (self.row_ptr[row], self.row_ptr[row + 1]);
        self.col_idx[start..end]
            .binary_search(&col)
            .ok()
            .map(|pos| self.values[start + pos])
    }

    /// Column indices of the non-zeros in a row
    pub fn row_indices(&self, row: usize) -> &[usize] {
        &self.col_idx[self.row_ptr[row]..self.row_ptr[row + 1]]
    }

    /// Iterator over `(row, col, value)` of all stored elements
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (0..self.nrows).flat_map(move |row| {
            let (start, end) = (self.row_ptr[row], self.row_ptr[row + 1]);
            (start..end).map(move |i| (row, self.col_idx[i], self.values[i]))
        })
    }

    /// Convert to dense row-major storage
    pub fn to_dense(&self) -> DenseMatrix {
        let mut values = vec![0.0; self.nrows * self.ncols];
        for (row, col, value) in self.iter() {
            values[row * self.ncols + col] = value;
        }
        DenseMatrix::new(self.nrows, self.ncols, values)
    }
}

impl MatrixBlock for CsrMatrix {
    fn dimensions(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    fn nnz(&self) -> u64 {
        self.values.len() as u64
    }

    fn row(&self, row: usize) -> RowView<'_> {
        RowView::Sparse(self.row_indices(row))
    }
}

/// Dense row-major matrix
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    nrows: usize,
    ncols: usize,
    values: Vec<f64>,
    nnz: u64,
}

impl DenseMatrix {
    /// Create from a flat row-major value vector
    ///
    /// # Panics
    ///
    /// Panics if `values.len() != nrows * ncols`.
    pub fn new(nrows: usize, ncols: usize, values: Vec<f64>) -> Self {
        assert_eq!(
            values.len(),
            nrows * ncols,
            "dense matrix {nrows}x{ncols} needs {} values",
            nrows * ncols
        );
        let nnz = values.iter().filter(|&&v| v != 0.0).count() as u64;
        Self {
            nrows,
            ncols,
            values,
            nnz,
        }
    }

    /// Create an all-zero matrix
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self::new(nrows, ncols, vec![0.0; nrows * ncols])
    }

    /// Create from a slice of equally long rows
    pub fn from_rows(rows: &[&[f64]]) -> Self {
        let ncols = rows.first().map_or(0, |row| row.len());
        let values = rows.iter().flat_map(|row| row.iter().copied()).collect();
        Self::new(rows.len(), ncols, values)
    }

    /// Get the value at a position
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.ncols + col]
    }

    /// Values of a row in column order
    pub fn row_values(&self, row: usize) -> &[f64] {
        &self.values[row * self.ncols..(row + 1) * self.ncols]
    }
}

impl MatrixBlock for DenseMatrix {
    fn dimensions(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    fn nnz(&self) -> u64 {
        self.nnz
    }

    fn row(&self, row: usize) -> RowView<'_> {
        RowView::Dense(self.row_values(row))
    }
}
