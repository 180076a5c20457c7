//! Size and sparsity descriptors
//!
//! A [`MatrixCharacteristics`] describes a matrix by its shape and non-zero
//! count only. Leaves of an operation tree produce them from concrete
//! matrices; estimators derive new ones from their operands.

/// Immutable (rows, cols, nnz) descriptor of a matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatrixCharacteristics {
    rows: u64,
    cols: u64,
    nnz: u64,
}

impl MatrixCharacteristics {
    /// Create a descriptor from shape and non-zero count
    pub const fn new(rows: u64, cols: u64, nnz: u64) -> Self {
        debug_assert!(nnz as u128 <= rows as u128 * cols as u128);
        Self { rows, cols, nnz }
    }

    /// Create a descriptor whose non-zero count is derived from a sparsity
    pub fn from_sparsity(rows: u64, cols: u64, sparsity: f64) -> Self {
        Self::new(rows, cols, nnz_from_sparsity(rows, cols, sparsity))
    }

    /// Number of rows
    pub const fn rows(&self) -> u64 {
        self.rows
    }

    /// Number of columns
    pub const fn cols(&self) -> u64 {
        self.cols
    }

    /// Number of non-zero cells
    pub const fn nnz(&self) -> u64 {
        self.nnz
    }

    /// Total number of cells (rows * cols)
    pub const fn cells(&self) -> u64 {
        self.rows.saturating_mul(self.cols)
    }

    /// Fraction of non-zero cells
    pub fn sparsity(&self) -> f64 {
        sparsity(self.rows, self.cols, self.nnz)
    }

    /// Whether the described matrix has no non-zero cells
    pub const fn is_empty(&self) -> bool {
        self.nnz == 0
    }

    /// Same non-zero count with rows and columns exchanged
    pub const fn transposed(&self) -> Self {
        Self::new(self.cols, self.rows, self.nnz)
    }
}

impl core::fmt::Display for MatrixCharacteristics {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[{}x{}, nnz={}]", self.rows, self.cols, self.nnz)
    }
}

/// Sparsity of a matrix with the given shape and non-zero count
///
/// A shape without cells has sparsity 0. The result is clamped to 1.
pub fn sparsity(rows: u64, cols: u64, nnz: u64) -> f64 {
    if rows == 0 || cols == 0 {
        return 0.0;
    }
    (nnz as f64 / rows as f64 / cols as f64).min(1.0)
}

/// Expected non-zero count of a `rows x cols` matrix with the given sparsity
///
/// Rounds to the nearest integer and clamps into `[0, rows * cols]`.
pub fn nnz_from_sparsity(rows: u64, cols: u64, sparsity: f64) -> u64 {
    let cells = rows.saturating_mul(cols);
    let expected = sparsity * rows as f64 * cols as f64;
    if expected.is_nan() || expected <= 0.0 {
        return 0;
    }
    // no_std: round half up via truncation of a non-negative value
    let nnz = (expected + 0.5) as u64;
    nnz.min(cells)
}
