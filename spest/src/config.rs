//! Tuning configuration for the estimators and the boolean matrix kernel
//!
//! None of these values change results. Thresholds only select between the
//! sequential and the parallel code path, block sizes only change the loop
//! schedule of the multiply kernel.

use spest_core::TransposeShape;

/// Default non-zero count above which boolean matrices are built in parallel
pub const DEFAULT_BUILD_PARALLEL_THRESHOLD: u64 = 1024 * 1024;

/// Default operand cell count above which boolean products run in parallel
pub const DEFAULT_MULTIPLY_PARALLEL_THRESHOLD: u64 = 1024 * 1024;

/// Default number of output rows per multiply block
pub const DEFAULT_BLOCK_ROWS: usize = 32;

/// Default number of shared-dimension indices per multiply block
pub const DEFAULT_BLOCK_SHARED: usize = 24;

/// Default number of output columns per multiply block
pub const DEFAULT_BLOCK_COLS: usize = 1024 * 64;

/// Default number of parallel tasks per available thread
pub const DEFAULT_TASKS_PER_THREAD: usize = 4;

/// Configuration shared by all estimators
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EstimatorConfig {
    /// Allow parallel boolean matrix construction
    pub multi_threaded_build: bool,
    /// Allow parallel boolean matrix multiplication
    pub multi_threaded_multiply: bool,
    /// Declared non-zero count above which construction runs in parallel
    pub build_parallel_threshold: u64,
    /// Combined operand cell count above which multiplication runs in parallel
    pub multiply_parallel_threshold: u64,
    /// Output rows per multiply block
    pub block_rows: usize,
    /// Shared-dimension indices per multiply block
    pub block_shared: usize,
    /// Output columns per multiply block (rounded up to whole words)
    pub block_cols: usize,
    /// Parallel tasks created per rayon worker thread
    pub tasks_per_thread: usize,
    /// Output shape of `TRANS` in the closed-form estimators
    pub transpose_shape: TransposeShape,
}

impl EstimatorConfig {
    /// Configuration that never takes a parallel code path
    pub fn sequential() -> Self {
        Self::default()
            .with_multi_threaded_build(false)
            .with_multi_threaded_multiply(false)
    }

    /// Enable or disable parallel construction
    pub fn with_multi_threaded_build(mut self, enabled: bool) -> Self {
        self.multi_threaded_build = enabled;
        self
    }

    /// Enable or disable parallel multiplication
    pub fn with_multi_threaded_multiply(mut self, enabled: bool) -> Self {
        self.multi_threaded_multiply = enabled;
        self
    }

    /// Set the parallel construction threshold
    pub fn with_build_parallel_threshold(mut self, threshold: u64) -> Self {
        self.build_parallel_threshold = threshold;
        self
    }

    /// Set the parallel multiplication threshold
    pub fn with_multiply_parallel_threshold(mut self, threshold: u64) -> Self {
        self.multiply_parallel_threshold = threshold;
        self
    }

    /// Set the multiply block sizes (rows, shared dimension, columns)
    ///
    /// Zero sizes are raised to one.
    pub fn with_block_sizes(mut self, rows: usize, shared: usize, cols: usize) -> Self {
        self.block_rows = rows.max(1);
        self.block_shared = shared.max(1);
        self.block_cols = cols.max(1);
        self
    }

    /// Set the number of parallel tasks per worker thread
    pub fn with_tasks_per_thread(mut self, tasks: usize) -> Self {
        self.tasks_per_thread = tasks.max(1);
        self
    }

    /// Choose the output shape of `TRANS`
    pub fn with_transpose_shape(mut self, shape: TransposeShape) -> Self {
        self.transpose_shape = shape;
        self
    }

    /// Number of parallel tasks for a fan-out over `rows` rows
    pub fn parallel_tasks(&self, rows: usize) -> usize {
        let tasks = self.tasks_per_thread.max(1) * rayon::current_num_threads();
        tasks.clamp(1, rows.max(1))
    }

    /// Whether construction from a source with `nnz` non-zeros runs in parallel
    pub fn parallel_build(&self, nnz: u64) -> bool {
        self.multi_threaded_build && nnz > self.build_parallel_threshold
    }

    /// Whether a product over `cells` operand cells runs in parallel
    pub fn parallel_multiply(&self, cells: u64) -> bool {
        self.multi_threaded_multiply && cells > self.multiply_parallel_threshold
    }
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            multi_threaded_build: true,
            multi_threaded_multiply: true,
            build_parallel_threshold: DEFAULT_BUILD_PARALLEL_THRESHOLD,
            multiply_parallel_threshold: DEFAULT_MULTIPLY_PARALLEL_THRESHOLD,
            block_rows: DEFAULT_BLOCK_ROWS,
            block_shared: DEFAULT_BLOCK_SHARED,
            block_cols: DEFAULT_BLOCK_COLS,
            tasks_per_thread: DEFAULT_TASKS_PER_THREAD,
            transpose_shape: TransposeShape::Preserve,
        }
    }
}
