//! SPEST - Sparsity Estimation for Sparse Matrix Operation Chains
//!
//! This library estimates the non-zero count of the output of a tree of
//! sparse matrix operations from the shapes and sparsity of its inputs,
//! without computing any numeric result.
//!
//! ## Architecture
//!
//! SPEST is split into a definitions crate and an implementation crate:
//!
//! - **spest-core**: descriptors, operation codes, errors, exact metadata rules
//!   and the matrix access trait (no_std, no allocation)
//! - **spest**: estimators, the bit-packed boolean matrix kernel, operation
//!   trees and in-memory matrices
//!
//! ## Quick Start
//!
//! ```rust
//! use spest::{CsrMatrix, EstimatorBasicAvg, EstimatorBitsetMM, MMNode, SparsityEstimator};
//!
//! fn example() -> spest::Result<()> {
//!     let a = CsrMatrix::from_pattern(3, 3, &[(0, 1), (1, 2), (2, 0)]);
//!     let b = CsrMatrix::from_pattern(3, 3, &[(0, 0), (1, 1)]);
//!
//!     // Cheap closed-form estimate
//!     let avg = EstimatorBasicAvg::new().estimate_pair(&a, &b)?;
//!
//!     // Exact count through boolean matrix multiplication
//!     let mut root = MMNode::mm(MMNode::leaf(&a), MMNode::leaf(&b));
//!     let exact = EstimatorBitsetMM::new().estimate(&mut root)?;
//!     println!("average-case sparsity {avg}, exact {}", exact.sparsity());
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! ## Estimators
//!
//! - **Average case**: independence assumption, `1 - (1 - sp1*sp2)^k`
//! - **Worst case**: upper bound, `min(1, sp1*k) * min(1, sp2*k)`
//! - **Boolean product**: exact, cache-blocked and multi-threaded via rayon

// Re-export core abstractions
pub use spest_core::{
    // Descriptors and operations
    MatrixCharacteristics, OpCode, TransposeShape,
    // Matrix access
    MatrixBlock, RowView,
    // Error handling
    EstimError, Result,
    // Shared rules
    exact_metadata, nnz_from_sparsity, sparsity,
};

// Implementation modules
pub mod bitset;
pub mod block;
pub mod config;
pub mod estimator;
pub mod tree;

// Public exports
pub use bitset::BitsetMatrix;
pub use block::{CsrMatrix, DenseMatrix};
pub use config::EstimatorConfig;
pub use estimator::{
    Estimator, EstimatorBasicAvg, EstimatorBasicWorst, EstimatorBitsetMM, SparsityEstimator,
};
pub use tree::{MMNode, Synopsis};
