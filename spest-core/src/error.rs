//! Error types for sparsity estimation

use crate::OpCode;

/// Errors that can occur during sparsity estimation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimError {
    /// The estimator does not implement this operation on the invoked entry point
    UnsupportedOperation {
        /// The rejected operation
        op: OpCode,
    },
    /// A binary operation was evaluated without its right operand
    MissingOperand {
        /// The binary operation
        op: OpCode,
    },
    /// A leaf carries a descriptor but no concrete matrix
    MissingMatrix,
    /// Shared dimension of a matrix product does not line up
    DimensionMismatch {
        /// Columns of the left operand
        expected: u64,
        /// Rows of the right operand
        found: u64,
    },
}

impl core::fmt::Display for EstimError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EstimError::UnsupportedOperation { op } => {
                write!(f, "Unsupported operation {op} for this estimator")
            }
            EstimError::MissingOperand { op } => {
                write!(f, "Binary operation {op} requires a right operand")
            }
            EstimError::MissingMatrix => write!(f, "Leaf node has no matrix data"),
            EstimError::DimensionMismatch { expected, found } => write!(
                f,
                "Shared dimension mismatch: left has {expected} columns, right has {found} rows"
            ),
        }
    }
}

/// Result type for estimation operations
pub type Result<T> = core::result::Result<T, EstimError>;
