//! Exact metadata propagation
//!
//! For several operations the output shape and non-zero count follow
//! deterministically from the input descriptors. These rules are shared by
//! every closed-form estimator. Pure functions, no allocation.

use crate::{EstimError, MatrixCharacteristics, OpCode, Result};

/// Output shape produced for `TRANS`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransposeShape {
    /// Return the input descriptor unchanged
    #[default]
    Preserve,
    /// Exchange rows and columns
    Swap,
}

/// Fetch the right operand of a binary operation
pub fn require_right<'a>(
    op: OpCode,
    mc2: Option<&'a MatrixCharacteristics>,
) -> Result<&'a MatrixCharacteristics> {
    mc2.ok_or(EstimError::MissingOperand { op })
}

/// Compute the exact output descriptor of a metadata-only operation
///
/// Returns `UnsupportedOperation` for `MM`, `MULT` and `PLUS`, whose output
/// requires an estimate.
pub fn exact_metadata(
    mc1: &MatrixCharacteristics,
    mc2: Option<&MatrixCharacteristics>,
    op: OpCode,
    transpose: TransposeShape,
) -> Result<MatrixCharacteristics> {
    match op {
        OpCode::EqZero => Ok(MatrixCharacteristics::new(
            mc1.rows(),
            mc1.cols(),
            mc1.cells() - mc1.nnz(),
        )),
        OpCode::Diag => Ok(if mc1.cols() == 1 {
            // column vector to diagonal matrix
            MatrixCharacteristics::new(mc1.rows(), mc1.rows(), mc1.nnz())
        } else {
            MatrixCharacteristics::new(mc1.rows(), 1, mc1.rows().min(mc1.nnz()))
        }),
        OpCode::Cbind => {
            let mc2 = require_right(op, mc2)?;
            Ok(MatrixCharacteristics::new(
                mc1.rows(),
                mc1.cols() + mc2.cols(),
                mc1.nnz() + mc2.nnz(),
            ))
        }
        OpCode::Rbind => {
            let mc2 = require_right(op, mc2)?;
            Ok(MatrixCharacteristics::new(
                mc1.rows() + mc2.rows(),
                mc1.cols(),
                mc1.nnz() + mc2.nnz(),
            ))
        }
        OpCode::Trans => Ok(match transpose {
            TransposeShape::Preserve => *mc1,
            TransposeShape::Swap => mc1.transposed(),
        }),
        OpCode::NeqZero | OpCode::Reshape => Ok(*mc1),
        OpCode::Mm | OpCode::Mult | OpCode::Plus => Err(EstimError::UnsupportedOperation { op }),
    }
}
