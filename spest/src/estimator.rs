//! Sparsity estimators
//!
//! Three strategies share the [`SparsityEstimator`] contract:
//!
//! - [`EstimatorBasicAvg`]: closed-form average case, assuming non-zeros are
//!   placed independently
//! - [`EstimatorBasicWorst`]: closed-form upper bounds
//! - [`EstimatorBitsetMM`]: exact non-zero count of matrix products through
//!   boolean matrix multiplication
//!
//! [`Estimator`] wraps the closed set of strategies for callers that choose
//! one at runtime.

pub mod basic_avg;
pub mod basic_worst;
pub mod bitset_mm;

pub use basic_avg::EstimatorBasicAvg;
pub use basic_worst::EstimatorBasicWorst;
pub use bitset_mm::EstimatorBitsetMM;

use spest_core::{EstimError, MatrixBlock, MatrixCharacteristics, OpCode, Result};
use tracing::trace;

use crate::config::EstimatorConfig;
use crate::tree::MMNode;

/// Common contract of all sparsity estimators
pub trait SparsityEstimator {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Estimate the output descriptor of an operation tree
    ///
    /// Every visited inner node is annotated with its estimate.
    fn estimate(&self, root: &mut MMNode<'_>) -> Result<MatrixCharacteristics>;

    /// Estimate the output sparsity of the matrix product `m1 x m2`
    fn estimate_pair(&self, m1: &dyn MatrixBlock, m2: &dyn MatrixBlock) -> Result<f64> {
        self.estimate_pair_op(m1, m2, OpCode::Mm)
    }

    /// Estimate the output sparsity of a binary operation
    fn estimate_pair_op(&self, m1: &dyn MatrixBlock, m2: &dyn MatrixBlock, op: OpCode)
        -> Result<f64>;

    /// Estimate the output sparsity of a unary operation
    fn estimate_unary(&self, m: &dyn MatrixBlock, op: OpCode) -> Result<f64>;
}

/// Per-operation formula of a closed-form estimator
///
/// Implementors get tree traversal from [`estimate_tree`].
pub trait CharacteristicsFormula {
    /// Output descriptor of `op` applied to the operand descriptors
    ///
    /// `mc2` is `None` for unary operations. Binary operations without a right
    /// operand fail with `MissingOperand`.
    fn estimate_intern(
        &self,
        mc1: &MatrixCharacteristics,
        mc2: Option<&MatrixCharacteristics>,
        op: OpCode,
    ) -> Result<MatrixCharacteristics>;
}

/// Recursively estimate a tree with a closed-form formula
///
/// Leaves contribute their own descriptor. The arity of a node is validated
/// before any child is visited, so a malformed node leaves no annotation
/// behind. Annotating a node drops any synopsis left by an earlier
/// estimation.
pub fn estimate_tree<F: CharacteristicsFormula + ?Sized>(
    formula: &F,
    root: &mut MMNode<'_>,
) -> Result<MatrixCharacteristics> {
    if root.is_leaf() {
        return root.characteristics().ok_or(EstimError::MissingMatrix);
    }

    let op = root.op();
    if op.is_binary() && root.right().is_none() {
        return Err(EstimError::MissingOperand { op });
    }

    let (left, right) = root.children_mut();
    let left = left.ok_or(EstimError::MissingOperand { op })?;
    let mc1 = estimate_tree(formula, left)?;
    let mc2 = match right {
        Some(right) => Some(estimate_tree(formula, right)?),
        None => None,
    };

    let out = formula.estimate_intern(&mc1, mc2.as_ref(), op)?;
    trace!(%op, %out, "annotated node");
    root.clear_synopsis();
    Ok(root.set_characteristics(out))
}

/// Output sparsity of a matrix product under the basic estimators
///
/// `shared` is the inner dimension k. The average case is
/// `1 - (1 - sp1*sp2)^k`; the worst case is `min(1, sp1*k) * min(1, sp2*k)`.
/// Both reduce to exactly `sp1 * sp2` for an outer product (k = 1).
pub fn matmult_sparsity(sp1: f64, sp2: f64, shared: u64, worst_case: bool) -> f64 {
    let k = shared as f64;
    let sp = if worst_case {
        (sp1 * k).min(1.0) * (sp2 * k).min(1.0)
    } else {
        let p = sp1 * sp2;
        match shared {
            0 => 0.0,
            1 => p,
            // 1 - (1-p)^k without cancellation for small p
            _ => -(k * (-p).ln_1p()).exp_m1(),
        }
    };
    sp.clamp(0.0, 1.0)
}

/// Closed set of estimation strategies
#[derive(Debug, Clone)]
pub enum Estimator {
    BasicAvg(EstimatorBasicAvg),
    BasicWorst(EstimatorBasicWorst),
    BitsetMM(EstimatorBitsetMM),
}

impl Estimator {
    /// Average-case estimator with the given configuration
    pub fn basic_avg(config: EstimatorConfig) -> Self {
        Estimator::BasicAvg(EstimatorBasicAvg::with_config(config))
    }

    /// Worst-case estimator with the given configuration
    pub fn basic_worst(config: EstimatorConfig) -> Self {
        Estimator::BasicWorst(EstimatorBasicWorst::with_config(config))
    }

    /// Exact boolean-product estimator with the given configuration
    pub fn bitset_mm(config: EstimatorConfig) -> Self {
        Estimator::BitsetMM(EstimatorBitsetMM::with_config(config))
    }

    fn inner(&self) -> &dyn SparsityEstimator {
        match self {
            Estimator::BasicAvg(e) => e,
            Estimator::BasicWorst(e) => e,
            Estimator::BitsetMM(e) => e,
        }
    }
}

impl SparsityEstimator for Estimator {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn estimate(&self, root: &mut MMNode<'_>) -> Result<MatrixCharacteristics> {
        self.inner().estimate(root)
    }

    fn estimate_pair(&self, m1: &dyn MatrixBlock, m2: &dyn MatrixBlock) -> Result<f64> {
        self.inner().estimate_pair(m1, m2)
    }

    fn estimate_pair_op(
        &self,
        m1: &dyn MatrixBlock,
        m2: &dyn MatrixBlock,
        op: OpCode,
    ) -> Result<f64> {
        self.inner().estimate_pair_op(m1, m2, op)
    }

    fn estimate_unary(&self, m: &dyn MatrixBlock, op: OpCode) -> Result<f64> {
        self.inner().estimate_unary(m, op)
    }
}

impl From<EstimatorBasicAvg> for Estimator {
    fn from(estimator: EstimatorBasicAvg) -> Self {
        Estimator::BasicAvg(estimator)
    }
}

impl From<EstimatorBasicWorst> for Estimator {
    fn from(estimator: EstimatorBasicWorst) -> Self {
        Estimator::BasicWorst(estimator)
    }
}

impl From<EstimatorBitsetMM> for Estimator {
    fn from(estimator: EstimatorBitsetMM) -> Self {
        Estimator::BitsetMM(estimator)
    }
}
