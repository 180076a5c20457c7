//! Basic average-case estimator
//!
//! Assumes the non-zeros of both operands are placed independently:
//! `sp = 1 - (1 - sp1*sp2)^k` for a product with inner dimension k.

use spest_core::{
    exact_metadata, require_right, MatrixBlock, MatrixCharacteristics, OpCode, Result,
};
use tracing::debug;

use super::{estimate_tree, matmult_sparsity, CharacteristicsFormula, SparsityEstimator};
use crate::config::EstimatorConfig;
use crate::tree::MMNode;

/// Closed-form average-case sparsity estimator
#[derive(Debug, Clone, Default)]
pub struct EstimatorBasicAvg {
    config: EstimatorConfig,
}

impl EstimatorBasicAvg {
    /// Create with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a custom configuration
    pub fn with_config(config: EstimatorConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }
}

impl CharacteristicsFormula for EstimatorBasicAvg {
    fn estimate_intern(
        &self,
        mc1: &MatrixCharacteristics,
        mc2: Option<&MatrixCharacteristics>,
        op: OpCode,
    ) -> Result<MatrixCharacteristics> {
        match op {
            OpCode::Mm => {
                let mc2 = require_right(op, mc2)?;
                let sp = matmult_sparsity(mc1.sparsity(), mc2.sparsity(), mc1.cols(), false);
                Ok(MatrixCharacteristics::from_sparsity(mc1.rows(), mc2.cols(), sp))
            }
            OpCode::Mult => {
                let mc2 = require_right(op, mc2)?;
                let sp = mc1.sparsity() * mc2.sparsity();
                Ok(MatrixCharacteristics::from_sparsity(mc1.rows(), mc1.cols(), sp))
            }
            OpCode::Plus => {
                let mc2 = require_right(op, mc2)?;
                let (sp1, sp2) = (mc1.sparsity(), mc2.sparsity());
                let sp = sp1 + sp2 - sp1 * sp2;
                Ok(MatrixCharacteristics::from_sparsity(mc1.rows(), mc1.cols(), sp))
            }
            OpCode::EqZero
            | OpCode::Diag
            | OpCode::Cbind
            | OpCode::Rbind
            | OpCode::NeqZero
            | OpCode::Trans
            | OpCode::Reshape => exact_metadata(mc1, mc2, op, self.config.transpose_shape),
        }
    }
}

impl SparsityEstimator for EstimatorBasicAvg {
    fn name(&self) -> &'static str {
        "basic_avg"
    }

    fn estimate(&self, root: &mut MMNode<'_>) -> Result<MatrixCharacteristics> {
        let out = estimate_tree(self, root)?;
        debug!(estimator = self.name(), %out, "estimated tree");
        Ok(out)
    }

    fn estimate_pair_op(
        &self,
        m1: &dyn MatrixBlock,
        m2: &dyn MatrixBlock,
        op: OpCode,
    ) -> Result<f64> {
        let out = self.estimate_intern(&m1.characteristics(), Some(&m2.characteristics()), op)?;
        Ok(out.sparsity())
    }

    fn estimate_unary(&self, m: &dyn MatrixBlock, op: OpCode) -> Result<f64> {
        let out = self.estimate_intern(&m.characteristics(), None, op)?;
        Ok(out.sparsity())
    }
}
