//! Basic worst-case estimator
//!
//! Upper bounds without any independence assumption:
//! `sp = min(1, sp1*k) * min(1, sp2*k)` for a product with inner dimension k.
//! For outer products (k = 1) this equals the average-case estimate and the
//! exact output sparsity.

use spest_core::{
    exact_metadata, require_right, MatrixBlock, MatrixCharacteristics, OpCode, Result,
};
use tracing::debug;

use super::{estimate_tree, matmult_sparsity, CharacteristicsFormula, SparsityEstimator};
use crate::config::EstimatorConfig;
use crate::tree::MMNode;

/// Closed-form worst-case sparsity estimator
#[derive(Debug, Clone, Default)]
pub struct EstimatorBasicWorst {
    config: EstimatorConfig,
}

impl EstimatorBasicWorst {
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

impl CharacteristicsFormula for EstimatorBasicWorst {
    fn estimate_intern(
        &self,
        mc1: &MatrixCharacteristics,
        mc2: Option<&MatrixCharacteristics>,
        op: OpCode,
    ) -> Result<MatrixCharacteristics> {
        match op {
            OpCode::Mm => {
                let mc2 = require_right(op, mc2)?;
                let sp = matmult_sparsity(mc1.sparsity(), mc2.sparsity(), mc1.cols(), true);
                Ok(MatrixCharacteristics::from_sparsity(mc1.rows(), mc2.cols(), sp))
            }
            OpCode::Mult => {
                let mc2 = require_right(op, mc2)?;
                let sp = mc1.sparsity().min(mc2.sparsity());
                Ok(MatrixCharacteristics::from_sparsity(mc1.rows(), mc1.cols(), sp))
            }
            OpCode::Plus => {
                let mc2 = require_right(op, mc2)?;
                let sp = (mc1.sparsity() + mc2.sparsity()).min(1.0);
                Ok(MatrixCharacteristics::from_sparsity(mc1.rows(), mc1.cols(), sp))
            }
            // exact, no bound needed
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

impl SparsityEstimator for EstimatorBasicWorst {
    fn name(&self) -> &'static str {
        "basic_worst"
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
