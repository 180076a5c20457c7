//! Exact estimator based on boolean matrix multiplication
//!
//! Multiplying the existence patterns of the operands yields the exact
//! non-zero structure of a product, which also makes the result usable for
//! sparse output preallocation. Only `MM` is supported. Inner nodes keep
//! their product as a [`Synopsis`] so the parent multiplies it directly
//! instead of rebuilding it.

use spest_core::{EstimError, MatrixBlock, MatrixCharacteristics, OpCode, Result};
use tracing::debug;

use super::SparsityEstimator;
use crate::bitset::BitsetMatrix;
use crate::config::EstimatorConfig;
use crate::tree::{MMNode, Synopsis};

/// Exact boolean-product sparsity estimator
#[derive(Debug, Clone, Default)]
pub struct EstimatorBitsetMM {
    config: EstimatorConfig,
}

impl EstimatorBitsetMM {
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

    fn build(&self, node: &MMNode<'_>) -> Result<BitsetMatrix> {
        let data = node.data().ok_or(EstimError::MissingMatrix)?;
        Ok(BitsetMatrix::from_block(data, &self.config))
    }
}

/// Boolean product memoized on an already estimated inner node
fn synopsis_of<'n>(node: &'n MMNode<'_>) -> Result<&'n BitsetMatrix> {
    node.synopsis()
        .and_then(Synopsis::as_bitset)
        .ok_or(EstimError::MissingMatrix)
}

/// Whether two leaves reference the very same matrix
fn same_data(left: &MMNode<'_>, right: &MMNode<'_>) -> bool {
    match (left.data(), right.data()) {
        (Some(a), Some(b)) => std::ptr::addr_eq(a, b),
        _ => false,
    }
}

impl SparsityEstimator for EstimatorBitsetMM {
    fn name(&self) -> &'static str {
        "bitset_mm"
    }

    fn estimate(&self, root: &mut MMNode<'_>) -> Result<MatrixCharacteristics> {
        if root.is_leaf() {
            let data = root.data().ok_or(EstimError::MissingMatrix)?;
            return Ok(data.characteristics());
        }

        let op = root.op();
        if op != OpCode::Mm {
            return Err(EstimError::UnsupportedOperation { op });
        }

        let (left, right) = root.children_mut();
        let (left, right) = match (left, right) {
            (Some(left), Some(right)) => (left, right),
            _ => return Err(EstimError::MissingOperand { op }),
        };

        // obtain synopses of inner children
        if !left.is_leaf() {
            self.estimate(left)?;
        }
        if !right.is_leaf() {
            self.estimate(right)?;
        }

        let self_product = left.is_leaf() && right.is_leaf() && same_data(left, right);
        let left_built = if left.is_leaf() {
            Some(self.build(left)?)
        } else {
            None
        };
        let right_built = if right.is_leaf() && !self_product {
            Some(self.build(right)?)
        } else {
            None
        };

        let m1 = match &left_built {
            Some(bits) => bits,
            None => synopsis_of(left)?,
        };
        let m2 = match &right_built {
            Some(bits) => bits,
            None if self_product => m1,
            None => synopsis_of(right)?,
        };

        let product = m1.multiply(m2, &self.config)?;
        let out = product.characteristics();
        debug!(
            estimator = self.name(),
            %out,
            self_product,
            "estimated product node"
        );

        root.set_synopsis(Synopsis::Bitset(product));
        Ok(root.set_characteristics(out))
    }

    fn estimate_pair_op(
        &self,
        m1: &dyn MatrixBlock,
        m2: &dyn MatrixBlock,
        op: OpCode,
    ) -> Result<f64> {
        if op != OpCode::Mm {
            return Err(EstimError::UnsupportedOperation { op });
        }

        let m1_bits = BitsetMatrix::from_block(m1, &self.config);
        let self_product = std::ptr::addr_eq(m1, m2);
        let m2_bits = if self_product {
            None
        } else {
            Some(BitsetMatrix::from_block(m2, &self.config))
        };

        let product = m1_bits.multiply(m2_bits.as_ref().unwrap_or(&m1_bits), &self.config)?;
        debug!(
            estimator = self.name(),
            out = %product.characteristics(),
            self_product,
            "estimated matrix pair"
        );
        Ok(product.sparsity())
    }

    fn estimate_unary(&self, _m: &dyn MatrixBlock, op: OpCode) -> Result<f64> {
        Err(EstimError::UnsupportedOperation { op })
    }
}
