//! Operation trees annotated by the estimators
//!
//! An [`MMNode`] is either a leaf referencing a concrete matrix (or only its
//! descriptor) or an operation over one or two child nodes. Estimators write
//! the computed descriptor, and optionally a [`Synopsis`], back onto every
//! node they visit. A later estimation overwrites earlier annotations.

use spest_core::{MatrixBlock, MatrixCharacteristics, OpCode};

use crate::bitset::BitsetMatrix;

/// Reusable intermediate estimation artifact attached to a node
#[derive(Debug, Clone, PartialEq)]
pub enum Synopsis {
    /// Exact boolean existence pattern of the node's output
    Bitset(BitsetMatrix),
}

impl Synopsis {
    /// The boolean pattern, if this synopsis holds one
    pub fn as_bitset(&self) -> Option<&BitsetMatrix> {
        match self {
            Synopsis::Bitset(bits) => Some(bits),
        }
    }
}

/// Node of a binary operation tree
pub struct MMNode<'a> {
    op: OpCode,
    left: Option<Box<MMNode<'a>>>,
    right: Option<Box<MMNode<'a>>>,
    data: Option<&'a dyn MatrixBlock>,
    characteristics: Option<MatrixCharacteristics>,
    synopsis: Option<Synopsis>,
}

impl<'a> MMNode<'a> {
    /// Leaf backed by a concrete matrix
    ///
    /// The op code of a leaf is never consulted.
    pub fn leaf(data: &'a dyn MatrixBlock) -> Self {
        Self {
            op: OpCode::Mm,
            left: None,
            right: None,
            data: Some(data),
            characteristics: Some(data.characteristics()),
            synopsis: None,
        }
    }

    /// Leaf known only by its descriptor
    pub fn leaf_characteristics(characteristics: MatrixCharacteristics) -> Self {
        Self {
            op: OpCode::Mm,
            left: None,
            right: None,
            data: None,
            characteristics: Some(characteristics),
            synopsis: None,
        }
    }

    /// Operation over a single input
    pub fn unary(op: OpCode, input: MMNode<'a>) -> Self {
        Self {
            op,
            left: Some(Box::new(input)),
            right: None,
            data: None,
            characteristics: None,
            synopsis: None,
        }
    }

    /// Operation over two inputs
    pub fn binary(op: OpCode, left: MMNode<'a>, right: MMNode<'a>) -> Self {
        Self {
            op,
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
            data: None,
            characteristics: None,
            synopsis: None,
        }
    }

    /// Matrix product of two inputs
    pub fn mm(left: MMNode<'a>, right: MMNode<'a>) -> Self {
        Self::binary(OpCode::Mm, left, right)
    }

    /// Operation code of this node
    pub fn op(&self) -> OpCode {
        self.op
    }

    /// Whether this node is a leaf
    pub fn is_leaf(&self) -> bool {
        self.left.is_none()
    }

    /// Left (or only) child
    pub fn left(&self) -> Option<&MMNode<'a>> {
        self.left.as_deref()
    }

    /// Right child of a binary operation
    pub fn right(&self) -> Option<&MMNode<'a>> {
        self.right.as_deref()
    }

    /// Mutable access to both children at once
    pub fn children_mut(&mut self) -> (Option<&mut MMNode<'a>>, Option<&mut MMNode<'a>>) {
        (self.left.as_deref_mut(), self.right.as_deref_mut())
    }

    /// Concrete matrix of a leaf
    pub fn data(&self) -> Option<&'a dyn MatrixBlock> {
        self.data
    }

    /// Descriptor of a leaf, or the last estimate written onto an inner node
    pub fn characteristics(&self) -> Option<MatrixCharacteristics> {
        self.characteristics
    }

    /// Synopsis left by the last estimation, if any
    pub fn synopsis(&self) -> Option<&Synopsis> {
        self.synopsis.as_ref()
    }

    /// Record an estimated descriptor, returning it
    pub fn set_characteristics(&mut self, characteristics: MatrixCharacteristics) -> MatrixCharacteristics {
        self.characteristics = Some(characteristics);
        characteristics
    }

    /// Record a synopsis
    pub fn set_synopsis(&mut self, synopsis: Synopsis) {
        self.synopsis = Some(synopsis);
    }

    /// Drop a synopsis left by an earlier estimation
    pub fn clear_synopsis(&mut self) {
        self.synopsis = None;
    }
}

impl std::fmt::Debug for MMNode<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_leaf() {
            return f
                .debug_struct("Leaf")
                .field("characteristics", &self.characteristics)
                .field("has_data", &self.data.is_some())
                .finish();
        }
        f.debug_struct("MMNode")
            .field("op", &self.op)
            .field("characteristics", &self.characteristics)
            .field("has_synopsis", &self.synopsis.is_some())
            .field("left", &self.left)
            .field("right", &self.right)
            .finish()
    }
}
