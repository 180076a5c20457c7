//! Operation codes understood by the sparsity estimators

/// Matrix operations whose output sparsity can be estimated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum OpCode {
    /// Matrix multiplication
    Mm = 0,
    /// Elementwise multiplication
    Mult = 1,
    /// Elementwise addition
    Plus = 2,
    /// Elementwise `x == 0` test
    EqZero = 3,
    /// Elementwise `x != 0` test
    NeqZero = 4,
    /// Column-wise concatenation
    Cbind = 5,
    /// Row-wise concatenation
    Rbind = 6,
    /// Transpose
    Trans = 7,
    /// Diagonal extraction (square input) or construction (column vector input)
    Diag = 8,
    /// Reshape
    Reshape = 9,
}

impl OpCode {
    /// All operation codes in declaration order
    pub const ALL: [OpCode; 10] = [
        OpCode::Mm,
        OpCode::Mult,
        OpCode::Plus,
        OpCode::EqZero,
        OpCode::NeqZero,
        OpCode::Cbind,
        OpCode::Rbind,
        OpCode::Trans,
        OpCode::Diag,
        OpCode::Reshape,
    ];

    /// Whether the operation consumes a right operand
    pub const fn is_binary(&self) -> bool {
        matches!(
            self,
            OpCode::Mm | OpCode::Mult | OpCode::Plus | OpCode::Cbind | OpCode::Rbind
        )
    }

    /// Whether output metadata follows deterministically from input metadata
    pub const fn is_exact_metadata(&self) -> bool {
        !matches!(self, OpCode::Mm | OpCode::Mult | OpCode::Plus)
    }

    /// Upper-case mnemonic
    pub const fn name(&self) -> &'static str {
        match self {
            OpCode::Mm => "MM",
            OpCode::Mult => "MULT",
            OpCode::Plus => "PLUS",
            OpCode::EqZero => "EQZERO",
            OpCode::NeqZero => "NEQZERO",
            OpCode::Cbind => "CBIND",
            OpCode::Rbind => "RBIND",
            OpCode::Trans => "TRANS",
            OpCode::Diag => "DIAG",
            OpCode::Reshape => "RESHAPE",
        }
    }
}

impl TryFrom<u8> for OpCode {
    type Error = u8;

    fn try_from(value: u8) -> core::result::Result<Self, Self::Error> {
        OpCode::ALL.get(value as usize).copied().ok_or(value)
    }
}

impl core::fmt::Display for OpCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity() {
        let binary = OpCode::ALL.iter().filter(|op| op.is_binary()).count();
        assert_eq!(binary, 5);
        assert!(!OpCode::Diag.is_binary());
        assert!(OpCode::Rbind.is_binary());
    }

    #[test]
    fn test_try_from_u8() {
        for op in OpCode::ALL {
            assert_eq!(OpCode::try_from(op as u8), Ok(op));
        }
        assert_eq!(OpCode::try_from(10), Err(10));
    }
}
