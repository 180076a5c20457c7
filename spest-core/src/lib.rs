#![no_std]

//! SPEST Core - Sparsity Estimation Definitions
//!
//! This crate provides the descriptors, operation codes, error type and
//! matrix access traits shared by all sparsity estimators, plus the exact
//! metadata rules that need no estimation at all.

#[cfg(test)]
extern crate alloc;

pub mod characteristics;
pub mod error;
pub mod metadata;
pub mod opcode;
pub mod traits;

pub use characteristics::*;
pub use error::*;
pub use metadata::*;
pub use opcode::*;
pub use traits::*;
