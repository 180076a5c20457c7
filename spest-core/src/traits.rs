//! Abstract interfaces for matrices consumed by the estimators
//!
//! Concrete storage formats live outside this crate. The estimators only
//! need shape, declared non-zero count and a per-row view of where the
//! non-zeros are.

pub mod block;

pub use block::{MatrixBlock, RowView};
