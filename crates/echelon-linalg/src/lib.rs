//! # echelon-linalg
//!
//! Barrier-synchronized parallel Gaussian elimination.
//!
//! This crate provides:
//! - Dense row-major matrices with seeded random initialization
//! - A deterministic work partitioner (strided and chunked splits)
//! - A two-phase (normalize, eliminate) parallel engine driven by
//!   `T + 1`-sized barriers over waves of scoped worker threads
//! - A sequential reference elimination used as a correctness oracle
//! - Tolerance-based element-wise verification
//!
//! ## Algorithm
//!
//! The engine reduces a square matrix to row-echelon form (upper
//! triangular with a unit diagonal) without pivoting. For each pivot
//! row the remaining columns are normalized by the pivot value across
//! strided worker ranges, then every row below is reduced against the
//! frozen pivot row across contiguous flat chunks. Within a phase the
//! worker ranges are pairwise disjoint, so no locks or atomics are
//! needed; the barriers are the only cross-phase synchronization.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod dense_matrix;
pub mod error;
pub mod parallel;
pub mod partition;
pub mod sequential;
pub mod verify;

pub use dense_matrix::DenseMatrix;
pub use error::EliminationError;
pub use parallel::{eliminate_parallel, EngineConfig};
pub use sequential::eliminate_sequential;
pub use verify::{check_unit_diagonal, compare_elements};

#[cfg(test)]
mod proptests;
