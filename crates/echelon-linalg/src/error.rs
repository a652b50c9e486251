//! Error taxonomy shared by the sequential and parallel elimination paths.

use thiserror::Error;

/// Errors reported by elimination and verification.
///
/// Every variant is detected at the point of occurrence and propagated
/// immediately; none of these conditions is transient, so there are no
/// retries anywhere in the crate.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum EliminationError {
    /// A pivot value was zero within epsilon; elimination cannot continue.
    #[error("singular matrix: pivot at row {row} is zero within epsilon")]
    SingularMatrix {
        /// The pivot row at which the zero pivot was encountered.
        row: usize,
    },

    /// A shape precondition was violated at entry.
    #[error("dimension mismatch: {reason}")]
    DimensionMismatch {
        /// Human-readable description of the violated precondition.
        reason: String,
    },

    /// Two result buffers differ beyond tolerance on at least one element.
    #[error("result mismatch at flat index {index}: {left} vs {right} exceeds tolerance {tolerance}")]
    ResultMismatch {
        /// Flat index of the first offending element found.
        index: usize,
        /// Value from the first (reference) buffer.
        left: f64,
        /// Value from the second buffer.
        right: f64,
        /// The tolerance that was exceeded.
        tolerance: f64,
    },

    /// The OS refused to create a worker thread. Fatal to the run; a
    /// half-completed elimination has no valid interpretation.
    #[error("failed to spawn worker thread: {0}")]
    WorkerSpawn(String),
}
