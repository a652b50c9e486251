//! Tolerance-based verification of elimination results.

use num_traits::{Float, ToPrimitive};
use rayon::prelude::*;

use crate::dense_matrix::DenseMatrix;
use crate::error::EliminationError;

/// Checks that two equal-length buffers agree element-wise within
/// `tolerance`.
///
/// The scan is parallelized with rayon; buffers here are whole `n * n`
/// matrices, so the work is worth splitting.
///
/// # Errors
///
/// - [`EliminationError::DimensionMismatch`] if the buffers differ in
///   length.
/// - [`EliminationError::ResultMismatch`] carrying the first offending
///   index found if any pair differs by more than `tolerance`.
pub fn compare_elements<F: Float + Send + Sync>(
    a: &[F],
    b: &[F],
    tolerance: F,
) -> Result<(), EliminationError> {
    if a.len() != b.len() {
        return Err(EliminationError::DimensionMismatch {
            reason: format!(
                "comparison buffers differ in length: {} vs {}",
                a.len(),
                b.len()
            ),
        });
    }

    let mismatch = a
        .par_iter()
        .zip(b.par_iter())
        .position_first(|(x, y)| (*x - *y).abs() > tolerance);

    match mismatch {
        Some(index) => Err(EliminationError::ResultMismatch {
            index,
            left: a[index].to_f64().unwrap_or(f64::NAN),
            right: b[index].to_f64().unwrap_or(f64::NAN),
            tolerance: tolerance.to_f64().unwrap_or(f64::NAN),
        }),
        None => Ok(()),
    }
}

/// Checks that every diagonal element of `matrix` is 1 within `tolerance`.
///
/// # Errors
///
/// [`EliminationError::ResultMismatch`] carrying the flat index of the
/// first offending diagonal element.
pub fn check_unit_diagonal<F: Float>(
    matrix: &DenseMatrix<F>,
    tolerance: F,
) -> Result<(), EliminationError> {
    let n = matrix.num_rows().min(matrix.num_cols());
    for i in 0..n {
        let value = matrix[(i, i)];
        if (value - F::one()).abs() > tolerance {
            return Err(EliminationError::ResultMismatch {
                index: i * matrix.num_cols() + i,
                left: 1.0,
                right: value.to_f64().unwrap_or(f64::NAN),
                tolerance: tolerance.to_f64().unwrap_or(f64::NAN),
            });
        }
    }
    Ok(())
}
