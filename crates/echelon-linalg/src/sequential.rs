//! Sequential Gaussian elimination, used as the correctness oracle.

use num_traits::Float;

use crate::dense_matrix::DenseMatrix;
use crate::error::EliminationError;

/// Reduces `matrix` in place to row-echelon form (upper triangular with a
/// unit diagonal) with a single-threaded sweep and no pivoting.
///
/// This is the ground truth the parallel engine is verified against: for
/// the same input both paths perform the same arithmetic per element, just
/// in a different order.
///
/// # Errors
///
/// - [`EliminationError::DimensionMismatch`] if the matrix is not square.
/// - [`EliminationError::SingularMatrix`] if a pivot is zero within
///   `pivot_epsilon`; the matrix is left partially reduced.
pub fn eliminate_sequential<F: Float>(
    matrix: &mut DenseMatrix<F>,
    pivot_epsilon: F,
) -> Result<(), EliminationError> {
    if !matrix.is_square() {
        return Err(EliminationError::DimensionMismatch {
            reason: format!(
                "elimination requires a square matrix, got {}x{}",
                matrix.num_rows(),
                matrix.num_cols()
            ),
        });
    }

    let n = matrix.num_rows();
    for i in 0..n {
        let pivot = matrix[(i, i)];
        if pivot.abs() <= pivot_epsilon {
            return Err(EliminationError::SingularMatrix { row: i });
        }

        // Normalize: bring the diagonal to exactly 1.
        for c in i + 1..n {
            matrix[(i, c)] = matrix[(i, c)] / pivot;
        }
        matrix[(i, i)] = F::one();

        // Eliminate below. With a unit diagonal the conventional factor
        // U[r][i] / U[i][i] is just U[r][i].
        for r in i + 1..n {
            let factor = matrix[(r, i)];
            for c in i..n {
                matrix[(r, c)] = matrix[(r, c)] - factor * matrix[(i, c)];
            }
        }
    }

    Ok(())
}
