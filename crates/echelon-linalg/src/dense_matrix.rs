//! Dense matrix storage for the elimination engine.
//!
//! The buffer is a single row-major `Vec`; the shape is fixed at
//! construction and the matrix is only ever mutated in place by the
//! elimination algorithms.

use std::ops::{Index, IndexMut};

use num_traits::Float;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Dense matrix stored in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix<F> {
    /// Matrix entries in row-major order; `data.len() == num_rows * num_cols`.
    data: Vec<F>,
    /// Number of rows.
    num_rows: usize,
    /// Number of columns.
    num_cols: usize,
}

impl<F: Float> DenseMatrix<F> {
    /// Creates a new matrix filled with zeros.
    #[must_use]
    pub fn zeros(num_rows: usize, num_cols: usize) -> Self {
        Self {
            data: vec![F::zero(); num_rows * num_cols],
            num_rows,
            num_cols,
        }
    }

    /// Creates a matrix from a 2D vector.
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<F>>) -> Self {
        if rows.is_empty() {
            return Self::zeros(0, 0);
        }
        let num_rows = rows.len();
        let num_cols = rows[0].len();
        let data: Vec<F> = rows.into_iter().flatten().collect();
        assert_eq!(data.len(), num_rows * num_cols);
        Self {
            data,
            num_rows,
            num_cols,
        }
    }

    /// Creates a matrix of uniform random whole numbers in `[lo, hi]`.
    ///
    /// The sequence is fully determined by `seed`, so tests and the
    /// harness can reproduce any run exactly.
    #[must_use]
    pub fn random(num_rows: usize, num_cols: usize, lo: F, hi: F, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let span = hi - lo + F::one();
        let data = (0..num_rows * num_cols)
            .map(|_| {
                let u = F::from(rng.gen::<f64>()).unwrap_or_else(F::zero);
                (lo + span * u).floor()
            })
            .collect();
        Self {
            data,
            num_rows,
            num_cols,
        }
    }

    /// Like [`DenseMatrix::random`], but boosts every diagonal entry so the
    /// matrix is strictly diagonally dominant.
    ///
    /// Diagonal dominance survives Gaussian elimination without pivoting,
    /// so every pivot encountered by the engine is guaranteed non-zero.
    #[must_use]
    pub fn random_diagonally_dominant(n: usize, lo: F, hi: F, seed: u64) -> Self {
        let mut m = Self::random(n, n, lo, hi, seed);
        let bound = lo.abs().max(hi.abs());
        let boost = bound * F::from(n + 1).unwrap_or_else(F::one);
        for i in 0..n {
            m[(i, i)] = m[(i, i)] + boost;
        }
        m
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Checks if the matrix is square.
    #[must_use]
    pub fn is_square(&self) -> bool {
        self.num_rows == self.num_cols
    }

    /// Returns a reference to the entry at (row, col), or `None` if the
    /// position is out of range.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<&F> {
        if row < self.num_rows && col < self.num_cols {
            Some(&self.data[row * self.num_cols + col])
        } else {
            None
        }
    }

    /// Returns a mutable reference to the entry at (row, col), or `None`
    /// if the position is out of range.
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut F> {
        if row < self.num_rows && col < self.num_cols {
            Some(&mut self.data[row * self.num_cols + col])
        } else {
            None
        }
    }

    /// Returns a slice of the specified row.
    #[must_use]
    pub fn row(&self, row: usize) -> &[F] {
        let start = row * self.num_cols;
        &self.data[start..start + self.num_cols]
    }

    /// Returns a mutable slice of the specified row.
    pub fn row_mut(&mut self, row: usize) -> &mut [F] {
        let start = row * self.num_cols;
        &mut self.data[start..start + self.num_cols]
    }

    /// Returns the whole buffer in row-major order.
    #[must_use]
    pub fn as_slice(&self) -> &[F] {
        &self.data
    }

    /// Returns the whole buffer mutably in row-major order.
    pub fn as_mut_slice(&mut self) -> &mut [F] {
        &mut self.data
    }
}

impl<F> Index<(usize, usize)> for DenseMatrix<F> {
    type Output = F;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.data[row * self.num_cols + col]
    }
}

impl<F> IndexMut<(usize, usize)> for DenseMatrix<F> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        &mut self.data[row * self.num_cols + col]
    }
}
