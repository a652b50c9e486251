//! The barrier-synchronized parallel elimination engine.
//!
//! Each pivot row is processed in two phases. The normalize phase divides
//! the pivot row's remaining columns by the pivot value across strided
//! worker ranges; the eliminate phase reduces every row below against the
//! now-frozen pivot row across contiguous flat chunks. A `T + 1`-sized
//! barrier after each phase is the only synchronization over the matrix:
//! the index ranges handed to workers within a phase are pairwise disjoint
//! by the partitioner's contract, so no locks or atomics guard the buffer.
//! Workers additionally block on a one-shot go/abort gate before touching
//! anything, so a spawn failure partway through a wave cancels cleanly
//! instead of stranding the started workers at a barrier that can never
//! fill.

use std::sync::{Barrier, Condvar, Mutex, PoisonError};
use std::thread;

use num_traits::Float;

use crate::dense_matrix::DenseMatrix;
use crate::error::EliminationError;
use crate::partition::{chunked, strided};

/// Configuration for the parallel elimination engine.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Worker threads spawned per phase; values below 1 are treated as 1.
    pub num_threads: usize,
    /// Pivots with absolute value at or below this are treated as zero.
    pub pivot_epsilon: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            num_threads: 4,
            pivot_epsilon: 1e-9,
        }
    }
}

/// Sends the matrix buffer across the scoped-thread boundary as a raw
/// pointer.
///
/// Safety: the partitioner hands every worker a pairwise-disjoint index
/// range, so no two threads write the same element, and reads outside a
/// worker's own range only touch data frozen for the current phase.
#[derive(Clone, Copy)]
struct SharedElems<F> {
    ptr: *mut F,
    len: usize,
}

unsafe impl<F: Send> Send for SharedElems<F> {}
unsafe impl<F: Send> Sync for SharedElems<F> {}

impl<F> SharedElems<F> {
    fn new(slice: &mut [F]) -> Self {
        Self {
            ptr: slice.as_mut_ptr(),
            len: slice.len(),
        }
    }

    /// Safety: caller must not access any element another thread writes.
    #[allow(clippy::mut_from_ref)]
    unsafe fn slice(&self) -> &mut [F] {
        std::slice::from_raw_parts_mut(self.ptr, self.len)
    }

    /// Safety: caller must ensure no other thread accesses `idx`.
    unsafe fn write(&self, idx: usize, value: F) {
        debug_assert!(idx < self.len);
        *self.ptr.add(idx) = value;
    }
}

/// One-shot go/abort decision each wave's workers block on before doing
/// any work.
///
/// The phase barrier is only sound once every slot in the wave is
/// accounted for: a single driver cannot fill more than one slot of a
/// `Barrier` generation, so a short wave could never be drained through
/// the barrier itself. Gating the workers instead means an aborted wave
/// never enters the barrier at all, and the scope join collects the
/// workers as they exit.
struct StartGate {
    decision: Mutex<Option<bool>>,
    ready: Condvar,
}

impl StartGate {
    fn new() -> Self {
        Self {
            decision: Mutex::new(None),
            ready: Condvar::new(),
        }
    }

    /// Releases the wave; every spawn succeeded.
    fn open(&self) {
        self.decide(true);
    }

    /// Cancels the wave; workers exit without touching the matrix.
    fn abort(&self) {
        self.decide(false);
    }

    fn decide(&self, go: bool) {
        let mut decision = self
            .decision
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *decision = Some(go);
        self.ready.notify_all();
    }

    /// Blocks until the driver decides; returns whether to proceed.
    fn wait(&self) -> bool {
        let mut decision = self
            .decision
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        loop {
            if let Some(go) = *decision {
                return go;
            }
            decision = self
                .ready
                .wait(decision)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

/// Reduces `matrix` in place to row-echelon form (upper triangular, unit
/// diagonal) using waves of scoped worker threads.
///
/// Per pivot row `i`, the driver reads the pivot `U[i][i]`, runs the
/// normalize wave, writes the diagonal 1 itself, and meets the workers at
/// the first barrier. Unless `i` is the last row it then snapshots the
/// elimination factors `U[r][i]` for every row below and runs the
/// eliminate wave, meeting the workers at the second barrier before
/// advancing. This gives `2 * (n - 1) + 1` thread waves for an `n`-row
/// matrix.
///
/// # Errors
///
/// - [`EliminationError::DimensionMismatch`] if the matrix is not square.
/// - [`EliminationError::SingularMatrix`] if a pivot is zero within
///   `config.pivot_epsilon`; the matrix is left partially reduced.
/// - [`EliminationError::WorkerSpawn`] if the OS refuses to create a
///   worker thread; the wave is cancelled before it touches the matrix
///   and the run aborts with no partial-result recovery.
pub fn eliminate_parallel<F: Float + Send + Sync>(
    matrix: &mut DenseMatrix<F>,
    config: &EngineConfig,
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
    let threads = config.num_threads.max(1);
    let epsilon = F::from(config.pivot_epsilon).unwrap_or_else(F::epsilon);

    for i in 0..n {
        let pivot = matrix[(i, i)];
        if pivot.abs() <= epsilon {
            return Err(EliminationError::SingularMatrix { row: i });
        }

        normalize_phase(matrix, i, pivot, threads)?;

        // The last row has nothing below it to eliminate.
        if i + 1 < n {
            // Snapshot the factors before the wave starts: with a unit
            // diagonal the conventional U[r][i] / U[i][i] is just U[r][i],
            // and workers must not re-read column i while it is being
            // zeroed.
            let factors: Vec<F> = (i + 1..n).map(|r| matrix[(r, i)]).collect();
            eliminate_phase(matrix, i, &factors, threads)?;
        }
    }

    Ok(())
}

/// Divides the pivot row's columns right of the diagonal by the pivot
/// value, one strided range per worker. The driver writes the diagonal 1
/// itself so no worker races on that single cell.
fn normalize_phase<F: Float + Send + Sync>(
    matrix: &mut DenseMatrix<F>,
    pivot_row: usize,
    pivot: F,
    threads: usize,
) -> Result<(), EliminationError> {
    let cols = matrix.num_cols();
    let row_start = pivot_row * cols;
    let diag = row_start + pivot_row;

    let ranges = strided(diag + 1, row_start + cols, threads);
    if ranges.is_empty() {
        // Last row: no columns right of the diagonal.
        matrix[(pivot_row, pivot_row)] = F::one();
        return Ok(());
    }

    let barrier = Barrier::new(ranges.len() + 1);
    let gate = StartGate::new();
    let shared = SharedElems::new(matrix.as_mut_slice());

    thread::scope(|s| -> Result<(), EliminationError> {
        for range in &ranges {
            let range = *range;
            let barrier = &barrier;
            let gate = &gate;
            let elems = shared;
            let spawn = thread::Builder::new().spawn_scoped(s, move || {
                if !gate.wait() {
                    return;
                }
                // Safety: strided ranges over the pivot row are pairwise
                // disjoint and exclude the diagonal cell.
                let elems = unsafe { elems.slice() };
                for k in range.indices() {
                    elems[k] = elems[k] / pivot;
                }
                barrier.wait();
            });
            if let Err(err) = spawn {
                gate.abort();
                return Err(EliminationError::WorkerSpawn(err.to_string()));
            }
        }

        gate.open();
        // Safety: the diagonal cell is excluded from every worker range.
        unsafe { shared.write(diag, F::one()) };
        barrier.wait();
        Ok(())
    })
}

/// Subtracts `factor * U[i][c]` from every element of the sub-matrix below
/// the pivot row, one contiguous flat chunk per worker.
fn eliminate_phase<F: Float + Send + Sync>(
    matrix: &mut DenseMatrix<F>,
    pivot_row: usize,
    factors: &[F],
    threads: usize,
) -> Result<(), EliminationError> {
    let cols = matrix.num_cols();
    let base = (pivot_row + 1) * cols;
    let pivot_base = pivot_row * cols;
    let total = matrix.as_slice().len() - base;

    let ranges = chunked(total, threads);
    if ranges.is_empty() {
        return Ok(());
    }

    let barrier = Barrier::new(ranges.len() + 1);
    let gate = StartGate::new();
    let shared = SharedElems::new(matrix.as_mut_slice());

    thread::scope(|s| -> Result<(), EliminationError> {
        for range in &ranges {
            let range = range.clone();
            let barrier = &barrier;
            let gate = &gate;
            let elems = shared;
            let spawn = thread::Builder::new().spawn_scoped(s, move || {
                if !gate.wait() {
                    return;
                }
                // Safety: flat chunks are pairwise disjoint; the only reads
                // outside the chunk hit the pivot row and the factor
                // snapshot, neither of which is written during this phase.
                let elems = unsafe { elems.slice() };
                let mut row = usize::MAX;
                let mut factor = F::zero();
                for k in range {
                    let flat = base + k;
                    let r = flat / cols;
                    if r != row {
                        // Constant within a row; refresh on row boundaries.
                        row = r;
                        factor = factors[r - pivot_row - 1];
                    }
                    let pivot_idx = pivot_base + flat % cols;
                    elems[flat] = elems[flat] - factor * elems[pivot_idx];
                }
                barrier.wait();
            });
            if let Err(err) = spawn {
                gate.abort();
                return Err(EliminationError::WorkerSpawn(err.to_string()));
            }
        }

        gate.open();
        barrier.wait();
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(threads: usize) -> EngineConfig {
        EngineConfig {
            num_threads: threads,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_two_by_two_scenario() {
        let mut m = DenseMatrix::from_rows(vec![vec![2.0f64, 4.0], vec![1.0, 3.0]]);
        eliminate_parallel(&mut m, &config(2)).unwrap();
        assert_eq!(m.as_slice(), &[1.0, 2.0, 0.0, 1.0]);
    }

    #[test]
    fn test_single_element() {
        // n = 1: normalize only, no eliminate phase.
        let mut m = DenseMatrix::from_rows(vec![vec![5.0f32]]);
        eliminate_parallel(&mut m, &config(3)).unwrap();
        assert_eq!(m[(0, 0)], 1.0);
    }

    #[test]
    fn test_more_threads_than_columns() {
        let mut m = DenseMatrix::from_rows(vec![
            vec![2.0f64, 2.0, 4.0],
            vec![1.0, 3.0, 5.0],
            vec![2.0, 8.0, 2.0],
        ]);
        eliminate_parallel(&mut m, &config(16)).unwrap();
        for i in 0..3 {
            assert_eq!(m[(i, i)], 1.0);
            for j in 0..i {
                assert_eq!(m[(i, j)], 0.0);
            }
        }
    }

    #[test]
    fn test_zero_pivot_detected() {
        let mut m = DenseMatrix::from_rows(vec![vec![0.0f64, 1.0], vec![1.0, 0.0]]);
        let err = eliminate_parallel(&mut m, &config(2)).unwrap_err();
        assert_eq!(err, EliminationError::SingularMatrix { row: 0 });
    }

    #[test]
    fn test_non_square_rejected() {
        let mut m: DenseMatrix<f32> = DenseMatrix::zeros(3, 2);
        assert!(matches!(
            eliminate_parallel(&mut m, &config(2)),
            Err(EliminationError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_zero_thread_count_clamped() {
        let mut m = DenseMatrix::from_rows(vec![vec![2.0f64, 4.0], vec![1.0, 3.0]]);
        eliminate_parallel(&mut m, &config(0)).unwrap();
        assert_eq!(m.as_slice(), &[1.0, 2.0, 0.0, 1.0]);
    }

    #[test]
    fn test_gate_abort_releases_short_wave() {
        // A failed spawn leaves the wave short of the barrier size; the
        // cancelled workers must exit without ever entering the barrier,
        // otherwise the driver would hang instead of reporting the
        // failure. This test deadlocks if the abort path regresses.
        let gate = StartGate::new();
        let barrier = Barrier::new(3);

        thread::scope(|s| {
            let mut workers = Vec::new();
            for _ in 0..2 {
                let gate = &gate;
                let barrier = &barrier;
                workers.push(s.spawn(move || {
                    if !gate.wait() {
                        return false;
                    }
                    barrier.wait();
                    true
                }));
            }

            gate.abort();
            for worker in workers {
                assert!(!worker.join().unwrap());
            }
        });
    }

    #[test]
    fn test_gate_open_runs_full_wave() {
        let gate = StartGate::new();
        let barrier = Barrier::new(3);

        thread::scope(|s| {
            for _ in 0..2 {
                let gate = &gate;
                let barrier = &barrier;
                s.spawn(move || {
                    assert!(gate.wait());
                    barrier.wait();
                });
            }

            gate.open();
            barrier.wait();
        });
    }

    #[test]
    fn test_gate_abort_before_workers_wait() {
        // Decision made before anyone blocks; late waiters must still
        // observe it.
        let gate = StartGate::new();
        gate.abort();
        assert!(!gate.wait());
    }
}
