//! Deterministic work partitioning for the elimination phases.
//!
//! Both splits share one contract: for any total length `L >= 0` and any
//! worker count `T >= 1`, the union of the returned ranges covers the full
//! index range exactly once, with no overlap and no gap. When `L == 0` no
//! work items are produced at all; otherwise exactly `T` items are
//! returned, some of which may be empty.

use std::ops::Range;

/// A strided slice of indices: `start`, `start + stride`,
/// `start + 2 * stride`, ... strictly below `end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StridedRange {
    /// First index of the stride.
    pub start: usize,
    /// Exclusive upper bound.
    pub end: usize,
    /// Distance between consecutive indices; always the worker count.
    pub stride: usize,
}

impl StridedRange {
    /// Iterates the indices covered by this range.
    pub fn indices(self) -> impl Iterator<Item = usize> {
        (self.start..self.end).step_by(self.stride.max(1))
    }
}

/// Splits `[start, end)` across `num_workers` by strided interleaving:
/// worker `t` takes `start + t`, `start + t + T`, `start + t + 2T`, ...
///
/// Used for the normalize phase, where it balances load evenly over the
/// pivot row regardless of its length, with no remainder special case.
#[must_use]
pub fn strided(start: usize, end: usize, num_workers: usize) -> Vec<StridedRange> {
    assert!(num_workers >= 1);
    if start >= end {
        return Vec::new();
    }
    (0..num_workers)
        .map(|t| StridedRange {
            start: start + t,
            end,
            stride: num_workers,
        })
        .collect()
}

/// Splits `[0, len)` into `num_workers` contiguous chunks of
/// `floor(len / T)` indices; the last worker absorbs the remainder.
///
/// Used for the eliminate phase over the flattened sub-matrix below the
/// pivot row.
#[must_use]
pub fn chunked(len: usize, num_workers: usize) -> Vec<Range<usize>> {
    assert!(num_workers >= 1);
    if len == 0 {
        return Vec::new();
    }
    let chunk = len / num_workers;
    (0..num_workers)
        .map(|t| {
            if t == num_workers - 1 {
                t * chunk..len
            } else {
                t * chunk..(t + 1) * chunk
            }
        })
        .collect()
}
