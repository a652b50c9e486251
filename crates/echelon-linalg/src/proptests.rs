//! Property-based tests for the work partitioner.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::partition::{chunked, strided};

    proptest! {
        // Partition completeness: every index covered exactly once,
        // no overlap, no gap.

        #[test]
        fn chunked_covers_exactly_once(len in 0usize..600, workers in 1usize..17) {
            let ranges = chunked(len, workers);
            if len == 0 {
                prop_assert!(ranges.is_empty());
            } else {
                prop_assert_eq!(ranges.len(), workers);
            }

            let mut covered: Vec<usize> = ranges.into_iter().flatten().collect();
            covered.sort_unstable();
            prop_assert_eq!(covered, (0..len).collect::<Vec<_>>());
        }

        #[test]
        fn chunked_is_contiguous_and_ordered(len in 1usize..600, workers in 1usize..17) {
            let ranges = chunked(len, workers);
            let mut next = 0;
            for r in &ranges {
                prop_assert_eq!(r.start, next);
                next = r.end;
            }
            prop_assert_eq!(next, len);
        }

        #[test]
        fn chunked_remainder_bounded(len in 1usize..600, workers in 1usize..17) {
            // The last worker absorbs the remainder, never more than an
            // extra (workers - 1) elements over the base chunk.
            let ranges = chunked(len, workers);
            let chunk = len / workers;
            let last = ranges.last().cloned().map_or(0, |r| r.len());
            prop_assert!(last >= chunk);
            prop_assert!(last < chunk + workers);
        }

        #[test]
        fn strided_covers_exactly_once(
            start in 0usize..300,
            extra in 0usize..300,
            workers in 1usize..17,
        ) {
            let end = start + extra;
            let ranges = strided(start, end, workers);
            if extra == 0 {
                prop_assert!(ranges.is_empty());
            } else {
                prop_assert_eq!(ranges.len(), workers);
            }

            let mut covered: Vec<usize> =
                ranges.into_iter().flat_map(|r| r.indices()).collect();
            covered.sort_unstable();
            prop_assert_eq!(covered, (start..end).collect::<Vec<_>>());
        }

        #[test]
        fn strided_workers_are_disjoint(
            start in 0usize..300,
            extra in 1usize..300,
            workers in 1usize..17,
        ) {
            let ranges = strided(start, start + extra, workers);
            let per_worker: Vec<Vec<usize>> =
                ranges.iter().map(|r| r.indices().collect()).collect();
            for (t, indices) in per_worker.iter().enumerate() {
                for other in &per_worker[t + 1..] {
                    for k in indices {
                        prop_assert!(!other.contains(k));
                    }
                }
            }
        }
    }
}
