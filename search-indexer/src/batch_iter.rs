//! Splitting an id range into fixed-size batches.

/// An inclusive id range `from..=to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdRange {
    pub from: i64,
    pub to: i64,
}

/// Walks `start..=end` in sub-ranges of at most `size` ids.
///
/// The last sub-range is clamped to `end`. A range with `start > end` yields
/// nothing.
///
/// # Example
///
/// ```
/// use search_indexer::batch_iter::{BatchIterator, IdRange};
///
/// let batches: Vec<IdRange> = BatchIterator::new(1, 25, 10).collect();
/// assert_eq!(
///     batches,
///     vec![
///         IdRange { from: 1, to: 10 },
///         IdRange { from: 11, to: 20 },
///         IdRange { from: 21, to: 25 },
///     ]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct BatchIterator {
    next_from: i64,
    end: i64,
    size: i64,
    exhausted: bool,
}

impl BatchIterator {
    /// A `size` below one is treated as one.
    pub fn new(start: i64, end: i64, size: i64) -> Self {
        Self {
            next_from: start,
            end,
            size: size.max(1),
            exhausted: start > end,
        }
    }
}

impl Iterator for BatchIterator {
    type Item = IdRange;

    fn next(&mut self) -> Option<IdRange> {
        if self.exhausted {
            return None;
        }

        let from = self.next_from;
        let to = from.saturating_add(self.size - 1).min(self.end);

        match to.checked_add(1) {
            Some(next) if next <= self.end => self.next_from = next,
            _ => self.exhausted = true,
        }

        Some(IdRange { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges(start: i64, end: i64, size: i64) -> Vec<(i64, i64)> {
        BatchIterator::new(start, end, size)
            .map(|r| (r.from, r.to))
            .collect()
    }

    #[test]
    fn test_start_after_end_yields_nothing() {
        assert!(ranges(10, 9, 5).is_empty());
    }

    #[test]
    fn test_range_equal_to_size_is_one_batch() {
        assert_eq!(ranges(1, 10, 10), vec![(1, 10)]);
    }

    #[test]
    fn test_single_id() {
        assert_eq!(ranges(0, 0, 10000), vec![(0, 0)]);
    }

    #[test]
    fn test_last_batch_is_clamped() {
        assert_eq!(ranges(0, 100, 30), vec![(0, 29), (30, 59), (60, 89), (90, 100)]);
    }

    #[test]
    fn test_batches_cover_range_without_gaps() {
        for (start, end, size) in [(1, 1000, 7), (-50, 50, 3), (5, 6, 1), (0, 99, 100)] {
            let batches: Vec<IdRange> = BatchIterator::new(start, end, size).collect();

            assert_eq!(batches.first().map(|b| b.from), Some(start));
            assert_eq!(batches.last().map(|b| b.to), Some(end));
            for pair in batches.windows(2) {
                assert_eq!(pair[0].to + 1, pair[1].from);
            }
            for batch in &batches {
                assert!(batch.from <= batch.to);
                assert!(batch.to <= end);
                assert!(batch.to - batch.from < size);
            }
        }
    }

    #[test]
    fn test_does_not_overflow_at_max() {
        assert_eq!(
            ranges(i64::MAX - 3, i64::MAX, 2),
            vec![(i64::MAX - 3, i64::MAX - 2), (i64::MAX - 1, i64::MAX)]
        );
    }

    #[test]
    fn test_zero_size_is_treated_as_one() {
        assert_eq!(ranges(1, 3, 0), vec![(1, 1), (2, 2), (3, 3)]);
    }
}
