// Tue Jan 20 2026 - Alex

use crate::splitter::{merge_partials, Interval, SplitterError, TargetId, TimeSplitter};
use itertools::Itertools;
use log::debug;

impl TimeSplitter {
    /// Builds from an explicit `(start, stop, target)` table. Rows may come in any
    /// order but must not overlap once sorted.
    pub fn from_rows(rows: &[Interval]) -> Result<Self, SplitterError> {
        if rows.is_empty() {
            return Err(SplitterError::EmptyTable);
        }

        let merged = merge_partials(vec![rows.to_vec()])?;
        debug!("Built splitter from {} rows into {} intervals", rows.len(), merged.len());
        Ok(TimeSplitter::from_covering(merged))
    }

    /// Builds from parallel arrays where `targets[i]` is active on
    /// `[boundaries[i], boundaries[i + 1])`.
    pub fn from_boundaries(boundaries: &[i64], targets: &[TargetId]) -> Result<Self, SplitterError> {
        if boundaries.len() < 2 {
            return Err(SplitterError::EmptyTable);
        }
        if targets.len() + 1 != boundaries.len() {
            return Err(SplitterError::LengthMismatch {
                boundaries: boundaries.len(),
                expected: boundaries.len() - 1,
                targets: targets.len(),
            });
        }

        if let Some((index, (previous, value))) = boundaries
            .iter()
            .tuple_windows()
            .enumerate()
            .find(|(_, (previous, value))| value <= previous)
        {
            return Err(SplitterError::NonMonotonicBoundary {
                index: index + 1,
                previous: *previous,
                value: *value,
            });
        }

        let rows: Vec<Interval> = boundaries
            .iter()
            .tuple_windows()
            .zip(targets.iter())
            .map(|((&start, &stop), &target)| Interval::new(start, stop, target))
            .collect();

        let merged = merge_partials(vec![rows])?;
        debug!(
            "Built splitter from {} boundaries into {} intervals",
            boundaries.len(),
            merged.len()
        );
        Ok(TimeSplitter::from_covering(merged))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::splitter::NO_TARGET;

    #[test]
    fn test_rows_need_not_be_sorted() {
        let splitter = TimeSplitter::from_rows(&[
            Interval::new(20, 30, 2),
            Interval::new(0, 10, 0),
            Interval::new(10, 20, 1),
        ])
        .unwrap();
        assert_eq!(splitter.interval_count(), 3);
        assert_eq!(splitter.lookup(25), 2);
    }

    #[test]
    fn test_zero_width_row_fails_validation() {
        let err = TimeSplitter::from_rows(&[Interval::new(0, 5, 1), Interval::new(5, 5, 2)]).unwrap_err();
        assert!(matches!(err, SplitterError::ZeroWidthInterval { row: 1, start: 5, stop: 5 }));
    }

    #[test]
    fn test_empty_rows_fail_validation() {
        assert!(matches!(TimeSplitter::from_rows(&[]), Err(SplitterError::EmptyTable)));
    }

    #[test]
    fn test_boundary_vectors_with_explicit_gap() {
        let splitter = TimeSplitter::from_boundaries(&[0, 5, 15], &[1, NO_TARGET]).unwrap();
        assert_eq!(splitter.lookup(3), 1);
        assert_eq!(splitter.lookup(9), NO_TARGET);
        assert_eq!(splitter.lookup(5), NO_TARGET);
    }

    #[test]
    fn test_boundary_vectors_must_increase() {
        let err = TimeSplitter::from_boundaries(&[0, 5, 5, 9], &[1, 2, 3]).unwrap_err();
        assert!(matches!(
            err,
            SplitterError::NonMonotonicBoundary { index: 2, previous: 5, value: 5 }
        ));
    }

    #[test]
    fn test_boundary_vectors_length_mismatch() {
        let err = TimeSplitter::from_boundaries(&[0, 5, 9], &[1]).unwrap_err();
        assert!(matches!(
            err,
            SplitterError::LengthMismatch { boundaries: 3, expected: 2, targets: 1 }
        ));
        assert!(matches!(
            TimeSplitter::from_boundaries(&[7], &[]),
            Err(SplitterError::EmptyTable)
        ));
    }

    #[test]
    fn test_repeated_targets_collapse() {
        let splitter = TimeSplitter::from_boundaries(&[0, 1, 2, 3], &[4, 4, 5]).unwrap();
        assert_eq!(splitter.boundaries(), &[0, 2, 3]);
        assert_eq!(splitter.targets(), &[4, 5]);
    }
}
