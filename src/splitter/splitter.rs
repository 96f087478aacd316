// Tue Jan 20 2026 - Alex

use crate::event::TimeRange;
use crate::splitter::{Interval, TargetId, NO_TARGET};
use std::collections::BTreeSet;

/// Read-only map from time to target.
///
/// Stored as `n + 1` strictly increasing boundaries and `n` targets, where
/// `targets[i]` is active on `[boundaries[i], boundaries[i + 1])`. The
/// intervals cover `[boundaries[0], boundaries[n])` without gaps; time outside
/// that span maps to [`NO_TARGET`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSplitter {
    boundaries: Vec<i64>,
    targets: Vec<TargetId>,
}

impl TimeSplitter {
    /// Builds from a list already reconciled by `merge_partials`: sorted,
    /// non-empty, gap free, and with no two touching intervals sharing a target.
    pub(crate) fn from_covering(intervals: Vec<Interval>) -> Self {
        let mut boundaries = Vec::with_capacity(intervals.len() + 1);
        let mut targets = Vec::with_capacity(intervals.len());

        for interval in &intervals {
            boundaries.push(interval.start);
            targets.push(interval.target);
        }
        if let Some(last) = intervals.last() {
            boundaries.push(last.stop);
        }

        Self { boundaries, targets }
    }

    /// Target for `time`. A time equal to a boundary belongs to the interval that
    /// starts there.
    #[inline]
    pub fn lookup(&self, time: i64) -> TargetId {
        self.locate(time).map_or(NO_TARGET, |idx| self.targets[idx])
    }

    /// Position of the interval holding `time`, or `None` outside the covered span.
    #[inline]
    pub fn locate(&self, time: i64) -> Option<usize> {
        let idx = self.boundaries.partition_point(|&boundary| boundary <= time);
        if idx == 0 || idx >= self.boundaries.len() {
            None
        } else {
            Some(idx - 1)
        }
    }

    /// Every distinct target, always including [`NO_TARGET`].
    pub fn output_targets(&self) -> BTreeSet<TargetId> {
        let mut targets: BTreeSet<TargetId> = self.targets.iter().copied().collect();
        targets.insert(NO_TARGET);
        targets
    }

    /// Intervals routed to `target`, in time order.
    pub fn validity_region(&self, target: TargetId) -> Vec<Interval> {
        self.intervals().filter(|interval| interval.target == target).collect()
    }

    pub fn intervals(&self) -> impl Iterator<Item = Interval> + '_ {
        self.boundaries
            .windows(2)
            .zip(self.targets.iter())
            .map(|(edge, &target)| Interval::new(edge[0], edge[1], target))
    }

    pub fn interval_count(&self) -> usize {
        self.targets.len()
    }

    pub fn boundaries(&self) -> &[i64] {
        &self.boundaries
    }

    pub fn targets(&self) -> &[TargetId] {
        &self.targets
    }

    /// The span covered by the intervals.
    pub fn time_range(&self) -> TimeRange {
        match (self.boundaries.first(), self.boundaries.last()) {
            (Some(&start), Some(&stop)) => TimeRange::new(start, stop),
            _ => TimeRange::new(0, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::splitter::merge_partials;

    fn splitter(rows: Vec<Interval>) -> TimeSplitter {
        TimeSplitter::from_covering(merge_partials(vec![rows]).unwrap())
    }

    #[test]
    fn test_boundary_tie_break_goes_to_later_interval() {
        let splitter = splitter(vec![Interval::new(0, 10, 0), Interval::new(10, 20, 1)]);
        assert_eq!(splitter.lookup(9), 0);
        assert_eq!(splitter.lookup(10), 1);
        assert_eq!(splitter.lookup(19), 1);
    }

    #[test]
    fn test_outside_range_is_unfiltered() {
        let splitter = splitter(vec![Interval::new(100, 200, 4)]);
        assert_eq!(splitter.lookup(99), NO_TARGET);
        assert_eq!(splitter.lookup(200), NO_TARGET);
        assert_eq!(splitter.lookup(i64::MIN), NO_TARGET);
        assert_eq!(splitter.lookup(i64::MAX), NO_TARGET);
    }

    #[test]
    fn test_output_targets_include_sentinel() {
        let splitter = splitter(vec![Interval::new(0, 5, 3), Interval::new(5, 9, 1)]);
        let targets: Vec<_> = splitter.output_targets().into_iter().collect();
        assert_eq!(targets, vec![NO_TARGET, 1, 3]);
    }

    #[test]
    fn test_validity_region_lists_matching_intervals() {
        let splitter = splitter(vec![
            Interval::new(0, 5, 1),
            Interval::new(5, 7, 2),
            Interval::new(9, 12, 1),
        ]);
        assert_eq!(
            splitter.validity_region(1),
            vec![Interval::new(0, 5, 1), Interval::new(9, 12, 1)]
        );
        assert_eq!(splitter.validity_region(NO_TARGET), vec![Interval::unfiltered(7, 9)]);
        assert!(splitter.validity_region(42).is_empty());
    }

    #[test]
    fn test_intervals_cover_span_without_gaps() {
        let splitter = splitter(vec![
            Interval::new(30, 40, 2),
            Interval::new(0, 10, 0),
            Interval::new(12, 13, 1),
        ]);
        let intervals: Vec<_> = splitter.intervals().collect();
        assert_eq!(intervals.first().unwrap().start, 0);
        assert_eq!(intervals.last().unwrap().stop, 40);
        for pair in intervals.windows(2) {
            assert_eq!(pair[0].stop, pair[1].start);
            assert_ne!(pair[0].target, pair[1].target);
        }
        let covered: i64 = intervals.iter().map(Interval::width).sum();
        assert_eq!(covered, 40);
        assert_eq!(splitter.time_range(), TimeRange::new(0, 40));
    }
}
