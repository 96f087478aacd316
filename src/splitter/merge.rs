// Tue Jan 20 2026 - Alex

use crate::splitter::{Interval, SplitterError, NO_TARGET};

/// Appends `interval` to a sorted, covering list, applying the boundary rules:
/// touching intervals with the same target collapse into one, touching intervals
/// with different targets keep their boundary, and a gap is filled with an
/// unfiltered interval.
pub(crate) fn push_merged(out: &mut Vec<Interval>, interval: Interval) {
    if let Some(last) = out.last_mut() {
        if last.stop < interval.start {
            if last.target == NO_TARGET {
                last.stop = interval.start;
            } else {
                let filler = Interval::unfiltered(last.stop, interval.start);
                out.push(filler);
            }
        }
    }

    match out.last_mut() {
        Some(last) if last.joins(&interval) => last.stop = interval.stop,
        _ => out.push(interval),
    }
}

/// Reconciles interval lists built independently (for example one per worker)
/// into a single sorted list that covers `[min start, max stop)` without gaps
/// or overlaps.
///
/// Row numbers in errors refer to the position of the interval in the
/// concatenation of `partials`.
pub fn merge_partials(partials: Vec<Vec<Interval>>) -> Result<Vec<Interval>, SplitterError> {
    let mut rows: Vec<(usize, Interval)> = partials.into_iter().flatten().enumerate().collect();
    if rows.is_empty() {
        return Err(SplitterError::EmptyTable);
    }

    for (row, interval) in &rows {
        if interval.stop <= interval.start {
            return Err(SplitterError::ZeroWidthInterval {
                row: *row,
                start: interval.start,
                stop: interval.stop,
            });
        }
        if interval.target < NO_TARGET {
            return Err(SplitterError::InvalidTarget {
                row: *row,
                target: interval.target,
            });
        }
    }

    rows.sort_by_key(|(row, interval)| (interval.start, *row));

    let mut merged: Vec<Interval> = Vec::with_capacity(rows.len());
    let mut previous: Option<(usize, Interval)> = None;
    for (row, interval) in rows {
        if let Some((prev_row, prev)) = previous {
            if interval.start < prev.stop {
                return Err(SplitterError::OverlappingRows {
                    first: prev_row.min(row),
                    second: prev_row.max(row),
                    at: interval.start,
                });
            }
        }
        push_merged(&mut merged, interval);
        previous = Some((row, interval));
    }

    Ok(merged)
}
