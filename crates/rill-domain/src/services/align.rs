use crate::value_objects::frame::CombinedFrame;
use crate::value_objects::schema::Schema;
use crate::value_objects::series::SeriesPoint;

#[derive(Debug, Clone, PartialEq)]
pub enum AlignError {
    UnsortedPrimary { timestamp: i64 },
    UnsortedSecondary { timestamp: i64 },
}

impl std::fmt::Display for AlignError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlignError::UnsortedPrimary { timestamp } => {
                write!(f, "primary timeline not strictly increasing at ts={timestamp}")
            }
            AlignError::UnsortedSecondary { timestamp } => {
                write!(f, "secondary stream out of order at ts={timestamp}")
            }
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct AlignReport {
    pub assigned: usize,
    pub discarded_before_cursor: usize,
    pub discarded_after_exhaustion: usize,
    pub overwrites: usize,
}

/// Project a lower-frequency secondary stream onto the primary timeline's
/// grid by nearest timestamp.
///
/// A cursor pair of consecutive primary timestamps sweeps forward once, so
/// the chosen grid key never decreases across the stream and the whole merge
/// is O(|primary| + |secondary|). Policy, by contract with the upstream
/// feeds: observations earlier than the current cursor are discarded, equal
/// distances resolve to the earlier grid point, and a second observation
/// landing on an occupied grid point overwrites it (last write wins). Once
/// the primary cursor is exhausted the sweep stops and the remaining
/// observations are discarded; the report carries all three counts.
pub fn align(
    primary: &[SeriesPoint],
    secondary: &[SeriesPoint],
    schema: &Schema,
) -> Result<(CombinedFrame, AlignReport), AlignError> {
    for pair in primary.windows(2) {
        if pair[1].timestamp <= pair[0].timestamp {
            return Err(AlignError::UnsortedPrimary {
                timestamp: pair[1].timestamp,
            });
        }
    }
    for pair in secondary.windows(2) {
        if pair[1].timestamp < pair[0].timestamp {
            return Err(AlignError::UnsortedSecondary {
                timestamp: pair[1].timestamp,
            });
        }
    }

    let mut frame = CombinedFrame::from_primary(schema, primary);
    let mut report = AlignReport::default();

    // The sweep needs a full cursor pair; a grid shorter than two entries
    // cannot place any observation.
    if primary.len() < 2 {
        report.discarded_after_exhaustion = secondary.len();
        return Ok((frame, report));
    }

    let offset = schema.primary.len();
    let width = schema.secondary.len();
    let mut lo = 0usize;
    let mut hi = 1usize;
    let mut exhausted = false;

    for (obs_idx, obs) in secondary.iter().enumerate() {
        let t = obs.timestamp;
        if t < primary[lo].timestamp {
            report.discarded_before_cursor += 1;
            continue;
        }

        while primary[hi].timestamp < t {
            lo = hi;
            if hi + 1 >= primary.len() {
                exhausted = true;
                break;
            }
            hi += 1;
        }
        if !exhausted && (t - primary[lo].timestamp) > (primary[hi].timestamp - t) {
            lo = hi;
            if hi + 1 >= primary.len() {
                exhausted = true;
            } else {
                hi += 1;
            }
        }
        if exhausted {
            report.discarded_after_exhaustion = secondary.len() - obs_idx;
            break;
        }

        let row = &mut frame.cells[lo];
        if row[offset..offset + width].iter().any(|cell| cell.is_some()) {
            report.overwrites += 1;
        }
        for (idx, slot) in row[offset..offset + width].iter_mut().enumerate() {
            *slot = obs.values.get(idx).copied().flatten();
        }
        report.assigned += 1;
    }

    Ok((frame, report))
}
