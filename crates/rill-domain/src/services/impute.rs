use crate::value_objects::frame::CombinedFrame;
use crate::value_objects::schema::Schema;

/// Gap-filling strategy for the combined table, chosen once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillStrategy {
    /// Leave missing cells missing.
    Omit,
    /// Last observation carried forward; leading gaps stay missing.
    Locf,
    /// Linear interpolation across interior gaps only; boundary gaps are
    /// never extrapolated. Integer attributes are rounded afterwards.
    Interpolate,
}

impl FillStrategy {
    /// Stable suffix used in output file names (`combined_<suffix>.csv`).
    pub fn file_suffix(&self) -> &'static str {
        match self {
            FillStrategy::Omit => "omit",
            FillStrategy::Locf => "locf",
            FillStrategy::Interpolate => "interpolate",
        }
    }
}

/// Fill missing cells of a caller-owned table in place. Total over any
/// input: an all-missing table comes back unchanged. Callers that need the
/// unfilled table must copy first.
pub fn fill(frame: &mut CombinedFrame, strategy: FillStrategy, schema: &Schema) {
    match strategy {
        FillStrategy::Omit => {}
        FillStrategy::Locf => forward_fill(frame),
        FillStrategy::Interpolate => interpolate(frame, schema),
    }
}

fn forward_fill(frame: &mut CombinedFrame) {
    let width = frame.width();
    for column in 0..width {
        let mut last: Option<f64> = None;
        for row in frame.cells.iter_mut() {
            match row[column] {
                Some(value) => last = Some(value),
                None => row[column] = last,
            }
        }
    }
}

fn interpolate(frame: &mut CombinedFrame, schema: &Schema) {
    let rows = frame.len();
    for column in 0..frame.width() {
        let mut prev_observed: Option<usize> = None;
        let mut row = 0;
        while row < rows {
            if frame.cells[row][column].is_some() {
                prev_observed = Some(row);
                row += 1;
                continue;
            }

            let mut next = row + 1;
            while next < rows && frame.cells[next][column].is_none() {
                next += 1;
            }

            // Interior gaps only: a gap with no observed value on either
            // side is left missing.
            if let Some(lo) = prev_observed {
                if next < rows {
                    let lo_value = frame.cells[lo][column].unwrap_or(0.0);
                    let hi_value = frame.cells[next][column].unwrap_or(0.0);
                    let span = (next - lo) as f64;
                    for gap_row in row..next {
                        let weight = (gap_row - lo) as f64 / span;
                        frame.cells[gap_row][column] =
                            Some(lo_value + (hi_value - lo_value) * weight);
                    }
                }
            }
            row = next;
        }

        if schema.is_integer(&frame.columns[column]) {
            for cells in frame.cells.iter_mut() {
                if let Some(value) = cells[column] {
                    cells[column] = Some(value.round());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{fill, FillStrategy};
    use crate::value_objects::frame::CombinedFrame;
    use crate::value_objects::schema::{ColumnSpec, Schema};
    use crate::value_objects::series::SeriesPoint;

    fn schema() -> Schema {
        Schema::new(
            vec![ColumnSpec::real("level")],
            vec![ColumnSpec::integer("temp")],
            "level",
        )
        .expect("schema")
    }

    fn frame(level: &[Option<f64>], temp: &[Option<f64>]) -> CombinedFrame {
        let primary: Vec<SeriesPoint> = level
            .iter()
            .enumerate()
            .map(|(idx, value)| SeriesPoint::new(idx as i64 * 60, vec![*value]))
            .collect();
        let mut frame = CombinedFrame::from_primary(&schema(), &primary);
        for (row, value) in temp.iter().enumerate() {
            frame.cells[row][1] = *value;
        }
        frame
    }

    fn column(frame: &CombinedFrame, idx: usize) -> Vec<Option<f64>> {
        frame.cells.iter().map(|row| row[idx]).collect()
    }

    #[test]
    fn omit_leaves_table_unchanged() {
        let mut f = frame(&[Some(1.0), None], &[None, Some(2.0)]);
        let before = f.clone();
        fill(&mut f, FillStrategy::Omit, &schema());
        assert_eq!(f, before);
    }

    #[test]
    fn locf_carries_last_observation_forward() {
        let mut f = frame(
            &[None, Some(1.0), None, None, Some(4.0)],
            &[None, None, None, None, None],
        );
        fill(&mut f, FillStrategy::Locf, &schema());
        assert_eq!(
            column(&f, 0),
            vec![None, Some(1.0), Some(1.0), Some(1.0), Some(4.0)]
        );
    }

    #[test]
    fn locf_is_idempotent() {
        let mut once = frame(&[Some(1.0), None, Some(3.0), None], &[None; 4]);
        fill(&mut once, FillStrategy::Locf, &schema());
        let mut twice = once.clone();
        fill(&mut twice, FillStrategy::Locf, &schema());
        assert_eq!(once, twice);
    }

    #[test]
    fn interpolate_fills_interior_gaps_linearly() {
        let mut f = frame(&[Some(1.0), None, None, Some(4.0)], &[None; 4]);
        fill(&mut f, FillStrategy::Interpolate, &schema());
        assert_eq!(
            column(&f, 0),
            vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)]
        );
    }

    #[test]
    fn interpolate_never_touches_boundary_gaps() {
        let mut f = frame(&[None, Some(2.0), None, Some(4.0), None], &[None; 5]);
        fill(&mut f, FillStrategy::Interpolate, &schema());
        assert_eq!(
            column(&f, 0),
            vec![None, Some(2.0), Some(3.0), Some(4.0), None]
        );
    }

    #[test]
    fn interpolate_rounds_integer_attributes() {
        let mut f = frame(
            &[Some(0.0), Some(0.0), Some(0.0)],
            &[Some(60.0), None, Some(61.0)],
        );
        fill(&mut f, FillStrategy::Interpolate, &schema());
        assert_eq!(column(&f, 1), vec![Some(60.0), Some(61.0), Some(61.0)]);
    }

    #[test]
    fn all_missing_table_is_returned_unchanged() {
        let mut f = frame(&[None, None], &[None, None]);
        let before = f.clone();
        fill(&mut f, FillStrategy::Interpolate, &schema());
        assert_eq!(f, before);
    }
}
