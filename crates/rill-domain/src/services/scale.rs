use crate::value_objects::frame::DenseFrame;

#[derive(Debug, Clone, PartialEq)]
pub enum ScaleError {
    EmptyFrame,
    DegenerateRange { column: String },
    WidthMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for ScaleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScaleError::EmptyFrame => write!(f, "cannot fit scaler on an empty frame"),
            ScaleError::DegenerateRange { column } => {
                write!(f, "constant attribute column cannot be scaled: {column}")
            }
            ScaleError::WidthMismatch { expected, actual } => {
                write!(f, "row width mismatch: expected {expected}, got {actual}")
            }
        }
    }
}

/// Per-column linear [0, 1] normalization. Fitted once over the full dense
/// frame, then reused for every transform and inversion in the run.
#[derive(Debug, Clone, PartialEq)]
pub struct MinMaxScaler {
    pub ranges: Vec<(f64, f64)>,
}

impl MinMaxScaler {
    pub fn fit(frame: &DenseFrame) -> Result<Self, ScaleError> {
        if frame.is_empty() {
            return Err(ScaleError::EmptyFrame);
        }

        let width = frame.width();
        let mut ranges = vec![(f64::INFINITY, f64::NEG_INFINITY); width];
        for row in &frame.rows {
            for (idx, value) in row.iter().enumerate().take(width) {
                let (min, max) = &mut ranges[idx];
                *min = min.min(*value);
                *max = max.max(*value);
            }
        }

        for (idx, (min, max)) in ranges.iter().enumerate() {
            if max <= min {
                return Err(ScaleError::DegenerateRange {
                    column: frame.columns.get(idx).cloned().unwrap_or_default(),
                });
            }
        }

        Ok(Self { ranges })
    }

    pub fn width(&self) -> usize {
        self.ranges.len()
    }

    pub fn transform_row(&self, row: &[f64]) -> Result<Vec<f64>, ScaleError> {
        if row.len() != self.ranges.len() {
            return Err(ScaleError::WidthMismatch {
                expected: self.ranges.len(),
                actual: row.len(),
            });
        }
        Ok(row
            .iter()
            .zip(self.ranges.iter())
            .map(|(value, (min, max))| (value - min) / (max - min))
            .collect())
    }

    pub fn transform(&self, frame: &DenseFrame) -> Result<DenseFrame, ScaleError> {
        let mut rows = Vec::with_capacity(frame.rows.len());
        for row in &frame.rows {
            rows.push(self.transform_row(row)?);
        }
        Ok(DenseFrame {
            columns: frame.columns.clone(),
            timestamps: frame.timestamps.clone(),
            rows,
        })
    }

    fn invert_row(&self, row: &[f64]) -> Result<Vec<f64>, ScaleError> {
        if row.len() != self.ranges.len() {
            return Err(ScaleError::WidthMismatch {
                expected: self.ranges.len(),
                actual: row.len(),
            });
        }
        Ok(row
            .iter()
            .zip(self.ranges.iter())
            .map(|(value, (min, max))| value * (max - min) + min)
            .collect())
    }

    /// Recover the target column's original units for a batch of predicted
    /// values. Only the final (target) column is ever inverted on its own:
    /// each prediction is re-attached to the trailing normalized context of
    /// its feature row to rebuild a full-width row, the whole row runs
    /// through the inverse transform, and the last column is returned.
    /// Out-of-range predictions are not clamped.
    pub fn invert_target(
        &self,
        predicted: &[f64],
        feature_rows: &[Vec<f64>],
    ) -> Result<Vec<f64>, ScaleError> {
        let width = self.ranges.len();
        let context_width = width - 1;
        let mut inverted = Vec::with_capacity(predicted.len());

        for (value, features) in predicted.iter().zip(feature_rows.iter()) {
            if features.len() < context_width {
                return Err(ScaleError::WidthMismatch {
                    expected: context_width,
                    actual: features.len(),
                });
            }
            let mut row = features[features.len() - context_width..].to_vec();
            row.push(*value);
            let original = self.invert_row(&row)?;
            inverted.push(original[width - 1]);
        }

        Ok(inverted)
    }
}
