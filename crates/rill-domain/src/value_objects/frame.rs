use crate::value_objects::schema::Schema;
use crate::value_objects::series::SeriesPoint;

/// The combined table: one row per primary-timeline timestamp, columns fixed
/// to primary attributes followed by secondary attributes. Secondary cells
/// start unset and are filled by alignment/imputation.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedFrame {
    pub columns: Vec<String>,
    pub timestamps: Vec<i64>,
    pub cells: Vec<Vec<Option<f64>>>,
}

impl CombinedFrame {
    pub fn from_primary(schema: &Schema, primary: &[SeriesPoint]) -> Self {
        let columns = schema.column_names();
        let width = columns.len();
        let primary_width = schema.primary.len();

        let mut timestamps = Vec::with_capacity(primary.len());
        let mut cells = Vec::with_capacity(primary.len());
        for point in primary {
            let mut row = vec![None; width];
            for (idx, slot) in row.iter_mut().enumerate().take(primary_width) {
                *slot = point.values.get(idx).copied().flatten();
            }
            timestamps.push(point.timestamp);
            cells.push(row);
        }

        Self {
            columns,
            timestamps,
            cells,
        }
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        self.cells.get(row).and_then(|r| r.get(column).copied().flatten())
    }

    pub fn missing_cells(&self) -> usize {
        self.cells
            .iter()
            .map(|row| row.iter().filter(|cell| cell.is_none()).count())
            .sum()
    }

    /// Reorder columns to `order` and drop every row containing a missing
    /// cell, producing a dense frame for the modeling path.
    pub fn drop_missing(&self, order: &[String]) -> Result<DenseFrame, String> {
        let mut indices = Vec::with_capacity(order.len());
        for name in order {
            let idx = self
                .column_index(name)
                .ok_or_else(|| format!("unknown column in reorder: {name}"))?;
            indices.push(idx);
        }

        let mut timestamps = Vec::new();
        let mut rows = Vec::new();
        for (row_idx, row) in self.cells.iter().enumerate() {
            let mut dense = Vec::with_capacity(indices.len());
            let mut complete = true;
            for &idx in &indices {
                match row[idx] {
                    Some(value) => dense.push(value),
                    None => {
                        complete = false;
                        break;
                    }
                }
            }
            if complete {
                timestamps.push(self.timestamps[row_idx]);
                rows.push(dense);
            }
        }

        Ok(DenseFrame {
            columns: order.to_vec(),
            timestamps,
            rows,
        })
    }
}

/// A fully observed frame: same shape as [`CombinedFrame`] but with no
/// missing cells, ready for scaling and windowing.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseFrame {
    pub columns: Vec<String>,
    pub timestamps: Vec<i64>,
    pub rows: Vec<Vec<f64>>,
}

impl DenseFrame {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }
}
