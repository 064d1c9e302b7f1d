use crate::value_objects::frame::DenseFrame;

#[derive(Debug, Clone, PartialEq)]
pub enum WindowError {
    InvalidShape { lag: usize, lead: usize },
    UnknownTarget(String),
    Empty { rows: usize, lag: usize, lead: usize },
}

impl std::fmt::Display for WindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowError::InvalidShape { lag, lead } => {
                write!(f, "lag and lead must both be >= 1 (lag={lag}, lead={lead})")
            }
            WindowError::UnknownTarget(name) => write!(f, "unknown target attribute: {name}"),
            WindowError::Empty { rows, lag, lead } => write!(
                f,
                "no complete windows: {rows} rows cannot cover lag={lag} + lead={lead}"
            ),
        }
    }
}

/// Fixed-width supervised rows derived from a dense series. Each row holds
/// `lag * n_attributes` feature columns (oldest lag first) followed by `lead`
/// target columns (earliest lead first). `timestamps` carries each row's
/// anchor (`t`) for traceability.
#[derive(Debug, Clone, PartialEq)]
pub struct SupervisedFrame {
    pub names: Vec<String>,
    pub timestamps: Vec<i64>,
    pub rows: Vec<Vec<f64>>,
    pub lag: usize,
    pub lead: usize,
    pub n_attributes: usize,
}

impl SupervisedFrame {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn feature_width(&self) -> usize {
        self.lag * self.n_attributes
    }

    pub fn feature_rows(&self) -> Vec<Vec<f64>> {
        let width = self.feature_width();
        self.rows.iter().map(|row| row[..width].to_vec()).collect()
    }

    pub fn target_rows(&self) -> Vec<Vec<f64>> {
        let width = self.feature_width();
        self.rows.iter().map(|row| row[width..].to_vec()).collect()
    }

    /// Positional split: the first `floor(train_fraction * len)` rows train,
    /// the remainder test. No shuffling, so repeated calls always produce
    /// identical partitions.
    pub fn split_train_test(&self, train_fraction: f64) -> (SupervisedFrame, SupervisedFrame) {
        let n_train = ((train_fraction.clamp(0.0, 1.0)) * self.len() as f64) as usize;
        let slice = |range: std::ops::Range<usize>| SupervisedFrame {
            names: self.names.clone(),
            timestamps: self.timestamps[range.clone()].to_vec(),
            rows: self.rows[range].to_vec(),
            lag: self.lag,
            lead: self.lead,
            n_attributes: self.n_attributes,
        };
        (slice(0..n_train), slice(n_train..self.len()))
    }

    /// Reshape flat feature rows to `[samples][lag][attributes]`.
    pub fn feature_windows(&self) -> Vec<Vec<Vec<f64>>> {
        let n = self.n_attributes;
        self.rows
            .iter()
            .map(|row| (0..self.lag).map(|step| row[step * n..(step + 1) * n].to_vec()).collect())
            .collect()
    }
}

/// Build supervised rows from a dense series: `lag` prior steps of every
/// attribute as features, the target attribute at offsets `t .. t+lead-1` as
/// prediction columns. Rows whose window crosses a table boundary are
/// dropped entirely, so a clean N-row table yields `N - lag - lead + 1` rows.
pub fn build_supervised(
    frame: &DenseFrame,
    lag: usize,
    lead: usize,
    target: &str,
) -> Result<SupervisedFrame, WindowError> {
    if lag == 0 || lead == 0 {
        return Err(WindowError::InvalidShape { lag, lead });
    }
    let target_idx = frame
        .column_index(target)
        .ok_or_else(|| WindowError::UnknownTarget(target.to_string()))?;

    let rows = frame.len();
    if rows < lag + lead {
        return Err(WindowError::Empty { rows, lag, lead });
    }

    let n_attributes = frame.width();
    let mut names = Vec::with_capacity(lag * n_attributes + lead);
    for offset in (1..=lag).rev() {
        for column in &frame.columns {
            names.push(format!("{column}(t-{offset})"));
        }
    }
    for offset in 0..lead {
        names.push(format!("{target}(t+{offset})"));
    }

    let mut timestamps = Vec::with_capacity(rows - lag - lead + 1);
    let mut out_rows = Vec::with_capacity(rows - lag - lead + 1);
    for anchor in lag..=(rows - lead) {
        let mut row = Vec::with_capacity(names.len());
        for offset in (1..=lag).rev() {
            row.extend_from_slice(&frame.rows[anchor - offset]);
        }
        for offset in 0..lead {
            row.push(frame.rows[anchor + offset][target_idx]);
        }
        timestamps.push(frame.timestamps[anchor]);
        out_rows.push(row);
    }

    Ok(SupervisedFrame {
        names,
        timestamps,
        rows: out_rows,
        lag,
        lead,
        n_attributes,
    })
}
