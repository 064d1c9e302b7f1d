/// One sampled row of a stream: an epoch-second key and the attribute values
/// for that stream's side of the schema. Missing cells are `None`, never zero.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub timestamp: i64,
    pub values: Vec<Option<f64>>,
}

impl SeriesPoint {
    pub fn new(timestamp: i64, values: Vec<Option<f64>>) -> Self {
        Self { timestamp, values }
    }

    pub fn observed(timestamp: i64, values: &[f64]) -> Self {
        Self {
            timestamp,
            values: values.iter().copied().map(Some).collect(),
        }
    }
}
