use crate::value_objects::series::SeriesPoint;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct GaugeQuery {
    pub path: PathBuf,
    /// Attribute names to extract, in schema-primary order.
    pub attributes: Vec<String>,
}

#[derive(Debug, Default)]
pub struct GaugeReport {
    pub rows: usize,
    pub duplicates: usize,
    pub out_of_order: usize,
    pub missing_values: usize,
    pub skipped_rows: usize,
    pub first_timestamp: Option<i64>,
    pub last_timestamp: Option<i64>,
}

/// Source of the primary water-quality timeline. Implementations return
/// points sorted ascending with unique timestamps, values in query order.
pub trait GaugeRepository {
    fn load_gauge(&self, query: &GaugeQuery) -> Result<(Vec<SeriesPoint>, GaugeReport), String>;
}
