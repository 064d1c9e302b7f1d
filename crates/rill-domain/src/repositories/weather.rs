use crate::value_objects::series::SeriesPoint;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct WeatherQuery {
    pub dir: PathBuf,
    /// Attribute names to extract, in schema-secondary order.
    pub attributes: Vec<String>,
}

#[derive(Debug, Default)]
pub struct WeatherReport {
    pub files_read: usize,
    pub files_skipped: usize,
    pub rows: usize,
    pub duplicates: usize,
    pub missing_values: usize,
    pub first_timestamp: Option<i64>,
    pub last_timestamp: Option<i64>,
}

/// Source of the secondary weather observation stream. Implementations
/// return points sorted ascending with unique timestamps, values in query
/// order. A corrupt observation file is skipped (and counted), never fatal;
/// a missing directory is an error.
pub trait WeatherRepository {
    fn load_observations(
        &self,
        query: &WeatherQuery,
    ) -> Result<(Vec<SeriesPoint>, WeatherReport), String>;
}
