use crate::value_objects::frame::CombinedFrame;
use crate::value_objects::series::SeriesPoint;
use std::path::Path;

pub trait ArtifactWriter {
    fn ensure_dir(&self, path: &Path) -> Result<(), String>;
    fn write_series_csv(
        &self,
        path: &Path,
        columns: &[String],
        points: &[SeriesPoint],
    ) -> Result<(), String>;
    fn write_combined_csv(&self, path: &Path, frame: &CombinedFrame) -> Result<(), String>;
    fn write_summary_json(&self, path: &Path, summary: &serde_json::Value) -> Result<(), String>;
}

pub trait ArtifactReader {
    fn read_combined_csv(&self, path: &Path) -> Result<CombinedFrame, String>;
    fn exists(&self, path: &Path) -> bool;
}
