use rill_domain::repositories::artifacts::{ArtifactReader, ArtifactWriter};
use rill_domain::value_objects::frame::CombinedFrame;
use rill_domain::value_objects::series::SeriesPoint;
use std::fs;
use std::fs::File;
use std::path::Path;
use std::time::Instant;

const TIME_COLUMN: &str = "time_gmt";

#[derive(Debug, Default, Clone, Copy)]
pub struct FilesystemArtifacts;

impl FilesystemArtifacts {
    pub fn new() -> Self {
        Self
    }
}

fn record_write_metrics(kind: &'static str, start: Instant, result: &Result<(), String>) {
    let result_label = if result.is_ok() { "ok" } else { "err" };
    metrics::counter!(
        "rill.infra.artifacts.write.calls_total",
        "kind" => kind,
        "result" => result_label
    )
    .increment(1);
    metrics::histogram!("rill.infra.artifacts.write_ms", "kind" => kind, "result" => result_label)
        .record(start.elapsed().as_millis() as f64);
}

fn record_read_metrics<T>(kind: &'static str, start: Instant, result: &Result<T, String>) {
    let result_label = if result.is_ok() { "ok" } else { "err" };
    metrics::counter!(
        "rill.infra.artifacts.read.calls_total",
        "kind" => kind,
        "result" => result_label
    )
    .increment(1);
    metrics::histogram!("rill.infra.artifacts.read_ms", "kind" => kind, "result" => result_label)
        .record(start.elapsed().as_millis() as f64);
}

fn format_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl ArtifactWriter for FilesystemArtifacts {
    fn ensure_dir(&self, path: &Path) -> Result<(), String> {
        let start = Instant::now();
        let result = fs::create_dir_all(path)
            .map_err(|err| format!("failed to create dir {}: {}", path.display(), err));
        record_write_metrics("ensure_dir", start, &result);
        result
    }

    fn write_series_csv(
        &self,
        path: &Path,
        columns: &[String],
        points: &[SeriesPoint],
    ) -> Result<(), String> {
        let start = Instant::now();
        let result = write_series_csv(path, columns, points);
        record_write_metrics("series_csv", start, &result);
        result
    }

    fn write_combined_csv(&self, path: &Path, frame: &CombinedFrame) -> Result<(), String> {
        let start = Instant::now();
        let result = write_combined_csv(path, frame);
        record_write_metrics("combined_csv", start, &result);
        result
    }

    fn write_summary_json(&self, path: &Path, summary: &serde_json::Value) -> Result<(), String> {
        let start = Instant::now();
        let result = serde_json::to_string_pretty(summary)
            .map_err(|err| format!("failed to serialize summary json: {err}"))
            .and_then(|json| {
                fs::write(path, json).map_err(|err| {
                    format!("failed to write summary json {}: {}", path.display(), err)
                })
            });
        record_write_metrics("summary_json", start, &result);
        result
    }
}

impl ArtifactReader for FilesystemArtifacts {
    fn read_combined_csv(&self, path: &Path) -> Result<CombinedFrame, String> {
        let start = Instant::now();
        let result = read_combined_csv(path);
        record_read_metrics("combined_csv", start, &result);
        result
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

fn write_series_csv(path: &Path, columns: &[String], points: &[SeriesPoint]) -> Result<(), String> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|err| format!("failed to create {}: {err}", path.display()))?;

    let mut header = vec![TIME_COLUMN.to_string()];
    header.extend(columns.iter().cloned());
    writer
        .write_record(&header)
        .map_err(|err| format!("failed to write header: {err}"))?;

    for point in points {
        let mut record = vec![point.timestamp.to_string()];
        record.extend(point.values.iter().map(|value| format_cell(*value)));
        writer
            .write_record(&record)
            .map_err(|err| format!("failed to write series row: {err}"))?;
    }

    writer
        .flush()
        .map_err(|err| format!("failed to flush {}: {err}", path.display()))
}

fn write_combined_csv(path: &Path, frame: &CombinedFrame) -> Result<(), String> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|err| format!("failed to create {}: {err}", path.display()))?;

    let mut header = vec![TIME_COLUMN.to_string()];
    header.extend(frame.columns.iter().cloned());
    writer
        .write_record(&header)
        .map_err(|err| format!("failed to write header: {err}"))?;

    for (row, timestamp) in frame.cells.iter().zip(frame.timestamps.iter()) {
        let mut record = vec![timestamp.to_string()];
        record.extend(row.iter().map(|value| format_cell(*value)));
        writer
            .write_record(&record)
            .map_err(|err| format!("failed to write combined row: {err}"))?;
    }

    writer
        .flush()
        .map_err(|err| format!("failed to flush {}: {err}", path.display()))
}

fn read_combined_csv(path: &Path) -> Result<CombinedFrame, String> {
    let file = File::open(path)
        .map_err(|err| format!("failed to open combined CSV {}: {}", path.display(), err))?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader
        .headers()
        .map_err(|err| format!("failed to read combined CSV headers: {err}"))?
        .clone();
    if headers.get(0) != Some(TIME_COLUMN) {
        return Err(format!(
            "combined CSV {} must be keyed by {TIME_COLUMN}",
            path.display()
        ));
    }
    let columns: Vec<String> = headers.iter().skip(1).map(|h| h.to_string()).collect();

    let mut timestamps = Vec::new();
    let mut cells = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|err| format!("failed to parse combined CSV row: {err}"))?;
        let timestamp: i64 = record
            .get(0)
            .unwrap_or("")
            .parse()
            .map_err(|_| format!("invalid timestamp in combined CSV: {:?}", record.get(0)))?;

        let mut row = Vec::with_capacity(columns.len());
        for idx in 0..columns.len() {
            let raw = record.get(idx + 1).unwrap_or("").trim();
            if raw.is_empty() {
                row.push(None);
            } else {
                let value: f64 = raw
                    .parse()
                    .map_err(|_| format!("invalid value '{raw}' in column {}", columns[idx]))?;
                row.push(Some(value));
            }
        }
        timestamps.push(timestamp);
        cells.push(row);
    }

    Ok(CombinedFrame {
        columns,
        timestamps,
        cells,
    })
}
