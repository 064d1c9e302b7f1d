use rill_domain::repositories::weather::{WeatherQuery, WeatherReport, WeatherRepository};
use rill_domain::value_objects::series::SeriesPoint;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

const TIMESTAMP_FIELD: &str = "valid_time_gmt";

#[derive(Debug, Deserialize)]
struct ObservationFile {
    observations: Vec<serde_json::Value>,
}

/// Reads a directory of historical-weather JSON pages (one file per fetched
/// window, each holding an `observations` array keyed by `valid_time_gmt`).
/// A file that cannot be read or parsed is logged and skipped; losing one
/// page must not abort the merge.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonDirWeatherRepository;

impl JsonDirWeatherRepository {
    pub fn new() -> Self {
        Self
    }
}

impl WeatherRepository for JsonDirWeatherRepository {
    fn load_observations(
        &self,
        query: &WeatherQuery,
    ) -> Result<(Vec<SeriesPoint>, WeatherReport), String> {
        let entries = std::fs::read_dir(&query.dir).map_err(|err| {
            format!(
                "failed to read weather dir {}: {}",
                query.dir.display(),
                err
            )
        })?;

        let mut raw_by_ts: BTreeMap<i64, Vec<Option<f64>>> = BTreeMap::new();
        let mut report = WeatherReport::default();

        let mut paths: Vec<_> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("json"))
            .collect();
        paths.sort();

        for path in paths {
            match read_observation_file(&path, &query.attributes, &mut report) {
                Ok(points) => {
                    report.files_read += 1;
                    for (timestamp, values) in points {
                        if raw_by_ts.insert(timestamp, values).is_some() {
                            report.duplicates += 1;
                        }
                    }
                }
                Err(err) => {
                    tracing::warn!(file = %path.display(), error = %err, "skipping weather file");
                    report.files_skipped += 1;
                }
            }
        }

        let points: Vec<SeriesPoint> = raw_by_ts
            .into_iter()
            .map(|(timestamp, values)| SeriesPoint::new(timestamp, values))
            .collect();
        report.rows = points.len();
        report.first_timestamp = points.first().map(|p| p.timestamp);
        report.last_timestamp = points.last().map(|p| p.timestamp);

        Ok((points, report))
    }
}

fn read_observation_file(
    path: &Path,
    attributes: &[String],
    report: &mut WeatherReport,
) -> Result<Vec<(i64, Vec<Option<f64>>)>, String> {
    let file =
        File::open(path).map_err(|err| format!("failed to open: {err}"))?;
    let parsed: ObservationFile =
        serde_json::from_reader(file).map_err(|err| format!("failed to parse: {err}"))?;

    let mut rows = Vec::with_capacity(parsed.observations.len());
    for observation in &parsed.observations {
        let Some(object) = observation.as_object() else {
            return Err("observation is not an object".to_string());
        };
        let timestamp = object
            .get(TIMESTAMP_FIELD)
            .and_then(|v| v.as_i64())
            .ok_or_else(|| format!("observation missing {TIMESTAMP_FIELD}"))?;

        let mut values = Vec::with_capacity(attributes.len());
        for attribute in attributes {
            let value = object.get(attribute).and_then(|v| v.as_f64());
            if value.is_none() {
                report.missing_values += 1;
            }
            values.push(value);
        }
        rows.push((timestamp, values));
    }

    Ok(rows)
}
