use chrono::{FixedOffset, NaiveDateTime};
use rill_domain::repositories::gauge::{GaugeQuery, GaugeReport, GaugeRepository};
use rill_domain::value_objects::series::SeriesPoint;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Mapping from an RDB parameter column code to the attribute name the rest
/// of the pipeline knows it by.
#[derive(Debug, Clone)]
pub struct RdbField {
    pub code: String,
    pub attribute: String,
}

impl RdbField {
    pub fn new(code: &str, attribute: &str) -> Self {
        Self {
            code: code.to_string(),
            attribute: attribute.to_string(),
        }
    }
}

const DATETIME_COLUMN: &str = "datetime";
const TZ_COLUMN: &str = "tz_cd";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Reads USGS NWIS RDB gauge files: tab-delimited, `#` comment lines, a
/// header row naming the columns, then a column-width row that is skipped.
/// Rows that cannot be keyed (bad datetime, unknown zone code, short line)
/// are counted and skipped so one bad row never aborts a load.
#[derive(Debug, Clone)]
pub struct RdbGaugeRepository {
    fields: Vec<RdbField>,
}

impl RdbGaugeRepository {
    pub fn new(fields: Vec<RdbField>) -> Self {
        Self { fields }
    }

    /// The standard NWIS parameter codes for the site this pipeline was
    /// built around.
    pub fn usgs_default() -> Self {
        Self::new(vec![
            RdbField::new("121492_00065", "gage_height"),
            RdbField::new("121493_00060", "discharge"),
            RdbField::new("121495_63680", "turbidity"),
            RdbField::new("121496_00045", "precip"),
            RdbField::new("243576_00095", "specific_conductance"),
            RdbField::new("247057_00010", "water_temp"),
        ])
    }

    fn code_for(&self, attribute: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.attribute == attribute)
            .map(|field| field.code.as_str())
    }
}

impl GaugeRepository for RdbGaugeRepository {
    fn load_gauge(&self, query: &GaugeQuery) -> Result<(Vec<SeriesPoint>, GaugeReport), String> {
        let contents = fs::read_to_string(&query.path).map_err(|err| {
            format!(
                "failed to read gauge file {}: {}",
                query.path.display(),
                err
            )
        })?;

        let mut lines = contents
            .lines()
            .filter(|line| !line.starts_with('#') && !line.trim().is_empty());

        let header = lines
            .next()
            .ok_or_else(|| format!("gauge file has no header: {}", query.path.display()))?;
        let header: Vec<&str> = header.split('\t').map(str::trim).collect();
        // The row after the header carries RDB column widths ("5s", "20d").
        lines.next();

        let datetime_idx = column_index(&header, DATETIME_COLUMN, &query.path)?;
        let tz_idx = column_index(&header, TZ_COLUMN, &query.path)?;
        let mut value_indices = Vec::with_capacity(query.attributes.len());
        for attribute in &query.attributes {
            let code = self.code_for(attribute).ok_or_else(|| {
                format!("no RDB column mapped for gauge attribute: {attribute}")
            })?;
            value_indices.push(column_index(&header, code, &query.path)?);
        }

        let mut raw_by_ts: BTreeMap<i64, Vec<Option<f64>>> = BTreeMap::new();
        let mut report = GaugeReport::default();
        let mut last_ts: Option<i64> = None;
        let needed = value_indices
            .iter()
            .copied()
            .max()
            .unwrap_or(0)
            .max(datetime_idx)
            .max(tz_idx);

        for line in lines {
            let cells: Vec<&str> = line.split('\t').map(str::trim).collect();
            if cells.len() <= needed {
                report.skipped_rows += 1;
                continue;
            }

            let timestamp = match to_epoch(cells[datetime_idx], cells[tz_idx]) {
                Some(ts) => ts,
                None => {
                    report.skipped_rows += 1;
                    continue;
                }
            };

            if report.first_timestamp.is_none() {
                report.first_timestamp = Some(timestamp);
            }
            if let Some(prev) = last_ts {
                if timestamp < prev {
                    report.out_of_order += 1;
                }
            }
            last_ts = Some(timestamp);
            report.last_timestamp = Some(timestamp);

            let mut values = Vec::with_capacity(value_indices.len());
            for &idx in &value_indices {
                let raw = cells[idx];
                if raw.is_empty() {
                    report.missing_values += 1;
                    values.push(None);
                    continue;
                }
                match raw.parse::<f64>() {
                    Ok(value) => values.push(Some(value)),
                    Err(_) => {
                        // Sensor status markers ("Ice", "Eqp") read as gaps.
                        report.missing_values += 1;
                        values.push(None);
                    }
                }
            }

            if raw_by_ts.insert(timestamp, values).is_some() {
                report.duplicates += 1;
            }
        }

        let points: Vec<SeriesPoint> = raw_by_ts
            .into_iter()
            .map(|(timestamp, values)| SeriesPoint::new(timestamp, values))
            .collect();
        report.rows = points.len();

        Ok((points, report))
    }
}

fn column_index(header: &[&str], name: &str, path: &Path) -> Result<usize, String> {
    header
        .iter()
        .position(|column| *column == name)
        .ok_or_else(|| format!("gauge file {} missing column: {name}", path.display()))
}

/// Collapse a local datetime and its zone code into epoch seconds. The NWIS
/// feeds use US zone abbreviations next to each reading.
fn to_epoch(datetime: &str, tz_code: &str) -> Option<i64> {
    let naive = NaiveDateTime::parse_from_str(datetime, DATETIME_FORMAT).ok()?;
    let offset_seconds = match tz_code {
        "UTC" | "GMT" => 0,
        "EST" | "CDT" => -5 * 3600,
        "EDT" => -4 * 3600,
        "CST" | "MDT" => -6 * 3600,
        "MST" | "PDT" => -7 * 3600,
        "PST" => -8 * 3600,
        _ => return None,
    };
    let offset = FixedOffset::east_opt(offset_seconds)?;
    naive
        .and_local_timezone(offset)
        .single()
        .map(|dt| dt.timestamp())
}
