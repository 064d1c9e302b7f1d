use crate::config::Config;
use crate::shared::{combined_file_name, resolve_fill_strategy, schema_from_config};
use rill_domain::repositories::artifacts::{ArtifactReader, ArtifactWriter};
use rill_domain::repositories::gauge::{GaugeQuery, GaugeRepository};
use rill_domain::repositories::weather::{WeatherQuery, WeatherRepository};
use rill_domain::services::align::align;
use rill_domain::services::impute::{fill, FillStrategy};
use rill_domain::value_objects::frame::CombinedFrame;
use rill_domain::value_objects::schema::Schema;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, info_span};

/// Merge the gauge timeline and the weather stream into one imputed table
/// and write it as `combined_<strategy>.csv`. Returns the written path.
///
/// When `paths.preprocessed` names an existing combined CSV, the merge is
/// skipped and that table is imputed and re-written instead.
pub fn run_prepare(
    config: &Config,
    out: Option<PathBuf>,
    fill_override: Option<FillStrategy>,
    gauge: &dyn GaugeRepository,
    weather: &dyn WeatherRepository,
    writer: &dyn ArtifactWriter,
    reader: &dyn ArtifactReader,
) -> Result<PathBuf, String> {
    let _span = info_span!("run_prepare", run_id = %config.run.run_id).entered();

    let schema = schema_from_config(&config.attributes)?;
    let strategy = match fill_override {
        Some(strategy) => strategy,
        None => resolve_fill_strategy(&config.fill.strategy)?,
    };

    let out_dir = out.unwrap_or_else(|| PathBuf::from(&config.paths.out_dir));
    writer.ensure_dir(&out_dir)?;

    let mut combined = match preprocessed_path(config, reader) {
        Some(path) => load_preprocessed(&path, &schema, reader)?,
        None => combine_streams(config, &schema, gauge, weather, writer, &out_dir)?,
    };

    let fill_start = Instant::now();
    fill(&mut combined, strategy, &schema);
    metrics::histogram!("rill.prepare.fill_ms").record(fill_start.elapsed().as_millis() as f64);
    info!(
        strategy = strategy.file_suffix(),
        missing_after_fill = combined.missing_cells(),
        "imputation complete"
    );

    let combined_path = out_dir.join(combined_file_name(strategy));
    writer.write_combined_csv(&combined_path, &combined)?;
    info!(path = %combined_path.display(), rows = combined.len(), "combined table written");

    Ok(combined_path)
}

fn preprocessed_path(config: &Config, reader: &dyn ArtifactReader) -> Option<PathBuf> {
    let path = PathBuf::from(config.paths.preprocessed.as_deref()?);
    reader.exists(&path).then_some(path)
}

fn load_preprocessed(
    path: &Path,
    schema: &Schema,
    reader: &dyn ArtifactReader,
) -> Result<CombinedFrame, String> {
    let combined = reader.read_combined_csv(path)?;
    if combined.columns != schema.column_names() {
        return Err(format!(
            "preprocessed file {} columns {:?} do not match schema {:?}",
            path.display(),
            combined.columns,
            schema.column_names()
        ));
    }
    info!(path = %path.display(), rows = combined.len(), "using preprocessed combined table");
    Ok(combined)
}

fn combine_streams(
    config: &Config,
    schema: &Schema,
    gauge: &dyn GaugeRepository,
    weather: &dyn WeatherRepository,
    writer: &dyn ArtifactWriter,
    out_dir: &Path,
) -> Result<CombinedFrame, String> {
    let stage_start = Instant::now();
    let (gauge_points, gauge_report) = gauge.load_gauge(&GaugeQuery {
        path: PathBuf::from(&config.paths.gauge_file),
        attributes: schema.primary.iter().map(|c| c.name.clone()).collect(),
    })?;
    metrics::histogram!("rill.prepare.load_gauge_ms")
        .record(stage_start.elapsed().as_millis() as f64);
    info!(
        rows = gauge_report.rows,
        duplicates = gauge_report.duplicates,
        out_of_order = gauge_report.out_of_order,
        missing_values = gauge_report.missing_values,
        skipped_rows = gauge_report.skipped_rows,
        "gauge timeline loaded"
    );
    let gauge_columns: Vec<String> = schema.primary.iter().map(|c| c.name.clone()).collect();
    writer.write_series_csv(&out_dir.join("gauge.csv"), &gauge_columns, &gauge_points)?;

    let stage_start = Instant::now();
    let (weather_points, weather_report) = weather.load_observations(&WeatherQuery {
        dir: PathBuf::from(&config.paths.weather_dir),
        attributes: schema.secondary.iter().map(|c| c.name.clone()).collect(),
    })?;
    metrics::histogram!("rill.prepare.load_weather_ms")
        .record(stage_start.elapsed().as_millis() as f64);
    info!(
        rows = weather_report.rows,
        files_read = weather_report.files_read,
        files_skipped = weather_report.files_skipped,
        duplicates = weather_report.duplicates,
        missing_values = weather_report.missing_values,
        "weather stream loaded"
    );
    let weather_columns: Vec<String> = schema.secondary.iter().map(|c| c.name.clone()).collect();
    writer.write_series_csv(
        &out_dir.join("weather.csv"),
        &weather_columns,
        &weather_points,
    )?;

    let stage_start = Instant::now();
    let (combined, align_report) =
        align(&gauge_points, &weather_points, schema).map_err(|err| err.to_string())?;
    metrics::histogram!("rill.prepare.align_ms").record(stage_start.elapsed().as_millis() as f64);
    metrics::gauge!("rill.prepare.align.discarded")
        .set((align_report.discarded_before_cursor + align_report.discarded_after_exhaustion) as f64);
    info!(
        assigned = align_report.assigned,
        discarded_before_cursor = align_report.discarded_before_cursor,
        discarded_after_exhaustion = align_report.discarded_after_exhaustion,
        overwrites = align_report.overwrites,
        "streams aligned"
    );

    Ok(combined)
}
