use crate::infra;
use rill_application::config::load_config;
use rill_application::shared::schema_from_config;
use rill_domain::repositories::gauge::{GaugeQuery, GaugeRepository};
use rill_domain::repositories::weather::{WeatherQuery, WeatherRepository};
use std::path::PathBuf;

pub fn run(config_path: PathBuf) -> Result<(), String> {
    let config = load_config(&config_path)?;
    let schema = schema_from_config(&config.attributes)?;

    let gauge = infra::gauge_repository();
    let (_, gauge_report) = gauge.load_gauge(&GaugeQuery {
        path: PathBuf::from(&config.paths.gauge_file),
        attributes: schema.primary.iter().map(|c| c.name.clone()).collect(),
    })?;
    println!(
        "gauge report: rows={}, duplicates={}, out_of_order={}, missing_values={}, skipped_rows={}",
        gauge_report.rows,
        gauge_report.duplicates,
        gauge_report.out_of_order,
        gauge_report.missing_values,
        gauge_report.skipped_rows
    );

    let weather = infra::weather_repository();
    let (_, weather_report) = weather.load_observations(&WeatherQuery {
        dir: PathBuf::from(&config.paths.weather_dir),
        attributes: schema.secondary.iter().map(|c| c.name.clone()).collect(),
    })?;
    println!(
        "weather report: rows={}, files_read={}, files_skipped={}, duplicates={}, missing_values={}",
        weather_report.rows,
        weather_report.files_read,
        weather_report.files_skipped,
        weather_report.duplicates,
        weather_report.missing_values
    );

    Ok(())
}
