use crate::infra;
use rill_application::config::load_config;
use rill_application::preparation::run_prepare;
use rill_application::shared::resolve_fill_strategy;
use std::path::PathBuf;

pub fn run(config_path: PathBuf, out: Option<PathBuf>, fill: Option<String>) -> Result<(), String> {
    let config = load_config(&config_path)?;
    let fill_override = match fill {
        Some(value) => Some(resolve_fill_strategy(&value)?),
        None => None,
    };

    let gauge = infra::gauge_repository();
    let weather = infra::weather_repository();
    let artifacts = infra::artifacts();

    let combined_path = run_prepare(
        &config,
        out,
        fill_override,
        &gauge,
        &weather,
        &artifacts,
        &artifacts,
    )?;
    println!("combined table: {}", combined_path.display());
    Ok(())
}
