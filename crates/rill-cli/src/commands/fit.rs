use crate::infra;
use rill_application::config::load_config;
use rill_application::training::run_fit;
use std::path::PathBuf;

pub fn run(
    config_path: PathBuf,
    out: Option<PathBuf>,
    lag: Option<usize>,
    lead: Option<usize>,
) -> Result<(), String> {
    let config = load_config(&config_path)?;
    let artifacts = infra::artifacts();
    let mut forecaster = infra::forecaster();

    let outcome = run_fit(
        &config,
        out,
        lag,
        lead,
        &artifacts,
        &artifacts,
        &mut forecaster,
    )?;

    println!(
        "fit: windowed_rows={} train={} test={}",
        outcome.windowed_rows, outcome.train_rows, outcome.test_rows
    );
    println!("test rmse: {:.3}", outcome.rmse);
    println!("summary: {}", outcome.summary_path.display());
    Ok(())
}
