use crate::config::Config;
use crate::shared::{
    combined_file_name, resolve_fill_strategy, rmse, schema_from_config, ts_rfc3339,
};
use rill_domain::repositories::artifacts::{ArtifactReader, ArtifactWriter};
use rill_domain::repositories::forecaster::{Forecaster, TrainingTensors};
use rill_domain::services::scale::MinMaxScaler;
use rill_domain::services::window::build_supervised;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, info_span};

#[derive(Debug, Clone, PartialEq)]
pub struct FitOutcome {
    pub rmse: f64,
    pub combined_rows: usize,
    pub modeled_rows: usize,
    pub windowed_rows: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub summary_path: PathBuf,
}

/// Read a prepared combined table, normalize and window it, hand tensors to
/// the forecaster, and score the un-normalized predictions.
pub fn run_fit(
    config: &Config,
    out: Option<PathBuf>,
    lag_override: Option<usize>,
    lead_override: Option<usize>,
    reader: &dyn ArtifactReader,
    writer: &dyn ArtifactWriter,
    forecaster: &mut dyn Forecaster,
) -> Result<FitOutcome, String> {
    let lag = lag_override.unwrap_or(config.window.lag);
    let lead = lead_override.unwrap_or(config.window.lead);
    let _span = info_span!("run_fit", run_id = %config.run.run_id, lag, lead).entered();

    let schema = schema_from_config(&config.attributes)?;
    let strategy = resolve_fill_strategy(&config.fill.strategy)?;
    let data_dir = PathBuf::from(&config.paths.out_dir);
    let combined_path = data_dir.join(combined_file_name(strategy));

    let stage_start = Instant::now();
    let combined = reader.read_combined_csv(&combined_path)?;
    metrics::histogram!("rill.fit.load_combined_ms")
        .record(stage_start.elapsed().as_millis() as f64);

    let model_order = schema.model_order();
    let dense = combined.drop_missing(&model_order)?;
    info!(
        combined_rows = combined.len(),
        modeled_rows = dense.len(),
        dropped = combined.len() - dense.len(),
        "incomplete rows dropped"
    );

    let scaler = MinMaxScaler::fit(&dense).map_err(|err| err.to_string())?;
    let scaled = scaler.transform(&dense).map_err(|err| err.to_string())?;

    let stage_start = Instant::now();
    let supervised =
        build_supervised(&scaled, lag, lead, &schema.target).map_err(|err| err.to_string())?;
    metrics::histogram!("rill.fit.window_ms").record(stage_start.elapsed().as_millis() as f64);

    let (train, test) = supervised.split_train_test(config.split.train_fraction);
    if train.is_empty() || test.is_empty() {
        return Err(format!(
            "split produced an empty partition: windowed_rows={} train_fraction={}",
            supervised.len(),
            config.split.train_fraction
        ));
    }

    let tensors = TrainingTensors {
        lag,
        lead,
        n_attributes: supervised.n_attributes,
        train_features: train.feature_rows(),
        train_targets: train.target_rows(),
        test_features: test.feature_rows(),
        test_targets: test.target_rows(),
    };

    let stage_start = Instant::now();
    let predictions = forecaster.fit_predict(&tensors)?;
    metrics::histogram!("rill.fit.forecast_ms").record(stage_start.elapsed().as_millis() as f64);
    if predictions.len() != tensors.test_features.len() {
        return Err(format!(
            "forecaster returned {} predictions for {} test samples",
            predictions.len(),
            tensors.test_features.len()
        ));
    }

    // Invert one lead column at a time: each column is a batch of target
    // scalars re-attached to its row's feature context.
    let mut inverted_truth = Vec::with_capacity(test.len() * lead);
    let mut inverted_predicted = Vec::with_capacity(test.len() * lead);
    for step in 0..lead {
        let predicted_column: Vec<f64> = predictions
            .iter()
            .map(|row| row.get(step).copied().ok_or_else(|| {
                format!("forecaster prediction narrower than lead={lead}")
            }))
            .collect::<Result<_, String>>()?;
        let truth_column: Vec<f64> = tensors.test_targets.iter().map(|row| row[step]).collect();

        inverted_predicted.extend(
            scaler
                .invert_target(&predicted_column, &tensors.test_features)
                .map_err(|err| err.to_string())?,
        );
        inverted_truth.extend(
            scaler
                .invert_target(&truth_column, &tensors.test_features)
                .map_err(|err| err.to_string())?,
        );
    }

    let score = rmse(&inverted_truth, &inverted_predicted);
    metrics::gauge!("rill.fit.rmse").set(score);
    info!(rmse = score, test_rows = test.len(), "fit complete");

    let out_dir = out.unwrap_or(data_dir);
    writer.ensure_dir(&out_dir)?;
    let summary_path = out_dir.join("summary.json");
    let summary = serde_json::json!({
        "run_id": config.run.run_id,
        "fill": strategy.file_suffix(),
        "lag": lag,
        "lead": lead,
        "combined_rows": combined.len(),
        "modeled_rows": dense.len(),
        "windowed_rows": supervised.len(),
        "train_rows": train.len(),
        "test_rows": test.len(),
        "data_start": dense.timestamps.first().map(|&ts| ts_rfc3339(ts)),
        "data_end": dense.timestamps.last().map(|&ts| ts_rfc3339(ts)),
        "rmse": score,
    });
    writer.write_summary_json(&summary_path, &summary)?;

    Ok(FitOutcome {
        rmse: score,
        combined_rows: combined.len(),
        modeled_rows: dense.len(),
        windowed_rows: supervised.len(),
        train_rows: train.len(),
        test_rows: test.len(),
        summary_path,
    })
}
