use crate::config::AttributesConfig;
use rill_domain::services::impute::FillStrategy;
use rill_domain::value_objects::schema::Schema;

pub fn resolve_fill_strategy(value: &str) -> Result<FillStrategy, String> {
    match value.trim().to_lowercase().as_str() {
        "omit" | "none" => Ok(FillStrategy::Omit),
        "locf" | "ffill" | "forward_fill" | "forward-fill" => Ok(FillStrategy::Locf),
        "interpolate" | "linear" => Ok(FillStrategy::Interpolate),
        _ => Err(format!(
            "fill strategy must be: omit | locf | interpolate (got '{value}')"
        )),
    }
}

pub fn schema_from_config(attributes: &AttributesConfig) -> Result<Schema, String> {
    Schema::new(
        attributes.primary.clone(),
        attributes.secondary.clone(),
        &attributes.target,
    )
}

pub fn combined_file_name(strategy: FillStrategy) -> String {
    format!("combined_{}.csv", strategy.file_suffix())
}

pub fn rmse(truth: &[f64], predicted: &[f64]) -> f64 {
    if truth.is_empty() || truth.len() != predicted.len() {
        return f64::NAN;
    }
    let sum_sq: f64 = truth
        .iter()
        .zip(predicted.iter())
        .map(|(a, b)| (a - b) * (a - b))
        .sum();
    (sum_sq / truth.len() as f64).sqrt()
}

pub fn ts_rfc3339(ts: i64) -> String {
    chrono::DateTime::<chrono::Utc>::from_timestamp(ts, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{combined_file_name, resolve_fill_strategy, rmse};
    use rill_domain::services::impute::FillStrategy;

    #[test]
    fn resolve_fill_strategy_accepts_synonyms() {
        assert_eq!(resolve_fill_strategy("omit").unwrap(), FillStrategy::Omit);
        assert_eq!(resolve_fill_strategy("none").unwrap(), FillStrategy::Omit);
        assert_eq!(resolve_fill_strategy("LOCF").unwrap(), FillStrategy::Locf);
        assert_eq!(
            resolve_fill_strategy("forward_fill").unwrap(),
            FillStrategy::Locf
        );
        assert_eq!(
            resolve_fill_strategy("interpolate").unwrap(),
            FillStrategy::Interpolate
        );
        assert!(resolve_fill_strategy("bogus").is_err());
    }

    #[test]
    fn combined_file_name_encodes_strategy() {
        assert_eq!(combined_file_name(FillStrategy::Locf), "combined_locf.csv");
        assert_eq!(
            combined_file_name(FillStrategy::Interpolate),
            "combined_interpolate.csv"
        );
    }

    #[test]
    fn rmse_of_exact_prediction_is_zero() {
        let truth = [1.0, 2.0, 3.0];
        assert_eq!(rmse(&truth, &truth), 0.0);
    }

    #[test]
    fn rmse_matches_hand_computation() {
        let truth = [0.0, 0.0];
        let predicted = [3.0, 4.0];
        let expected = ((9.0 + 16.0) / 2.0f64).sqrt();
        assert!((rmse(&truth, &predicted) - expected).abs() < 1e-12);
    }

    #[test]
    fn rmse_of_mismatched_lengths_is_nan() {
        assert!(rmse(&[1.0], &[1.0, 2.0]).is_nan());
        assert!(rmse(&[], &[]).is_nan());
    }
}
