use rill_domain::repositories::forecaster::{Forecaster, TrainingTensors};

/// Baseline adapter for the model port: predicts that the target holds its
/// most recent observed value for every lead step. Useful as the default
/// model and as a floor any real sequence model has to beat.
#[derive(Debug, Default, Clone, Copy)]
pub struct PersistenceForecaster;

impl PersistenceForecaster {
    pub fn new() -> Self {
        Self
    }
}

impl Forecaster for PersistenceForecaster {
    fn fit_predict(&mut self, tensors: &TrainingTensors) -> Result<Vec<Vec<f64>>, String> {
        let width = tensors.lag * tensors.n_attributes;
        if width == 0 {
            return Err("tensors have zero feature width".to_string());
        }

        let mut predictions = Vec::with_capacity(tensors.test_features.len());
        for features in &tensors.test_features {
            if features.len() != width {
                return Err(format!(
                    "feature row width mismatch: expected {width}, got {}",
                    features.len()
                ));
            }
            // Target attribute is the last column of the newest lag step.
            let last_observed = features[width - 1];
            predictions.push(vec![last_observed; tensors.lead]);
        }

        Ok(predictions)
    }
}

#[cfg(test)]
mod tests {
    use super::PersistenceForecaster;
    use rill_domain::repositories::forecaster::{Forecaster, TrainingTensors};

    #[test]
    fn repeats_last_observed_target_per_lead_step() {
        let tensors = TrainingTensors {
            lag: 2,
            lead: 2,
            n_attributes: 2,
            train_features: vec![],
            train_targets: vec![],
            test_features: vec![vec![0.1, 0.5, 0.2, 0.8]],
            test_targets: vec![vec![0.9, 1.0]],
        };

        let mut forecaster = PersistenceForecaster::new();
        let predictions = forecaster.fit_predict(&tensors).expect("predict");
        assert_eq!(predictions, vec![vec![0.8, 0.8]]);
    }

    #[test]
    fn rejects_mismatched_feature_width() {
        let tensors = TrainingTensors {
            lag: 1,
            lead: 1,
            n_attributes: 2,
            train_features: vec![],
            train_targets: vec![],
            test_features: vec![vec![0.1]],
            test_targets: vec![vec![0.2]],
        };

        let mut forecaster = PersistenceForecaster::new();
        let err = forecaster.fit_predict(&tensors).expect_err("width");
        assert!(err.contains("width mismatch"));
    }
}
