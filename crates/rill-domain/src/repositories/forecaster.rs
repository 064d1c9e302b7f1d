/// Normalized training/evaluation tensors handed to the external model.
/// Feature rows are row-major `lag * n_attributes` wide (oldest lag first);
/// target rows are `lead` wide (earliest lead first). The 3-D
/// `[samples][lag][attributes]` view lives on `SupervisedFrame`.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingTensors {
    pub lag: usize,
    pub lead: usize,
    pub n_attributes: usize,
    pub train_features: Vec<Vec<f64>>,
    pub train_targets: Vec<Vec<f64>>,
    pub test_features: Vec<Vec<f64>>,
    pub test_targets: Vec<Vec<f64>>,
}

/// External sequence-model port. `fit_predict` trains on the train block and
/// returns normalized predictions for the test block, one `lead`-wide row
/// per test sample. The core only prepares tensors and un-normalizes the
/// result; everything inside the model is out of scope.
pub trait Forecaster {
    fn fit_predict(&mut self, tensors: &TrainingTensors) -> Result<Vec<Vec<f64>>, String>;
}
