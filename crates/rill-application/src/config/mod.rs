use rill_domain::value_objects::schema::ColumnSpec;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub run: RunConfig,
    pub paths: PathsConfig,
    pub fill: FillConfig,
    pub attributes: AttributesConfig,
    pub window: WindowConfig,
    pub split: SplitConfig,
}

#[derive(Debug, Deserialize)]
pub struct RunConfig {
    pub run_id: String,
}

#[derive(Debug, Deserialize)]
pub struct PathsConfig {
    pub gauge_file: String,
    pub weather_dir: String,
    pub out_dir: String,
    /// Optional previously combined CSV; when it exists, `prepare` loads it
    /// instead of re-running the merge.
    pub preprocessed: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FillConfig {
    pub strategy: String,
}

#[derive(Debug, Deserialize)]
pub struct AttributesConfig {
    pub target: String,
    pub primary: Vec<ColumnSpec>,
    pub secondary: Vec<ColumnSpec>,
}

#[derive(Debug, Deserialize)]
pub struct WindowConfig {
    pub lag: usize,
    pub lead: usize,
}

#[derive(Debug, Deserialize)]
pub struct SplitConfig {
    pub train_fraction: f64,
}

pub fn load_config(path: &Path) -> Result<Config, String> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("failed to read config {}: {}", path.display(), err))?;
    toml::from_str(&contents)
        .map_err(|err| format!("failed to parse TOML {}: {}", path.display(), err))
}
