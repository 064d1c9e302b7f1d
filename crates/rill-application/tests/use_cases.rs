use rill_application::config::load_config;
use rill_application::preparation::run_prepare;
use rill_application::training::run_fit;
use rill_domain::repositories::artifacts::ArtifactReader;
use rill_domain::services::impute::FillStrategy;
use rill_infrastructure::artifacts::FilesystemArtifacts;
use rill_infrastructure::forecasting::PersistenceForecaster;
use rill_infrastructure::gauge_data::RdbGaugeRepository;
use rill_infrastructure::weather_data::JsonDirWeatherRepository;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

// 2018-06-24 00:00 EDT.
const BASE_EPOCH: i64 = 1_529_812_800;

fn unique_tmp_dir(name: &str) -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let dir = std::env::temp_dir().join(format!("rill_{name}_{}_{}", std::process::id(), now));
    fs::create_dir_all(&dir).expect("create tmp dir");
    dir
}

fn write_gauge_file(path: &Path, rows: usize) {
    let mut contents = String::from(
        "# USGS water data\n\
         agency_cd\tsite_no\tdatetime\ttz_cd\t121496_00045\t121496_00045_cd\t247057_00010\t247057_00010_cd\n\
         5s\t15s\t20d\t6s\t14n\t10s\t14n\t10s\n",
    );
    for i in 0..rows {
        let hour = i / 4;
        let minute = (i % 4) * 15;
        contents.push_str(&format!(
            "USGS\t01474500\t2018-06-24 {hour:02}:{minute:02}\tEDT\t{:.2}\tA\t{:.1}\tA\n",
            0.01 * i as f64,
            20.0 + 0.1 * i as f64,
        ));
    }
    fs::write(path, contents).expect("write gauge file");
}

fn write_weather_dir(dir: &Path) {
    fs::create_dir_all(dir).expect("create weather dir");
    let pages = [
        (0i64, 70.0, 0.0),
        (3_600, 72.0, 1.0),
        (7_200, 75.0, 2.0),
        (10_800, 71.0, 3.0),
    ];
    for (idx, (offset, temp, uv)) in pages.iter().enumerate() {
        let body = format!(
            r#"{{"observations": [{{"valid_time_gmt": {}, "temp": {temp}, "uv_index": {uv}}}]}}"#,
            BASE_EPOCH + offset
        );
        fs::write(dir.join(format!("page_{idx}.json")), body).expect("write weather page");
    }
}

fn sample_config(tmp_dir: &Path) -> PathBuf {
    let gauge_path = tmp_dir.join("nwis.waterdata.usgs.gov.txt");
    let weather_dir = tmp_dir.join("phl.historical.weather");
    let out_dir = tmp_dir.join("processed");
    write_gauge_file(&gauge_path, 16);
    write_weather_dir(&weather_dir);

    let config_path = tmp_dir.join("config.toml");
    let toml_contents = format!(
        r#"
[run]
run_id = "use_case_run"

[paths]
gauge_file = "{}"
weather_dir = "{}"
out_dir = "{}"

[fill]
strategy = "locf"

[attributes]
target = "water_temp"
primary = [
  {{ name = "precip" }},
  {{ name = "water_temp" }},
]
secondary = [
  {{ name = "temp", integer = true }},
  {{ name = "uv_index", integer = true }},
]

[window]
lag = 1
lead = 1

[split]
train_fraction = 0.67
"#,
        gauge_path.display(),
        weather_dir.display(),
        out_dir.display(),
    );
    fs::write(&config_path, toml_contents).expect("write config");
    config_path
}

#[test]
fn prepare_then_fit_round_trip() {
    let tmp_dir = unique_tmp_dir("use_cases");
    let config = load_config(&sample_config(&tmp_dir)).expect("config");

    let gauge = RdbGaugeRepository::usgs_default();
    let weather = JsonDirWeatherRepository::new();
    let artifacts = FilesystemArtifacts::new();

    let combined_path = run_prepare(
        &config, None, None, &gauge, &weather, &artifacts, &artifacts,
    )
    .expect("prepare");

    assert!(combined_path.ends_with("combined_locf.csv"));
    assert!(combined_path.exists());
    assert!(tmp_dir.join("processed/gauge.csv").exists());
    assert!(tmp_dir.join("processed/weather.csv").exists());

    let combined = artifacts
        .read_combined_csv(&combined_path)
        .expect("read combined");
    assert_eq!(combined.len(), 16);
    assert_eq!(
        combined.columns,
        vec!["precip", "water_temp", "temp", "uv_index"]
    );
    // Forward fill leaves no gaps after the first weather assignment.
    assert_eq!(combined.missing_cells(), 0);

    let mut forecaster = PersistenceForecaster::new();
    let outcome = run_fit(
        &config,
        None,
        None,
        None,
        &artifacts,
        &artifacts,
        &mut forecaster,
    )
    .expect("fit");

    assert_eq!(outcome.combined_rows, 16);
    assert_eq!(outcome.modeled_rows, 16);
    assert_eq!(outcome.windowed_rows, 15);
    assert_eq!(outcome.train_rows, 10);
    assert_eq!(outcome.test_rows, 5);
    assert!(outcome.rmse.is_finite());
    assert!(outcome.rmse >= 0.0);
    assert!(outcome.summary_path.exists());
}

#[test]
fn prepare_honors_fill_override_in_file_name() {
    let tmp_dir = unique_tmp_dir("fill_override");
    let config = load_config(&sample_config(&tmp_dir)).expect("config");

    let gauge = RdbGaugeRepository::usgs_default();
    let weather = JsonDirWeatherRepository::new();
    let artifacts = FilesystemArtifacts::new();

    let combined_path = run_prepare(
        &config,
        None,
        Some(FillStrategy::Interpolate),
        &gauge,
        &weather,
        &artifacts,
        &artifacts,
    )
    .expect("prepare");

    assert!(combined_path.ends_with("combined_interpolate.csv"));
    assert!(combined_path.exists());
}

#[test]
fn prepare_reuses_preprocessed_combined_table() {
    let tmp_dir = unique_tmp_dir("preprocessed");
    let config_path = sample_config(&tmp_dir);
    let config = load_config(&config_path).expect("config");

    let gauge = RdbGaugeRepository::usgs_default();
    let weather = JsonDirWeatherRepository::new();
    let artifacts = FilesystemArtifacts::new();

    let first = run_prepare(
        &config, None, None, &gauge, &weather, &artifacts, &artifacts,
    )
    .expect("first prepare");

    // Point a second run at the combined table and delete the raw inputs:
    // the merge must not be needed again.
    let toml_contents = fs::read_to_string(&config_path).expect("read config");
    let toml_contents = toml_contents.replace(
        "[fill]",
        &format!("preprocessed = \"{}\"\n\n[fill]", first.display()),
    );
    fs::write(&config_path, toml_contents).expect("rewrite config");
    fs::remove_file(tmp_dir.join("nwis.waterdata.usgs.gov.txt")).expect("remove gauge");

    let config = load_config(&config_path).expect("config");
    let second = run_prepare(
        &config, None, None, &gauge, &weather, &artifacts, &artifacts,
    )
    .expect("second prepare");
    assert!(second.exists());
}
