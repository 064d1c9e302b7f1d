use rill_infrastructure::artifacts::FilesystemArtifacts;
use rill_infrastructure::forecasting::PersistenceForecaster;
use rill_infrastructure::gauge_data::RdbGaugeRepository;
use rill_infrastructure::weather_data::JsonDirWeatherRepository;

pub fn gauge_repository() -> RdbGaugeRepository {
    RdbGaugeRepository::usgs_default()
}

pub fn weather_repository() -> JsonDirWeatherRepository {
    JsonDirWeatherRepository::new()
}

pub fn artifacts() -> FilesystemArtifacts {
    FilesystemArtifacts::new()
}

pub fn forecaster() -> PersistenceForecaster {
    PersistenceForecaster::new()
}
