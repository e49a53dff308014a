#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use climate_api::db::models::{ActivityCount, Observation, ObservationFilter, Station};
use climate_api::db::ObservationStore;
use climate_api::error::DataSourceError;
use mockall::mock;

mock! {
    pub Store {}

    #[async_trait]
    impl ObservationStore for Store {
        async fn max_observation_date(&self) -> Result<Option<NaiveDate>, DataSourceError>;
        async fn count_observations_by_station(&self) -> Result<Vec<ActivityCount>, DataSourceError>;
        async fn fetch_observations(
            &self,
            filter: &ObservationFilter,
        ) -> Result<Vec<Observation>, DataSourceError>;
        async fn fetch_all_stations(&self) -> Result<Vec<Station>, DataSourceError>;
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid test date")
}

pub fn observation(
    id: i64,
    station_code: &str,
    day: &str,
    precipitation: Option<f64>,
    temperature: f64,
) -> Observation {
    Observation {
        id,
        station_code: station_code.to_string(),
        date: date(day),
        precipitation,
        temperature,
    }
}

pub fn station(id: i64, code: &str, name: &str) -> Station {
    Station {
        id,
        code: code.to_string(),
        name: name.to_string(),
        latitude: 21.2716,
        longitude: -157.8168,
        elevation: 3.0,
    }
}

pub fn unavailable() -> DataSourceError {
    DataSourceError::Database(sqlx::Error::PoolTimedOut)
}
