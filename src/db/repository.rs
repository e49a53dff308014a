use crate::db::models::{ActivityCount, Observation, ObservationFilter, Station};
use crate::db::store::ObservationStore;
use crate::error::DataSourceError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

const OBSERVATION_COLUMNS: &str = "SELECT id, station AS station_code, date, \
     CAST(prcp AS REAL) AS precipitation, CAST(tobs AS REAL) AS temperature \
     FROM measurement";

/// SQLite-backed store over the `station` and `measurement` tables.
///
/// The schema is owned by whoever built the database file; nothing here writes to it.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn count_stations(&self) -> Result<i64, DataSourceError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM station")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl ObservationStore for Repository {
    async fn max_observation_date(&self) -> Result<Option<NaiveDate>, DataSourceError> {
        let latest = sqlx::query_scalar::<_, Option<String>>("SELECT MAX(date) FROM measurement")
            .fetch_one(&self.pool)
            .await?;

        latest
            .map(|raw| {
                NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|e| {
                    DataSourceError::Corrupt(format!("stored date '{}' is invalid: {}", raw, e))
                })
            })
            .transpose()
    }

    async fn count_observations_by_station(&self) -> Result<Vec<ActivityCount>, DataSourceError> {
        let counts = sqlx::query_as::<_, ActivityCount>(
            "SELECT station AS station_code, COUNT(*) AS observations \
             FROM measurement GROUP BY station",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }

    async fn fetch_observations(
        &self,
        filter: &ObservationFilter,
    ) -> Result<Vec<Observation>, DataSourceError> {
        let mut query_builder = QueryBuilder::<Sqlite>::new(OBSERVATION_COLUMNS);

        query_builder.push(" WHERE date >= ").push_bind(filter.from);
        if let Some(to) = filter.to {
            query_builder.push(" AND date <= ").push_bind(to);
        }
        if let Some(station_code) = &filter.station_code {
            query_builder
                .push(" AND station = ")
                .push_bind(station_code.as_str());
        }
        query_builder.push(" ORDER BY date, id");

        let observations = query_builder
            .build_query_as::<Observation>()
            .fetch_all(&self.pool)
            .await?;

        for observation in &observations {
            observation.check_finite()?;
        }

        debug!(
            "Fetched {} observations from {} to {:?} (station {:?})",
            observations.len(),
            filter.from,
            filter.to,
            filter.station_code
        );

        Ok(observations)
    }

    async fn fetch_all_stations(&self) -> Result<Vec<Station>, DataSourceError> {
        let stations = sqlx::query_as::<_, Station>(
            "SELECT id, station AS code, name, \
             CAST(latitude AS REAL) AS latitude, \
             CAST(longitude AS REAL) AS longitude, \
             CAST(elevation AS REAL) AS elevation \
             FROM station ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(stations)
    }
}
