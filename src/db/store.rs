use crate::db::models::{ActivityCount, Observation, ObservationFilter, Station};
use crate::error::DataSourceError;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Read-only access to the station and observation tables.
///
/// Implementations must be safe to share between concurrent requests.
#[async_trait]
pub trait ObservationStore: Send + Sync {
    /// Latest observation date, or `None` when there are no observations.
    async fn max_observation_date(&self) -> Result<Option<NaiveDate>, DataSourceError>;

    async fn count_observations_by_station(&self) -> Result<Vec<ActivityCount>, DataSourceError>;

    /// Observations matching `filter`, ordered by date.
    async fn fetch_observations(
        &self,
        filter: &ObservationFilter,
    ) -> Result<Vec<Observation>, DataSourceError>;

    async fn fetch_all_stations(&self) -> Result<Vec<Station>, DataSourceError>;
}
