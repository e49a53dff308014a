use crate::activity::most_active_station;
use crate::dates::resolve_anchor_date;
use crate::db::models::{Observation, ObservationFilter, Station};
use crate::db::ObservationStore;
use crate::error::{QueryError, QueryResult};
use crate::precipitation::{group_by_date, PrecipitationByDate};
use crate::stats::{compute_stats, TemperatureStats};
use crate::validation::{self, DateRange};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Observations of the most active station over the last year of data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationObservations {
    pub station: String,
    pub observations: Vec<Observation>,
}

/// Temperature statistics together with the range they were computed over.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeStats {
    pub range: DateRange,
    pub station: Option<String>,
    pub stats: TemperatureStats,
}

/// Entry point for the request layer: answers the four climate queries.
#[derive(Clone)]
pub struct ClimateService {
    store: Arc<dyn ObservationStore>,
}

impl ClimateService {
    pub fn new(store: Arc<dyn ObservationStore>) -> Self {
        Self { store }
    }

    /// Precipitation readings from the last year of data, grouped by date.
    pub async fn precipitation_last_year(&self) -> QueryResult<PrecipitationByDate> {
        let anchor = resolve_anchor_date(self.store.as_ref())
            .await
            .inspect_err(|e| warn!("Failed to resolve anchor date: {}", e))?;

        let observations = self
            .store
            .fetch_observations(&ObservationFilter::since(anchor))
            .await?;

        let grouped = group_by_date(
            observations
                .into_iter()
                .map(|obs| (obs.date, obs.precipitation)),
        );

        info!(
            "Precipitation since {}: {} dates with readings",
            anchor,
            grouped.len()
        );
        Ok(grouped)
    }

    /// Every station record, untransformed.
    pub async fn all_stations(&self) -> QueryResult<Vec<Station>> {
        let stations = self.store.fetch_all_stations().await?;
        info!("Returning {} stations", stations.len());
        Ok(stations)
    }

    /// The most active station's observations from the last year of data, ordered by date.
    pub async fn most_active_station_observations_last_year(
        &self,
    ) -> QueryResult<StationObservations> {
        let station = most_active_station(self.store.as_ref()).await?;
        let anchor = resolve_anchor_date(self.store.as_ref()).await?;

        debug!("Most active station: {}, window starts {}", station, anchor);

        let observations = self
            .store
            .fetch_observations(&ObservationFilter::since(anchor).for_station(Some(&station)))
            .await?;

        info!(
            "Station {}: {} observations since {}",
            station,
            observations.len(),
            anchor
        );
        Ok(StationObservations {
            station,
            observations,
        })
    }

    /// Min/max/avg temperature between `start` and `end` (inclusive) across all stations.
    pub async fn temperature_stats(
        &self,
        start: &str,
        end: Option<&str>,
    ) -> QueryResult<RangeStats> {
        self.station_temperature_stats(start, end, None).await
    }

    /// Like [`temperature_stats`](Self::temperature_stats), optionally limited to one station.
    pub async fn station_temperature_stats(
        &self,
        start: &str,
        end: Option<&str>,
        station: Option<&str>,
    ) -> QueryResult<RangeStats> {
        let range = validation::validate(start, end).map_err(|e| {
            info!("Rejected date range {} .. {:?}: {}", start, end, e);
            QueryError::from(e)
        })?;

        let stats = compute_stats(self.store.as_ref(), &range, station)
            .await
            .inspect_err(|e| {
                if matches!(e, QueryError::NoData) {
                    info!("No temperature data for {:?} (station {:?})", range, station);
                }
            })?;

        info!(
            "Temperature stats {} .. {:?} (station {:?}): min {}, avg {:.2}, max {}",
            range.start, range.end, station, stats.min, stats.avg, stats.max
        );
        Ok(RangeStats {
            range,
            station: station.map(str::to_string),
            stats,
        })
    }
}
