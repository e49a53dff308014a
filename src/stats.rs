use crate::db::models::{Observation, ObservationFilter};
use crate::db::ObservationStore;
use crate::error::{QueryError, QueryResult};
use crate::validation::DateRange;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperatureStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

impl TemperatureStats {
    /// Min, max and arithmetic mean of `temperatures`, or `None` when there are none.
    ///
    /// The mean is clamped into `[min, max]` so floating-point rounding can never
    /// push it outside the observed bounds.
    pub fn from_temperatures<I>(temperatures: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for value in temperatures {
            count += 1;
            sum += value;
            min = min.min(value);
            max = max.max(value);
        }

        if count == 0 {
            return None;
        }

        let avg = (sum / count as f64).clamp(min, max);
        Some(Self { min, max, avg })
    }
}

/// Temperature statistics over `range`, optionally limited to one station.
pub async fn compute_stats(
    store: &dyn ObservationStore,
    range: &DateRange,
    station_code: Option<&str>,
) -> QueryResult<TemperatureStats> {
    let filter = ObservationFilter::since(range.start)
        .until(range.end)
        .for_station(station_code);

    let observations = store.fetch_observations(&filter).await?;
    summarize(&observations)
}

/// Temperature statistics over already-fetched observations.
///
/// Non-finite readings are corrupt data, never aggregated.
pub fn summarize(observations: &[Observation]) -> QueryResult<TemperatureStats> {
    for observation in observations {
        observation.check_finite()?;
    }

    TemperatureStats::from_temperatures(observations.iter().map(|obs| obs.temperature))
        .ok_or(QueryError::NoData)
}
