use crate::db::models::ActivityCount;
use crate::db::ObservationStore;
use crate::error::{QueryError, QueryResult};
use std::cmp::{Ordering, Reverse};

/// Pick the station with the most observations.
///
/// Ties go to the lexicographically smallest station code, regardless of the
/// order the counts arrive in.
pub fn pick_most_active(counts: &[ActivityCount]) -> Option<&ActivityCount> {
    counts.iter().min_by(|a, b| rank(a, b))
}

fn rank(a: &ActivityCount, b: &ActivityCount) -> Ordering {
    (Reverse(a.observations), &a.station_code).cmp(&(Reverse(b.observations), &b.station_code))
}

/// Station code of the most active station in the dataset.
pub async fn most_active_station(store: &dyn ObservationStore) -> QueryResult<String> {
    let counts = store.count_observations_by_station().await?;

    pick_most_active(&counts)
        .filter(|count| count.observations > 0)
        .map(|count| count.station_code.clone())
        .ok_or(QueryError::EmptyDataset)
}
