use crate::db::ObservationStore;
use crate::error::{QueryError, QueryResult};
use chrono::{Months, NaiveDate};

/// Start of the "last year" window ending on `latest`.
///
/// Calendar-aware: the day of month is kept, and February 29 falls back to
/// February 28 of the previous year.
pub fn one_year_before(latest: NaiveDate) -> NaiveDate {
    latest
        .checked_sub_months(Months::new(12))
        .unwrap_or(NaiveDate::MIN)
}

/// Anchor date of the analysis window: the dataset's latest observation date minus one year.
///
/// Recomputed on every call; the dataset's own maximum date stands in for "now".
pub async fn resolve_anchor_date(store: &dyn ObservationStore) -> QueryResult<NaiveDate> {
    let latest = store
        .max_observation_date()
        .await?
        .ok_or(QueryError::EmptyDataset)?;

    Ok(one_year_before(latest))
}
