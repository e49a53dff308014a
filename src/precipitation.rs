use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Precipitation values keyed by date, in the order they were recorded.
pub type PrecipitationByDate = BTreeMap<NaiveDate, Vec<f64>>;

/// Group `(date, precipitation)` readings by date.
///
/// Readings without a precipitation value are dropped, and a date whose readings
/// were all dropped does not appear in the result. Values keep their input order
/// within a date.
pub fn group_by_date<I>(readings: I) -> PrecipitationByDate
where
    I: IntoIterator<Item = (NaiveDate, Option<f64>)>,
{
    let mut grouped = PrecipitationByDate::new();
    for (date, value) in readings {
        if let Some(value) = value {
            grouped.entry(date).or_default().push(value);
        }
    }
    grouped
}
