use crate::error::DataSourceError;
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Station {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

/// One station-day record. `precipitation` is `None` when it was not measured.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Observation {
    pub id: i64,
    pub station_code: String,
    pub date: NaiveDate,
    pub precipitation: Option<f64>,
    pub temperature: f64,
}

impl Observation {
    /// Reject readings that are NaN or infinite; they have no JSON representation.
    pub fn check_finite(&self) -> Result<(), DataSourceError> {
        let readings = [
            ("temperature", Some(self.temperature)),
            ("precipitation", self.precipitation),
        ];
        for (field, value) in readings {
            if let Some(value) = value.filter(|v| !v.is_finite()) {
                return Err(DataSourceError::Corrupt(format!(
                    "observation {} ({} on {}) has non-finite {}: {}",
                    self.id, self.station_code, self.date, field, value
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ActivityCount {
    pub station_code: String,
    pub observations: i64,
}

impl ActivityCount {
    pub fn new(station_code: impl Into<String>, observations: i64) -> Self {
        Self {
            station_code: station_code.into(),
            observations,
        }
    }
}

/// Range/station filter passed to the store when fetching observations.
///
/// Both date bounds are inclusive; `to: None` means "through the latest date".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationFilter {
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    pub station_code: Option<String>,
}

impl ObservationFilter {
    pub fn since(from: NaiveDate) -> Self {
        Self {
            from,
            to: None,
            station_code: None,
        }
    }

    pub fn until(mut self, to: Option<NaiveDate>) -> Self {
        self.to = to;
        self
    }

    pub fn for_station(mut self, station_code: Option<&str>) -> Self {
        self.station_code = station_code.map(str::to_string);
        self
    }
}
