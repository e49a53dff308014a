use crate::error::ValidationError;
use chrono::{NaiveDate, Utc};
use serde::Serialize;

/// Inclusive date range. `end: None` runs through the latest available date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
}

/// Validate a caller-supplied range against today's UTC date.
pub fn validate(start: &str, end: Option<&str>) -> Result<DateRange, ValidationError> {
    validate_at(start, end, Utc::now().date_naive())
}

/// Validate a caller-supplied range against an explicit `today`.
///
/// Checks run in order: format of both bounds, neither bound after `today`,
/// then `start <= end`.
pub fn validate_at(
    start: &str,
    end: Option<&str>,
    today: NaiveDate,
) -> Result<DateRange, ValidationError> {
    let start = parse_iso_date(start)?;
    let end = end.map(parse_iso_date).transpose()?;

    for date in std::iter::once(start).chain(end) {
        if date > today {
            return Err(ValidationError::FutureDate { date, today });
        }
    }

    if let Some(end) = end {
        if start > end {
            return Err(ValidationError::DateOrder { start, end });
        }
    }

    Ok(DateRange { start, end })
}

/// Parse a strict `YYYY-MM-DD` date.
///
/// chrono alone accepts unpadded fields and signed years, so the shape is checked first.
pub fn parse_iso_date(value: &str) -> Result<NaiveDate, ValidationError> {
    let invalid = || ValidationError::InvalidDateFormat {
        value: value.to_string(),
    };

    let bytes = value.as_bytes();
    let well_shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_shaped {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid())
}
