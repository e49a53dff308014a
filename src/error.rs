use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Rejections produced while validating a caller-supplied date range.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDateFormat { value: String },

    #[error("Date {date} is after today ({today})")]
    FutureDate { date: NaiveDate, today: NaiveDate },

    #[error("Start date {start} is after end date {end}")]
    DateOrder { start: NaiveDate, end: NaiveDate },
}

/// Opaque failure of the persistence collaborator.
#[derive(Error, Debug)]
pub enum DataSourceError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Corrupt data: {0}")]
    Corrupt(String),
}

#[derive(Error, Debug)]
pub enum QueryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("The observation dataset is empty")]
    EmptyDataset,

    #[error("No observations match the requested filters")]
    NoData,

    #[error("Data source failure: {0}")]
    DataSource(#[from] DataSourceError),
}

impl QueryError {
    /// Stable identifier for the error kind, used by the request layer.
    pub fn kind(&self) -> &'static str {
        match self {
            QueryError::Validation(ValidationError::InvalidDateFormat { .. }) => {
                "invalid_date_format"
            }
            QueryError::Validation(ValidationError::FutureDate { .. }) => "future_date",
            QueryError::Validation(ValidationError::DateOrder { .. }) => "date_order",
            QueryError::EmptyDataset => "empty_dataset",
            QueryError::NoData => "no_data",
            QueryError::DataSource(_) => "data_source",
        }
    }
}

pub type QueryResult<T> = std::result::Result<T, QueryError>;
