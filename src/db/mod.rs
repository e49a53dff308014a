pub mod models;
pub mod repository;
pub mod store;

pub use repository::Repository;
pub use store::ObservationStore;

use crate::config::DatabaseConfig;
use crate::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

/// Open a connection pool over the dataset file. The file must already exist.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool> {
    let connect_options = SqliteConnectOptions::new()
        .filename(&config.path)
        .read_only(config.read_only)
        .create_if_missing(false);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(connect_options)
        .await?;

    Ok(pool)
}
