mod common;

use climate_api::db::models::ActivityCount;
use climate_api::db::Repository;
use climate_api::error::{DataSourceError, QueryError, ValidationError};
use climate_api::service::ClimateService;
use common::{date, observation, station, unavailable, MockStore};
use sqlx::SqlitePool;
use std::sync::Arc;

fn service(store: MockStore) -> ClimateService {
    ClimateService::new(Arc::new(store))
}

/// The last-year window starts one calendar year before the dataset's latest date
#[tokio::test]
async fn test_precipitation_last_year_uses_anchor_and_groups() {
    let mut store = MockStore::new();
    store
        .expect_max_observation_date()
        .times(1)
        .returning(|| Ok(Some(date("2017-08-23"))));
    store
        .expect_fetch_observations()
        .withf(|filter| {
            filter.from == date("2016-08-23") && filter.to.is_none() && filter.station_code.is_none()
        })
        .times(1)
        .returning(|_| {
            Ok(vec![
                observation(1, "USC00519397", "2016-08-23", Some(0.08), 81.0),
                observation(2, "USC00513117", "2016-08-23", Some(0.02), 76.0),
                observation(3, "USC00513117", "2016-08-24", None, 75.0),
            ])
        });

    let grouped = service(store)
        .precipitation_last_year()
        .await
        .expect("Precipitation query failed");

    assert_eq!(grouped.len(), 1);
    assert_eq!(grouped[&date("2016-08-23")], vec![0.08, 0.02]);
}

/// Leap-day maximum resolves to February 28 of the previous year
#[tokio::test]
async fn test_precipitation_last_year_leap_day_anchor() {
    let mut store = MockStore::new();
    store
        .expect_max_observation_date()
        .returning(|| Ok(Some(date("2016-02-29"))));
    store
        .expect_fetch_observations()
        .withf(|filter| filter.from == date("2015-02-28"))
        .times(1)
        .returning(|_| Ok(vec![]));

    let grouped = service(store).precipitation_last_year().await.unwrap();
    assert!(grouped.is_empty());
}

#[tokio::test]
async fn test_precipitation_last_year_empty_dataset() {
    let mut store = MockStore::new();
    store.expect_max_observation_date().returning(|| Ok(None));
    store.expect_fetch_observations().times(0);

    let result = service(store).precipitation_last_year().await;
    assert!(matches!(result, Err(QueryError::EmptyDataset)));
}

#[tokio::test]
async fn test_data_source_failure_propagates() {
    let mut store = MockStore::new();
    store
        .expect_max_observation_date()
        .returning(|| Err(unavailable()));

    let result = service(store).precipitation_last_year().await;
    assert!(matches!(result, Err(QueryError::DataSource(_))));
}

/// Station list is passed through untouched
#[tokio::test]
async fn test_all_stations_pass_through() {
    let stations = vec![
        station(1, "USC00519397", "WAIKIKI 717.2, HI US"),
        station(2, "USC00513117", "KANEOHE 838.1, HI US"),
    ];
    let expected = stations.clone();

    let mut store = MockStore::new();
    store
        .expect_fetch_all_stations()
        .times(1)
        .returning(move || Ok(stations.clone()));

    let result = service(store).all_stations().await.unwrap();
    assert_eq!(result, expected);
}

/// Equal top counts go to the smaller station code
#[tokio::test]
async fn test_most_active_station_tie_break() {
    let mut store = MockStore::new();
    store.expect_count_observations_by_station().returning(|| {
        Ok(vec![
            ActivityCount::new("C", 7),
            ActivityCount::new("A", 5),
            ActivityCount::new("B", 7),
        ])
    });
    store
        .expect_max_observation_date()
        .returning(|| Ok(Some(date("2017-08-23"))));
    store
        .expect_fetch_observations()
        .withf(|filter| {
            filter.station_code.as_deref() == Some("B")
                && filter.from == date("2016-08-23")
                && filter.to.is_none()
        })
        .times(1)
        .returning(|_| {
            Ok(vec![
                observation(10, "B", "2016-08-23", Some(0.1), 77.0),
                observation(11, "B", "2016-08-24", None, 79.0),
            ])
        });

    let result = service(store)
        .most_active_station_observations_last_year()
        .await
        .unwrap();

    assert_eq!(result.station, "B");
    assert_eq!(result.observations.len(), 2);
    assert_eq!(result.observations[0].date, date("2016-08-23"));
}

#[tokio::test]
async fn test_most_active_station_empty_dataset() {
    let mut store = MockStore::new();
    store
        .expect_count_observations_by_station()
        .returning(|| Ok(vec![]));
    store.expect_fetch_observations().times(0);

    let result = service(store)
        .most_active_station_observations_last_year()
        .await;
    assert!(matches!(result, Err(QueryError::EmptyDataset)));
}

#[tokio::test]
async fn test_temperature_stats_over_range() {
    let mut store = MockStore::new();
    store
        .expect_fetch_observations()
        .withf(|filter| {
            filter.from == date("2017-01-01")
                && filter.to == Some(date("2017-01-31"))
                && filter.station_code.is_none()
        })
        .times(1)
        .returning(|_| {
            Ok(vec![
                observation(1, "A", "2017-01-01", None, 70.0),
                observation(2, "B", "2017-01-02", Some(0.3), 75.0),
                observation(3, "A", "2017-01-03", Some(0.0), 80.0),
            ])
        });

    let result = service(store)
        .temperature_stats("2017-01-01", Some("2017-01-31"))
        .await
        .unwrap();

    assert_eq!(result.stats.min, 70.0);
    assert_eq!(result.stats.max, 80.0);
    assert_eq!(result.stats.avg, 75.0);
    assert_eq!(result.range.start, date("2017-01-01"));
    assert_eq!(result.station, None);
}

#[tokio::test]
async fn test_temperature_stats_no_data() {
    let mut store = MockStore::new();
    store.expect_fetch_observations().returning(|_| Ok(vec![]));

    let result = service(store).temperature_stats("2010-01-01", None).await;
    assert!(matches!(result, Err(QueryError::NoData)));
}

/// Validation fails before the store is touched
#[tokio::test]
async fn test_temperature_stats_validation_errors() {
    // No expectations: any store call would panic
    let service = service(MockStore::new());

    let result = service.temperature_stats("2017/01/01", None).await;
    assert!(matches!(
        result,
        Err(QueryError::Validation(ValidationError::InvalidDateFormat { .. }))
    ));

    let result = service
        .temperature_stats("2017-08-23", Some("2016-08-23"))
        .await;
    assert!(matches!(
        result,
        Err(QueryError::Validation(ValidationError::DateOrder { .. }))
    ));

    let result = service.temperature_stats("9999-01-01", None).await;
    assert!(matches!(
        result,
        Err(QueryError::Validation(ValidationError::FutureDate { .. }))
    ));
}

/// Full path through the SQLite repository
#[sqlx::test(migrations = "tests/migrations", fixtures("stations", "measurements"))]
async fn test_queries_against_dataset(pool: SqlitePool) {
    let service = ClimateService::new(Arc::new(Repository::new(pool)));

    let precipitation = service.precipitation_last_year().await.unwrap();
    assert_eq!(precipitation[&date("2016-08-23")], vec![0.08, 1.79]);
    assert_eq!(precipitation[&date("2016-08-24")], vec![2.15]);
    assert_eq!(precipitation[&date("2017-08-23")], vec![0.0, 0.0]);
    assert!(!precipitation.contains_key(&date("2016-08-22")));
    let total: usize = precipitation.values().map(Vec::len).sum();
    assert_eq!(total, 7);

    let stations = service.all_stations().await.unwrap();
    assert_eq!(stations.len(), 3);

    let tobs = service
        .most_active_station_observations_last_year()
        .await
        .unwrap();
    assert_eq!(tobs.station, "USC00519281");
    let ids: Vec<i64> = tobs.observations.iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![8, 9, 10]);

    let stats = service
        .temperature_stats("2016-08-23", Some("2016-08-24"))
        .await
        .unwrap()
        .stats;
    assert_eq!(stats.min, 75.0);
    assert_eq!(stats.max, 81.0);
    assert_eq!(stats.avg, 77.8);

    let station_stats = service
        .station_temperature_stats("2016-08-22", None, Some("USC00519281"))
        .await
        .unwrap()
        .stats;
    assert_eq!(station_stats.min, 76.0);
    assert_eq!(station_stats.max, 80.0);
    assert_eq!(station_stats.avg, 77.5);

    let empty = service
        .temperature_stats("2010-01-01", Some("2010-12-31"))
        .await;
    assert!(matches!(empty, Err(QueryError::NoData)));
}

/// Infinite temperatures surface as a data source error instead of null stats
#[sqlx::test(migrations = "tests/migrations", fixtures("stations", "measurements"))]
async fn test_temperature_stats_with_infinite_readings(pool: SqlitePool) {
    sqlx::query(
        "INSERT INTO measurement (id, station, date, prcp, tobs) VALUES \
         (11, 'USC00519281', '2016-08-25', NULL, 9e999), \
         (12, 'USC00519397', '2016-08-25', NULL, -9e999)",
    )
    .execute(&pool)
    .await
    .expect("Seed failed");

    let service = ClimateService::new(Arc::new(Repository::new(pool)));

    let result = service.temperature_stats("2016-08-01", None).await;
    assert!(matches!(
        result,
        Err(QueryError::DataSource(DataSourceError::Corrupt(_)))
    ));

    // Ranges that exclude the bad rows still aggregate
    let stats = service
        .temperature_stats("2016-08-23", Some("2016-08-24"))
        .await
        .unwrap()
        .stats;
    assert!(stats.min <= stats.avg && stats.avg <= stats.max);
}

/// A store that hands back infinite readings never yields NaN stats
#[tokio::test]
async fn test_temperature_stats_rejects_non_finite_rows_from_store() {
    let mut store = MockStore::new();
    store.expect_fetch_observations().returning(|_| {
        Ok(vec![
            observation(1, "A", "2017-01-01", None, f64::INFINITY),
            observation(2, "B", "2017-01-02", None, f64::NEG_INFINITY),
        ])
    });

    let result = service(store).temperature_stats("2017-01-01", None).await;
    assert!(matches!(
        result,
        Err(QueryError::DataSource(DataSourceError::Corrupt(_)))
    ));
}

#[sqlx::test(migrations = "tests/migrations", fixtures("stations"))]
async fn test_queries_against_empty_measurements(pool: SqlitePool) {
    let service = ClimateService::new(Arc::new(Repository::new(pool)));

    assert!(matches!(
        service.precipitation_last_year().await,
        Err(QueryError::EmptyDataset)
    ));
    assert!(matches!(
        service.most_active_station_observations_last_year().await,
        Err(QueryError::EmptyDataset)
    ));
    assert!(matches!(
        service.temperature_stats("2016-01-01", None).await,
        Err(QueryError::NoData)
    ));
    assert_eq!(service.all_stations().await.unwrap().len(), 3);
}
