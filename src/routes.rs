use crate::error::QueryError;
use crate::service::ClimateService;
use crate::stats::TemperatureStats;
use axum::{
    body::Body,
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Instant;
use tracing::{error, info, warn};

const ROUTES: [&str; 5] = [
    "/api/v1.0/precipitation",
    "/api/v1.0/stations",
    "/api/v1.0/tobs",
    "/api/v1.0/<start>",
    "/api/v1.0/<start>/<end>",
];

pub fn app(service: ClimateService) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/api/v1.0/precipitation", get(precipitation))
        .route("/api/v1.0/stations", get(stations))
        .route("/api/v1.0/tobs", get(tobs))
        .route("/api/v1.0/{start}", get(stats_from))
        .route("/api/v1.0/{start}/{end}", get(stats_between))
        .fallback(not_found)
        .with_state(service)
        .layer(middleware::from_fn(log_request))
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let status = match &self {
            QueryError::Validation(_) => StatusCode::BAD_REQUEST,
            QueryError::NoData => StatusCode::NOT_FOUND,
            QueryError::EmptyDataset | QueryError::DataSource(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            error!("Query failed: {}", self);
        }

        let body = Json(json!({
            "error": self.kind(),
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}

async fn home() -> String {
    let mut listing = String::from("Welcome to the Climate API!\nAvailable Routes:\n");
    for route in ROUTES {
        listing.push_str(route);
        listing.push('\n');
    }
    listing
}

#[derive(Debug, Serialize)]
struct DataResponse<T> {
    data: T,
}

#[derive(Debug, Serialize)]
struct TobsResponse<T> {
    station: String,
    data: T,
}

#[derive(Debug, Serialize)]
struct StatsResponse {
    start: NaiveDate,
    end: Option<NaiveDate>,
    station: Option<String>,
    data: TemperatureStats,
}

async fn precipitation(State(service): State<ClimateService>) -> Result<Response, QueryError> {
    let data = service.precipitation_last_year().await?;
    Ok(Json(DataResponse { data }).into_response())
}

async fn stations(State(service): State<ClimateService>) -> Result<Response, QueryError> {
    let data = service.all_stations().await?;
    Ok(Json(DataResponse { data }).into_response())
}

async fn tobs(State(service): State<ClimateService>) -> Result<Response, QueryError> {
    let result = service.most_active_station_observations_last_year().await?;
    Ok(Json(TobsResponse {
        station: result.station,
        data: result.observations,
    })
    .into_response())
}

#[derive(Debug, Deserialize)]
pub struct StatsParams {
    pub station: Option<String>,
}

async fn stats_from(
    State(service): State<ClimateService>,
    Path(start): Path<String>,
    Query(params): Query<StatsParams>,
) -> Result<Response, QueryError> {
    stats_response(&service, &start, None, params.station.as_deref()).await
}

async fn stats_between(
    State(service): State<ClimateService>,
    Path((start, end)): Path<(String, String)>,
    Query(params): Query<StatsParams>,
) -> Result<Response, QueryError> {
    stats_response(&service, &start, Some(&end), params.station.as_deref()).await
}

async fn stats_response(
    service: &ClimateService,
    start: &str,
    end: Option<&str>,
    station: Option<&str>,
) -> Result<Response, QueryError> {
    let result = service.station_temperature_stats(start, end, station).await?;

    Ok(Json(StatsResponse {
        start: result.range.start,
        end: result.range.end,
        station: result.station,
        data: result.stats,
    })
    .into_response())
}

async fn not_found(request: Request) -> Response {
    let path = request.uri().path().to_string();
    warn!("No route for {}", path);
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error_message": "The requested resource was not found on the server.",
            "invalid_route": path,
            "error": {
                "code": StatusCode::NOT_FOUND.as_u16(),
                "name": "Not Found",
                "description": "The requested URL was not found on the server. \
                    If you entered the URL manually please check your spelling and try again.",
            },
        })),
    )
        .into_response()
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let started = Instant::now();
    let method = request.method().clone();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str().to_string())
        .unwrap_or_default();
    info!(target: "http_request", "{} {}", method, path);

    let response = next.run(request).await;
    info!(
        target: "http_response",
        "{} {} -> {} in {:?}",
        method,
        path,
        response.status().as_u16(),
        started.elapsed()
    );

    response
}
