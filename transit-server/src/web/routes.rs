//! HTTP route handlers.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{OriginalUri, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::domain::{Coordinates, TripId};
use crate::planner::{Planner, RouteError, RouteRequest};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/public_transport/city/:city/closest_departures",
            get(closest_departures),
        )
        .route("/public_transport/city/:city/best_route", get(best_route))
        .route("/public_transport/city/:city/trip/:trip_id", get(trip_details))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Departures near the start heading toward the end.
async fn closest_departures(
    State(state): State<AppState>,
    Path(city): Path<String>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<ClosestDeparturesParams>,
) -> Result<Json<ClosestDeparturesResponse>, AppError> {
    check_city(&state, &city)?;

    let (origin, destination) =
        parse_endpoints(params.start_coordinates.as_deref(), params.end_coordinates.as_deref())?;
    let (requested_limit, limit) = parse_limit(params.limit.as_deref(), state.config.departures_limit)?;
    let radius_m: f64 = parse_param(params.radius_m.as_deref(), state.config.radius_m)
        .ok()
        .filter(|r: &f64| r.is_finite())
        .ok_or_else(|| bad_request("radius_m must be a number (meters)"))?;
    let (reference, start_time) = parse_start_time(params.start_time.as_deref())?;

    let planner = Planner::new(&*state.timetable, &*state.config);
    let departures = planner
        .closest_departures(origin, destination, reference, limit, radius_m)
        .iter()
        .map(DepartureResult::from_departure)
        .collect();

    let metadata = Metadata {
        self_link: format!("{}?{}", uri.path(), uri.query().unwrap_or("")),
        city,
        query_parameters: ClosestDeparturesQuery {
            start_coordinates: params.start_coordinates.unwrap_or_default(),
            end_coordinates: params.end_coordinates.unwrap_or_default(),
            start_time,
            limit: requested_limit,
            radius_m,
        },
    };

    Ok(Json(ClosestDeparturesResponse {
        metadata,
        departures,
    }))
}

/// Fastest itinerary from start to end.
async fn best_route(
    State(state): State<AppState>,
    Path(city): Path<String>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<BestRouteParams>,
) -> Result<Json<BestRouteResponse>, AppError> {
    check_city(&state, &city)?;

    let (origin, destination) =
        parse_endpoints(params.start_coordinates.as_deref(), params.end_coordinates.as_deref())?;
    let max_walk_m: f64 = parse_param(params.max_walk_m.as_deref(), state.config.max_walk_m)
        .map_err(|_| bad_request("max_walk_m must be a number (meters)"))?;
    let walk_speed_mps: f64 =
        parse_param(params.walk_speed_mps.as_deref(), state.config.walk_speed_mps)
            .map_err(|_| bad_request("walk_speed_mps must be a number (meters per second)"))?;
    let (reference, start_time) = parse_start_time(params.start_time.as_deref())?;

    let mut request = RouteRequest::new(origin, destination, reference, &state.config);
    request.max_walk_m = max_walk_m;
    request.walk_speed_mps = walk_speed_mps;

    // The search is CPU-bound; keep it off the async workers
    let timetable = Arc::clone(&state.timetable);
    let config = Arc::clone(&state.config);
    let itinerary = tokio::task::spawn_blocking(move || {
        Planner::new(&*timetable, &*config).best_route(&request)
    })
    .await
    .map_err(|e| AppError::Internal {
        message: format!("route search task failed: {e}"),
    })??;

    let metadata = Metadata {
        self_link: format!("{}?{}", uri.path(), uri.query().unwrap_or("")),
        city,
        query_parameters: BestRouteQuery {
            start_coordinates: params.start_coordinates.unwrap_or_default(),
            end_coordinates: params.end_coordinates.unwrap_or_default(),
            start_time,
            max_walk_m,
            walk_speed_mps,
        },
    };

    Ok(Json(BestRouteResponse {
        metadata,
        route: RouteResult::from_itinerary(&itinerary),
    }))
}

/// A trip and its ordered calls.
async fn trip_details(
    State(state): State<AppState>,
    Path((city, trip_id)): Path<(String, String)>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<TripDetailsResponse>, AppError> {
    check_city(&state, &city)?;

    let planner = Planner::new(&*state.timetable, &*state.config);
    let details = planner
        .trip_details(&TripId::new(trip_id.as_str()))
        .ok_or_else(|| AppError::NotFound {
            message: "Trip not found".to_string(),
        })?;

    Ok(Json(TripDetailsResponse {
        metadata: Metadata {
            self_link: uri.path().to_string(),
            city,
            query_parameters: TripQuery { trip_id },
        },
        trip_details: TripDetailsResult::from_details(&details),
    }))
}

fn check_city(state: &AppState, city: &str) -> Result<(), AppError> {
    if state.serves(city) {
        Ok(())
    } else {
        Err(AppError::NotFound {
            message: "City not supported".to_string(),
        })
    }
}

fn bad_request(message: &str) -> AppError {
    AppError::BadRequest {
        message: message.to_string(),
    }
}

/// Parse a "lat,lon" pair.
fn parse_coordinates(value: &str) -> Option<Coordinates> {
    let (lat, lon) = value.split_once(',')?;
    let coordinates = Coordinates::new(lat.trim().parse().ok()?, lon.trim().parse().ok()?);
    coordinates.is_finite().then_some(coordinates)
}

fn parse_endpoints(
    start: Option<&str>,
    end: Option<&str>,
) -> Result<(Coordinates, Coordinates), AppError> {
    match (start.and_then(parse_coordinates), end.and_then(parse_coordinates)) {
        (Some(origin), Some(destination)) => Ok((origin, destination)),
        _ => Err(bad_request(
            "start_coordinates and end_coordinates are required in 'lat,lon' format, e.g. 51.1079,17.0385",
        )),
    }
}

/// Parse an optional query value, falling back to `default` when absent.
fn parse_param<T: FromStr>(value: Option<&str>, default: T) -> Result<T, T::Err> {
    match value {
        Some(v) => v.trim().parse(),
        None => Ok(default),
    }
}

/// Parse the departures limit, returning it as requested and as usable.
///
/// Negative limits are accepted and select no departures.
fn parse_limit(value: Option<&str>, default: usize) -> Result<(i64, usize), AppError> {
    let default = i64::try_from(default).unwrap_or(i64::MAX);
    let requested: i64 =
        parse_param(value, default).map_err(|_| bad_request("limit must be an integer"))?;
    Ok((requested, usize::try_from(requested).unwrap_or(0)))
}

/// Parse the reference time and render it back for the response.
///
/// Accepts RFC 3339 (a trailing `Z` means UTC) or a naive ISO 8601
/// date-time. The wall-clock value as written is used and any offset is
/// dropped. Defaults to the current UTC time.
fn parse_start_time(value: Option<&str>) -> Result<(NaiveDateTime, String), AppError> {
    let Some(raw) = value else {
        let now = Utc::now();
        return Ok((
            now.naive_utc(),
            now.to_rfc3339_opts(SecondsFormat::Micros, true),
        ));
    };

    let trimmed = raw.trim();
    let parsed = DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.naive_local())
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f"))
        .map_err(|_| bad_request("start_time must be an ISO 8601 date-time"))?;

    Ok((parsed, raw.to_string()))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<RouteError> for AppError {
    fn from(e: RouteError) -> Self {
        match e {
            RouteError::NoRouteFound => AppError::NotFound {
                message: "No route found".to_string(),
            },
            RouteError::InvalidRequest(message) => AppError::BadRequest { message },
            RouteError::Invariant(_) => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => {
                error!(%message, "request failed");
                let body = Json(ErrorResponse {
                    error: "Internal Server Error".to_string(),
                });
                return (StatusCode::INTERNAL_SERVER_ERROR, body).into_response();
            }
        };

        warn!(status = status.as_u16(), %message, "request rejected");
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn coordinates_parse() {
        let c = parse_coordinates("51.1079,17.0385").unwrap();
        assert_eq!(c, Coordinates::new(51.1079, 17.0385));
        assert_eq!(
            parse_coordinates(" 51.1 , 17.0 "),
            Some(Coordinates::new(51.1, 17.0))
        );

        assert!(parse_coordinates("51.1079").is_none());
        assert!(parse_coordinates("abc,17.0").is_none());
        assert!(parse_coordinates("51.1,17.0,3").is_none());
        assert!(parse_coordinates("NaN,17.0").is_none());
        assert!(parse_coordinates("").is_none());
    }

    #[test]
    fn endpoints_require_both() {
        assert!(parse_endpoints(Some("51.1,17.0"), None).is_err());
        assert!(parse_endpoints(None, Some("51.1,17.0")).is_err());
        assert!(parse_endpoints(Some("51.1,17.0"), Some("51.2,17.1")).is_ok());
    }

    #[test]
    fn param_defaults_and_errors() {
        assert_eq!(parse_param::<usize>(None, 5), Ok(5));
        assert_eq!(parse_param::<usize>(Some("3"), 5), Ok(3));
        assert!(parse_param::<usize>(Some("-1"), 5).is_err());
        assert!(parse_param::<usize>(Some("three"), 5).is_err());
        assert_eq!(parse_param::<f64>(Some("250.5"), 1000.0), Ok(250.5));
    }

    #[test]
    fn negative_limit_selects_nothing() {
        assert_eq!(parse_limit(None, 5).unwrap(), (5, 5));
        assert_eq!(parse_limit(Some("2"), 5).unwrap(), (2, 2));
        assert_eq!(parse_limit(Some("-3"), 5).unwrap(), (-3, 0));
        assert!(parse_limit(Some("many"), 5).is_err());
    }

    #[test]
    fn start_time_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 4, 2)
            .unwrap()
            .and_hms_opt(7, 59, 0)
            .unwrap();

        let (t, echo) = parse_start_time(Some("2025-04-02T07:59:00Z")).unwrap();
        assert_eq!(t, expected);
        assert_eq!(echo, "2025-04-02T07:59:00Z");

        // Offset is dropped; the wall-clock time is used as written
        let (t, _) = parse_start_time(Some("2025-04-02T07:59:00+02:00")).unwrap();
        assert_eq!(t, expected);

        let (t, _) = parse_start_time(Some("2025-04-02T07:59:00")).unwrap();
        assert_eq!(t, expected);

        let (t, _) = parse_start_time(Some("2025-04-02 07:59:00")).unwrap();
        assert_eq!(t, expected);

        assert!(parse_start_time(Some("yesterday")).is_err());
        assert!(parse_start_time(None).is_ok());
    }

    #[test]
    fn route_errors_map_to_status() {
        let status = |e: RouteError| AppError::from(e).into_response().status();
        assert_eq!(status(RouteError::NoRouteFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status(RouteError::InvalidRequest("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(RouteError::Invariant("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
