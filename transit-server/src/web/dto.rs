//! Data transfer objects for web requests and responses.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Coordinates, Departure, Itinerary, Leg, Place, RideLeg, StopRef, TripDetails, TripStop,
    WalkLeg,
};

/// Query string of the closest-departures endpoint.
///
/// Every field is optional text so that validation errors can be reported
/// as 400 responses with a JSON body.
#[derive(Debug, Default, Deserialize)]
pub struct ClosestDeparturesParams {
    /// Origin as "lat,lon"
    pub start_coordinates: Option<String>,

    /// Destination as "lat,lon"
    pub end_coordinates: Option<String>,

    /// ISO 8601 reference time (defaults to now)
    pub start_time: Option<String>,

    /// Maximum number of departures
    pub limit: Option<String>,

    /// Search radius in meters
    pub radius_m: Option<String>,
}

/// Query string of the best-route endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct BestRouteParams {
    pub start_coordinates: Option<String>,
    pub end_coordinates: Option<String>,
    pub start_time: Option<String>,

    /// Maximum walk at either end, in meters
    pub max_walk_m: Option<String>,

    /// Walking speed in meters per second
    pub walk_speed_mps: Option<String>,
}

/// Latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoordinatesResult {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Coordinates> for CoordinatesResult {
    fn from(c: Coordinates) -> Self {
        Self {
            latitude: c.latitude,
            longitude: c.longitude,
        }
    }
}

/// Request description echoed back with every response.
#[derive(Debug, Serialize)]
pub struct Metadata<Q: Serialize> {
    /// Path and query string of the request
    #[serde(rename = "self")]
    pub self_link: String,
    pub city: String,
    pub query_parameters: Q,
}

/// Echo of the closest-departures parameters after defaults are applied.
#[derive(Debug, Serialize)]
pub struct ClosestDeparturesQuery {
    pub start_coordinates: String,
    pub end_coordinates: String,
    pub start_time: String,
    /// As requested; negative values select nothing
    pub limit: i64,
    pub radius_m: f64,
}

/// Echo of the best-route parameters after defaults are applied.
#[derive(Debug, Serialize)]
pub struct BestRouteQuery {
    pub start_coordinates: String,
    pub end_coordinates: String,
    pub start_time: String,
    pub max_walk_m: f64,
    pub walk_speed_mps: f64,
}

/// Echo of the trip-details parameters.
#[derive(Debug, Serialize)]
pub struct TripQuery {
    pub trip_id: String,
}

/// The stop part of a departure.
#[derive(Debug, Serialize)]
pub struct DepartureStop {
    pub stop_id: String,
    pub name: String,
    pub coordinates: CoordinatesResult,
    pub arrival_time: String,
    pub departure_time: String,
    pub walking_distance_m: f64,
}

/// A departure in closest-departures results.
#[derive(Debug, Serialize)]
pub struct DepartureResult {
    pub trip_id: String,
    pub route_id: String,
    pub trip_headsign: Option<String>,
    pub stop: DepartureStop,
}

/// Response of the closest-departures endpoint.
#[derive(Debug, Serialize)]
pub struct ClosestDeparturesResponse {
    pub metadata: Metadata<ClosestDeparturesQuery>,
    pub departures: Vec<DepartureResult>,
}

/// A stop in an itinerary.
#[derive(Debug, Serialize)]
pub struct StopResult {
    pub stop_id: String,
    pub name: String,
    pub coordinates: Option<CoordinatesResult>,
}

/// Either end of a leg.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PlaceResult {
    Stop(StopResult),
    Point { coordinates: CoordinatesResult },
}

/// A walking leg.
#[derive(Debug, Serialize)]
pub struct WalkResult {
    pub from: PlaceResult,
    pub to: PlaceResult,
    pub distance_m: f64,
    pub duration_s: f64,
    pub start_time: String,
    pub end_time: String,
}

/// A ride leg.
#[derive(Debug, Serialize)]
pub struct RideResult {
    pub trip_id: String,
    pub route_id: Option<String>,
    pub trip_headsign: Option<String>,
    pub from: StopResult,
    pub to: StopResult,
    pub departure_time: String,
    pub arrival_time: String,
    pub num_stops: usize,
}

/// A leg of a route.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LegResult {
    Walk(WalkResult),
    Ride(RideResult),
}

/// A complete route.
#[derive(Debug, Serialize)]
pub struct RouteResult {
    pub legs: Vec<LegResult>,
    pub departure_time: String,
    pub arrival_time: String,
    pub total_travel_time_s: f64,
    pub total_walk_distance_m: f64,
    pub transfers: usize,
}

/// Response of the best-route endpoint.
#[derive(Debug, Serialize)]
pub struct BestRouteResponse {
    pub metadata: Metadata<BestRouteQuery>,
    pub route: RouteResult,
}

/// A call in trip details.
#[derive(Debug, Serialize)]
pub struct TripStopResult {
    pub stop_id: String,
    pub name: String,
    pub coordinates: Option<CoordinatesResult>,
    pub stop_sequence: u32,
    pub arrival_time: String,
    pub departure_time: String,
}

/// Trip details body.
#[derive(Debug, Serialize)]
pub struct TripDetailsResult {
    pub trip_id: String,
    pub route_id: String,
    pub trip_headsign: Option<String>,
    pub stops: Vec<TripStopResult>,
}

/// Response of the trip-details endpoint.
#[derive(Debug, Serialize)]
pub struct TripDetailsResponse {
    pub metadata: Metadata<TripQuery>,
    pub trip_details: TripDetailsResult,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

impl DepartureResult {
    /// Create from a domain Departure.
    pub fn from_departure(departure: &Departure) -> Self {
        Self {
            trip_id: departure.trip_id.to_string(),
            route_id: departure.route_id.clone(),
            trip_headsign: departure.headsign.clone(),
            stop: DepartureStop {
                stop_id: departure.stop_id.to_string(),
                name: departure.stop_name.clone(),
                coordinates: departure.stop_coordinates.into(),
                arrival_time: format_timestamp(&departure.arrival),
                departure_time: format_timestamp(&departure.departure),
                walking_distance_m: departure.walking_distance_m,
            },
        }
    }
}

impl StopResult {
    fn from_stop(stop: &StopRef) -> Self {
        Self {
            stop_id: stop.id.to_string(),
            name: stop.name.clone(),
            coordinates: stop.coordinates.map(Into::into),
        }
    }
}

impl PlaceResult {
    fn from_place(place: &Place) -> Self {
        match place {
            Place::Stop(stop) => PlaceResult::Stop(StopResult::from_stop(stop)),
            Place::Point(c) => PlaceResult::Point {
                coordinates: (*c).into(),
            },
        }
    }
}

impl WalkResult {
    /// Create from a domain WalkLeg.
    pub fn from_walk(walk: &WalkLeg) -> Self {
        Self {
            from: PlaceResult::from_place(&walk.from),
            to: PlaceResult::from_place(&walk.to),
            distance_m: walk.distance_m,
            duration_s: walk.duration_s,
            start_time: format_timestamp(&walk.start),
            end_time: format_timestamp(&walk.end),
        }
    }
}

impl RideResult {
    /// Create from a domain RideLeg.
    pub fn from_ride(ride: &RideLeg) -> Self {
        Self {
            trip_id: ride.trip_id.to_string(),
            route_id: ride.route_id.clone(),
            trip_headsign: ride.headsign.clone(),
            from: StopResult::from_stop(&ride.from),
            to: StopResult::from_stop(&ride.to),
            departure_time: format_timestamp(&ride.departure),
            arrival_time: format_timestamp(&ride.arrival),
            num_stops: ride.num_stops,
        }
    }
}

impl RouteResult {
    /// Create from a domain Itinerary.
    pub fn from_itinerary(itinerary: &Itinerary) -> Self {
        let legs = itinerary
            .legs()
            .iter()
            .map(|leg| match leg {
                Leg::Walk(walk) => LegResult::Walk(WalkResult::from_walk(walk)),
                Leg::Ride(ride) => LegResult::Ride(RideResult::from_ride(ride)),
            })
            .collect();

        Self {
            legs,
            departure_time: format_timestamp(&itinerary.departure_time()),
            arrival_time: format_timestamp(&itinerary.arrival_time()),
            total_travel_time_s: itinerary.total_duration().num_milliseconds() as f64 / 1000.0,
            total_walk_distance_m: itinerary.total_walk_distance_m(),
            transfers: itinerary.transfer_count(),
        }
    }
}

impl TripDetailsResult {
    /// Create from domain TripDetails.
    pub fn from_details(details: &TripDetails) -> Self {
        Self {
            trip_id: details.trip.id.to_string(),
            route_id: details.trip.route_id.clone(),
            trip_headsign: details.trip.headsign.clone(),
            stops: details.stops.iter().map(TripStopResult::from_stop).collect(),
        }
    }
}

impl TripStopResult {
    fn from_stop(stop: &TripStop) -> Self {
        Self {
            stop_id: stop.stop_id.to_string(),
            name: stop.name.clone(),
            coordinates: stop.coordinates.map(Into::into),
            stop_sequence: stop.sequence,
            arrival_time: stop.arrival.clone(),
            departure_time: stop.departure.clone(),
        }
    }
}

/// Format a timestamp as ISO 8601 with a `Z` suffix.
///
/// Whole seconds are printed without a fraction; sub-second walking
/// offsets keep their milliseconds.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
