//! Departure board and trip detail types.

use chrono::{DateTime, Utc};

use super::{Coordinates, StopId, Trip, TripId};

/// A boardable departure near the traveller.
#[derive(Debug, Clone, PartialEq)]
pub struct Departure {
    pub trip_id: TripId,
    pub route_id: String,
    pub headsign: Option<String>,
    pub stop_id: StopId,
    pub stop_name: String,
    pub stop_coordinates: Coordinates,
    pub arrival: DateTime<Utc>,
    pub departure: DateTime<Utc>,
    /// Walking distance from the origin, rounded to 0.1 m
    pub walking_distance_m: f64,
}

/// One call of a trip, as listed in trip details.
#[derive(Debug, Clone, PartialEq)]
pub struct TripStop {
    pub stop_id: StopId,
    pub name: String,
    pub coordinates: Option<Coordinates>,
    pub sequence: u32,
    /// Raw "HH:MM:SS" arrival as timetabled
    pub arrival: String,
    /// Raw "HH:MM:SS" departure as timetabled
    pub departure: String,
}

/// A trip together with its ordered calls.
#[derive(Debug, Clone, PartialEq)]
pub struct TripDetails {
    pub trip: Trip,
    pub stops: Vec<TripStop>,
}

impl TripDetails {
    /// Returns the trip identifier.
    pub fn trip_id(&self) -> &TripId {
        &self.trip.id
    }
}
