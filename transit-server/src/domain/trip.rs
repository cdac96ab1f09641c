//! Trip and stop-visit types.

use std::fmt;

use super::{ServiceTime, StopId, TimeError};

/// A timetable trip identifier.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TripId(String);

impl TripId {
    /// Create a trip identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TripId({})", self.0)
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TripId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One scheduled run of a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    pub id: TripId,
    /// Route (line) the trip belongs to, e.g. "31"
    pub route_id: String,
    /// Destination sign shown to passengers
    pub headsign: Option<String>,
}

impl Trip {
    /// Create a trip.
    pub fn new(id: impl Into<String>, route_id: impl Into<String>, headsign: Option<String>) -> Self {
        Self {
            id: TripId::new(id),
            route_id: route_id.into(),
            headsign,
        }
    }
}

/// One scheduled call of a trip at a stop.
///
/// Times are kept as the raw "HH:MM:SS" strings from the timetable; they
/// are parsed on use so that a malformed value only excludes the records
/// that depend on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopVisit {
    pub trip_id: TripId,
    pub stop_id: StopId,
    /// Position within the trip; increasing but not necessarily contiguous
    pub sequence: u32,
    pub arrival: String,
    pub departure: String,
}

impl StopVisit {
    /// Create a stop visit.
    pub fn new(
        trip_id: impl Into<String>,
        stop_id: impl Into<String>,
        sequence: u32,
        arrival: impl Into<String>,
        departure: impl Into<String>,
    ) -> Self {
        Self {
            trip_id: TripId::new(trip_id),
            stop_id: StopId::new(stop_id),
            sequence,
            arrival: arrival.into(),
            departure: departure.into(),
        }
    }

    /// Parsed arrival time.
    pub fn arrival_time(&self) -> Result<ServiceTime, TimeError> {
        ServiceTime::parse(&self.arrival)
    }

    /// Parsed departure time.
    pub fn departure_time(&self) -> Result<ServiceTime, TimeError> {
        ServiceTime::parse(&self.departure)
    }
}
