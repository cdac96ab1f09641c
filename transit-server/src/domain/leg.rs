//! Itinerary legs.
//!
//! A `Leg` is one contiguous part of an itinerary: either walking between
//! two places or riding a single trip from a boarding stop to an alighting
//! stop. Ride legs cover any number of consecutive stop-to-stop hops of
//! the same trip.

use chrono::{DateTime, Utc};

use super::{Coordinates, Stop, StopId, TripId};

/// A stop as shown in an itinerary.
#[derive(Debug, Clone, PartialEq)]
pub struct StopRef {
    pub id: StopId,
    pub name: String,
    pub coordinates: Option<Coordinates>,
}

impl From<&Stop> for StopRef {
    fn from(stop: &Stop) -> Self {
        Self {
            id: stop.id.clone(),
            name: stop.name.clone(),
            coordinates: stop.coordinates(),
        }
    }
}

impl StopRef {
    /// A stop known only by its identifier.
    pub fn unnamed(id: StopId) -> Self {
        Self {
            name: id.as_str().to_string(),
            id,
            coordinates: None,
        }
    }
}

/// Either end of a leg.
#[derive(Debug, Clone, PartialEq)]
pub enum Place {
    /// A free-form point, such as the traveller's origin
    Point(Coordinates),
    /// A timetable stop
    Stop(StopRef),
}

impl Place {
    /// Returns true if both places denote the same location.
    ///
    /// Stops compare by identifier, points by value.
    pub fn same_as(&self, other: &Place) -> bool {
        match (self, other) {
            (Place::Stop(a), Place::Stop(b)) => a.id == b.id,
            (Place::Point(a), Place::Point(b)) => a == b,
            _ => false,
        }
    }
}

/// Walking between two places.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkLeg {
    pub from: Place,
    pub to: Place,
    /// Great-circle distance in meters
    pub distance_m: f64,
    /// Walking time in seconds at the requested speed
    pub duration_s: f64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Riding one trip.
#[derive(Debug, Clone, PartialEq)]
pub struct RideLeg {
    pub from: StopRef,
    pub to: StopRef,
    pub trip_id: TripId,
    /// Absent when the trip is missing from the timetable's trip table
    pub route_id: Option<String>,
    pub headsign: Option<String>,
    pub departure: DateTime<Utc>,
    pub arrival: DateTime<Utc>,
    /// Stop-to-stop hops ridden; 1 for a single edge
    pub num_stops: usize,
}

impl RideLeg {
    /// Continue this ride to a further stop on the same trip.
    pub fn extend(&mut self, to: StopRef, arrival: DateTime<Utc>) {
        self.to = to;
        self.arrival = arrival;
        self.num_stops += 1;
    }
}

/// A leg of an itinerary.
#[derive(Debug, Clone, PartialEq)]
pub enum Leg {
    Walk(WalkLeg),
    Ride(RideLeg),
}

impl Leg {
    /// Returns where this leg starts.
    pub fn origin(&self) -> Place {
        match self {
            Leg::Walk(walk) => walk.from.clone(),
            Leg::Ride(ride) => Place::Stop(ride.from.clone()),
        }
    }

    /// Returns where this leg ends.
    pub fn destination(&self) -> Place {
        match self {
            Leg::Walk(walk) => walk.to.clone(),
            Leg::Ride(ride) => Place::Stop(ride.to.clone()),
        }
    }

    /// Returns when this leg starts.
    pub fn start(&self) -> DateTime<Utc> {
        match self {
            Leg::Walk(walk) => walk.start,
            Leg::Ride(ride) => ride.departure,
        }
    }

    /// Returns when this leg ends.
    pub fn end(&self) -> DateTime<Utc> {
        match self {
            Leg::Walk(walk) => walk.end,
            Leg::Ride(ride) => ride.arrival,
        }
    }

    /// Returns the ride if this leg is one.
    pub fn as_ride(&self) -> Option<&RideLeg> {
        match self {
            Leg::Ride(ride) => Some(ride),
            Leg::Walk(_) => None,
        }
    }

    /// Returns the walk if this leg is one.
    pub fn as_walk(&self) -> Option<&WalkLeg> {
        match self {
            Leg::Walk(walk) => Some(walk),
            Leg::Ride(_) => None,
        }
    }
}
