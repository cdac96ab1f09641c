//! Domain types for the transit planner.
//!
//! This module contains the value types shared by the timetable store,
//! the planner and the web layer. Types that carry invariants enforce them
//! at construction time, so code that receives them can trust their
//! validity.

mod departure;
mod error;
mod geo;
mod itinerary;
mod leg;
mod stop;
mod time;
mod trip;

pub use departure::{Departure, TripDetails, TripStop};
pub use error::DataIssue;
pub use geo::{Coordinates, EARTH_RADIUS_M, distance_meters};
pub use itinerary::{Itinerary, ItineraryError};
pub use leg::{Leg, Place, RideLeg, StopRef, WalkLeg};
pub use stop::{Stop, StopId};
pub use time::{
    SECONDS_PER_DAY, ServiceTime, TimeError, seconds_since_midnight, service_day_start,
    timestamp_at,
};
pub use trip::{StopVisit, Trip, TripId};
