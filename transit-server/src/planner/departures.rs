//! Closest departures.
//!
//! "What can I catch soon from here toward there?" Candidate stops are
//! scanned nearest-first and each contributes its next few departures that
//! head toward the destination, until the requested number is collected.
//! Results therefore favour proximity over earliest departure time.

use chrono::NaiveDateTime;
use tracing::{debug, trace};

use crate::domain::{Coordinates, DataIssue, Departure, ServiceTime};
use crate::timetable::TimetableStore;
use crate::walkable::find_stops_within;

use super::direction::is_toward_destination;

/// A closest-departures query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepartureQuery {
    pub origin: Coordinates,
    pub destination: Coordinates,
    /// Only the time of day is used for the lookup; the date anchors the
    /// returned timestamps
    pub reference: NaiveDateTime,
    pub limit: usize,
    pub radius_m: f64,
}

/// Collect up to `query.limit` departures near the origin.
///
/// `visits_per_stop` bounds how many upcoming visits each stop offers
/// before the direction filter runs. Never fails; an empty list means
/// nothing suitable departs nearby.
pub fn closest_departures<S: TimetableStore + ?Sized>(
    store: &S,
    query: &DepartureQuery,
    visits_per_stop: usize,
) -> Vec<Departure> {
    let mut found = Vec::new();
    if query.limit == 0 {
        return found;
    }

    let from = ServiceTime::of_day(query.reference.time());
    let day = query.reference.date();

    'stops: for candidate in find_stops_within(store.stops(), query.origin, query.radius_m) {
        let Some(stop_coordinates) = candidate.stop.coordinates() else {
            continue;
        };

        for (visit, trip) in store.departures_from(&candidate.stop.id, from, visits_per_stop) {
            if !is_toward_destination(store, &visit.trip_id, candidate.stop, query.destination) {
                trace!(trip = %visit.trip_id, stop = %candidate.stop.id, "heading away");
                continue;
            }

            let (arrival, departure) = match (visit.arrival_time(), visit.departure_time()) {
                (Ok(a), Ok(d)) => (a, d),
                (Err(source), _) | (_, Err(source)) => {
                    let issue = DataIssue::BadTime {
                        trip: visit.trip_id.clone(),
                        stop: visit.stop_id.clone(),
                        source,
                    };
                    debug!(%issue, "skipping departure");
                    continue;
                }
            };

            found.push(Departure {
                trip_id: trip.id.clone(),
                route_id: trip.route_id.clone(),
                headsign: trip.headsign.clone(),
                stop_id: candidate.stop.id.clone(),
                stop_name: candidate.stop.name.clone(),
                stop_coordinates,
                arrival: arrival.on(day),
                departure: departure.on(day),
                walking_distance_m: (candidate.distance_m * 10.0).round() / 10.0,
            });

            if found.len() >= query.limit {
                break 'stops;
            }
        }
    }

    debug!(count = found.len(), "closest departures collected");
    found
}
