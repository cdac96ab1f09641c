//! Direction heuristic for departures.
//!
//! A departure is only useful if the vehicle heads roughly toward the
//! traveller's destination. We approximate this by looking one stop ahead:
//! if the trip's next stop is no farther from the destination than the
//! boarding stop, the trip counts as going the right way. Trips that turn
//! away later are not caught, and trips that briefly detour are excluded.

use tracing::trace;

use crate::domain::{Coordinates, Stop, TripId};
use crate::timetable::TimetableStore;

/// Decide whether `trip`, boarded at `boarding`, moves toward `destination`.
///
/// Fails open: returns true whenever the direction cannot be determined
/// (boarding stop not on the trip, no later stop, missing coordinates).
pub fn is_toward_destination<S: TimetableStore + ?Sized>(
    store: &S,
    trip: &TripId,
    boarding: &Stop,
    destination: Coordinates,
) -> bool {
    let Some(here) = boarding.coordinates() else {
        return true;
    };

    let visits = store.trip_visits(trip);
    let Some(pos) = visits.iter().position(|v| v.stop_id == boarding.id) else {
        trace!(%trip, stop = %boarding.id, "boarding stop not on trip");
        return true;
    };
    let sequence = visits[pos].sequence;

    // First later visit at a stop we know about
    let next = visits[pos + 1..]
        .iter()
        .filter(|v| v.sequence > sequence)
        .find_map(|v| store.stop(&v.stop_id));

    let Some(next_coords) = next.and_then(Stop::coordinates) else {
        return true;
    };

    next_coords.distance_to(&destination) <= here.distance_to(&destination)
}
