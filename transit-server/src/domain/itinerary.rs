//! Itinerary type.
//!
//! An `Itinerary` is the answer to "how do I get from A to B": an ordered
//! list of walk and ride legs from a free-form origin to a free-form
//! destination.

use chrono::{DateTime, Duration, Utc};

use super::{Leg, Place, RideLeg, WalkLeg};

/// Errors from assembling an itinerary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ItineraryError {
    /// No legs at all
    #[error("itinerary must have at least one leg")]
    Empty,

    /// A leg does not start where the previous one ended
    #[error("leg {0} does not start where the previous leg ends")]
    Disconnected(usize),

    /// Two adjacent rides on the same trip should have been one leg
    #[error("legs {0} and {next} ride the same trip without a transfer", next = .0 + 1)]
    UnmergedRide(usize),
}

/// A complete route from origin to destination.
///
/// # Invariants
///
/// - At least one leg
/// - Consecutive legs connect (destination of one = origin of the next)
/// - No two adjacent ride legs share a trip
#[derive(Debug, Clone)]
pub struct Itinerary {
    legs: Vec<Leg>,
}

impl Itinerary {
    /// Construct an itinerary, validating the leg chain.
    pub fn new(legs: Vec<Leg>) -> Result<Self, ItineraryError> {
        if legs.is_empty() {
            return Err(ItineraryError::Empty);
        }

        for (i, window) in legs.windows(2).enumerate() {
            if !window[0].destination().same_as(&window[1].origin()) {
                return Err(ItineraryError::Disconnected(i + 1));
            }
            if let (Leg::Ride(a), Leg::Ride(b)) = (&window[0], &window[1])
                && a.trip_id == b.trip_id
            {
                return Err(ItineraryError::UnmergedRide(i));
            }
        }

        Ok(Itinerary { legs })
    }

    /// Returns all legs in order.
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Returns the ride legs in order.
    pub fn rides(&self) -> impl Iterator<Item = &RideLeg> {
        self.legs.iter().filter_map(|l| l.as_ride())
    }

    /// Returns the walk legs in order.
    pub fn walks(&self) -> impl Iterator<Item = &WalkLeg> {
        self.legs.iter().filter_map(|l| l.as_walk())
    }

    /// Returns the number of transfers (rides - 1, or 0).
    pub fn transfer_count(&self) -> usize {
        self.rides().count().saturating_sub(1)
    }

    /// Returns where the itinerary starts.
    pub fn origin(&self) -> Place {
        self.legs[0].origin()
    }

    /// Returns where the itinerary ends.
    pub fn destination(&self) -> Place {
        self.legs[self.legs.len() - 1].destination()
    }

    /// Returns the reference time the route was planned from.
    pub fn departure_time(&self) -> DateTime<Utc> {
        self.legs[0].start()
    }

    /// Returns when the destination is reached.
    pub fn arrival_time(&self) -> DateTime<Utc> {
        self.legs[self.legs.len() - 1].end()
    }

    /// Returns the travel time from the reference time to arrival,
    /// including any wait before the first boarding.
    pub fn total_duration(&self) -> Duration {
        self.arrival_time()
            .signed_duration_since(self.departure_time())
    }

    /// Returns the total walking distance in meters.
    pub fn total_walk_distance_m(&self) -> f64 {
        self.walks().map(|w| w.distance_m).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinates, Stop, StopRef, TripId};
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2025, 4, 2)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
            .and_utc()
    }

    fn stop(id: &str) -> StopRef {
        StopRef::from(&Stop::new(id, id, 51.0, 17.0))
    }

    fn walk(from: Place, to: Place, start: DateTime<Utc>, end: DateTime<Utc>) -> Leg {
        Leg::Walk(WalkLeg {
            from,
            to,
            distance_m: 60.0,
            duration_s: 50.0,
            start,
            end,
        })
    }

    fn ride(trip: &str, from: &str, to: &str, dep: DateTime<Utc>, arr: DateTime<Utc>) -> Leg {
        Leg::Ride(RideLeg {
            from: stop(from),
            to: stop(to),
            trip_id: TripId::from(trip),
            route_id: None,
            headsign: None,
            departure: dep,
            arrival: arr,
            num_stops: 1,
        })
    }

    fn origin() -> Place {
        Place::Point(Coordinates::new(51.1, 17.0))
    }

    fn destination() -> Place {
        Place::Point(Coordinates::new(51.2, 17.1))
    }

    #[test]
    fn valid_itinerary() {
        let it = Itinerary::new(vec![
            walk(origin(), Place::Stop(stop("A")), at(7, 58), at(7, 59)),
            ride("T1", "A", "B", at(8, 0), at(8, 10)),
            ride("T2", "B", "C", at(8, 15), at(8, 20)),
            walk(Place::Stop(stop("C")), destination(), at(8, 20), at(8, 21)),
        ])
        .unwrap();

        assert_eq!(it.legs().len(), 4);
        assert_eq!(it.transfer_count(), 1);
        assert_eq!(it.departure_time(), at(7, 58));
        assert_eq!(it.arrival_time(), at(8, 21));
        assert_eq!(it.total_duration(), Duration::minutes(23));
        assert_eq!(it.total_walk_distance_m(), 120.0);
        assert!(it.origin().same_as(&origin()));
        assert!(it.destination().same_as(&destination()));
    }

    #[test]
    fn empty_rejected() {
        assert_eq!(Itinerary::new(vec![]).unwrap_err(), ItineraryError::Empty);
    }

    #[test]
    fn disconnected_rejected() {
        let err = Itinerary::new(vec![
            ride("T1", "A", "B", at(8, 0), at(8, 10)),
            ride("T2", "C", "D", at(8, 15), at(8, 20)),
        ])
        .unwrap_err();
        assert_eq!(err, ItineraryError::Disconnected(1));
    }

    #[test]
    fn unmerged_same_trip_rejected() {
        let err = Itinerary::new(vec![
            ride("T1", "A", "B", at(8, 0), at(8, 10)),
            ride("T1", "B", "C", at(8, 10), at(8, 20)),
        ])
        .unwrap_err();
        assert_eq!(err, ItineraryError::UnmergedRide(0));
        assert_eq!(
            err.to_string(),
            "legs 0 and 1 ride the same trip without a transfer"
        );
    }
}
