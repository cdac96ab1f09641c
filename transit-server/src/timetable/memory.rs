//! In-memory timetable store.

use std::collections::HashMap;
use std::ops::Range;

use tracing::{debug, info};

use crate::domain::{DataIssue, ServiceTime, Stop, StopId, StopVisit, Trip, TripId};

use super::TimetableStore;
use super::records::{StopRecord, TimetableSnapshot};

/// A timetable held entirely in memory, indexed for the planner's lookups.
///
/// Immutable once built, so it can be shared between concurrent queries
/// behind an `Arc` without locking.
#[derive(Debug, Default)]
pub struct InMemoryTimetable {
    stops: Vec<Stop>,
    stop_index: HashMap<StopId, usize>,
    trips: Vec<Trip>,
    trip_index: HashMap<TripId, usize>,
    /// Ordered by (trip id, sequence)
    visits: Vec<StopVisit>,
    /// Range of `visits` belonging to each trip
    trip_visits: HashMap<TripId, Range<usize>>,
    /// Per stop: (departure, index into `visits`), ordered by departure
    departures: HashMap<StopId, Vec<(ServiceTime, usize)>>,
}

impl InMemoryTimetable {
    /// Build a store from already-typed records.
    ///
    /// Duplicate stop or trip identifiers keep their first occurrence for
    /// lookups. Visits with an unparseable departure time never appear in
    /// departure lookups.
    pub fn new(stops: Vec<Stop>, trips: Vec<Trip>, mut visits: Vec<StopVisit>) -> Self {
        let mut stop_index = HashMap::with_capacity(stops.len());
        for (idx, stop) in stops.iter().enumerate() {
            stop_index.entry(stop.id.clone()).or_insert(idx);
        }

        let mut trip_index = HashMap::with_capacity(trips.len());
        for (idx, trip) in trips.iter().enumerate() {
            trip_index.entry(trip.id.clone()).or_insert(idx);
        }

        visits.sort_by(|a, b| {
            a.trip_id
                .cmp(&b.trip_id)
                .then(a.sequence.cmp(&b.sequence))
        });

        let mut trip_visits: HashMap<TripId, Range<usize>> = HashMap::new();
        let mut departures: HashMap<StopId, Vec<(ServiceTime, usize)>> = HashMap::new();
        let mut bad_departures = 0usize;

        for (idx, visit) in visits.iter().enumerate() {
            trip_visits
                .entry(visit.trip_id.clone())
                .and_modify(|range| range.end = idx + 1)
                .or_insert(idx..idx + 1);

            match visit.departure_time() {
                Ok(time) => departures
                    .entry(visit.stop_id.clone())
                    .or_default()
                    .push((time, idx)),
                Err(source) => {
                    bad_departures += 1;
                    let issue = DataIssue::BadTime {
                        trip: visit.trip_id.clone(),
                        stop: visit.stop_id.clone(),
                        source,
                    };
                    debug!(%issue, "excluding visit from departure lookups");
                }
            }
        }

        // Stable sort keeps (trip, sequence) order among equal departures
        for list in departures.values_mut() {
            list.sort_by_key(|(time, _)| *time);
        }

        info!(
            stops = stops.len(),
            trips = trips.len(),
            visits = visits.len(),
            bad_departures,
            "timetable indexed"
        );

        Self {
            stops,
            stop_index,
            trips,
            trip_index,
            visits,
            trip_visits,
            departures,
        }
    }

    /// Build a store from a deserialized snapshot.
    pub fn from_snapshot(snapshot: TimetableSnapshot) -> Self {
        let mut bad_coordinates = 0usize;
        let stops = snapshot
            .stops
            .into_iter()
            .map(StopRecord::into_stop)
            .map(|(stop, issue)| {
                if let Some(issue) = issue {
                    bad_coordinates += 1;
                    debug!(%issue, "stop excluded from spatial lookups");
                }
                stop
            })
            .collect();

        if bad_coordinates > 0 {
            info!(bad_coordinates, "stops without usable coordinates");
        }

        let trips = snapshot.trips.into_iter().map(Trip::from).collect();
        let visits = snapshot
            .stop_times
            .into_iter()
            .map(StopVisit::from)
            .collect();

        Self::new(stops, trips, visits)
    }
}

impl TimetableStore for InMemoryTimetable {
    fn stops(&self) -> &[Stop] {
        &self.stops
    }

    fn trips(&self) -> &[Trip] {
        &self.trips
    }

    fn stop(&self, id: &StopId) -> Option<&Stop> {
        self.stop_index.get(id).map(|&idx| &self.stops[idx])
    }

    fn trip(&self, id: &TripId) -> Option<&Trip> {
        self.trip_index.get(id).map(|&idx| &self.trips[idx])
    }

    fn stop_visits_ordered(&self) -> &[StopVisit] {
        &self.visits
    }

    fn trip_visits(&self, trip: &TripId) -> &[StopVisit] {
        match self.trip_visits.get(trip) {
            Some(range) => &self.visits[range.clone()],
            None => &[],
        }
    }

    fn departures_from(
        &self,
        stop: &StopId,
        from: ServiceTime,
        limit: usize,
    ) -> Vec<(&StopVisit, &Trip)> {
        let Some(list) = self.departures.get(stop) else {
            return Vec::new();
        };

        let start = list.partition_point(|(time, _)| *time < from);
        list[start..]
            .iter()
            .filter_map(|&(_, idx)| {
                let visit = &self.visits[idx];
                self.trip(&visit.trip_id).map(|trip| (visit, trip))
            })
            .take(limit)
            .collect()
    }
}
