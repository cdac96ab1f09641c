//! Itinerary reconstruction.
//!
//! Follows predecessor labels from the exit stop back to the walk from the
//! origin, then replays the chain forward into legs. Consecutive hops of
//! the same trip become a single ride leg.

use chrono::NaiveDate;

use crate::domain::{
    Coordinates, Itinerary, Leg, Place, RideLeg, StopRef, WalkLeg, timestamp_at,
};
use crate::timetable::TimetableStore;
use crate::walkable::walk_seconds;

use super::earliest::{SearchOutcome, Step};
use super::graph::{StopIdx, TransitEdge, TransitGraph};
use super::search::RouteError;

/// Fixed context of the search being reconstructed.
#[derive(Debug, Clone, Copy)]
pub struct Endpoints {
    pub origin: Coordinates,
    pub destination: Coordinates,
    /// Day whose midnight all search times count from
    pub service_day: NaiveDate,
    /// Seconds since midnight at which the traveller is ready to leave
    pub depart_at: f64,
    pub walk_speed_mps: f64,
}

/// Turn a search outcome into an itinerary.
///
/// Fails with [`RouteError::Invariant`] if the predecessor chain does not
/// lead back to a walk from the origin.
pub fn reconstruct<S: TimetableStore + ?Sized>(
    store: &S,
    graph: &TransitGraph,
    outcome: &SearchOutcome,
    ends: &Endpoints,
) -> Result<Itinerary, RouteError> {
    let day = ends.service_day;
    let label_at = |idx: StopIdx| {
        outcome
            .labels
            .get(idx.0 as usize)
            .copied()
            .flatten()
            .ok_or_else(|| RouteError::Invariant(format!("stop #{} on the route has no label", idx.0)))
    };

    let mut hops: Vec<TransitEdge> = Vec::new();
    let mut current = outcome.exit;
    let walk_in_m = loop {
        match label_at(current)?.via {
            Step::WalkFromOrigin { distance_m } => break distance_m,
            Step::Ride(edge) => {
                // A chain through a label tree cannot be longer than the tree
                if hops.len() >= graph.stop_count() {
                    return Err(RouteError::Invariant(
                        "predecessor chain does not reach the origin".to_string(),
                    ));
                }
                hops.push(edge);
                current = edge.from;
            }
        }
    };
    hops.reverse();
    let entry = current;

    let stop_ref = |idx: StopIdx| {
        let id = graph.stop_id(idx);
        store
            .stop(id)
            .map(StopRef::from)
            .unwrap_or_else(|| StopRef::unnamed(id.clone()))
    };

    let walk_in_s = walk_seconds(walk_in_m, ends.walk_speed_mps);
    // The walk-in spans the reference time up to the first boarding, waits
    // included, so the itinerary's total is always arrival minus reference
    let walk_in_start = timestamp_at(day, ends.depart_at);
    let walk_in_end = match hops.first() {
        Some(first) => first.departure.on(day),
        None => timestamp_at(day, ends.depart_at + walk_in_s),
    };

    let mut legs = Vec::with_capacity(hops.len() + 2);
    legs.push(Leg::Walk(WalkLeg {
        from: Place::Point(ends.origin),
        to: Place::Stop(stop_ref(entry)),
        distance_m: walk_in_m,
        duration_s: walk_in_s,
        start: walk_in_start,
        end: walk_in_end,
    }));

    let mut ride: Option<RideLeg> = None;
    for edge in &hops {
        let trip_id = graph.trip_id(edge.trip);
        let to = stop_ref(edge.to);
        let arrival = edge.arrival.on(day);

        match ride.as_mut() {
            Some(current) if &current.trip_id == trip_id => current.extend(to, arrival),
            _ => {
                if let Some(done) = ride.take() {
                    legs.push(Leg::Ride(done));
                }
                let trip = store.trip(trip_id);
                ride = Some(RideLeg {
                    from: stop_ref(edge.from),
                    to,
                    trip_id: trip_id.clone(),
                    route_id: trip.map(|t| t.route_id.clone()),
                    headsign: trip.and_then(|t| t.headsign.clone()),
                    departure: edge.departure.on(day),
                    arrival,
                    num_stops: 1,
                });
            }
        }
    }
    if let Some(done) = ride {
        legs.push(Leg::Ride(done));
    }

    let at_exit = label_at(outcome.exit)?.arrival;
    let walk_out_s = walk_seconds(outcome.exit_walk_m, ends.walk_speed_mps);
    legs.push(Leg::Walk(WalkLeg {
        from: Place::Stop(stop_ref(outcome.exit)),
        to: Place::Point(ends.destination),
        distance_m: outcome.exit_walk_m,
        duration_s: walk_out_s,
        start: timestamp_at(day, at_exit),
        end: timestamp_at(day, at_exit + walk_out_s),
    }));

    Itinerary::new(legs).map_err(|e| RouteError::Invariant(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ServiceTime, Stop, StopId, StopVisit, Trip, TripId};
    use crate::planner::earliest::Label;
    use crate::planner::graph::TripIdx;
    use crate::timetable::InMemoryTimetable;
    use chrono::{DateTime, Utc};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 2).unwrap()
    }

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        day().and_hms_opt(h, m, 0).unwrap().and_utc()
    }

    fn store() -> InMemoryTimetable {
        let stops = vec![
            Stop::new("A", "Alpha", 51.10, 17.00),
            Stop::new("B", "Bravo", 51.10, 17.01),
            Stop::new("C", "Charlie", 51.10, 17.02),
            Stop::new("D", "Delta", 51.10, 17.03),
        ];
        let trips = vec![
            Trip::new("T1", "12", Some("Charlie".into())),
            Trip::new("T2", "7", None),
        ];
        let visits = vec![
            StopVisit::new("T1", "A", 1, "08:00:00", "08:00:00"),
            StopVisit::new("T1", "B", 2, "08:05:00", "08:05:00"),
            StopVisit::new("T1", "C", 3, "08:10:00", "08:10:00"),
            StopVisit::new("T2", "C", 1, "08:15:00", "08:15:00"),
            StopVisit::new("T2", "D", 2, "08:20:00", "08:20:00"),
            StopVisit::new("ORPHAN", "D", 1, "09:00:00", "09:00:00"),
            StopVisit::new("ORPHAN", "A", 2, "09:10:00", "09:10:00"),
        ];
        InMemoryTimetable::new(stops, trips, visits)
    }

    fn ends() -> Endpoints {
        Endpoints {
            origin: Coordinates::new(51.10, 16.999),
            destination: Coordinates::new(51.10, 17.031),
            service_day: day(),
            depart_at: 7.0 * 3600.0 + 50.0 * 60.0,
            walk_speed_mps: 1.0,
        }
    }

    fn idx(graph: &TransitGraph, id: &str) -> StopIdx {
        graph.index_of(&StopId::from(id)).unwrap()
    }

    fn edge(graph: &TransitGraph, from: &str, trip: &str) -> TransitEdge {
        *graph
            .edges_from(idx(graph, from))
            .iter()
            .find(|e| graph.trip_id(e.trip) == &TripId::from(trip))
            .unwrap()
    }

    fn ride_label(graph: &TransitGraph, from: &str, trip: &str) -> Option<Label> {
        let e = edge(graph, from, trip);
        Some(Label {
            arrival: e.arrival.as_f64(),
            via: Step::Ride(e),
        })
    }

    fn walk_label(arrival: f64, distance_m: f64) -> Option<Label> {
        Some(Label {
            arrival,
            via: Step::WalkFromOrigin { distance_m },
        })
    }

    fn outcome(graph: &TransitGraph, labels: Vec<(&str, Option<Label>)>, exit: &str) -> SearchOutcome {
        let mut all = vec![None; graph.stop_count()];
        for (id, label) in labels {
            all[idx(graph, id).0 as usize] = label;
        }
        let exit_walk_m = 60.0;
        let arrival = all[idx(graph, exit).0 as usize].unwrap().arrival + exit_walk_m;
        SearchOutcome {
            labels: all,
            exit: idx(graph, exit),
            exit_walk_m,
            arrival,
            settled: 0,
        }
    }

    #[test]
    fn merges_same_trip_and_splits_on_transfer() {
        let store = store();
        let graph = TransitGraph::build(&store);
        let out = outcome(
            &graph,
            vec![
                ("A", walk_label(ends().depart_at + 120.0, 120.0)),
                ("B", ride_label(&graph, "A", "T1")),
                ("C", ride_label(&graph, "B", "T1")),
                ("D", ride_label(&graph, "C", "T2")),
            ],
            "D",
        );

        let itinerary = reconstruct(&store, &graph, &out, &ends()).unwrap();
        let legs = itinerary.legs();
        assert_eq!(legs.len(), 4);

        let walk_in = legs[0].as_walk().unwrap();
        assert_eq!(walk_in.distance_m, 120.0);
        assert_eq!(walk_in.duration_s, 120.0);
        assert_eq!(walk_in.start, at(7, 50));
        assert_eq!(walk_in.end, at(8, 0));

        let first = legs[1].as_ride().unwrap();
        assert_eq!(first.trip_id, TripId::from("T1"));
        assert_eq!(first.from.name, "Alpha");
        assert_eq!(first.to.name, "Charlie");
        assert_eq!(first.num_stops, 2);
        assert_eq!(first.route_id.as_deref(), Some("12"));
        assert_eq!(first.headsign.as_deref(), Some("Charlie"));
        assert_eq!(first.departure, at(8, 0));
        assert_eq!(first.arrival, at(8, 10));

        let second = legs[2].as_ride().unwrap();
        assert_eq!(second.trip_id, TripId::from("T2"));
        assert_eq!(second.num_stops, 1);
        assert_eq!(second.headsign, None);

        let walk_out = legs[3].as_walk().unwrap();
        assert_eq!(walk_out.start, at(8, 20));
        assert_eq!(walk_out.end, at(8, 21));

        assert_eq!(itinerary.transfer_count(), 1);
        assert_eq!(itinerary.departure_time(), at(7, 50));
        assert_eq!(itinerary.arrival_time(), at(8, 21));
        assert_eq!(itinerary.total_duration(), chrono::Duration::minutes(31));
    }

    #[test]
    fn missing_trip_row_leaves_route_empty() {
        let store = store();
        let graph = TransitGraph::build(&store);
        let out = outcome(
            &graph,
            vec![
                ("D", walk_label(ends().depart_at, 0.0)),
                ("A", ride_label(&graph, "D", "ORPHAN")),
            ],
            "A",
        );

        let itinerary = reconstruct(&store, &graph, &out, &ends()).unwrap();
        let ride = itinerary.rides().next().unwrap();
        assert_eq!(ride.route_id, None);
        assert_eq!(ride.trip_id, TripId::from("ORPHAN"));
    }

    #[test]
    fn walk_only_leaves_at_reference_time() {
        let store = store();
        let graph = TransitGraph::build(&store);
        let depart_at = ends().depart_at;
        let out = outcome(&graph, vec![("B", walk_label(depart_at + 30.0, 30.0))], "B");

        let itinerary = reconstruct(&store, &graph, &out, &ends()).unwrap();
        assert_eq!(itinerary.legs().len(), 2);
        assert_eq!(itinerary.rides().count(), 0);
        assert_eq!(itinerary.transfer_count(), 0);
        assert_eq!(itinerary.departure_time(), at(7, 50));
        assert_eq!(
            itinerary.total_duration(),
            chrono::Duration::seconds(90)
        );
    }

    #[test]
    fn missing_root_is_an_invariant_violation() {
        let store = store();
        let graph = TransitGraph::build(&store);
        // B claims to be reached from A, but A was never labelled
        let out = outcome(&graph, vec![("B", ride_label(&graph, "A", "T1"))], "B");

        let err = reconstruct(&store, &graph, &out, &ends()).unwrap_err();
        assert!(matches!(err, RouteError::Invariant(_)));
    }

    #[test]
    fn predecessor_cycle_is_an_invariant_violation() {
        let store = store();
        let graph = TransitGraph::build(&store);
        let a = idx(&graph, "A");
        let self_loop = TransitEdge {
            from: a,
            to: a,
            trip: TripIdx(0),
            departure: ServiceTime::from_seconds(28_800),
            arrival: ServiceTime::from_seconds(28_800),
        };
        let out = outcome(
            &graph,
            vec![(
                "A",
                Some(Label {
                    arrival: 28_800.0,
                    via: Step::Ride(self_loop),
                }),
            )],
            "A",
        );

        let err = reconstruct(&store, &graph, &out, &ends()).unwrap_err();
        assert!(matches!(err, RouteError::Invariant(_)));
    }
}
