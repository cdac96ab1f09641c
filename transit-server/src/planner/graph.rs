//! Transit graph construction.
//!
//! The graph has one node per stop and one edge per pair of consecutive
//! stop-visits of the same trip. Edges carry the scheduled departure from
//! the first stop and arrival at the second; waiting at a stop is implicit
//! in the search, so there are no wait or transfer edges.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::domain::{DataIssue, ServiceTime, StopId, StopVisit, TimeError, TripId};
use crate::timetable::TimetableStore;

/// Dense index of a stop within a [`TransitGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StopIdx(pub u32);

impl StopIdx {
    fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Dense index of a trip within a [`TransitGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TripIdx(pub u32);

/// One stop-to-stop hop of a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitEdge {
    pub from: StopIdx,
    pub to: StopIdx,
    pub trip: TripIdx,
    pub departure: ServiceTime,
    pub arrival: ServiceTime,
}

/// Counts gathered while building a graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub edges: usize,
    /// Pairs skipped because a time string did not parse
    pub bad_times: usize,
    /// Pairs skipped because the arrival precedes the departure
    pub non_monotonic: usize,
    /// Visits referring to a stop missing from the stop table
    pub unknown_stops: usize,
}

impl BuildStats {
    /// Returns the number of visit pairs that produced no edge.
    pub fn skipped(&self) -> usize {
        self.bad_times + self.non_monotonic
    }
}

/// Adjacency lists of the timetable's stop-to-stop hops.
#[derive(Debug, Default)]
pub struct TransitGraph {
    stops: Vec<StopId>,
    stop_index: HashMap<StopId, StopIdx>,
    trips: Vec<TripId>,
    /// Outgoing edges per stop, indexed by `StopIdx`
    adjacency: Vec<Vec<TransitEdge>>,
    stats: BuildStats,
}

impl TransitGraph {
    /// Build the graph from a store's ordered stop-visits.
    ///
    /// Every stop in the store gets a node, whether or not any trip calls
    /// there. Stops that only appear in visits get a node too, so rides can
    /// pass through them.
    pub fn build<S: TimetableStore + ?Sized>(store: &S) -> Self {
        let mut graph = Self::default();
        for stop in store.stops() {
            graph.intern_stop(&stop.id);
        }

        for pair in store.stop_visits_ordered().windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if a.trip_id != b.trip_id {
                continue;
            }
            graph.add_hop(store, a, b);
        }

        let stats = graph.stats;
        if stats.skipped() > 0 {
            warn!(
                bad_times = stats.bad_times,
                non_monotonic = stats.non_monotonic,
                "skipped timetable hops"
            );
        }
        info!(
            stops = graph.stops.len(),
            trips = graph.trips.len(),
            edges = stats.edges,
            "transit graph built"
        );

        graph
    }

    fn add_hop<S: TimetableStore + ?Sized>(&mut self, store: &S, a: &StopVisit, b: &StopVisit) {
        let departure = match a.departure_time() {
            Ok(t) => t,
            Err(source) => return self.skip_bad_time(a, source),
        };
        let arrival = match b.arrival_time() {
            Ok(t) => t,
            Err(source) => return self.skip_bad_time(b, source),
        };

        if arrival < departure {
            self.stats.non_monotonic += 1;
            let issue = DataIssue::NonMonotonicEdge {
                trip: a.trip_id.clone(),
                from: a.stop_id.clone(),
                to: b.stop_id.clone(),
                departure: departure.seconds(),
                arrival: arrival.seconds(),
            };
            debug!(%issue, "skipping hop");
            return;
        }

        for visit in [a, b] {
            if !self.stop_index.contains_key(&visit.stop_id) && store.stop(&visit.stop_id).is_none() {
                self.stats.unknown_stops += 1;
                let issue = DataIssue::DanglingReference {
                    kind: "stop",
                    id: visit.stop_id.to_string(),
                };
                debug!(%issue, "stop has no timetable entry");
            }
        }

        let from = self.intern_stop(&a.stop_id);
        let to = self.intern_stop(&b.stop_id);
        let trip = self.intern_trip(&a.trip_id);

        self.adjacency[from.as_usize()].push(TransitEdge {
            from,
            to,
            trip,
            departure,
            arrival,
        });
        self.stats.edges += 1;
    }

    fn skip_bad_time(&mut self, visit: &StopVisit, source: TimeError) {
        self.stats.bad_times += 1;
        let issue = DataIssue::BadTime {
            trip: visit.trip_id.clone(),
            stop: visit.stop_id.clone(),
            source,
        };
        debug!(%issue, "skipping hop");
    }

    fn intern_stop(&mut self, id: &StopId) -> StopIdx {
        if let Some(&idx) = self.stop_index.get(id) {
            return idx;
        }
        let idx = StopIdx(self.stops.len() as u32);
        self.stops.push(id.clone());
        self.stop_index.insert(id.clone(), idx);
        self.adjacency.push(Vec::new());
        idx
    }

    // Visits arrive grouped by trip, so only the last trip can match
    fn intern_trip(&mut self, id: &TripId) -> TripIdx {
        match self.trips.last() {
            Some(last) if last == id => TripIdx(self.trips.len() as u32 - 1),
            _ => {
                self.trips.push(id.clone());
                TripIdx(self.trips.len() as u32 - 1)
            }
        }
    }

    /// Returns the number of stop nodes.
    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.stats.edges
    }

    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    /// Look up the node for a stop identifier.
    pub fn index_of(&self, id: &StopId) -> Option<StopIdx> {
        self.stop_index.get(id).copied()
    }

    /// Returns the stop identifier of a node.
    ///
    /// # Panics
    ///
    /// Panics if `idx` did not come from this graph.
    pub fn stop_id(&self, idx: StopIdx) -> &StopId {
        &self.stops[idx.as_usize()]
    }

    /// Returns the trip identifier of a trip index.
    ///
    /// # Panics
    ///
    /// Panics if `idx` did not come from this graph.
    pub fn trip_id(&self, idx: TripIdx) -> &TripId {
        &self.trips[idx.0 as usize]
    }

    /// Outgoing edges of a stop. Terminal stops have none.
    pub fn edges_from(&self, idx: StopIdx) -> &[TransitEdge] {
        self.adjacency
            .get(idx.as_usize())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Stop, StopVisit, Trip};
    use crate::timetable::InMemoryTimetable;

    fn t(s: &str) -> ServiceTime {
        ServiceTime::parse(s).unwrap()
    }

    fn build(visits: Vec<StopVisit>) -> TransitGraph {
        let stops = vec![
            Stop::new("A", "A", 51.10, 17.00),
            Stop::new("B", "B", 51.10, 17.01),
            Stop::new("C", "C", 51.10, 17.02),
            Stop::new("LONELY", "Nobody calls here", 51.20, 17.00),
        ];
        let trips = vec![Trip::new("T1", "1", None), Trip::new("T2", "2", None)];
        TransitGraph::build(&InMemoryTimetable::new(stops, trips, visits))
    }

    fn idx(graph: &TransitGraph, id: &str) -> StopIdx {
        graph.index_of(&StopId::from(id)).unwrap()
    }

    #[test]
    fn one_edge_per_consecutive_pair() {
        let graph = build(vec![
            StopVisit::new("T1", "A", 1, "08:00:00", "08:00:00"),
            StopVisit::new("T1", "B", 2, "08:05:00", "08:06:00"),
            StopVisit::new("T1", "C", 3, "08:10:00", "08:10:00"),
        ]);

        assert_eq!(graph.edge_count(), 2);
        let from_a = graph.edges_from(idx(&graph, "A"));
        assert_eq!(from_a.len(), 1);
        assert_eq!(from_a[0].to, idx(&graph, "B"));
        assert_eq!(from_a[0].departure, t("08:00:00"));
        assert_eq!(from_a[0].arrival, t("08:05:00"));

        // Departure from B is its departure time, not its arrival
        let from_b = graph.edges_from(idx(&graph, "B"));
        assert_eq!(from_b[0].departure, t("08:06:00"));
        assert_eq!(graph.trip_id(from_b[0].trip), &TripId::from("T1"));

        assert!(graph.edges_from(idx(&graph, "C")).is_empty());
    }

    #[test]
    fn no_edges_across_trips() {
        let graph = build(vec![
            StopVisit::new("T1", "A", 1, "08:00:00", "08:00:00"),
            StopVisit::new("T2", "B", 1, "09:00:00", "09:00:00"),
            StopVisit::new("T2", "C", 2, "09:05:00", "09:05:00"),
        ]);

        assert_eq!(graph.edge_count(), 1);
        assert!(graph.edges_from(idx(&graph, "A")).is_empty());
    }

    #[test]
    fn non_contiguous_sequences_still_adjacent() {
        let graph = build(vec![
            StopVisit::new("T1", "C", 30, "08:20:00", "08:20:00"),
            StopVisit::new("T1", "A", 10, "08:00:00", "08:00:00"),
            StopVisit::new("T1", "B", 20, "08:10:00", "08:10:00"),
        ]);

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.edges_from(idx(&graph, "A"))[0].to, idx(&graph, "B"));
        assert_eq!(graph.edges_from(idx(&graph, "B"))[0].to, idx(&graph, "C"));
    }

    #[test]
    fn skips_bad_and_backwards_hops() {
        let graph = build(vec![
            StopVisit::new("T1", "A", 1, "08:00:00", "08:00:00"),
            StopVisit::new("T1", "B", 2, "nonsense", "08:05:00"),
            StopVisit::new("T1", "C", 3, "08:10:00", "08:10:00"),
            StopVisit::new("T2", "C", 1, "09:00:00", "09:00:00"),
            StopVisit::new("T2", "A", 2, "08:50:00", "08:50:00"),
        ]);

        let stats = graph.stats();
        assert_eq!(stats.edges, 1);
        assert_eq!(stats.bad_times, 1);
        assert_eq!(stats.non_monotonic, 1);
        assert_eq!(stats.skipped(), 2);
        assert_eq!(graph.edges_from(idx(&graph, "B"))[0].to, idx(&graph, "C"));
    }

    #[test]
    fn zero_duration_hop_kept() {
        let graph = build(vec![
            StopVisit::new("T1", "A", 1, "08:00:00", "08:00:00"),
            StopVisit::new("T1", "B", 2, "08:00:00", "08:00:00"),
        ]);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn past_midnight_times_not_wrapped() {
        let graph = build(vec![
            StopVisit::new("T1", "A", 1, "23:55:00", "23:55:00"),
            StopVisit::new("T1", "B", 2, "24:05:00", "24:05:00"),
        ]);
        let edge = graph.edges_from(idx(&graph, "A"))[0];
        assert_eq!(edge.arrival.seconds(), 86_700);
    }

    #[test]
    fn every_store_stop_has_a_node() {
        let graph = build(vec![
            StopVisit::new("T1", "A", 1, "08:00:00", "08:00:00"),
            StopVisit::new("T1", "GHOST", 2, "08:05:00", "08:05:00"),
        ]);

        assert!(graph.index_of(&StopId::from("LONELY")).is_some());
        assert!(graph.index_of(&StopId::from("GHOST")).is_some());
        assert_eq!(graph.stop_count(), 5);
        assert_eq!(graph.stats().unknown_stops, 1);
        assert_eq!(graph.stop_id(idx(&graph, "GHOST")), &StopId::from("GHOST"));
    }
}
