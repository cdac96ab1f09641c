//! Earliest-arrival search.
//!
//! Dijkstra over stops, where each stop's label is the earliest time we
//! can be there. Edges are timetabled hops: an edge is usable only if it
//! departs no earlier than our arrival at its stop, and using it yields
//! the edge's own arrival time. Waiting is free, so the earliest arrival
//! at a stop dominates every later one and a single label per stop is
//! enough.
//!
//! The heap has no decrease-key; improved stops are pushed again and stale
//! entries are dropped when popped.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use tracing::debug;

use super::graph::{StopIdx, TransitEdge, TransitGraph};
use super::search::RouteError;
use crate::walkable::walk_seconds;

/// A stop reachable on foot from the origin or destination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Access {
    pub stop: StopIdx,
    pub distance_m: f64,
}

/// How a stop's best arrival was achieved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Walked directly from the origin
    WalkFromOrigin { distance_m: f64 },
    /// Rode one hop of a trip
    Ride(TransitEdge),
}

/// Best known arrival at a stop, in seconds since the service day's
/// midnight, and the step that achieved it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Label {
    pub arrival: f64,
    pub via: Step,
}

/// Result of a successful search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// One label per graph stop; `None` for stops never reached
    pub labels: Vec<Option<Label>>,
    /// Stop from which the destination is walked to
    pub exit: StopIdx,
    pub exit_walk_m: f64,
    /// Arrival at the destination coordinates
    pub arrival: f64,
    /// Number of heap entries processed
    pub settled: usize,
}

/// Parameters that do not vary during a search.
#[derive(Debug, Clone, Copy)]
pub struct SearchParams {
    /// Seconds since midnight at which the traveller leaves the origin
    pub depart_at: f64,
    pub walk_speed_mps: f64,
    pub epsilon_s: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct State {
    arrival: f64,
    stop: StopIdx,
}

impl Eq for State {}

impl Ord for State {
    // Reversed so the max-heap pops the earliest arrival
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .arrival
            .total_cmp(&self.arrival)
            .then_with(|| other.stop.cmp(&self.stop))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find the earliest arrival at the destination.
///
/// `access` lists the stops walkable from the origin, `egress` those from
/// which the destination can be walked to. Fails with
/// [`RouteError::NoRouteFound`] if either is empty or no egress stop is
/// ever reached.
pub fn earliest_arrival(
    graph: &TransitGraph,
    access: &[Access],
    egress: &[Access],
    params: SearchParams,
) -> Result<SearchOutcome, RouteError> {
    let walk = |distance_m: f64| walk_seconds(distance_m, params.walk_speed_mps);

    // Nearest walk-out per stop
    let mut exits: HashMap<StopIdx, f64> = HashMap::with_capacity(egress.len());
    for e in egress {
        exits
            .entry(e.stop)
            .and_modify(|d| *d = d.min(e.distance_m))
            .or_insert(e.distance_m);
    }

    let mut labels: Vec<Option<Label>> = vec![None; graph.stop_count()];
    let mut heap = BinaryHeap::new();

    for a in access {
        let Some(slot) = labels.get_mut(a.stop.0 as usize) else {
            continue;
        };
        let arrival = params.depart_at + walk(a.distance_m);
        if slot.is_none_or(|l| arrival < l.arrival) {
            *slot = Some(Label {
                arrival,
                via: Step::WalkFromOrigin {
                    distance_m: a.distance_m,
                },
            });
            heap.push(State {
                arrival,
                stop: a.stop,
            });
        }
    }

    if heap.is_empty() || exits.is_empty() {
        debug!(
            access = access.len(),
            egress = egress.len(),
            "no walkable stops at one end"
        );
        return Err(RouteError::NoRouteFound);
    }

    // (arrival at destination, exit stop, walk-out distance)
    let mut best: Option<(f64, StopIdx, f64)> = None;
    let mut settled = 0usize;

    while let Some(State { arrival, stop }) = heap.pop() {
        let Some(label) = labels[stop.0 as usize] else {
            continue;
        };
        if arrival > label.arrival {
            continue;
        }
        if best.is_some_and(|(b, _, _)| arrival > b) {
            break;
        }
        settled += 1;

        if let Some(&distance_m) = exits.get(&stop) {
            let total = arrival + walk(distance_m);
            if best.is_none_or(|(b, _, _)| total < b) {
                best = Some((total, stop, distance_m));
            }
        }

        for edge in graph.edges_from(stop) {
            if edge.departure.as_f64() + params.epsilon_s < arrival {
                continue;
            }
            let reached = edge.arrival.as_f64();
            let target = &mut labels[edge.to.0 as usize];
            if target.is_none_or(|l| reached < l.arrival) {
                *target = Some(Label {
                    arrival: reached,
                    via: Step::Ride(*edge),
                });
                heap.push(State {
                    arrival: reached,
                    stop: edge.to,
                });
            }
        }
    }

    let Some((arrival, exit, exit_walk_m)) = best else {
        debug!(settled, "search exhausted without reaching the destination");
        return Err(RouteError::NoRouteFound);
    };

    debug!(settled, arrival, "search finished");
    Ok(SearchOutcome {
        labels,
        exit,
        exit_walk_m,
        arrival,
        settled,
    })
}
