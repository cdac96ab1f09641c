//! Route search entry points.
//!
//! [`Planner`] ties the pieces together: it reads the timetable through a
//! [`TimetableStore`], builds a fresh transit graph for each route query,
//! runs the earliest-arrival search and reconstructs the itinerary.

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::domain::{
    Coordinates, Departure, Itinerary, TripDetails, TripId, TripStop, seconds_since_midnight,
};
use crate::timetable::TimetableStore;
use crate::walkable::find_stops_within;

use super::config::PlannerConfig;
use super::departures::{DepartureQuery, closest_departures};
use super::earliest::{Access, SearchParams, earliest_arrival};
use super::graph::TransitGraph;
use super::reconstruct::{Endpoints, reconstruct};

/// Error from route search.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RouteError {
    /// No itinerary exists within the walking bounds
    #[error("no route found")]
    NoRouteFound,

    /// Invalid route request
    #[error("invalid route request: {0}")]
    InvalidRequest(String),

    /// Search bookkeeping is inconsistent; this is a bug
    #[error("internal routing error: {0}")]
    Invariant(String),
}

/// Request for a best-route search.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub origin: Coordinates,
    pub destination: Coordinates,
    /// When the traveller is ready to leave. Its date is the service day.
    pub reference: NaiveDateTime,
    /// Maximum walk at either end (meters)
    pub max_walk_m: f64,
    pub walk_speed_mps: f64,
}

impl RouteRequest {
    /// Create a request using the configured walking bounds.
    pub fn new(
        origin: Coordinates,
        destination: Coordinates,
        reference: NaiveDateTime,
        config: &PlannerConfig,
    ) -> Self {
        Self {
            origin,
            destination,
            reference,
            max_walk_m: config.max_walk_m,
            walk_speed_mps: config.walk_speed_mps,
        }
    }

    /// Validate the route request.
    pub fn validate(&self) -> Result<(), RouteError> {
        if !self.origin.is_finite() || !self.destination.is_finite() {
            return Err(RouteError::InvalidRequest(
                "coordinates must be finite".to_string(),
            ));
        }
        if !self.max_walk_m.is_finite() || self.max_walk_m < 0.0 {
            return Err(RouteError::InvalidRequest(
                "maximum walking distance must be a non-negative number".to_string(),
            ));
        }
        if !self.walk_speed_mps.is_finite() || self.walk_speed_mps <= 0.0 {
            return Err(RouteError::InvalidRequest(
                "walking speed must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Query planner over a timetable store.
pub struct Planner<'a, S: TimetableStore + ?Sized> {
    store: &'a S,
    config: &'a PlannerConfig,
}

impl<'a, S: TimetableStore + ?Sized> Planner<'a, S> {
    /// Create a new planner.
    pub fn new(store: &'a S, config: &'a PlannerConfig) -> Self {
        Self { store, config }
    }

    /// Departures near `origin` heading toward `destination`.
    pub fn closest_departures(
        &self,
        origin: Coordinates,
        destination: Coordinates,
        reference: NaiveDateTime,
        limit: usize,
        radius_m: f64,
    ) -> Vec<Departure> {
        let query = DepartureQuery {
            origin,
            destination,
            reference,
            limit,
            radius_m,
        };
        closest_departures(self.store, &query, self.config.visits_per_stop)
    }

    /// Fastest itinerary from origin to destination.
    pub fn best_route(&self, request: &RouteRequest) -> Result<Itinerary, RouteError> {
        request.validate()?;

        let graph = TransitGraph::build(self.store);
        let stops = self.store.stops();

        // Every store stop has a node, so the lookups cannot miss
        let walkable = |point: Coordinates| -> Vec<Access> {
            find_stops_within(stops, point, request.max_walk_m)
                .into_iter()
                .filter_map(|w| {
                    Some(Access {
                        stop: graph.index_of(&w.stop.id)?,
                        distance_m: w.distance_m,
                    })
                })
                .collect()
        };
        let access = walkable(request.origin);
        let egress = walkable(request.destination);
        debug!(
            access = access.len(),
            egress = egress.len(),
            "walkable stops"
        );

        let depart_at = seconds_since_midnight(request.reference);
        let params = SearchParams {
            depart_at,
            walk_speed_mps: request.walk_speed_mps,
            epsilon_s: self.config.boarding_epsilon_s,
        };
        let outcome = earliest_arrival(&graph, &access, &egress, params)?;

        let ends = Endpoints {
            origin: request.origin,
            destination: request.destination,
            service_day: request.reference.date(),
            depart_at,
            walk_speed_mps: request.walk_speed_mps,
        };
        let itinerary = reconstruct(self.store, &graph, &outcome, &ends)?;

        info!(
            settled = outcome.settled,
            legs = itinerary.legs().len(),
            transfers = itinerary.transfer_count(),
            "route found"
        );
        Ok(itinerary)
    }

    /// A trip and its calls, or `None` if the trip is unknown.
    ///
    /// Calls at stops missing from the stop table are left out.
    pub fn trip_details(&self, id: &TripId) -> Option<TripDetails> {
        let trip = self.store.trip(id)?.clone();
        let stops = self
            .store
            .trip_visits(id)
            .iter()
            .filter_map(|visit| {
                let stop = self.store.stop(&visit.stop_id)?;
                Some(TripStop {
                    stop_id: stop.id.clone(),
                    name: stop.name.clone(),
                    coordinates: stop.coordinates(),
                    sequence: visit.sequence,
                    arrival: visit.arrival.clone(),
                    departure: visit.departure.clone(),
                })
            })
            .collect();

        Some(TripDetails { trip, stops })
    }
}
