//! Itinerary planner.
//!
//! Answers two questions over a loaded timetable:
//!
//! - "What can I catch soon from here toward there?" ([`Planner::closest_departures`])
//! - "What is the fastest way from A to B leaving at T?" ([`Planner::best_route`])
//!
//! Best-route builds a graph of timetabled stop-to-stop hops, runs an
//! earliest-arrival search seeded by walking from the origin, and
//! reconstructs the winning chain of hops into walk and ride legs.

mod config;
mod departures;
mod direction;
mod earliest;
mod graph;
mod reconstruct;
mod search;


pub use config::PlannerConfig;
pub use departures::{DepartureQuery, closest_departures};
pub use direction::is_toward_destination;
pub use earliest::{Access, Label, SearchOutcome, SearchParams, Step, earliest_arrival};
pub use graph::{BuildStats, StopIdx, TransitEdge, TransitGraph, TripIdx};
pub use reconstruct::{Endpoints, reconstruct};
pub use search::{Planner, RouteError, RouteRequest};
