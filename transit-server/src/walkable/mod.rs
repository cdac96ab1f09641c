//! Walking access to the stop network.
//!
//! Travellers start and end at arbitrary coordinates. This module finds
//! the stops close enough to walk to, and converts walking distances into
//! walking times.

use std::cmp::Ordering;

use crate::domain::{Coordinates, Stop};

/// A stop within walking range of some point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkableStop<'a> {
    pub stop: &'a Stop,
    /// Great-circle distance from the point, in meters
    pub distance_m: f64,
}

/// Find the stops within `radius_m` meters of `origin`, nearest first.
///
/// The boundary is inclusive. Ties keep input order. Stops without
/// usable coordinates are skipped.
///
/// # Examples
///
/// ```
/// use transit_server::domain::{Coordinates, Stop};
/// use transit_server::walkable::find_stops_within;
///
/// let stops = vec![
///     Stop::new("far", "Far", 51.20, 17.00),
///     Stop::new("near", "Near", 51.1001, 17.00),
/// ];
/// let found = find_stops_within(&stops, Coordinates::new(51.10, 17.00), 500.0);
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].stop.id.as_str(), "near");
/// ```
pub fn find_stops_within(stops: &[Stop], origin: Coordinates, radius_m: f64) -> Vec<WalkableStop<'_>> {
    let mut found: Vec<WalkableStop<'_>> = stops
        .iter()
        .filter_map(|stop| {
            let distance_m = origin.distance_to(&stop.coordinates()?);
            (distance_m <= radius_m).then_some(WalkableStop { stop, distance_m })
        })
        .collect();

    // Stable: equal distances keep input order
    found.sort_by(|a, b| {
        a.distance_m
            .partial_cmp(&b.distance_m)
            .unwrap_or(Ordering::Equal)
    });
    found
}

/// Seconds needed to walk `distance_m` at `speed_mps`.
///
/// # Examples
///
/// ```
/// use transit_server::walkable::walk_seconds;
///
/// assert_eq!(walk_seconds(120.0, 1.2), 100.0);
/// ```
pub fn walk_seconds(distance_m: f64, speed_mps: f64) -> f64 {
    distance_m / speed_mps
}
