//! Planner configuration.

/// Defaults and tuning parameters for planner queries.
///
/// Request-level values (limit, radius, walking bounds) fall back to these
/// when the caller does not supply them.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Maximum number of departures returned by a closest-departures query.
    pub departures_limit: usize,

    /// Search radius around the origin for closest departures (meters).
    pub radius_m: f64,

    /// How many upcoming visits to inspect per candidate stop.
    pub visits_per_stop: usize,

    /// Maximum walking distance at either end of a route (meters).
    pub max_walk_m: f64,

    /// Walking speed (meters per second).
    pub walk_speed_mps: f64,

    /// Tolerance when comparing arrival and departure times (seconds).
    /// Absorbs float noise only; it is not a transfer buffer.
    pub boarding_epsilon_s: f64,
}

impl PlannerConfig {
    /// Override the walking bounds.
    pub fn with_walking(mut self, max_walk_m: f64, walk_speed_mps: f64) -> Self {
        self.max_walk_m = max_walk_m;
        self.walk_speed_mps = walk_speed_mps;
        self
    }

    /// Override the departure query bounds.
    pub fn with_departures(mut self, limit: usize, radius_m: f64) -> Self {
        self.departures_limit = limit;
        self.radius_m = radius_m;
        self
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            departures_limit: 5,
            radius_m: 1000.0,
            visits_per_stop: 3,
            max_walk_m: 1000.0,
            walk_speed_mps: 1.2,
            boarding_epsilon_s: 1e-6,
        }
    }
}
