//! Application state for the web layer.

use std::sync::Arc;

use crate::planner::PlannerConfig;
use crate::timetable::InMemoryTimetable;

/// Shared application state.
///
/// Everything here is read-only after startup, so handlers share it
/// without locking.
#[derive(Clone)]
pub struct AppState {
    /// Loaded timetable
    pub timetable: Arc<InMemoryTimetable>,

    /// Planner defaults
    pub config: Arc<PlannerConfig>,

    /// The one city this timetable covers, lowercase
    pub city: Arc<str>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(timetable: InMemoryTimetable, config: PlannerConfig, city: &str) -> Self {
        Self {
            timetable: Arc::new(timetable),
            config: Arc::new(config),
            city: Arc::from(city.to_lowercase()),
        }
    }

    /// Returns true if requests for `city` are served (case-insensitive).
    pub fn serves(&self, city: &str) -> bool {
        city.to_lowercase() == *self.city
    }
}
