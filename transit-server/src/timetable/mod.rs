//! Timetable store.
//!
//! The planner reads the timetable through the [`TimetableStore`] trait:
//! stops, trips and the stop-visits of each trip. All reads happen before
//! a search starts; nothing in this module is consulted from inside the
//! search loop.
//!
//! The bundled implementation, [`InMemoryTimetable`], is loaded once at
//! startup from a JSON snapshot of the timetable database.

mod error;
mod memory;
pub mod records;
mod snapshot;

pub use error::TimetableError;
pub use memory::InMemoryTimetable;
pub use records::TimetableSnapshot;
pub use snapshot::{TimetableConfig, read_snapshot, write_snapshot};

use crate::domain::{ServiceTime, Stop, StopId, StopVisit, Trip, TripId};

/// Read access to a loaded timetable.
///
/// This abstraction allows the planner to be tested with hand-built data.
pub trait TimetableStore {
    /// All stops, in load order.
    fn stops(&self) -> &[Stop];

    /// All trips, in load order.
    fn trips(&self) -> &[Trip];

    /// Look up a stop by identifier.
    fn stop(&self, id: &StopId) -> Option<&Stop>;

    /// Look up a trip by identifier.
    fn trip(&self, id: &TripId) -> Option<&Trip>;

    /// All stop-visits, ordered by trip identifier then sequence number.
    fn stop_visits_ordered(&self) -> &[StopVisit];

    /// One trip's stop-visits, ordered by sequence number.
    fn trip_visits(&self, trip: &TripId) -> &[StopVisit];

    /// Up to `limit` visits at `stop` departing at or after `from`.
    ///
    /// Ordered by departure time ascending. Visits whose trip is unknown
    /// are skipped before the limit is applied.
    fn departures_from(
        &self,
        stop: &StopId,
        from: ServiceTime,
        limit: usize,
    ) -> Vec<(&StopVisit, &Trip)>;
}
