//! Data quality issues.
//!
//! Timetable data is imported as-is, so individual records may be
//! unusable. These issues are recovered locally by skipping the record;
//! they are reported to the diagnostics sink and never surfaced to callers.

use super::{StopId, TimeError, TripId};

/// A timetable record that had to be excluded.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DataIssue {
    /// A stop's latitude or longitude is not a finite number
    #[error("stop {stop} has unusable coordinates ({latitude}, {longitude})")]
    BadCoordinates {
        stop: StopId,
        latitude: String,
        longitude: String,
    },

    /// A stop-visit time could not be parsed
    #[error("trip {trip} at stop {stop} has a malformed time: {source}")]
    BadTime {
        trip: TripId,
        stop: StopId,
        source: TimeError,
    },

    /// Consecutive visits of a trip run backwards in time
    #[error("trip {trip} arrives at {to} ({arrival}s) before leaving {from} ({departure}s)")]
    NonMonotonicEdge {
        trip: TripId,
        from: StopId,
        to: StopId,
        departure: u32,
        arrival: u32,
    },

    /// A record references a stop or trip that does not exist
    #[error("{kind} {id} is referenced but not defined")]
    DanglingReference { kind: &'static str, id: String },
}
