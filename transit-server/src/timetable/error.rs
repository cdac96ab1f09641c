//! Timetable store error types.

use std::path::PathBuf;

/// Errors that can occur while loading a timetable snapshot.
#[derive(Debug, thiserror::Error)]
pub enum TimetableError {
    /// Reading or writing the snapshot file failed
    #[error("failed to access timetable {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The snapshot is not valid JSON or has the wrong shape
    #[error("failed to parse timetable {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}
