//! Disk-based timetable snapshots.

use std::path::{Path, PathBuf};

use tracing::info;

use super::error::TimetableError;
use super::memory::InMemoryTimetable;
use super::records::TimetableSnapshot;

/// Where to find the timetable snapshot.
#[derive(Debug, Clone)]
pub struct TimetableConfig {
    /// Path to the JSON snapshot file.
    pub path: PathBuf,
}

impl TimetableConfig {
    /// Create a config for the given snapshot path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for TimetableConfig {
    fn default() -> Self {
        Self::new("data/timetable.json")
    }
}

/// Read a snapshot file without indexing it.
pub fn read_snapshot(path: &Path) -> Result<TimetableSnapshot, TimetableError> {
    let contents = std::fs::read_to_string(path).map_err(|source| TimetableError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&contents).map_err(|source| TimetableError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a snapshot file, creating parent directories if needed.
pub fn write_snapshot(path: &Path, snapshot: &TimetableSnapshot) -> Result<(), TimetableError> {
    let io_err = |source| TimetableError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let json = serde_json::to_string_pretty(snapshot).map_err(|source| TimetableError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    std::fs::write(path, json).map_err(io_err)
}

impl InMemoryTimetable {
    /// Load and index the snapshot named by the config.
    pub fn load(config: &TimetableConfig) -> Result<Self, TimetableError> {
        info!(path = %config.path.display(), "loading timetable snapshot");
        let snapshot = read_snapshot(&config.path)?;
        Ok(Self::from_snapshot(snapshot))
    }
}
