//! Stop types.

use std::fmt;

use super::Coordinates;

/// A timetable stop identifier.
///
/// Identifiers are opaque strings taken verbatim from the timetable.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StopId(String);

impl StopId {
    /// Create a stop identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopId({})", self.0)
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StopId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A place where trips call.
///
/// Coordinates are only present when both latitude and longitude are
/// finite numbers. Stops without coordinates still take part in the
/// transit graph but never appear in spatial candidate sets.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
    coordinates: Option<Coordinates>,
}

impl Stop {
    /// Create a stop, discarding coordinates that are not finite.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_server::domain::Stop;
    ///
    /// let stop = Stop::new("WR-1001", "Dworzec Główny", 51.0987, 17.0362);
    /// assert!(stop.coordinates().is_some());
    ///
    /// let broken = Stop::new("WR-X", "Nowhere", f64::NAN, 17.0);
    /// assert!(broken.coordinates().is_none());
    /// ```
    pub fn new(id: impl Into<String>, name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        let coordinates = Coordinates::new(latitude, longitude);
        Self {
            id: StopId::new(id),
            name: name.into(),
            coordinates: coordinates.is_finite().then_some(coordinates),
        }
    }

    /// Create a stop whose coordinates could not be read.
    pub fn without_coordinates(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: StopId::new(id),
            name: name.into(),
            coordinates: None,
        }
    }

    /// Returns the stop's position, if known.
    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }
}
