//! Geographic coordinates and great-circle distance.

use std::fmt;

/// Mean Earth radius in meters, for a spherical Earth model.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS84 point in degrees.
///
/// Values are not validated here; use [`Coordinates::is_finite`] at
/// ingestion boundaries before trusting them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Create a point from latitude and longitude in degrees.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns true if both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// Great-circle distance to another point, in meters.
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        distance_meters(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Haversine distance between two WGS84 points, in meters.
///
/// Total over all inputs: NaN coordinates yield NaN.
///
/// # Examples
///
/// ```
/// use transit_server::domain::distance_meters;
///
/// assert_eq!(distance_meters(51.1079, 17.0385, 51.1079, 17.0385), 0.0);
///
/// // Roughly 111 km per degree of latitude
/// let d = distance_meters(51.0, 17.0, 52.0, 17.0);
/// assert!((d - 111_195.0).abs() < 1.0);
/// ```
pub fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}
