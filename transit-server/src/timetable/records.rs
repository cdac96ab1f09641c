//! Serialized timetable records.
//!
//! These mirror the three tables of the timetable database (`stops`,
//! `trips`, `stop_times`) using the GTFS column names. They are loose on
//! purpose: values that came through a CSV import may be text where a
//! number is expected, and are only validated when converted into domain
//! types.

use serde::{Deserialize, Serialize};

use crate::domain::{DataIssue, Stop, StopId, StopVisit, Trip};

/// A full timetable dump.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimetableSnapshot {
    #[serde(default)]
    pub stops: Vec<StopRecord>,
    #[serde(default)]
    pub trips: Vec<TripRecord>,
    #[serde(default)]
    pub stop_times: Vec<StopTimeRecord>,
}

/// A coordinate column, stored either as a number or as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoordinateValue {
    Number(f64),
    Text(String),
}

impl CoordinateValue {
    /// The value as a finite number, if it is one.
    pub fn as_finite(&self) -> Option<f64> {
        let value = match self {
            CoordinateValue::Number(n) => *n,
            CoordinateValue::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }

    fn describe(value: Option<&CoordinateValue>) -> String {
        match value {
            Some(CoordinateValue::Number(n)) => n.to_string(),
            Some(CoordinateValue::Text(s)) => format!("{s:?}"),
            None => "null".to_string(),
        }
    }
}

/// A row of the `stops` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopRecord {
    pub stop_id: String,
    #[serde(default)]
    pub stop_name: Option<String>,
    #[serde(default)]
    pub stop_lat: Option<CoordinateValue>,
    #[serde(default)]
    pub stop_lon: Option<CoordinateValue>,
}

impl StopRecord {
    /// Convert into a domain stop.
    ///
    /// Unusable coordinates do not reject the stop; they are reported
    /// alongside it and the stop is kept without a position.
    pub fn into_stop(self) -> (Stop, Option<DataIssue>) {
        let name = self.stop_name.unwrap_or_default();
        let lat = self.stop_lat.as_ref().and_then(CoordinateValue::as_finite);
        let lon = self.stop_lon.as_ref().and_then(CoordinateValue::as_finite);

        match (lat, lon) {
            (Some(lat), Some(lon)) => (Stop::new(self.stop_id, name, lat, lon), None),
            _ => {
                let issue = DataIssue::BadCoordinates {
                    stop: StopId::new(self.stop_id.clone()),
                    latitude: CoordinateValue::describe(self.stop_lat.as_ref()),
                    longitude: CoordinateValue::describe(self.stop_lon.as_ref()),
                };
                (Stop::without_coordinates(self.stop_id, name), Some(issue))
            }
        }
    }
}

/// A row of the `trips` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRecord {
    pub trip_id: String,
    pub route_id: String,
    #[serde(default)]
    pub trip_headsign: Option<String>,
}

impl From<TripRecord> for Trip {
    fn from(record: TripRecord) -> Self {
        Trip::new(record.trip_id, record.route_id, record.trip_headsign)
    }
}

/// A row of the `stop_times` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopTimeRecord {
    pub trip_id: String,
    pub arrival_time: String,
    pub departure_time: String,
    pub stop_id: String,
    pub stop_sequence: u32,
}

impl From<StopTimeRecord> for StopVisit {
    fn from(record: StopTimeRecord) -> Self {
        StopVisit::new(
            record.trip_id,
            record.stop_id,
            record.stop_sequence,
            record.arrival_time,
            record.departure_time,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinates;

    #[test]
    fn deserialize_numeric_and_text_coordinates() {
        let json = r#"{
            "stops": [
                {"stop_id": "A", "stop_name": "Stop A", "stop_lat": 51.1079, "stop_lon": 17.0385},
                {"stop_id": "B", "stop_name": "Stop B", "stop_lat": "51.11", "stop_lon": " 17.05 "}
            ]
        }"#;
        let snapshot: TimetableSnapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.trips.is_empty());

        let stops: Vec<_> = snapshot
            .stops
            .into_iter()
            .map(StopRecord::into_stop)
            .collect();
        assert_eq!(stops[0].0.coordinates(), Some(Coordinates::new(51.1079, 17.0385)));
        assert_eq!(stops[1].0.coordinates(), Some(Coordinates::new(51.11, 17.05)));
        assert!(stops.iter().all(|(_, issue)| issue.is_none()));
    }

    #[test]
    fn unusable_coordinates_reported() {
        let json = r#"{"stop_id": "X", "stop_name": "Broken", "stop_lat": "n/a", "stop_lon": null}"#;
        let record: StopRecord = serde_json::from_str(json).unwrap();
        let (stop, issue) = record.into_stop();

        assert!(stop.coordinates().is_none());
        assert_eq!(stop.name, "Broken");
        assert_eq!(
            issue.unwrap().to_string(),
            r#"stop X has unusable coordinates ("n/a", null)"#
        );
    }

    #[test]
    fn nan_text_is_not_finite() {
        assert_eq!(CoordinateValue::Text("NaN".into()).as_finite(), None);
        assert_eq!(CoordinateValue::Text("inf".into()).as_finite(), None);
        assert_eq!(CoordinateValue::Number(1.5).as_finite(), Some(1.5));
    }

    #[test]
    fn missing_headsign_is_none() {
        let record: TripRecord =
            serde_json::from_str(r#"{"trip_id": "T1", "route_id": "31"}"#).unwrap();
        let trip = Trip::from(record);
        assert_eq!(trip.headsign, None);
        assert_eq!(trip.route_id, "31");
    }

    #[test]
    fn stop_time_conversion() {
        let record: StopTimeRecord = serde_json::from_str(
            r#"{"trip_id": "T1", "arrival_time": "08:00:00", "departure_time": "08:01:00",
                "stop_id": "A", "stop_sequence": 4}"#,
        )
        .unwrap();
        let visit = StopVisit::from(record);
        assert_eq!(visit.sequence, 4);
        assert_eq!(visit.departure, "08:01:00");
    }
}
