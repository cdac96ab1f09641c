//! Timetable time handling.
//!
//! Timetables give times of day as "HH:MM:SS" strings. Following the GTFS
//! convention, the hour may exceed 23 for services that continue past
//! midnight ("25:10:00" is 01:10 the next morning). This module keeps those
//! times as plain seconds since the service day's midnight, never wrapping
//! them, and anchors them to a calendar day only when rendering.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use std::fmt;

/// Seconds in one calendar day.
pub const SECONDS_PER_DAY: u32 = 86_400;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A scheduled time as seconds since the service day's midnight.
///
/// Values of 86400 and above denote times after midnight on a service
/// that started the previous day.
///
/// # Examples
///
/// ```
/// use transit_server::domain::ServiceTime;
///
/// let t = ServiceTime::parse("08:05:30").unwrap();
/// assert_eq!(t.seconds(), 29_130);
///
/// let late = ServiceTime::parse("25:00:00").unwrap();
/// assert_eq!(late.seconds(), 90_000);
/// assert_eq!(late.to_string(), "25:00:00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ServiceTime(u32);

impl ServiceTime {
    /// Create a time from seconds since midnight.
    pub fn from_seconds(seconds: u32) -> Self {
        Self(seconds)
    }

    /// Parse an "HH:MM:SS" string.
    ///
    /// The hour has at least one digit and is not limited to 23. Minutes and
    /// seconds are exactly two digits in 00-59. Surrounding whitespace is
    /// ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_server::domain::ServiceTime;
    ///
    /// assert!(ServiceTime::parse("00:00:00").is_ok());
    /// assert!(ServiceTime::parse("7:45:00").is_ok());
    /// assert!(ServiceTime::parse("24:10:00").is_ok());
    ///
    /// assert!(ServiceTime::parse("08:05").is_err());
    /// assert!(ServiceTime::parse("08:60:00").is_err());
    /// assert!(ServiceTime::parse("ab:cd:ef").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let mut parts = s.trim().split(':');
        let (Some(h), Some(m), Some(sec), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TimeError::new("expected HH:MM:SS format"));
        };

        if h.is_empty() || h.len() > 3 || !h.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TimeError::new("invalid hour digits"));
        }
        let hour: u32 = h
            .parse()
            .map_err(|_| TimeError::new("invalid hour digits"))?;

        let minute =
            parse_two_digits(m.as_bytes()).ok_or_else(|| TimeError::new("invalid minute digits"))?;
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }

        let second =
            parse_two_digits(sec.as_bytes()).ok_or_else(|| TimeError::new("invalid second digits"))?;
        if second > 59 {
            return Err(TimeError::new("second must be 0-59"));
        }

        Ok(Self(hour * 3600 + minute * 60 + second))
    }

    /// Time of day of a wall-clock time, truncated to whole seconds.
    pub fn of_day(time: NaiveTime) -> Self {
        Self(time.num_seconds_from_midnight())
    }

    /// Returns the seconds since midnight.
    pub fn seconds(&self) -> u32 {
        self.0
    }

    /// Returns the seconds since midnight as a float, for search arithmetic.
    pub fn as_f64(&self) -> f64 {
        f64::from(self.0)
    }

    /// Anchor this time to a service day, in UTC.
    ///
    /// Times past 24:00:00 land on the following calendar day.
    pub fn on(&self, service_day: NaiveDate) -> DateTime<Utc> {
        service_day_start(service_day) + Duration::seconds(i64::from(self.0))
    }
}

impl fmt::Display for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.0 / 3600,
            (self.0 % 3600) / 60,
            self.0 % 60
        )
    }
}

/// Midnight at the start of a service day, in UTC.
pub fn service_day_start(service_day: NaiveDate) -> DateTime<Utc> {
    service_day.and_time(NaiveTime::MIN).and_utc()
}

/// Seconds elapsed between the reference's midnight and the reference.
///
/// Keeps sub-second precision so walking offsets added later stay exact.
pub fn seconds_since_midnight(reference: NaiveDateTime) -> f64 {
    let time = reference.time();
    f64::from(time.num_seconds_from_midnight()) + f64::from(time.nanosecond()) / 1e9
}

/// Render a fractional offset from a service day's midnight as a timestamp.
///
/// Offsets are rounded to whole milliseconds.
///
/// # Examples
///
/// ```
/// use transit_server::domain::timestamp_at;
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2025, 4, 2).unwrap();
/// let ts = timestamp_at(day, 90_000.0);
/// assert_eq!(ts.to_rfc3339(), "2025-04-03T01:00:00+00:00");
/// ```
pub fn timestamp_at(service_day: NaiveDate, seconds: f64) -> DateTime<Utc> {
    service_day_start(service_day) + Duration::milliseconds((seconds * 1000.0).round() as i64)
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 2).unwrap()
    }

    #[test]
    fn parse_valid_times() {
        assert_eq!(ServiceTime::parse("00:00:00").unwrap().seconds(), 0);
        assert_eq!(ServiceTime::parse("08:05:30").unwrap().seconds(), 29_130);
        assert_eq!(ServiceTime::parse("23:59:59").unwrap().seconds(), 86_399);
    }

    #[test]
    fn parse_past_midnight_without_wrapping() {
        let t = ServiceTime::parse("24:00:00").unwrap();
        assert_eq!(t.seconds(), SECONDS_PER_DAY);

        let t = ServiceTime::parse("25:00:00").unwrap();
        assert_eq!(t.seconds(), 90_000);
    }

    #[test]
    fn parse_single_digit_hour_and_whitespace() {
        assert_eq!(ServiceTime::parse("8:05:30").unwrap().seconds(), 29_130);
        assert_eq!(ServiceTime::parse(" 08:05:30 ").unwrap().seconds(), 29_130);
    }

    #[test]
    fn reject_invalid_format() {
        assert!(ServiceTime::parse("").is_err());
        assert!(ServiceTime::parse("08:05").is_err());
        assert!(ServiceTime::parse("08:05:30:00").is_err());
        assert!(ServiceTime::parse("08-05-30").is_err());
        assert!(ServiceTime::parse(":05:30").is_err());
        assert!(ServiceTime::parse("08:5:30").is_err());
        assert!(ServiceTime::parse("-1:05:30").is_err());
    }

    #[test]
    fn reject_out_of_range() {
        assert!(ServiceTime::parse("08:60:00").is_err());
        assert!(ServiceTime::parse("08:00:60").is_err());
    }

    #[test]
    fn display_pads_and_keeps_large_hours() {
        assert_eq!(ServiceTime::from_seconds(29_130).to_string(), "08:05:30");
        assert_eq!(ServiceTime::from_seconds(90_000).to_string(), "25:00:00");
    }

    #[test]
    fn of_day_truncates_subseconds() {
        let t = NaiveTime::from_hms_milli_opt(7, 59, 0, 900).unwrap();
        assert_eq!(ServiceTime::of_day(t).seconds(), 7 * 3600 + 59 * 60);
    }

    #[test]
    fn on_service_day_rolls_past_midnight() {
        let t = ServiceTime::from_seconds(90_000);
        let expected = day()
            .succ_opt()
            .unwrap()
            .and_hms_opt(1, 0, 0)
            .unwrap()
            .and_utc();
        assert_eq!(t.on(day()), expected);
    }

    #[test]
    fn seconds_since_midnight_keeps_fraction() {
        let reference = day().and_hms_milli_opt(7, 59, 0, 500).unwrap();
        assert_eq!(seconds_since_midnight(reference), 28_740.5);
    }

    #[test]
    fn timestamp_at_rounds_to_millis() {
        let ts = timestamp_at(day(), 28_800.0004);
        assert_eq!(ts, day().and_hms_opt(8, 0, 0).unwrap().and_utc());
    }
}
