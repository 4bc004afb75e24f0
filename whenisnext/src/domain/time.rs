//! Departure time handling.
//!
//! The realtime API sends expected times as local date-times without an
//! offset (`2024-03-15T10:05:00`). They are kept naive and compared against
//! the local wall clock.

use std::fmt;

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

/// The fixed textual format of `ExpectedDateTime`.
pub const EXPECTED_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Departures further ahead than this are presumed to be a day-boundary
/// artifact in the upstream timestamp and are not shown.
pub const MAX_MINUTES_AHEAD: i64 = 1000;

/// Error returned when parsing an invalid departure timestamp.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid departure time {input:?}: {reason}")]
pub struct TimeError {
    input: String,
    reason: String,
}

/// A single expected departure at the configured stop.
///
/// # Examples
///
/// ```
/// use whenisnext::domain::Departure;
///
/// let dep = Departure::parse("2024-03-15T14:30:00").unwrap();
/// assert_eq!(dep.to_string(), "14:30");
///
/// assert!(Departure::parse("2024-03-15 14:30").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Departure(NaiveDateTime);

impl Departure {
    /// Create a departure from a local date-time.
    pub fn new(at: NaiveDateTime) -> Self {
        Self(at)
    }

    /// Parse an `ExpectedDateTime` value (`YYYY-MM-DDTHH:MM:SS`).
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        NaiveDateTime::parse_from_str(s, EXPECTED_DATE_TIME_FORMAT)
            .map(Self)
            .map_err(|e| TimeError {
                input: s.to_string(),
                reason: e.to_string(),
            })
    }

    /// Returns the local date-time.
    pub fn at(&self) -> NaiveDateTime {
        self.0
    }

    /// Signed time from `now` until this departure.
    pub fn until(&self, now: NaiveDateTime) -> TimeDelta {
        self.0 - now
    }

    /// Whole minutes from `now` until this departure, truncated.
    ///
    /// Returns `None` when the departure is already in the past or more than
    /// [`MAX_MINUTES_AHEAD`] minutes away.
    pub fn minutes_ahead(&self, now: NaiveDateTime) -> Option<i64> {
        let delta = self.until(now);
        if delta < TimeDelta::zero() {
            return None;
        }
        let mins = delta.num_minutes();
        (mins <= MAX_MINUTES_AHEAD).then_some(mins)
    }
}

impl fmt::Display for Departure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn parse_expected_format() {
        let dep = Departure::parse("2024-03-15T10:05:00").unwrap();
        assert_eq!(dep.at(), at(10, 5));
    }

    #[test]
    fn parse_rejects_other_formats() {
        assert!(Departure::parse("2024-03-15T10:05").is_err());
        assert!(Departure::parse("2024-03-15 10:05:00").is_err());
        assert!(Departure::parse("2024-03-15T10:05:00+01:00").is_err());
        assert!(Departure::parse("").is_err());
    }

    #[test]
    fn parse_error_mentions_input() {
        let err = Departure::parse("soon").unwrap_err();
        assert!(err.to_string().contains("\"soon\""));
    }

    #[test]
    fn minutes_ahead_truncates() {
        let dep = Departure::new(at(10, 15));
        let now = at(10, 0) + TimeDelta::seconds(30);
        assert_eq!(dep.minutes_ahead(now), Some(14));
    }

    #[test]
    fn departing_now_is_zero_minutes() {
        let dep = Departure::new(at(10, 0));
        assert_eq!(dep.minutes_ahead(at(10, 0)), Some(0));
    }

    #[test]
    fn past_departure_is_hidden() {
        // 00:05 on the same date as a 10:00 clock: the day has wrapped upstream
        let dep = Departure::new(at(0, 5));
        assert_eq!(dep.minutes_ahead(at(10, 0)), None);
    }

    #[test]
    fn far_future_is_hidden() {
        let now = at(0, 0);
        assert_eq!(
            Departure::new(now + TimeDelta::minutes(1000)).minutes_ahead(now),
            Some(1000)
        );
        assert_eq!(
            Departure::new(now + TimeDelta::minutes(1001)).minutes_ahead(now),
            None
        );
    }

    #[test]
    fn serde_uses_plain_timestamp() {
        let dep = Departure::new(at(10, 5));
        let json = serde_json::to_string(&dep).unwrap();
        assert_eq!(json, "\"2024-03-15T10:05:00\"");
    }

    proptest! {
        /// Anything shown is within [0, MAX_MINUTES_AHEAD]
        #[test]
        fn shown_minutes_in_range(offset_secs in -200_000i64..200_000) {
            let now = at(12, 0);
            let dep = Departure::new(now + TimeDelta::seconds(offset_secs));
            if let Some(mins) = dep.minutes_ahead(now) {
                prop_assert!((0..=MAX_MINUTES_AHEAD).contains(&mins));
                prop_assert!(offset_secs >= 0);
            } else {
                prop_assert!(offset_secs < 0 || offset_secs / 60 > MAX_MINUTES_AHEAD);
            }
        }
    }
}
