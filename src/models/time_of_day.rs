//! Wall-clock time of day.
//!
//! The engine never knows the calendar date of an event — only its start
//! time-of-day and slot durations. `TimeOfDay` wraps [`chrono::NaiveTime`]
//! at minute resolution and serializes as an `"HH:MM"` string, the format
//! the host CMS stores and the timetable widget renders.
//!
//! Comparison (`PartialOrd`/`Ord`) is naive same-day ordering. Whether a
//! time that looks "earlier" actually belongs to the next day is the
//! engine's rollover policy, not a property of the type.

use chrono::{Duration, NaiveTime, Timelike};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A wall-clock time (hour and minute), no date component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// Midnight (00:00).
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(NaiveTime::MIN);

    /// Creates a time of day.
    ///
    /// Returns `None` if `hour` or `minute` is out of range.
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Hour component (0-23).
    #[inline]
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    /// Minute component (0-59).
    #[inline]
    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// Adds a duration, wrapping past midnight (23:00 + 2h = 01:00).
    pub fn plus(&self, duration: Duration) -> Self {
        let (time, _wrapped_secs) = self.0.overflowing_add_signed(duration);
        Self(time)
    }

    /// Adds whole hours, wrapping past midnight.
    pub fn plus_hours(&self, hours: i64) -> Self {
        self.plus(Duration::hours(hours))
    }

    /// Adds whole minutes, wrapping past midnight.
    pub fn plus_minutes(&self, minutes: i64) -> Self {
        self.plus(Duration::minutes(minutes))
    }
}

impl Default for TimeOfDay {
    fn default() -> Self {
        Self::MIDNIGHT
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s, "%H:%M").map(Self)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
