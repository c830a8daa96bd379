//! Performer slot model.
//!
//! A slot is one performer's booking within an event timetable: their
//! 1-based position in the running order, the derived start time, and an
//! end time that is either engine-derived (default slot length) or typed
//! by hand. The `is_manual_end` flag records which of the two it is, so a
//! rebuild knows whether to preserve the value.
//!
//! [`SlotRecord`] is the wire form handed to the host's persistence layer:
//! camelCase field names, no manual-end flag (that flag is session-local).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::TimeOfDay;

/// Opaque performer identifier, as supplied by the host's selection widget.
///
/// Stored as a string; deserializes from either a JSON string or a JSON
/// integer, since the host CMS keys performers numerically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawPerformerId")]
pub struct PerformerId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPerformerId {
    Number(i64),
    Text(String),
}

impl From<RawPerformerId> for PerformerId {
    fn from(raw: RawPerformerId) -> Self {
        match raw {
            RawPerformerId::Number(n) => Self(n.to_string()),
            RawPerformerId::Text(s) => Self(s),
        }
    }
}

impl From<&str> for PerformerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PerformerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<i64> for PerformerId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

impl PerformerId {
    /// The identifier as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PerformerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One performer's booking in the timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Performer occupying this slot.
    pub performer_id: PerformerId,
    /// 1-based position in the running order. Dense and unique within a
    /// timetable; 0 only transiently before renumbering.
    pub order: u32,
    /// Start time. Derived from the chain, never set directly.
    pub start: TimeOfDay,
    /// End time. User-supplied override or engine-derived default.
    pub end: TimeOfDay,
    /// Whether `end` was typed by a user this session. Manual ends survive
    /// rebuilds; derived ends are recomputed every pass.
    pub is_manual_end: bool,
}

impl Slot {
    /// Creates a placeholder slot for a performer.
    ///
    /// Times start at midnight and the order at 0; both are overwritten by
    /// the next recalculation pass.
    pub fn new(performer_id: impl Into<PerformerId>) -> Self {
        Self {
            performer_id: performer_id.into(),
            order: 0,
            start: TimeOfDay::MIDNIGHT,
            end: TimeOfDay::MIDNIGHT,
            is_manual_end: false,
        }
    }

    /// Sets start and end times.
    pub fn with_times(mut self, start: TimeOfDay, end: TimeOfDay) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Sets a user-entered end time.
    pub fn with_manual_end(mut self, end: TimeOfDay) -> Self {
        self.end = end;
        self.is_manual_end = true;
        self
    }

    /// Slot length in minutes, treating an end that wraps past midnight
    /// as next-day (23:00-01:00 is 120 minutes, not negative).
    pub fn duration_minutes(&self) -> i64 {
        let start = i64::from(self.start.hour()) * 60 + i64::from(self.start.minute());
        let end = i64::from(self.end.hour()) * 60 + i64::from(self.end.minute());
        (end - start).rem_euclid(24 * 60)
    }
}

/// Canonical serialized form of a slot.
///
/// This is the record shape the persistence collaborator stores alongside
/// the event: `{performerId, order, start, end}` with `"HH:MM"` times.
/// The anchor start and manual-end flags are not part of the wire form —
/// the host re-supplies the anchor on load, and manual flags are
/// session-local.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRecord {
    /// Performer identifier.
    pub performer_id: PerformerId,
    /// 1-based position as stored. May be sparse in old blobs; the engine
    /// renumbers densely on load.
    pub order: u32,
    /// Start time.
    pub start: TimeOfDay,
    /// End time.
    pub end: TimeOfDay,
}

impl From<&Slot> for SlotRecord {
    fn from(slot: &Slot) -> Self {
        Self {
            performer_id: slot.performer_id.clone(),
            order: slot.order,
            start: slot.start,
            end: slot.end,
        }
    }
}

impl From<SlotRecord> for Slot {
    fn from(record: SlotRecord) -> Self {
        Self {
            performer_id: record.performer_id,
            order: record.order,
            start: record.start,
            end: record.end,
            is_manual_end: false,
        }
    }
}
