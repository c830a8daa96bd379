//! Timetable domain models.
//!
//! Core data types for one event's performer timetable: wall-clock times
//! with no date component, performer identifiers as supplied by the host's
//! selection widget, the slots they occupy, and the timetable that chains
//! them together.
//!
//! Times deliberately carry no calendar date — the engine only knows the
//! event's anchor start time-of-day and slot durations. Crossing midnight
//! is a policy decision made in [`engine`](crate::engine), not here.

mod slot;
mod time_of_day;
mod timetable;

pub use slot::{PerformerId, Slot, SlotRecord};
pub use time_of_day::TimeOfDay;
pub use timetable::Timetable;
