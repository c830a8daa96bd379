//! Strict-chaining performer timetable engine.
//!
//! Maintains the ordered set-time schedule for the performers booked on a
//! single event: slot 1 starts at the event's anchor time, and every later
//! slot starts exactly where the previous one ends. End times default to a
//! fixed slot length unless a user has typed one by hand, and late-night
//! chains roll over midnight (a 23:00 start flows into a 01:00 end).
//!
//! # Modules
//!
//! - **`models`**: Domain types — [`TimeOfDay`](models::TimeOfDay),
//!   [`PerformerId`](models::PerformerId), [`Slot`](models::Slot),
//!   [`Timetable`](models::Timetable), wire-format [`SlotRecord`](models::SlotRecord)
//! - **`engine`**: [`TimetableEngine`](engine::TimetableEngine) — rebuild,
//!   recalculate, reorder, manual-end edits, serialization
//! - **`validation`**: Invariant checks (dense order, strict chaining,
//!   positive durations, unique performers)
//!
//! # Architecture
//!
//! The engine is a pure library: no I/O, no clock reads, no shared state.
//! A host UI layer owns the one live `Timetable`, pushes selection changes,
//! drag reorders, and field edits into the engine, and persists the
//! serialized form through its own storage layer.

pub mod engine;
pub mod models;
pub mod validation;
