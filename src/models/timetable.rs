//! Timetable model.
//!
//! The ordered slot list for one event. Created the first time a performer
//! is selected, rebuilt in place on every selection change, edit, or
//! reorder, and discarded when the editing session ends. The host owns
//! persistence; the engine only guarantees the chaining invariants hold
//! after each operation.

use serde::{Deserialize, Serialize};

use super::{PerformerId, Slot, TimeOfDay};

/// The performer timetable for a single event.
///
/// Invariants maintained by the engine:
/// 1. `order` values are exactly `1..=N`, no gaps or duplicates.
/// 2. The first slot starts at `anchor_start`.
/// 3. Each later slot starts exactly where the previous one ends.
/// 4. Every slot's end is strictly after its start (with midnight
///    rollover applied).
/// 5. At most one slot per performer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timetable {
    /// The event's own start time; slot 1 always starts here.
    pub anchor_start: TimeOfDay,
    /// Slots in running order (ascending `order`).
    pub slots: Vec<Slot>,
}

impl Timetable {
    /// Creates an empty timetable anchored at the event start time.
    pub fn new(anchor_start: TimeOfDay) -> Self {
        Self {
            anchor_start,
            slots: Vec::new(),
        }
    }

    /// Appends a slot (test/builder convenience; the engine renumbers).
    pub fn with_slot(mut self, slot: Slot) -> Self {
        self.slots.push(slot);
        self
    }

    /// Number of slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the timetable has no slots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Finds the slot for a performer.
    pub fn slot_for(&self, performer_id: &PerformerId) -> Option<&Slot> {
        self.slots.iter().find(|s| &s.performer_id == performer_id)
    }

    /// Whether a performer holds a slot.
    pub fn contains(&self, performer_id: &PerformerId) -> bool {
        self.slot_for(performer_id).is_some()
    }

    /// Performer ids in running order.
    pub fn performer_ids(&self) -> Vec<&PerformerId> {
        self.slots.iter().map(|s| &s.performer_id).collect()
    }

    /// End time of the final slot, if any.
    pub fn last_end(&self) -> Option<TimeOfDay> {
        self.slots.last().map(|s| s.end)
    }

    /// Renumbers `order` densely as `1..=N` in current sequence order.
    pub fn renumber(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            slot.order = index as u32 + 1;
        }
    }
}
