//! Strict-chaining timetable engine.
//!
//! Owns the derived-state rules for one event's running order: membership
//! reconciliation against the host's performer selection, the chaining
//! pass that recomputes every start/end, list-move reordering, manual
//! end-time edits, and the wire-format conversion the host persists.
//!
//! # Chaining rule
//!
//! Slot 1 starts at the event anchor; every later slot starts where the
//! previous one ends. An end time is either a user-entered override
//! (kept while it stays strictly after its recomputed start) or the
//! engine default of two hours past the start. Ends that cross midnight
//! are read as next-day when the start is in the evening, so a 23:00
//! start chains into 01:00, 03:00, 05:00.
//!
//! Every operation is a pure value transformation: no I/O, no clock, no
//! shared state. Identical inputs always produce identical timetables,
//! and no operation fails — anomalies (malformed blobs, out-of-range
//! reorders, unknown performers, invalid manual ends) degrade to safe
//! defaults rather than erroring, so the host editing UI never blocks.

use std::collections::HashSet;

use chrono::Duration;

use crate::models::{PerformerId, Slot, SlotRecord, TimeOfDay, Timetable};

/// Default slot length when no manual end is in force.
const DEFAULT_SLOT_HOURS: i64 = 2;

/// The timetable engine: pure operations over [`Timetable`] values.
///
/// Holds only configuration (the default slot length). The host owns the
/// one live timetable and threads it through each call.
///
/// # Example
/// ```
/// use settimes::engine::TimetableEngine;
/// use settimes::models::{PerformerId, TimeOfDay, Timetable};
///
/// let engine = TimetableEngine::new();
/// let anchor = TimeOfDay::new(23, 0).unwrap();
/// let lineup: Vec<PerformerId> = vec!["headliner".into(), "support".into()];
///
/// let table = engine.rebuild(&lineup, Timetable::new(anchor));
/// assert_eq!(table.slots[0].start, anchor);
/// assert_eq!(table.slots[1].start.to_string(), "01:00");
/// ```
#[derive(Debug, Clone)]
pub struct TimetableEngine {
    default_duration: Duration,
}

impl TimetableEngine {
    /// Creates an engine with the default two-hour slot length.
    pub fn new() -> Self {
        Self {
            default_duration: Duration::hours(DEFAULT_SLOT_HOURS),
        }
    }

    /// Overrides the default slot length.
    pub fn with_default_duration(mut self, duration: Duration) -> Self {
        self.default_duration = duration;
        self
    }

    /// Reconciles the timetable against the current performer selection.
    ///
    /// Performers already in `previous` keep their prior relative order
    /// (and their manual end, if any, carried verbatim for re-validation);
    /// performers no longer selected are dropped; new performers are
    /// appended in selection order. Duplicate ids in the selection yield a
    /// single slot. An empty selection yields an empty timetable — a valid
    /// state, not an error.
    pub fn rebuild(&self, selected: &[PerformerId], previous: Timetable) -> Timetable {
        let anchor = previous.anchor_start;

        let keep: HashSet<&PerformerId> = selected.iter().collect();
        let mut slots: Vec<Slot> = previous
            .slots
            .into_iter()
            .filter(|s| keep.contains(&s.performer_id))
            .collect();

        let mut present: HashSet<PerformerId> =
            slots.iter().map(|s| s.performer_id.clone()).collect();
        for id in selected {
            if present.insert(id.clone()) {
                slots.push(Slot::new(id.clone()));
            }
        }

        self.recalculate(
            anchor,
            Timetable {
                anchor_start: anchor,
                slots,
            },
        )
    }

    /// Recomputes every slot's start and end under the chaining rule.
    ///
    /// Walks the slots in order with a running cursor that begins at
    /// `anchor`: each slot starts at the cursor; a manual end that is
    /// still strictly after that start (with rollover applied) is kept,
    /// otherwise the end becomes start + default length and the manual
    /// flag is cleared; the cursor advances to the end.
    ///
    /// This is also the entry point for anchor changes from the host's
    /// event start-time field — membership is untouched, only times move.
    /// Pure and idempotent.
    pub fn recalculate(&self, anchor: TimeOfDay, mut timetable: Timetable) -> Timetable {
        timetable.anchor_start = anchor;
        timetable.renumber();

        let mut current = anchor;
        for slot in &mut timetable.slots {
            slot.start = current;
            if !(slot.is_manual_end && end_follows_start(current, slot.end)) {
                slot.is_manual_end = false;
                slot.end = current.plus(self.default_duration);
            }
            current = slot.end;
        }
        timetable
    }

    /// Moves the slot at `from_order` to `to_order` (1-based), shifting
    /// the slots between them, then re-chains.
    ///
    /// Out-of-range orders return the input unchanged. Reorders come from
    /// a drag gesture that cannot produce a bad index, so this guard is
    /// not a user-facing failure.
    pub fn reorder(&self, mut timetable: Timetable, from_order: u32, to_order: u32) -> Timetable {
        let len = timetable.len() as u32;
        if from_order < 1 || from_order > len || to_order < 1 || to_order > len {
            return timetable;
        }

        let slot = timetable.slots.remove(from_order as usize - 1);
        timetable.slots.insert(to_order as usize - 1, slot);

        let anchor = timetable.anchor_start;
        self.recalculate(anchor, timetable)
    }

    /// Records a user-entered end time for a performer's slot, then
    /// re-chains. Unknown performer → input returned unchanged.
    ///
    /// The value is accepted as typed; if it violates chaining it is
    /// replaced by the default derivation during the recalculation pass.
    pub fn set_manual_end(
        &self,
        mut timetable: Timetable,
        performer_id: &PerformerId,
        end: TimeOfDay,
    ) -> Timetable {
        let Some(index) = timetable
            .slots
            .iter()
            .position(|s| &s.performer_id == performer_id)
        else {
            return timetable;
        };
        let slot = &mut timetable.slots[index];
        slot.end = end;
        slot.is_manual_end = true;

        let anchor = timetable.anchor_start;
        self.recalculate(anchor, timetable)
    }

    /// Canonical external representation: one record per slot, ascending
    /// order, for handoff to the host's persistence layer.
    pub fn serialize(&self, timetable: &Timetable) -> Vec<SlotRecord> {
        timetable.slots.iter().map(SlotRecord::from).collect()
    }

    /// The serialized form as a JSON blob.
    pub fn serialize_json(&self, timetable: &Timetable) -> String {
        serde_json::to_string(&self.serialize(timetable)).unwrap_or_else(|_| String::from("[]"))
    }

    /// Parses a previously stored blob back into a timetable.
    ///
    /// The anchor is not part of the wire form; the host re-supplies it
    /// from the event's start-time field on every load. Malformed input
    /// yields an empty timetable at `anchor` — the host recovers by
    /// rebuilding from the current selection. Records are ordered by their
    /// stored `order` (sparse values are renumbered densely), duplicate
    /// performers keep their first record, and the result is re-chained so
    /// the usual invariants hold.
    pub fn deserialize(&self, raw: &str, anchor: TimeOfDay) -> Timetable {
        let mut records: Vec<SlotRecord> = match serde_json::from_str(raw) {
            Ok(records) => records,
            Err(_) => return Timetable::new(anchor),
        };
        records.sort_by_key(|r| r.order);

        let mut seen = HashSet::new();
        records.retain(|r| seen.insert(r.performer_id.clone()));

        let slots: Vec<Slot> = records.into_iter().map(Slot::from).collect();
        self.recalculate(
            anchor,
            Timetable {
                anchor_start: anchor,
                slots,
            },
        )
    }
}

impl Default for TimetableEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether `end` is strictly after `start` once rollover is applied.
pub(crate) fn end_follows_start(start: TimeOfDay, end: TimeOfDay) -> bool {
    end > start || rolls_over(start, end)
}

/// Midnight-rollover heuristic: a morning end (hour < 12) against an
/// afternoon-or-later start (hour > 12) belongs to the next day. A late
/// evening end behind a late evening start (22:30 against 23:00) stays
/// same-day and therefore reads as earlier. Known limitation: early
/// afternoon starts with very long overnight slots can be misread.
fn rolls_over(start: TimeOfDay, end: TimeOfDay) -> bool {
    start.hour() > 12 && end.hour() < 12
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> TimeOfDay {
        TimeOfDay::new(h, m).unwrap()
    }

    fn lineup(names: &[&str]) -> Vec<PerformerId> {
        names.iter().map(|&n| PerformerId::from(n)).collect()
    }

    fn spans(table: &Timetable) -> Vec<(String, String)> {
        table
            .slots
            .iter()
            .map(|s| (s.start.to_string(), s.end.to_string()))
            .collect()
    }

    fn assert_invariants(table: &Timetable) {
        for (i, slot) in table.slots.iter().enumerate() {
            assert_eq!(slot.order, i as u32 + 1, "orders must be dense 1..=N");
            if i == 0 {
                assert_eq!(slot.start, table.anchor_start);
            } else {
                assert_eq!(slot.start, table.slots[i - 1].end, "chain break at {i}");
            }
            assert!(end_follows_start(slot.start, slot.end));
        }
    }

    #[test]
    fn test_rebuild_from_empty_selection() {
        let engine = TimetableEngine::new();
        let table = engine.rebuild(&[], Timetable::new(t(20, 0)));
        assert!(table.is_empty());
        assert_eq!(table.anchor_start, t(20, 0));
    }

    #[test]
    fn test_rebuild_defaults_chain_from_anchor() {
        let engine = TimetableEngine::new();
        let table = engine.rebuild(&lineup(&["a", "b"]), Timetable::new(t(20, 0)));

        assert_eq!(
            spans(&table),
            vec![
                ("20:00".into(), "22:00".into()),
                ("22:00".into(), "00:00".into()),
            ]
        );
        assert_invariants(&table);
    }

    #[test]
    fn test_rollover_chain_from_late_anchor() {
        // 23:00 anchor, three default slots: 23-01, 01-03, 03-05.
        let engine = TimetableEngine::new();
        let table = engine.rebuild(&lineup(&["a", "b", "c"]), Timetable::new(t(23, 0)));

        assert_eq!(
            spans(&table),
            vec![
                ("23:00".into(), "01:00".into()),
                ("01:00".into(), "03:00".into()),
                ("03:00".into(), "05:00".into()),
            ]
        );
        assert_invariants(&table);
    }

    #[test]
    fn test_rebuild_membership() {
        let engine = TimetableEngine::new();
        let table = engine.rebuild(&lineup(&["a", "b", "c"]), Timetable::new(t(20, 0)));

        // c and a retained in prior relative order (a, c); d appended.
        let table = engine.rebuild(&lineup(&["c", "d", "a"]), table);
        let ids: Vec<&str> = table.performer_ids().iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "d"]);
        assert_invariants(&table);
    }

    #[test]
    fn test_rebuild_drops_removed_performers() {
        let engine = TimetableEngine::new();
        let table = engine.rebuild(&lineup(&["a", "b"]), Timetable::new(t(20, 0)));
        let table = engine.rebuild(&lineup(&["b"]), table);

        assert_eq!(table.len(), 1);
        assert_eq!(table.slots[0].performer_id.as_str(), "b");
        // b moves up to the anchor.
        assert_eq!(table.slots[0].start, t(20, 0));
    }

    #[test]
    fn test_rebuild_dedupes_selection() {
        let engine = TimetableEngine::new();
        let table = engine.rebuild(&lineup(&["a", "a", "b"]), Timetable::new(t(20, 0)));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_manual_end_preserved_across_rebuild() {
        let engine = TimetableEngine::new();
        let table = engine.rebuild(&lineup(&["a"]), Timetable::new(t(22, 0)));
        let table = engine.set_manual_end(table, &"a".into(), t(23, 30));
        assert_eq!(spans(&table), vec![("22:00".into(), "23:30".into())]);

        let table = engine.rebuild(&lineup(&["a", "b"]), table);
        assert_eq!(
            spans(&table),
            vec![
                ("22:00".into(), "23:30".into()),
                ("23:30".into(), "01:30".into()),
            ]
        );
        assert!(table.slots[0].is_manual_end);
        assert!(!table.slots[1].is_manual_end);
        assert_invariants(&table);
    }

    #[test]
    fn test_invalid_manual_end_discarded() {
        // 22:30 against a 23:00 start stays same-day, reads as earlier,
        // and is replaced by the default 23:00 + 2h = 01:00.
        let engine = TimetableEngine::new();
        let table = engine.rebuild(&lineup(&["a"]), Timetable::new(t(23, 0)));
        let table = engine.set_manual_end(table, &"a".into(), t(22, 30));

        assert_eq!(spans(&table), vec![("23:00".into(), "01:00".into())]);
        assert!(!table.slots[0].is_manual_end);
    }

    #[test]
    fn test_manual_end_equal_to_start_discarded() {
        let engine = TimetableEngine::new();
        let table = engine.rebuild(&lineup(&["a"]), Timetable::new(t(21, 0)));
        let table = engine.set_manual_end(table, &"a".into(), t(21, 0));

        assert_eq!(table.slots[0].end, t(23, 0));
        assert!(!table.slots[0].is_manual_end);
    }

    #[test]
    fn test_manual_end_rolls_over_midnight() {
        let engine = TimetableEngine::new();
        let table = engine.rebuild(&lineup(&["a", "b"]), Timetable::new(t(22, 0)));
        let table = engine.set_manual_end(table, &"a".into(), t(1, 30));

        assert_eq!(
            spans(&table),
            vec![
                ("22:00".into(), "01:30".into()),
                ("01:30".into(), "03:30".into()),
            ]
        );
        assert!(table.slots[0].is_manual_end);
    }

    #[test]
    fn test_set_manual_end_unknown_performer_is_noop() {
        let engine = TimetableEngine::new();
        let table = engine.rebuild(&lineup(&["a"]), Timetable::new(t(20, 0)));
        let after = engine.set_manual_end(table.clone(), &"ghost".into(), t(21, 0));
        assert_eq!(after, table);
    }

    #[test]
    fn test_recalculate_is_idempotent() {
        let engine = TimetableEngine::new();
        let table = engine.rebuild(&lineup(&["a", "b", "c"]), Timetable::new(t(23, 0)));
        let table = engine.set_manual_end(table, &"b".into(), t(2, 15));

        let once = engine.recalculate(t(23, 0), table);
        let twice = engine.recalculate(t(23, 0), once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_anchor_change_shifts_chain() {
        let engine = TimetableEngine::new();
        let table = engine.rebuild(&lineup(&["a", "b"]), Timetable::new(t(22, 0)));
        let table = engine.set_manual_end(table, &"a".into(), t(23, 30));

        // Earlier anchor: the manual end still follows the new start.
        let shifted = engine.recalculate(t(21, 0), table.clone());
        assert_eq!(
            spans(&shifted),
            vec![
                ("21:00".into(), "23:30".into()),
                ("23:30".into(), "01:30".into()),
            ]
        );
        assert!(shifted.slots[0].is_manual_end);

        // Later anchor: 23:30 no longer follows 23:45, so the override
        // is dropped for the default derivation.
        let late = engine.recalculate(t(23, 45), table);
        assert_eq!(spans(&late)[0], ("23:45".into(), "01:45".into()));
        assert!(!late.slots[0].is_manual_end);
    }

    #[test]
    fn test_reorder_moves_to_front() {
        let engine = TimetableEngine::new();
        let table = engine.rebuild(&lineup(&["a", "b", "c"]), Timetable::new(t(20, 0)));
        let table = engine.reorder(table, 3, 1);

        let ids: Vec<&str> = table.performer_ids().iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
        assert_eq!(table.slots[0].start, t(20, 0));
        assert_invariants(&table);
    }

    #[test]
    fn test_reorder_moves_to_back() {
        let engine = TimetableEngine::new();
        let table = engine.rebuild(&lineup(&["a", "b", "c"]), Timetable::new(t(20, 0)));
        let table = engine.reorder(table, 1, 3);

        let ids: Vec<&str> = table.performer_ids().iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
        assert_invariants(&table);
    }

    #[test]
    fn test_reorder_out_of_range_is_noop() {
        let engine = TimetableEngine::new();
        let table = engine.rebuild(&lineup(&["a", "b"]), Timetable::new(t(20, 0)));

        assert_eq!(engine.reorder(table.clone(), 0, 1), table);
        assert_eq!(engine.reorder(table.clone(), 1, 3), table);
        assert_eq!(engine.reorder(table.clone(), 5, 1), table);
    }

    #[test]
    fn test_reorder_same_position() {
        let engine = TimetableEngine::new();
        let table = engine.rebuild(&lineup(&["a", "b"]), Timetable::new(t(20, 0)));
        assert_eq!(engine.reorder(table.clone(), 2, 2), table);
    }

    #[test]
    fn test_serialize_records_ascending() {
        let engine = TimetableEngine::new();
        let table = engine.rebuild(&lineup(&["a", "b"]), Timetable::new(t(23, 0)));

        let records = engine.serialize(&table);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].order, 1);
        assert_eq!(records[0].start, t(23, 0));
        assert_eq!(records[1].order, 2);
        assert_eq!(records[1].end, t(3, 0));
    }

    #[test]
    fn test_json_round_trip() {
        let engine = TimetableEngine::new();
        let table = engine.rebuild(&lineup(&["a", "b", "c"]), Timetable::new(t(23, 0)));

        let blob = engine.serialize_json(&table);
        let back = engine.deserialize(&blob, t(23, 0));
        assert_eq!(back, table);
    }

    #[test]
    fn test_deserialize_malformed_yields_empty() {
        let engine = TimetableEngine::new();
        for raw in ["", "not json", "{\"a\":1}", "[1,2,3]", "null"] {
            let table = engine.deserialize(raw, t(20, 0));
            assert!(table.is_empty(), "expected empty for {raw:?}");
            assert_eq!(table.anchor_start, t(20, 0));
        }
    }

    #[test]
    fn test_deserialize_sorts_and_renumbers_sparse_orders() {
        let engine = TimetableEngine::new();
        let raw = r#"[
            {"performerId": 9, "order": 5, "start": "22:00", "end": "00:00"},
            {"performerId": 4, "order": 2, "start": "20:00", "end": "22:00"}
        ]"#;
        let table = engine.deserialize(raw, t(20, 0));

        let ids: Vec<&str> = table.performer_ids().iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["4", "9"]);
        assert_eq!(table.slots[0].order, 1);
        assert_eq!(table.slots[1].order, 2);
        assert_invariants(&table);
    }

    #[test]
    fn test_deserialize_keeps_first_duplicate() {
        let engine = TimetableEngine::new();
        let raw = r#"[
            {"performerId": "a", "order": 1, "start": "20:00", "end": "22:00"},
            {"performerId": "a", "order": 2, "start": "22:00", "end": "00:00"}
        ]"#;
        let table = engine.deserialize(raw, t(20, 0));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_custom_default_duration() {
        let engine = TimetableEngine::new().with_default_duration(Duration::minutes(90));
        let table = engine.rebuild(&lineup(&["a", "b"]), Timetable::new(t(22, 0)));

        assert_eq!(
            spans(&table),
            vec![
                ("22:00".into(), "23:30".into()),
                ("23:30".into(), "01:00".into()),
            ]
        );
    }

    #[test]
    fn test_rolls_over_heuristic() {
        assert!(rolls_over(t(23, 0), t(1, 0)));
        assert!(rolls_over(t(13, 0), t(11, 59)));
        assert!(!rolls_over(t(23, 0), t(22, 30))); // late end stays same-day
        assert!(!rolls_over(t(11, 0), t(1, 0))); // morning start never rolls
        assert!(!rolls_over(t(12, 0), t(1, 0))); // noon is not "after noon"
    }
}
