//! Timetable invariant checks.
//!
//! Verifies the structural invariants the engine guarantees on every
//! output:
//! - Dense 1..=N slot orders
//! - First slot starts at the anchor
//! - Strict chaining (each start equals the previous end)
//! - Every end strictly after its start (rollover applied)
//! - At most one slot per performer
//!
//! The engine never produces a violating timetable, so this is a
//! diagnostic surface: hosts can sanity-check externally supplied state,
//! and tests use it to assert engine outputs wholesale.

use std::collections::HashSet;

use crate::engine::end_follows_start;
use crate::models::Timetable;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Slot orders are not exactly 1..=N in sequence.
    NonDenseOrder,
    /// The first slot does not start at the anchor.
    AnchorMismatch,
    /// A slot does not start where the previous one ends.
    ChainBreak,
    /// A slot's end is not strictly after its start.
    InvalidDuration,
    /// Two slots share a performer.
    DuplicatePerformer,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a timetable against the engine's invariants.
///
/// An empty timetable is valid. Returns `Ok(())` if all checks pass,
/// `Err(errors)` with every detected issue.
pub fn validate_timetable(timetable: &Timetable) -> ValidationResult {
    let mut errors = Vec::new();

    let mut performers = HashSet::new();
    for (index, slot) in timetable.slots.iter().enumerate() {
        let expected_order = index as u32 + 1;
        if slot.order != expected_order {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonDenseOrder,
                format!(
                    "Slot for '{}' has order {} at position {expected_order}",
                    slot.performer_id, slot.order
                ),
            ));
        }

        if !performers.insert(slot.performer_id.clone()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicatePerformer,
                format!("Performer '{}' holds more than one slot", slot.performer_id),
            ));
        }

        if index == 0 {
            if slot.start != timetable.anchor_start {
                errors.push(ValidationError::new(
                    ValidationErrorKind::AnchorMismatch,
                    format!(
                        "First slot starts at {} but the anchor is {}",
                        slot.start, timetable.anchor_start
                    ),
                ));
            }
        } else {
            let previous = &timetable.slots[index - 1];
            if slot.start != previous.end {
                errors.push(ValidationError::new(
                    ValidationErrorKind::ChainBreak,
                    format!(
                        "Slot for '{}' starts at {} but the previous slot ends at {}",
                        slot.performer_id, slot.start, previous.end
                    ),
                ));
            }
        }

        if !end_follows_start(slot.start, slot.end) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDuration,
                format!(
                    "Slot for '{}' ends at {} which is not after its {} start",
                    slot.performer_id, slot.end, slot.start
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
