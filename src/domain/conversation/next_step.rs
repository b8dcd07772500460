//! Deterministic next-field resolution.
//!
//! The entire workflow logic of a conversation is one linear pass over
//! the blueprint's field list: skip everything that is already satisfied
//! or currently invisible, ask the first remaining field, declare
//! completion when nothing remains. The function is pure — repeated calls
//! with the same inputs give the same answer and nothing is mutated.

use crate::domain::blueprint::FieldDefinition;
use crate::domain::foundation::{FieldId, SlotMap};

/// Result of resolving the next step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextStep {
    /// Field to ask next, if any.
    pub next_field: Option<FieldId>,
    /// True when no unsatisfied visible field remains.
    pub is_complete: bool,
}

impl NextStep {
    /// Step asking the given field.
    pub fn ask(field: FieldId) -> Self {
        Self {
            next_field: Some(field),
            is_complete: false,
        }
    }

    /// Completion step.
    pub fn complete() -> Self {
        Self {
            next_field: None,
            is_complete: true,
        }
    }
}

/// Finds the next field to ask, in declaration order.
///
/// A field is skipped when it already holds a value (any value — `0`,
/// `false` and `""` all count as answered) or when its visibility
/// condition evaluates falsy against the current data. A stored value is
/// kept but ignored when its field is hidden, so toggling a condition off
/// never re-asks an already-answered field and toggling it back on finds
/// the old answer still in place.
pub fn determine_next_step(fields: &[FieldDefinition], data: &SlotMap) -> NextStep {
    for field in fields {
        if data.contains_key(&field.id) {
            continue;
        }
        if !field.is_visible(data) {
            continue;
        }
        return NextStep::ask(field.id.clone());
    }
    NextStep::complete()
}
