//! Foundation types shared across the domain.
//!
//! Identifiers, error types, and the generic state machine trait.

mod errors;
mod ids;
mod slot;
mod state_machine;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{BlueprintId, ConversationId, FieldId, PluginInstanceId, PluginTypeId};
pub use slot::{SlotMap, SlotValue};
pub use state_machine::StateMachine;
