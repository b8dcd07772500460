//! Conversation aggregate.
//!
//! Holds everything one dialogue accumulates: the selected service, the
//! collected slot values, the transcript, the pinned language, and the
//! collection status. The phase is always derived from `blueprint_id`
//! and `status`, never stored, and all transitions go through methods
//! that assert the predecessor phase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use super::next_step::NextStep;
use super::state::ConversationPhase;
use crate::domain::foundation::{
    BlueprintId, ConversationId, DomainError, ErrorCode, FieldId, SlotMap, SlotValue, StateMachine,
};

/// Collection status, the stored half of the phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStatus {
    Collecting,
    Completed,
}

/// Who authored a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationMessage {
    /// Message authored by the user, stamped now.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Message authored by the assistant, stamped now.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// One multi-turn dialogue and everything it has collected so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    /// Selected service, absent while in service selection.
    pub blueprint_id: Option<BlueprintId>,
    pub status: ConversationStatus,
    /// Field the last question asked about, absent before the first
    /// question and after completion.
    pub current_field: Option<FieldId>,
    /// Collected slot values, hidden fields' values included.
    pub data: SlotMap,
    /// Language pinned from the first detection, ISO 639-1. Set once,
    /// never overwritten.
    pub current_language: Option<String>,
    pub messages: Vec<ConversationMessage>,
    /// Plugin-reported metadata keyed by plugin instance id.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Starts a fresh conversation in service selection.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: ConversationId::new(),
            blueprint_id: None,
            status: ConversationStatus::Collecting,
            current_field: None,
            data: SlotMap::new(),
            current_language: None,
            messages: Vec::new(),
            metadata: HashMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Current phase, derived from `blueprint_id` and `status`.
    pub fn phase(&self) -> ConversationPhase {
        match (self.status, &self.blueprint_id) {
            (ConversationStatus::Completed, _) => ConversationPhase::Completion,
            (ConversationStatus::Collecting, None) => ConversationPhase::ServiceSelection,
            (ConversationStatus::Collecting, Some(_)) => ConversationPhase::DataCollection,
        }
    }

    /// Binds the conversation to a service and enters data collection.
    /// Fails unless currently in service selection.
    pub fn select_service(&mut self, blueprint_id: BlueprintId) -> Result<(), DomainError> {
        self.assert_transition(ConversationPhase::DataCollection)?;
        self.blueprint_id = Some(blueprint_id);
        self.touch();
        Ok(())
    }

    /// Marks the conversation complete and clears the current field.
    /// Fails unless currently in data collection.
    pub fn complete(&mut self) -> Result<(), DomainError> {
        self.assert_transition(ConversationPhase::Completion)?;
        self.status = ConversationStatus::Completed;
        self.current_field = None;
        self.touch();
        Ok(())
    }

    /// Applies a resolver result: points at the next field, or completes
    /// when none remains.
    pub fn progress_to_next_field(&mut self, step: &NextStep) -> Result<(), DomainError> {
        match &step.next_field {
            Some(field) => {
                self.set_current_field(Some(field.clone()));
                Ok(())
            }
            None => self.complete(),
        }
    }

    /// True once the terminal phase is reached.
    pub fn is_completed(&self) -> bool {
        self.status == ConversationStatus::Completed
    }

    /// Points the conversation at the field being asked next.
    pub fn set_current_field(&mut self, field: Option<FieldId>) {
        self.current_field = field;
        self.touch();
    }

    /// Stores a collected value. Overwrites any previous value for the
    /// field, which is how plugins revise earlier data.
    pub fn put_value(&mut self, field: FieldId, value: SlotValue) {
        self.data.insert(field, value);
        self.touch();
    }

    /// Pins the conversation language if none is pinned yet. The first
    /// detection wins for the whole dialogue.
    pub fn pin_language(&mut self, language: impl Into<String>) {
        if self.current_language.is_none() {
            self.current_language = Some(language.into());
            self.touch();
        }
    }

    /// Records plugin metadata under an instance id.
    pub fn record_metadata(&mut self, instance_id: impl Into<String>, value: Value) {
        self.metadata.insert(instance_id.into(), value);
        self.touch();
    }

    /// Appends a user message to the transcript.
    pub fn push_user_message(&mut self, content: impl Into<String>) {
        self.messages.push(ConversationMessage::user(content));
        self.touch();
    }

    /// Appends an assistant message to the transcript.
    pub fn push_assistant_message(&mut self, content: impl Into<String>) {
        self.messages.push(ConversationMessage::assistant(content));
        self.touch();
    }

    fn assert_transition(&self, target: ConversationPhase) -> Result<(), DomainError> {
        self.phase().transition_to(target).map_err(|e| {
            DomainError::new(ErrorCode::InvalidStateTransition, e.to_string())
                .with_detail("conversation_id", self.id.to_string())
        })?;
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}
