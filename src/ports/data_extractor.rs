//! Data extraction port.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

use super::intent_classifier::CollaboratorError;
use crate::domain::blueprint::{FieldDefinition, LanguagePolicy};
use crate::domain::conversation::Conversation;
use crate::domain::foundation::FieldId;

/// Raw values pulled out of one user message.
///
/// Values are untyped JSON at this point. The flow controller runs each
/// one through the owning field's coercion and validation before
/// anything reaches the slot map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    /// Candidate values keyed by field id. Usually just the pending
    /// field, but a verbose message may fill several at once.
    pub data: HashMap<FieldId, Value>,
    /// Language the user wrote in, ISO 639-1, when determinable.
    pub user_message_language: Option<String>,
}

impl Extraction {
    /// Extraction with nothing found.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds a candidate value.
    pub fn with_value(mut self, field: impl Into<FieldId>, value: Value) -> Self {
        self.data.insert(field.into(), value);
        self
    }

    /// Sets the detected message language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.user_message_language = Some(language.into());
        self
    }
}

/// Port for pulling field values out of free text.
///
/// May raise [`CollaboratorError::LanguageViolation`] under a strict
/// language policy.
#[async_trait]
pub trait DataExtractor: Send + Sync {
    /// Extracts candidate values for the pending field (and any other
    /// listed fields the message happens to mention).
    async fn extract(
        &self,
        message: &str,
        fields: &[FieldDefinition],
        pending_field: &FieldDefinition,
        policy: Option<&LanguagePolicy>,
        conversation: &Conversation,
    ) -> Result<Extraction, CollaboratorError>;
}
