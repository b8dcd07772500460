//! Intent classification port.
//!
//! Two classification jobs live here: mapping a free-text opening message
//! to one of the available services, and deciding mid-collection whether
//! a message answers the pending question or asks one of its own.

use async_trait::async_trait;

use crate::domain::blueprint::{FieldDefinition, LanguagePolicy, LanguageViolation, ServiceBlueprint};
use crate::domain::conversation::Conversation;
use crate::domain::foundation::BlueprintId;

/// Outcome of service selection on a free-text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceSelection {
    /// The message named a specific service.
    Service(BlueprintId),
    /// The user asked what services exist.
    ListServices,
    /// The message matched nothing; ask the user to clarify.
    Unclear,
}

/// What a mid-collection message is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageIntent {
    /// The message answers the pending question.
    Answer,
    /// The message asks a question of its own.
    Question,
}

/// Intent decision with an optional rationale for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentClassification {
    pub intent: MessageIntent,
    pub reason: Option<String>,
}

impl IntentClassification {
    /// Answer classification without rationale.
    pub fn answer() -> Self {
        Self {
            intent: MessageIntent::Answer,
            reason: None,
        }
    }

    /// Question classification without rationale.
    pub fn question() -> Self {
        Self {
            intent: MessageIntent::Question,
            reason: None,
        }
    }

    /// Attaches a rationale.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Port for natural-language intent decisions.
///
/// Both operations may raise
/// [`CollaboratorError::LanguageViolation`] under a strict language
/// policy; the flow absorbs that variant once at the handler boundary.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    /// Maps an opening message to a service from the available catalog.
    async fn classify_service(
        &self,
        message: &str,
        available: &[ServiceBlueprint],
        conversation: &Conversation,
    ) -> Result<ServiceSelection, CollaboratorError>;

    /// Decides whether a mid-collection message answers the pending
    /// field or asks a question. Ambiguity resolves to `Answer`.
    async fn classify_intent(
        &self,
        message: &str,
        pending_field: &FieldDefinition,
        policy: Option<&LanguagePolicy>,
        conversation: &Conversation,
    ) -> Result<IntentClassification, CollaboratorError>;
}

/// Errors from natural-language collaborators (classifier, extractor).
#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    /// The user wrote outside the policy-mandated language. Recovered
    /// by the language guard, never a request failure.
    #[error("language violation: expected '{}', detected '{}'", .0.expected_language, .0.detected_language)]
    LanguageViolation(LanguageViolation),

    /// The backing provider is unreachable or failed.
    #[error("collaborator provider error: {0}")]
    Provider(String),

    /// The provider answered but its output could not be used.
    #[error("collaborator output unusable: {0}")]
    Unusable(String),
}

impl CollaboratorError {
    /// Creates a provider error.
    pub fn provider(message: impl Into<String>) -> Self {
        CollaboratorError::Provider(message.into())
    }

    /// Creates an unusable-output error.
    pub fn unusable(message: impl Into<String>) -> Self {
        CollaboratorError::Unusable(message.into())
    }
}

impl From<LanguageViolation> for CollaboratorError {
    fn from(violation: LanguageViolation) -> Self {
        CollaboratorError::LanguageViolation(violation)
    }
}
