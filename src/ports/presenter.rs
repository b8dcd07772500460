//! Response presenter port.
//!
//! Every assistant-authored turn is rendered through this port, keeping
//! wording out of the flow logic. The default adapter fills templates;
//! a generative adapter could phrase the same turns freely as long as it
//! keeps the question's meaning intact.

use crate::domain::blueprint::{FieldDefinition, ServiceBlueprint};
use crate::domain::conversation::Conversation;
use crate::domain::foundation::{SlotMap, ValidationError};

/// Renders user-facing assistant messages.
pub trait ResponsePresenter: Send + Sync {
    /// Greeting rendered when a conversation is created, before any
    /// service is known.
    fn greeting(&self) -> String;

    /// Opening turn after a service was selected, before the first
    /// question.
    fn welcome(&self, blueprint: &ServiceBlueprint) -> String;

    /// The question turn for one field. Fields marked verbatim must be
    /// asked with their prompt unchanged.
    fn question(&self, field: &FieldDefinition, conversation: &Conversation) -> String;

    /// Re-ask turn after a rejected value: explains the problem and
    /// repeats the question.
    fn validation_failure(&self, field: &FieldDefinition, error: &ValidationError) -> String;

    /// Answer to a user question asked mid-collection, followed by a
    /// re-ask of the pending question.
    fn contextual_answer(
        &self,
        user_question: &str,
        pending_field: &FieldDefinition,
        blueprint: &ServiceBlueprint,
    ) -> String;

    /// Closing turn once every field is collected.
    fn completion(&self, blueprint: &ServiceBlueprint, data: &SlotMap) -> String;

    /// Catalog of available services.
    fn service_list(&self, blueprints: &[ServiceBlueprint]) -> String;

    /// Asking the user to pick a service when their message matched
    /// nothing.
    fn clarification(&self, blueprints: &[ServiceBlueprint]) -> String;

    /// Fixed closing message for turns arriving after completion.
    fn already_completed(&self, blueprint: &ServiceBlueprint) -> String;
}
