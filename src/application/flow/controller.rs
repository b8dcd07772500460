//! Conversation flow controller.
//!
//! Top-level coordinator for one incoming message: load or create the
//! conversation, dispatch on its phase, drive collaborators and plugin
//! hooks, and return the next turn. Turns for one conversation are
//! serialized; state is persisted before every returned turn.

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::error::FlowError;
use super::hooks::{HookOutcome, PluginOrchestrator};
use super::language_guard::{self, GuardFlow};
use super::locks::ConversationLocks;
use crate::domain::blueprint::{HookKind, LanguagePolicy, ServiceBlueprint};
use crate::domain::conversation::{determine_next_step, Conversation, ConversationPhase};
use crate::domain::foundation::{
    ConversationId, DomainError, ErrorCode, SlotMap, ValidationError,
};
use crate::ports::{
    BlueprintStore, CollaboratorError, ConversationRepository, DataExtractor, IntentClassifier,
    MessageIntent, PluginRegistry, ResponsePresenter, ServiceSelection,
};

/// One incoming message.
#[derive(Debug, Clone)]
pub struct TurnRequest {
    /// Absent on the first message; a new conversation is created.
    pub conversation_id: Option<ConversationId>,
    pub text: String,
}

impl TurnRequest {
    /// First message of a new conversation.
    pub fn open(text: impl Into<String>) -> Self {
        Self {
            conversation_id: None,
            text: text.into(),
        }
    }

    /// Follow-up message in an existing conversation.
    pub fn follow_up(conversation_id: ConversationId, text: impl Into<String>) -> Self {
        Self {
            conversation_id: Some(conversation_id),
            text: text.into(),
        }
    }
}

/// One outgoing turn.
#[derive(Debug, Clone)]
pub struct TurnResponse {
    pub conversation_id: ConversationId,
    pub text: String,
    pub is_complete: bool,
    /// Snapshot of the collected data after this turn.
    pub data: SlotMap,
}

/// Coordinates collaborators into conversation turns.
pub struct FlowController {
    blueprints: Arc<dyn BlueprintStore>,
    conversations: Arc<dyn ConversationRepository>,
    classifier: Arc<dyn IntentClassifier>,
    extractor: Arc<dyn DataExtractor>,
    presenter: Arc<dyn ResponsePresenter>,
    hooks: PluginOrchestrator,
    locks: ConversationLocks,
    /// Applied to blueprints that declare no language policy of their own.
    fallback_policy: LanguagePolicy,
}

impl FlowController {
    pub fn new(
        blueprints: Arc<dyn BlueprintStore>,
        conversations: Arc<dyn ConversationRepository>,
        classifier: Arc<dyn IntentClassifier>,
        extractor: Arc<dyn DataExtractor>,
        presenter: Arc<dyn ResponsePresenter>,
        registry: Arc<PluginRegistry>,
    ) -> Self {
        Self {
            blueprints,
            conversations,
            classifier,
            extractor,
            presenter,
            hooks: PluginOrchestrator::new(registry),
            locks: ConversationLocks::new(),
            fallback_policy: LanguagePolicy::adaptive("en"),
        }
    }

    /// Sets the deployment-wide default language, used for blueprints
    /// without a language policy.
    pub fn with_default_language(mut self, language: impl Into<String>) -> Self {
        self.fallback_policy = LanguagePolicy::adaptive(language);
        self
    }

    /// Handles one message end to end and returns the next turn.
    pub async fn handle_message(&self, request: TurnRequest) -> Result<TurnResponse, FlowError> {
        match request.conversation_id {
            Some(id) => {
                let _turn_guard = self.locks.acquire(id).await;
                let conversation = self
                    .conversations
                    .find_by_id(&id)
                    .await?
                    .ok_or_else(|| DomainError::conversation_not_found(id))?;
                self.process_turn(conversation, &request.text).await
            }
            None => {
                let mut conversation = Conversation::new();
                let greeting = self.presenter.greeting();
                conversation.push_assistant_message(&greeting);
                self.conversations.create(&conversation).await?;
                let _turn_guard = self.locks.acquire(conversation.id).await;
                let mut response = self.process_turn(conversation, &request.text).await?;
                response.text = format!("{}\n\n{}", greeting, response.text);
                Ok(response)
            }
        }
    }

    async fn process_turn(
        &self,
        mut conversation: Conversation,
        text: &str,
    ) -> Result<TurnResponse, FlowError> {
        let phase = conversation.phase();
        info!(
            conversation_id = %conversation.id,
            ?phase,
            "handling message"
        );
        conversation.push_user_message(text);

        match phase {
            ConversationPhase::ServiceSelection => {
                self.handle_service_selection(&mut conversation, text).await
            }
            ConversationPhase::DataCollection => {
                self.handle_data_collection(&mut conversation, text).await
            }
            ConversationPhase::Completion => self.handle_completed(&mut conversation).await,
        }
    }

    async fn handle_service_selection(
        &self,
        conversation: &mut Conversation,
        text: &str,
    ) -> Result<TurnResponse, FlowError> {
        let available = self.blueprints.list().await?;

        let selection = self
            .classifier
            .classify_service(text, &available, conversation)
            .await;
        let selection = match self.absorb(conversation, selection).await? {
            GuardFlow::Proceed(selection) => selection,
            GuardFlow::Halt(response) => return Ok(response),
        };

        match selection {
            ServiceSelection::ListServices => {
                let reply = self.presenter.service_list(&available);
                self.reply(conversation, reply).await
            }
            ServiceSelection::Unclear => {
                let reply = self.presenter.clarification(&available);
                self.reply(conversation, reply).await
            }
            ServiceSelection::Service(blueprint_id) => {
                let blueprint = self
                    .blueprints
                    .find_by_id(&blueprint_id)
                    .await?
                    .ok_or_else(|| DomainError::blueprint_not_found(&blueprint_id))?;
                conversation.select_service(blueprint_id)?;
                info!(
                    conversation_id = %conversation.id,
                    blueprint_id = %blueprint.id,
                    "service selected"
                );

                let outcome = self
                    .hooks
                    .execute_hook(HookKind::OnStart, &blueprint, conversation, None)
                    .await?;
                self.apply_hook_outcome(conversation, &blueprint, outcome)?;

                let welcome = self.presenter.welcome(&blueprint);
                self.advance(conversation, &blueprint, Some(welcome)).await
            }
        }
    }

    async fn handle_data_collection(
        &self,
        conversation: &mut Conversation,
        text: &str,
    ) -> Result<TurnResponse, FlowError> {
        let blueprint = self.load_blueprint(conversation).await?;
        let policy = Some(blueprint.language.as_ref().unwrap_or(&self.fallback_policy));

        let field = match &conversation.current_field {
            Some(field_id) => blueprint
                .field(field_id)
                .ok_or_else(|| DomainError::field_not_found(field_id))?
                .clone(),
            // Can happen when every field was seeded or hidden before a
            // question was ever asked.
            None => return self.advance(conversation, &blueprint, None).await,
        };

        let intent = self
            .classifier
            .classify_intent(text, &field, policy, conversation)
            .await;
        let intent = match self.absorb(conversation, intent).await? {
            GuardFlow::Proceed(intent) => intent,
            GuardFlow::Halt(response) => return Ok(response),
        };

        if intent.intent == MessageIntent::Question {
            debug!(
                conversation_id = %conversation.id,
                reason = intent.reason.as_deref().unwrap_or(""),
                "user asked a question, answering without advancing"
            );
            let reply = self.presenter.contextual_answer(text, &field, &blueprint);
            return self.reply(conversation, reply).await;
        }

        let extraction = self
            .extractor
            .extract(text, &blueprint.fields, &field, policy, conversation)
            .await;
        let extraction = match self.absorb(conversation, extraction).await? {
            GuardFlow::Proceed(extraction) => extraction,
            GuardFlow::Halt(response) => return Ok(response),
        };

        if let Some(language) = &extraction.user_message_language {
            conversation.pin_language(language.clone());
        }

        let value = match extraction.data.get(&field.id) {
            None => {
                let error = ValidationError::empty_field(field.id.as_str());
                let reply = self.presenter.validation_failure(&field, &error);
                return self.reply(conversation, reply).await;
            }
            Some(raw) => match field.coerce_and_validate(raw) {
                Err(error) => {
                    debug!(
                        conversation_id = %conversation.id,
                        field = %field.id,
                        %error,
                        "extracted value rejected, re-asking"
                    );
                    let reply = self.presenter.validation_failure(&field, &error);
                    return self.reply(conversation, reply).await;
                }
                Ok(value) => value,
            },
        };
        conversation.put_value(field.id.clone(), value.clone());

        // Volunteered values for other fields are merged when valid and
        // dropped otherwise; only the pending field re-asks on rejection.
        for (field_id, raw) in &extraction.data {
            if field_id == &field.id {
                continue;
            }
            let Some(extra) = blueprint.field(field_id) else {
                debug!(field = %field_id, "extractor returned unknown field, ignoring");
                continue;
            };
            match extra.coerce_and_validate(raw) {
                Ok(extra_value) => conversation.put_value(field_id.clone(), extra_value),
                Err(error) => {
                    debug!(field = %field_id, %error, "volunteered value rejected, dropping");
                }
            }
        }

        let outcome = self
            .hooks
            .execute_hook(
                HookKind::OnFieldValidated,
                &blueprint,
                conversation,
                Some((&field.id, &value)),
            )
            .await?;
        self.apply_hook_outcome(conversation, &blueprint, outcome)?;

        self.advance(conversation, &blueprint, None).await
    }

    async fn handle_completed(
        &self,
        conversation: &mut Conversation,
    ) -> Result<TurnResponse, FlowError> {
        let blueprint = self.load_blueprint(conversation).await?;
        let reply = self.presenter.already_completed(&blueprint);
        self.reply(conversation, reply).await
    }

    /// Resolves the next step and turns it into a question or the
    /// completion turn, running `onConversationComplete` hooks when the
    /// blueprint is exhausted.
    async fn advance(
        &self,
        conversation: &mut Conversation,
        blueprint: &ServiceBlueprint,
        prefix: Option<String>,
    ) -> Result<TurnResponse, FlowError> {
        let step = determine_next_step(&blueprint.fields, &conversation.data);

        if let Some(field_id) = &step.next_field {
            let field = blueprint
                .field(field_id)
                .ok_or_else(|| DomainError::field_not_found(field_id))?;
            conversation.progress_to_next_field(&step)?;
            let reply = join(prefix, self.presenter.question(field, conversation));
            return self.reply(conversation, reply).await;
        }

        let outcome = self
            .hooks
            .execute_hook(
                HookKind::OnConversationComplete,
                blueprint,
                conversation,
                None,
            )
            .await?;
        self.apply_hook_outcome(conversation, blueprint, outcome)?;
        conversation.progress_to_next_field(&step)?;
        info!(conversation_id = %conversation.id, "conversation completed");

        let reply = join(
            prefix,
            self.presenter.completion(blueprint, &conversation.data),
        );
        self.reply(conversation, reply).await
    }

    /// Merges a hook batch into the conversation. Every raw value passes
    /// through its field's coercion and validation; a plugin value that
    /// violates its field's schema is fatal, never silently applied.
    fn apply_hook_outcome(
        &self,
        conversation: &mut Conversation,
        blueprint: &ServiceBlueprint,
        outcome: HookOutcome,
    ) -> Result<(), FlowError> {
        for (field_id, raw) in outcome.slot_updates {
            let field = blueprint.field(&field_id).ok_or_else(|| {
                DomainError::new(
                    ErrorCode::PluginExecutionFailed,
                    format!("plugin update targets unknown field '{}'", field_id),
                )
            })?;
            let value = field.coerce_and_validate(&raw).map_err(|error| {
                DomainError::new(
                    ErrorCode::PluginExecutionFailed,
                    format!("plugin value for field '{}' rejected: {}", field_id, error),
                )
            })?;
            conversation.put_value(field_id, value);
        }
        for (instance_id, metadata) in outcome.metadata {
            conversation.record_metadata(instance_id.as_str(), metadata);
        }
        Ok(())
    }

    /// Single recovery point for language violations: the violation text
    /// becomes this turn's persisted, non-advancing response.
    async fn absorb<T>(
        &self,
        conversation: &mut Conversation,
        result: Result<T, CollaboratorError>,
    ) -> Result<GuardFlow<T, TurnResponse>, FlowError> {
        match language_guard::check(result).map_err(FlowError::from)? {
            GuardFlow::Proceed(value) => Ok(GuardFlow::Proceed(value)),
            GuardFlow::Halt(violation) => {
                warn!(
                    conversation_id = %conversation.id,
                    detected = %violation.detected_language,
                    expected = %violation.expected_language,
                    "language violation"
                );
                let response = self.reply(conversation, violation.message).await?;
                Ok(GuardFlow::Halt(response))
            }
        }
    }

    async fn load_blueprint(
        &self,
        conversation: &Conversation,
    ) -> Result<ServiceBlueprint, FlowError> {
        let blueprint_id = conversation.blueprint_id.clone().ok_or_else(|| {
            DomainError::new(
                ErrorCode::InternalError,
                "conversation past service selection has no blueprint",
            )
        })?;
        let blueprint = self
            .blueprints
            .find_by_id(&blueprint_id)
            .await?
            .ok_or_else(|| DomainError::blueprint_not_found(&blueprint_id))?;
        Ok(blueprint)
    }

    /// Appends the assistant turn, persists, and shapes the response.
    /// Every handler path funnels through here, so state is always
    /// flushed before a turn is returned.
    async fn reply(
        &self,
        conversation: &mut Conversation,
        text: String,
    ) -> Result<TurnResponse, FlowError> {
        conversation.push_assistant_message(&text);
        self.conversations.update(conversation).await?;
        Ok(TurnResponse {
            conversation_id: conversation.id,
            text,
            is_complete: conversation.is_completed(),
            data: conversation.data.clone(),
        })
    }
}

fn join(prefix: Option<String>, body: String) -> String {
    match prefix {
        Some(prefix) => format!("{}\n\n{}", prefix, body),
        None => body,
    }
}
