//! Plugin hook orchestration.
//!
//! Runs one lifecycle hook across the blueprint's ordered instance list
//! and accumulates the results. All-or-nothing per batch: any plugin
//! error aborts the whole invocation and nothing from it is applied.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use super::error::FlowError;
use crate::domain::blueprint::{HookKind, ServiceBlueprint};
use crate::domain::conversation::Conversation;
use crate::domain::foundation::{
    DomainError, ErrorCode, FieldId, PluginInstanceId, SlotValue,
};
use crate::ports::{HookContext, HookOutput, PluginError, PluginRegistry};

/// Accumulated result of one hook batch.
#[derive(Debug, Default)]
pub struct HookOutcome {
    /// Raw slot updates, later instances winning on key collision. The
    /// caller coerces and validates each against its field definition
    /// before merging into conversation data.
    pub slot_updates: HashMap<FieldId, Value>,
    /// Metadata keyed by plugin instance id.
    pub metadata: HashMap<PluginInstanceId, Value>,
}

/// Executes lifecycle hooks against a plugin registry.
pub struct PluginOrchestrator {
    registry: Arc<PluginRegistry>,
}

impl PluginOrchestrator {
    pub fn new(registry: Arc<PluginRegistry>) -> Self {
        Self { registry }
    }

    /// Runs `kind` over the blueprint's instance list for that hook.
    ///
    /// Per instance, in order: resolve the config (missing is fatal),
    /// resolve the implementation (missing is fatal), apply the
    /// `trigger_on_field` filter (`onFieldValidated` only), invoke, and
    /// fold the output. Unimplemented hooks are skipped silently; any
    /// real plugin error aborts the batch.
    pub async fn execute_hook(
        &self,
        kind: HookKind,
        blueprint: &ServiceBlueprint,
        conversation: &Conversation,
        trigger: Option<(&FieldId, &SlotValue)>,
    ) -> Result<HookOutcome, FlowError> {
        let mut outcome = HookOutcome::default();

        for instance_id in blueprint.hooks.instances(kind) {
            let config = blueprint.plugin_config(instance_id).ok_or_else(|| {
                DomainError::new(
                    ErrorCode::PluginConfigNotFound,
                    format!("no plugin config for instance '{}'", instance_id),
                )
                .with_detail("hook", kind.to_string())
            })?;

            // Resolve before filtering so a broken registration is fatal
            // on every turn, not only on matching ones.
            let plugin = self.registry.get(&config.type_id).ok_or_else(|| {
                DomainError::new(
                    ErrorCode::PluginNotRegistered,
                    format!("plugin type '{}' is not registered", config.type_id),
                )
                .with_detail("instance", instance_id.to_string())
            })?;

            if kind == HookKind::OnFieldValidated {
                if let (Some(filter), Some((field, _))) = (&config.trigger_on_field, trigger) {
                    if filter != field {
                        debug!(
                            instance = %instance_id,
                            field = %field,
                            "trigger filter does not match, skipping instance"
                        );
                        continue;
                    }
                }
            }

            let mut context = HookContext::new(
                blueprint.id.clone(),
                conversation.id,
                conversation.data.clone(),
                config.config.clone(),
            );
            if let Some((field, value)) = trigger {
                context = context.with_field(field.clone(), value.clone());
            }

            let result = match kind {
                HookKind::OnStart => plugin.on_start(&context).await,
                HookKind::OnFieldValidated => plugin.on_field_validated(&context).await,
                HookKind::OnConversationComplete => {
                    plugin.on_conversation_complete(&context).await
                }
            };

            match result {
                Ok(output) => fold(&mut outcome, instance_id.clone(), output),
                Err(PluginError::NotImplemented) => {
                    debug!(instance = %instance_id, hook = %kind, "hook not implemented, skipping");
                }
                Err(source) => {
                    return Err(FlowError::Hook {
                        hook: kind,
                        instance: instance_id.clone(),
                        source,
                    });
                }
            }
        }

        Ok(outcome)
    }
}

fn fold(outcome: &mut HookOutcome, instance_id: PluginInstanceId, output: HookOutput) {
    // Later instances overwrite earlier ones on key collision.
    outcome.slot_updates.extend(output.slot_updates);
    if !output.metadata.is_null() {
        outcome.metadata.insert(instance_id, output.metadata);
    }
}
