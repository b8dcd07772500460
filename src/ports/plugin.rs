//! Plugin port and registry.
//!
//! Plugins are stateless implementations keyed by type id. A blueprint
//! configures instances of them and wires those instances into lifecycle
//! hooks; the registry maps type ids to implementations, built explicitly
//! at startup from the enabled-plugin manifest.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::foundation::{
    BlueprintId, ConversationId, FieldId, PluginTypeId, SlotMap, SlotValue,
};

/// Read-only view of the conversation handed to a plugin invocation.
#[derive(Debug, Clone)]
pub struct HookContext {
    pub blueprint_id: BlueprintId,
    pub conversation_id: ConversationId,
    /// Snapshot of collected data at invocation time.
    pub data: SlotMap,
    /// Field that triggered the hook, `onFieldValidated` only.
    pub field_id: Option<FieldId>,
    /// Validated value of that field, `onFieldValidated` only.
    pub field_value: Option<SlotValue>,
    /// Instance configuration from the blueprint.
    pub config: Value,
}

impl HookContext {
    /// Context without field information, for `onStart` and
    /// `onConversationComplete`.
    pub fn new(
        blueprint_id: BlueprintId,
        conversation_id: ConversationId,
        data: SlotMap,
        config: Value,
    ) -> Self {
        Self {
            blueprint_id,
            conversation_id,
            data,
            field_id: None,
            field_value: None,
            config,
        }
    }

    /// Attaches the triggering field and its validated value.
    pub fn with_field(mut self, field_id: FieldId, value: SlotValue) -> Self {
        self.field_id = Some(field_id);
        self.field_value = Some(value);
        self
    }
}

/// What one plugin invocation wants changed.
///
/// Slot updates are raw JSON; the flow controller coerces and validates
/// each one against its field definition before merging, exactly like a
/// user-supplied value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HookOutput {
    pub slot_updates: HashMap<FieldId, Value>,
    /// Free-form data recorded on the conversation under the instance id.
    pub metadata: Value,
}

impl HookOutput {
    /// Output changing nothing.
    pub fn none() -> Self {
        Self::default()
    }

    /// Adds a slot update.
    pub fn with_update(mut self, field: impl Into<FieldId>, value: Value) -> Self {
        self.slot_updates.insert(field.into(), value);
        self
    }

    /// Sets the metadata payload.
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }
}

/// A plugin implementation.
///
/// Hooks default to [`PluginError::NotImplemented`]; the orchestrator
/// skips those silently, so an implementation only overrides the hooks
/// it cares about.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Type id this implementation registers under.
    fn type_id(&self) -> PluginTypeId;

    /// Runs after service selection, before the first question.
    async fn on_start(&self, _ctx: &HookContext) -> Result<HookOutput, PluginError> {
        Err(PluginError::NotImplemented)
    }

    /// Runs after a field value passed validation and was merged.
    async fn on_field_validated(&self, _ctx: &HookContext) -> Result<HookOutput, PluginError> {
        Err(PluginError::NotImplemented)
    }

    /// Runs once the last field is collected, before the completion turn.
    async fn on_conversation_complete(
        &self,
        _ctx: &HookContext,
    ) -> Result<HookOutput, PluginError> {
        Err(PluginError::NotImplemented)
    }
}

/// Plugin invocation errors.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// The plugin does not implement this hook. Skipped, never fatal.
    #[error("hook not implemented")]
    NotImplemented,

    /// The instance configuration is unusable.
    #[error("invalid plugin config: {0}")]
    InvalidConfig(String),

    /// The plugin ran and failed.
    #[error("plugin execution failed: {0}")]
    Execution(String),
}

impl PluginError {
    /// Creates an invalid-config error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        PluginError::InvalidConfig(message.into())
    }

    /// Creates an execution error.
    pub fn execution(message: impl Into<String>) -> Self {
        PluginError::Execution(message.into())
    }
}

/// Type-id-keyed registry of plugin implementations.
///
/// Built once at startup from the enabled-plugin manifest. A blueprint
/// referencing a type id absent from the registry fails at request time
/// with a fatal hook error, never silently.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: HashMap<PluginTypeId, Arc<dyn Plugin>>,
}

impl PluginRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an implementation under its own type id.
    pub fn register(mut self, plugin: Arc<dyn Plugin>) -> Self {
        self.plugins.insert(plugin.type_id(), plugin);
        self
    }

    /// Resolves an implementation by type id.
    pub fn get(&self, type_id: &PluginTypeId) -> Option<Arc<dyn Plugin>> {
        self.plugins.get(type_id).cloned()
    }

    /// Registered type ids, for startup logging.
    pub fn type_ids(&self) -> Vec<&PluginTypeId> {
        self.plugins.keys().collect()
    }
}
