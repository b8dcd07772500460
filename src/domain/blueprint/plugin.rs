//! Plugin configuration within a blueprint.
//!
//! A blueprint wires plugin *instances* (a configured use of a plugin
//! type) into three lifecycle hooks. The implementations themselves live
//! behind the plugin registry port; the blueprint only carries
//! configuration.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::domain::foundation::{FieldId, PluginInstanceId, PluginTypeId};

/// Lifecycle points at which plugins run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HookKind {
    /// After a service is selected, before the first question.
    OnStart,
    /// After a field value passed validation and was merged.
    OnFieldValidated,
    /// After the last field was collected.
    OnConversationComplete,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HookKind::OnStart => "onStart",
            HookKind::OnFieldValidated => "onFieldValidated",
            HookKind::OnConversationComplete => "onConversationComplete",
        };
        write!(f, "{}", s)
    }
}

/// One configured use of a plugin type within a blueprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Plugin implementation to run.
    #[serde(rename = "type")]
    pub type_id: PluginTypeId,
    /// Instance name, distinguishing multiple uses of one type.
    /// Defaults to the type id when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<PluginInstanceId>,
    /// Restricts `onFieldValidated` execution to one field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_on_field: Option<FieldId>,
    /// Opaque configuration handed to the plugin on every invocation.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub config: Value,
}

impl PluginConfig {
    /// Creates a config for a plugin type with defaults.
    pub fn new(type_id: impl Into<PluginTypeId>) -> Self {
        Self {
            type_id: type_id.into(),
            instance_id: None,
            trigger_on_field: None,
            config: Value::Null,
        }
    }

    /// Names the instance explicitly.
    pub fn with_instance_id(mut self, id: impl Into<PluginInstanceId>) -> Self {
        self.instance_id = Some(id.into());
        self
    }

    /// Restricts `onFieldValidated` to the given field.
    pub fn with_trigger_on_field(mut self, field: impl Into<FieldId>) -> Self {
        self.trigger_on_field = Some(field.into());
        self
    }

    /// Sets the opaque plugin configuration.
    pub fn with_config(mut self, config: Value) -> Self {
        self.config = config;
        self
    }

    /// Effective instance id: the explicit one, or the type id.
    pub fn effective_instance_id(&self) -> PluginInstanceId {
        self.instance_id
            .clone()
            .unwrap_or_else(|| (&self.type_id).into())
    }
}

/// Ordered plugin instance lists per lifecycle hook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceHooks {
    #[serde(default, rename = "onStart")]
    pub on_start: Vec<PluginInstanceId>,
    #[serde(default, rename = "onFieldValidated")]
    pub on_field_validated: Vec<PluginInstanceId>,
    #[serde(default, rename = "onConversationComplete")]
    pub on_conversation_complete: Vec<PluginInstanceId>,
}

impl ServiceHooks {
    /// Returns the instance list for a hook kind.
    pub fn instances(&self, kind: HookKind) -> &[PluginInstanceId] {
        match kind {
            HookKind::OnStart => &self.on_start,
            HookKind::OnFieldValidated => &self.on_field_validated,
            HookKind::OnConversationComplete => &self.on_conversation_complete,
        }
    }

    /// All instance ids referenced by any hook, for validation.
    pub fn all_instances(&self) -> impl Iterator<Item = &PluginInstanceId> {
        self.on_start
            .iter()
            .chain(&self.on_field_validated)
            .chain(&self.on_conversation_complete)
    }
}
