//! Plugin seeding slot values from configuration.
//!
//! Configured per instance as `{ "values": { "<field-id>": <value> } }`
//! and run at `onStart`: the listed values enter the slot map before the
//! first question, so pre-answered fields are never asked.

use async_trait::async_trait;
use serde_json::json;

use crate::domain::foundation::PluginTypeId;
use crate::ports::{HookContext, HookOutput, Plugin, PluginError};

pub const TYPE_ID: &str = "default-values";

/// Seeds configured values into the conversation at start.
#[derive(Default)]
pub struct DefaultValuesPlugin;

impl DefaultValuesPlugin {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Plugin for DefaultValuesPlugin {
    fn type_id(&self) -> PluginTypeId {
        PluginTypeId::new(TYPE_ID)
    }

    async fn on_start(&self, ctx: &HookContext) -> Result<HookOutput, PluginError> {
        let values = ctx
            .config
            .get("values")
            .and_then(|v| v.as_object())
            .ok_or_else(|| {
                PluginError::invalid_config("default-values requires a 'values' object")
            })?;

        let mut output = HookOutput::none();
        let mut seeded = Vec::with_capacity(values.len());
        for (field, value) in values {
            output = output.with_update(field.as_str(), value.clone());
            seeded.push(field.clone());
        }
        Ok(output.with_metadata(json!({ "seeded": seeded })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ConversationId, FieldId, SlotMap};
    use serde_json::Value;

    fn context(config: Value) -> HookContext {
        HookContext::new("svc".into(), ConversationId::new(), SlotMap::new(), config)
    }

    #[tokio::test]
    async fn seeds_every_configured_value() {
        let plugin = DefaultValuesPlugin::new();
        let output = plugin
            .on_start(&context(json!({
                "values": { "kind": "resident", "zone": 4 }
            })))
            .await
            .unwrap();

        assert_eq!(output.slot_updates[&FieldId::new("kind")], json!("resident"));
        assert_eq!(output.slot_updates[&FieldId::new("zone")], json!(4));
        assert_eq!(output.metadata["seeded"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn missing_values_object_is_a_config_error() {
        let plugin = DefaultValuesPlugin::new();
        let err = plugin.on_start(&context(json!(null))).await.unwrap_err();
        assert!(matches!(err, PluginError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn other_hooks_stay_unimplemented() {
        let plugin = DefaultValuesPlugin::new();
        let result = plugin.on_conversation_complete(&context(json!({}))).await;
        assert!(matches!(result, Err(PluginError::NotImplemented)));
    }
}
