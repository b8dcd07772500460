//! Service blueprint aggregate.
//!
//! A blueprint declares everything one conversational service needs: the
//! ordered fields to collect, the plugin instances it configures, the
//! lifecycle hooks those instances run at, and an optional language
//! policy. Blueprints are immutable once loaded.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::field::FieldDefinition;
use super::language::LanguagePolicy;
use super::plugin::{PluginConfig, ServiceHooks};
use crate::domain::foundation::{BlueprintId, FieldId, PluginInstanceId, ValidationError};

/// Declarative description of one conversational service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceBlueprint {
    pub id: BlueprintId,
    /// Human-readable service name, shown in the service list.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fields: Vec<FieldDefinition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<PluginConfig>,
    #[serde(default)]
    pub hooks: ServiceHooks,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<LanguagePolicy>,
}

impl ServiceBlueprint {
    /// Creates a blueprint with fields only.
    pub fn new(
        id: impl Into<BlueprintId>,
        name: impl Into<String>,
        fields: Vec<FieldDefinition>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            fields,
            plugins: Vec::new(),
            hooks: ServiceHooks::default(),
            language: None,
        }
    }

    /// Sets the plugin configuration list.
    pub fn with_plugins(mut self, plugins: Vec<PluginConfig>) -> Self {
        self.plugins = plugins;
        self
    }

    /// Sets the hook wiring.
    pub fn with_hooks(mut self, hooks: ServiceHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Sets the language policy.
    pub fn with_language(mut self, language: LanguagePolicy) -> Self {
        self.language = Some(language);
        self
    }

    /// Looks up a field by id.
    pub fn field(&self, id: &FieldId) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| &f.id == id)
    }

    /// Resolves a plugin config by instance id, falling back to type id
    /// for configs without an explicit instance name.
    pub fn plugin_config(&self, instance_id: &PluginInstanceId) -> Option<&PluginConfig> {
        self.plugins
            .iter()
            .find(|p| &p.effective_instance_id() == instance_id)
    }

    /// Structural validation run once at load time.
    ///
    /// Rejects duplicate field ids, duplicate plugin instance ids, hook
    /// references to unconfigured instances, and trigger filters naming
    /// unknown fields. Conditions referencing unknown fields are allowed:
    /// they evaluate against missing slots (falsy), which is the
    /// documented runtime behavior.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.fields.is_empty() {
            return Err(ValidationError::empty_field("fields"));
        }

        let mut seen_fields = HashSet::new();
        for field in &self.fields {
            if !seen_fields.insert(&field.id) {
                return Err(ValidationError::invalid_format(
                    "fields",
                    format!("duplicate field id '{}'", field.id),
                ));
            }
        }

        let mut instances = HashSet::new();
        for plugin in &self.plugins {
            let instance = plugin.effective_instance_id();
            if !instances.insert(instance.clone()) {
                return Err(ValidationError::invalid_format(
                    "plugins",
                    format!("duplicate plugin instance id '{}'", instance),
                ));
            }
            if let Some(field) = &plugin.trigger_on_field {
                if self.field(field).is_none() {
                    return Err(ValidationError::invalid_format(
                        "plugins",
                        format!(
                            "trigger_on_field '{}' of instance '{}' is not a field",
                            field, instance
                        ),
                    ));
                }
            }
        }

        for instance in self.hooks.all_instances() {
            if !instances.contains(instance) {
                return Err(ValidationError::invalid_format(
                    "hooks",
                    format!("hook references unconfigured plugin instance '{}'", instance),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::blueprint::field::FieldType;

    fn two_field_blueprint() -> ServiceBlueprint {
        ServiceBlueprint::new(
            "parking-permit",
            "Parking Permit",
            vec![
                FieldDefinition::new("name", "Your name?", FieldType::Text),
                FieldDefinition::new("age", "Your age?", FieldType::Number),
            ],
        )
    }

    #[test]
    fn field_lookup_finds_declared_fields() {
        let blueprint = two_field_blueprint();
        assert!(blueprint.field(&"age".into()).is_some());
        assert!(blueprint.field(&"unknown".into()).is_none());
    }

    #[test]
    fn plugin_config_resolves_by_instance_then_type_id() {
        let blueprint = two_field_blueprint().with_plugins(vec![
            PluginConfig::new("default-values").with_instance_id("seed"),
            PluginConfig::new("reference-number"),
        ]);

        assert!(blueprint.plugin_config(&"seed".into()).is_some());
        assert!(blueprint.plugin_config(&"reference-number".into()).is_some());
        // The explicit instance name shadows the type id.
        assert!(blueprint.plugin_config(&"default-values".into()).is_none());
    }

    #[test]
    fn validate_accepts_a_wellformed_blueprint() {
        let blueprint = two_field_blueprint()
            .with_plugins(vec![PluginConfig::new("reference-number")])
            .with_hooks(ServiceHooks {
                on_conversation_complete: vec!["reference-number".into()],
                ..Default::default()
            });
        assert!(blueprint.validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_field_list() {
        let blueprint = ServiceBlueprint::new("empty", "Empty", vec![]);
        assert!(blueprint.validate().is_err());
    }

    #[test]
    fn validate_rejects_duplicate_field_ids() {
        let blueprint = ServiceBlueprint::new(
            "dup",
            "Dup",
            vec![
                FieldDefinition::new("name", "A?", FieldType::Text),
                FieldDefinition::new("name", "B?", FieldType::Text),
            ],
        );
        let err = blueprint.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate field id"));
    }

    #[test]
    fn validate_rejects_hook_to_unconfigured_instance() {
        let blueprint = two_field_blueprint().with_hooks(ServiceHooks {
            on_start: vec!["ghost".into()],
            ..Default::default()
        });
        let err = blueprint.validate().unwrap_err();
        assert!(err.to_string().contains("unconfigured plugin instance"));
    }

    #[test]
    fn validate_rejects_trigger_on_unknown_field() {
        let blueprint = two_field_blueprint().with_plugins(vec![
            PluginConfig::new("audit").with_trigger_on_field("missing"),
        ]);
        assert!(blueprint.validate().is_err());
    }

    #[test]
    fn validate_rejects_duplicate_instance_ids() {
        let blueprint = two_field_blueprint().with_plugins(vec![
            PluginConfig::new("audit"),
            PluginConfig::new("audit"),
        ]);
        let err = blueprint.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate plugin instance"));
    }

    #[test]
    fn blueprint_parses_from_yaml() {
        let yaml = r#"
id: parking-permit
name: Parking Permit
description: Apply for a residential parking permit.
fields:
  - id: age
    prompt: "How old are you?"
    type: number
  - id: license
    prompt: "License number?"
    type: text
    condition:
      op: gt
      var: age
      value: 10
plugins:
  - type: reference-number
hooks:
  onConversationComplete: [reference-number]
language:
  mode: strict
  default_language: en
"#;
        let blueprint: ServiceBlueprint = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(blueprint.id.as_str(), "parking-permit");
        assert_eq!(blueprint.fields.len(), 2);
        assert!(blueprint.validate().is_ok());
        assert!(blueprint.language.unwrap().rejects("de"));
    }
}
