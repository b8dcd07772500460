//! Explicit plugin manifest.
//!
//! The registry is built once at process start from a declared list of
//! enabled plugin types. There is no directory scanning or dynamic
//! loading: a type id must appear here, mapped to a statically linked
//! implementation, or blueprints cannot use it.

use std::sync::Arc;
use tracing::info;

use super::default_values::{self, DefaultValuesPlugin};
use super::reference_number::{self, ReferenceNumberPlugin};
use crate::domain::foundation::PluginTypeId;
use crate::ports::{Plugin, PluginRegistry};

/// List of plugin types to enable.
#[derive(Debug, Clone)]
pub struct PluginManifest {
    pub enabled: Vec<PluginTypeId>,
}

/// Manifest errors.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("manifest names unknown plugin type '{0}'")]
    UnknownPlugin(PluginTypeId),
}

impl PluginManifest {
    /// Manifest with every built-in plugin enabled.
    pub fn builtin() -> Self {
        Self {
            enabled: vec![
                PluginTypeId::new(default_values::TYPE_ID),
                PluginTypeId::new(reference_number::TYPE_ID),
            ],
        }
    }

    /// Builds the registry, resolving each enabled type id to its
    /// implementation. Unknown ids fail the build.
    pub fn build_registry(&self) -> Result<PluginRegistry, ManifestError> {
        let mut registry = PluginRegistry::new();
        for type_id in &self.enabled {
            let plugin: Arc<dyn Plugin> = match type_id.as_str() {
                default_values::TYPE_ID => Arc::new(DefaultValuesPlugin::new()),
                reference_number::TYPE_ID => Arc::new(ReferenceNumberPlugin::new()),
                _ => return Err(ManifestError::UnknownPlugin(type_id.clone())),
            };
            registry = registry.register(plugin);
        }
        info!(count = self.enabled.len(), "plugin registry built");
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_manifest_registers_all_builtin_plugins() {
        let registry = PluginManifest::builtin().build_registry().unwrap();
        assert!(registry.get(&PluginTypeId::new("default-values")).is_some());
        assert!(registry.get(&PluginTypeId::new("reference-number")).is_some());
    }

    #[test]
    fn unknown_plugin_type_fails_the_build() {
        let manifest = PluginManifest {
            enabled: vec![PluginTypeId::new("mystery")],
        };
        assert!(matches!(
            manifest.build_registry(),
            Err(ManifestError::UnknownPlugin(_))
        ));
    }
}
