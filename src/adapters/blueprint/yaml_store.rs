//! YAML-backed blueprint store.
//!
//! Loads every `*.yaml`/`*.yml` file from a directory at startup, runs
//! structural validation, and serves the catalog from memory. Malformed
//! or invalid blueprints fail the whole load: a deployment never starts
//! with a partial catalog.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::domain::blueprint::ServiceBlueprint;
use crate::domain::foundation::BlueprintId;
use crate::ports::{BlueprintStore, StoreError};

/// Immutable blueprint catalog loaded from YAML files.
#[derive(Debug)]
pub struct YamlBlueprintStore {
    blueprints: HashMap<BlueprintId, ServiceBlueprint>,
    /// File-name order, kept stable for listings.
    order: Vec<BlueprintId>,
}

impl YamlBlueprintStore {
    /// Loads and validates all blueprint files in a directory.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir)
            .map_err(|e| StoreError::io(format!("cannot read '{}': {}", dir.display(), e)))?;

        let mut paths: Vec<_> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                matches!(
                    path.extension().and_then(|ext| ext.to_str()),
                    Some("yaml") | Some("yml")
                )
            })
            .collect();
        paths.sort();

        let mut blueprints = Vec::with_capacity(paths.len());
        for path in paths {
            let source_name = path.display().to_string();
            let raw = std::fs::read_to_string(&path)
                .map_err(|e| StoreError::io(format!("cannot read '{}': {}", source_name, e)))?;
            let blueprint: ServiceBlueprint = serde_yaml::from_str(&raw)
                .map_err(|e| StoreError::parse(&source_name, e.to_string()))?;
            blueprints.push(blueprint);
        }

        let store = Self::from_blueprints(blueprints)?;
        info!(
            dir = %dir.display(),
            count = store.order.len(),
            "blueprint catalog loaded"
        );
        Ok(store)
    }

    /// Builds a catalog from already-parsed blueprints, validating each
    /// and rejecting duplicate ids. Used directly by tests.
    pub fn from_blueprints(blueprints: Vec<ServiceBlueprint>) -> Result<Self, StoreError> {
        let mut catalog = HashMap::new();
        let mut order = Vec::with_capacity(blueprints.len());

        for blueprint in blueprints {
            blueprint
                .validate()
                .map_err(|e| StoreError::invalid(blueprint.id.as_str(), e.to_string()))?;
            if catalog.contains_key(&blueprint.id) {
                return Err(StoreError::invalid(
                    blueprint.id.as_str(),
                    "duplicate blueprint id",
                ));
            }
            order.push(blueprint.id.clone());
            catalog.insert(blueprint.id.clone(), blueprint);
        }

        Ok(Self {
            blueprints: catalog,
            order,
        })
    }
}

#[async_trait]
impl BlueprintStore for YamlBlueprintStore {
    async fn find_by_id(&self, id: &BlueprintId) -> Result<Option<ServiceBlueprint>, StoreError> {
        Ok(self.blueprints.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<ServiceBlueprint>, StoreError> {
        Ok(self
            .order
            .iter()
            .filter_map(|id| self.blueprints.get(id).cloned())
            .collect())
    }
}
