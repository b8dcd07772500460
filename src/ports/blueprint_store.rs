//! Blueprint store port.

use async_trait::async_trait;

use crate::domain::blueprint::ServiceBlueprint;
use crate::domain::foundation::BlueprintId;

/// Read access to the catalog of service blueprints.
///
/// Implementations load blueprints from wherever they live (a directory
/// of YAML files in the default deployment) and serve them validated.
#[async_trait]
pub trait BlueprintStore: Send + Sync {
    /// Looks up a blueprint by id.
    async fn find_by_id(&self, id: &BlueprintId) -> Result<Option<ServiceBlueprint>, StoreError>;

    /// Lists all available blueprints, stable order.
    async fn list(&self) -> Result<Vec<ServiceBlueprint>, StoreError>;
}

/// Blueprint store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A blueprint source could not be read.
    #[error("failed to read blueprint source: {0}")]
    Io(String),

    /// A blueprint source did not parse.
    #[error("failed to parse blueprint '{source_name}': {reason}")]
    Parse { source_name: String, reason: String },

    /// A blueprint parsed but failed structural validation.
    #[error("invalid blueprint '{id}': {reason}")]
    Invalid { id: String, reason: String },
}

impl StoreError {
    /// Creates an I/O error.
    pub fn io(message: impl Into<String>) -> Self {
        StoreError::Io(message.into())
    }

    /// Creates a parse error.
    pub fn parse(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        StoreError::Parse {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Creates a validation error.
    pub fn invalid(id: impl Into<String>, reason: impl Into<String>) -> Self {
        StoreError::Invalid {
            id: id.into(),
            reason: reason.into(),
        }
    }
}
