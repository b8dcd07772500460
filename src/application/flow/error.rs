//! Application-level error type for the flow controller.

use crate::domain::blueprint::HookKind;
use crate::domain::foundation::{DomainError, ErrorCode, PluginInstanceId};
use crate::ports::{CollaboratorError, PluginError, RepositoryError, StoreError};

/// Everything that can abort a turn.
///
/// Recoverable conditions (validation failures, language violations)
/// never become a `FlowError`; they produce normal turns. What remains
/// here surfaces as a request failure.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),

    #[error("{hook} hook failed for instance '{instance}': {source}")]
    Hook {
        hook: HookKind,
        instance: PluginInstanceId,
        #[source]
        source: PluginError,
    },
}

impl FlowError {
    /// Stable error code for transport-level mapping.
    pub fn code(&self) -> ErrorCode {
        match self {
            FlowError::Domain(e) => e.code,
            FlowError::Repository(RepositoryError::NotFound(_)) => ErrorCode::ConversationNotFound,
            FlowError::Repository(_) => ErrorCode::StorageError,
            FlowError::Store(_) => ErrorCode::StorageError,
            FlowError::Collaborator(_) => ErrorCode::InternalError,
            FlowError::Hook { .. } => ErrorCode::PluginExecutionFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_the_error_source() {
        let err: FlowError = DomainError::blueprint_not_found("x").into();
        assert_eq!(err.code(), ErrorCode::BlueprintNotFound);

        let err: FlowError = RepositoryError::storage("disk gone").into();
        assert_eq!(err.code(), ErrorCode::StorageError);

        let err = FlowError::Hook {
            hook: HookKind::OnStart,
            instance: "seed".into(),
            source: PluginError::execution("boom"),
        };
        assert_eq!(err.code(), ErrorCode::PluginExecutionFailed);
    }
}
