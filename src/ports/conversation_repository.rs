//! Conversation repository port.

use async_trait::async_trait;

use crate::domain::conversation::Conversation;
use crate::domain::foundation::ConversationId;

/// Persistence for conversation state.
///
/// The flow controller loads a conversation at the start of a turn and
/// saves it back once the turn's mutations are final. Implementations
/// only need last-write-wins semantics; turn ordering per conversation
/// is enforced above this port.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Persists a new conversation.
    async fn create(&self, conversation: &Conversation) -> Result<(), RepositoryError>;

    /// Overwrites an existing conversation's state.
    async fn update(&self, conversation: &Conversation) -> Result<(), RepositoryError>;

    /// Loads a conversation by id.
    async fn find_by_id(
        &self,
        id: &ConversationId,
    ) -> Result<Option<Conversation>, RepositoryError>;
}

/// Conversation repository errors.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Update targeted a conversation that was never created.
    #[error("conversation '{0}' not found")]
    NotFound(ConversationId),

    /// Create targeted an id that already exists.
    #[error("conversation '{0}' already exists")]
    AlreadyExists(ConversationId),

    /// Backing storage failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl RepositoryError {
    /// Creates a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        RepositoryError::Storage(message.into())
    }
}
