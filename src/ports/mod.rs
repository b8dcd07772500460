//! Ports: async contracts between the application core and adapters.

mod blueprint_store;
mod conversation_repository;
mod data_extractor;
mod intent_classifier;
mod plugin;
mod presenter;

pub use blueprint_store::{BlueprintStore, StoreError};
pub use conversation_repository::{ConversationRepository, RepositoryError};
pub use data_extractor::{DataExtractor, Extraction};
pub use intent_classifier::{
    CollaboratorError, IntentClassification, IntentClassifier, MessageIntent, ServiceSelection,
};
pub use plugin::{HookContext, HookOutput, Plugin, PluginError, PluginRegistry};
pub use presenter::ResponsePresenter;
