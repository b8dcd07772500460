//! Scripted collaborator doubles for tests.
//!
//! Each adapter replays a queue of pre-programmed results, one per call,
//! falling back to a neutral default when the queue runs dry. Tests
//! script exact collaborator behavior without any real NLU.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::domain::blueprint::{FieldDefinition, LanguagePolicy, ServiceBlueprint};
use crate::domain::conversation::Conversation;
use crate::ports::{
    CollaboratorError, DataExtractor, Extraction, IntentClassification, IntentClassifier,
    ServiceSelection,
};

/// Classifier replaying scripted selections and intents.
#[derive(Default)]
pub struct ScriptedClassifier {
    selections: Mutex<VecDeque<Result<ServiceSelection, CollaboratorError>>>,
    intents: Mutex<VecDeque<Result<IntentClassification, CollaboratorError>>>,
}

impl ScriptedClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the next `classify_service` result.
    pub fn push_selection(&self, result: Result<ServiceSelection, CollaboratorError>) {
        self.selections.lock().unwrap().push_back(result);
    }

    /// Queues the next `classify_intent` result.
    pub fn push_intent(&self, result: Result<IntentClassification, CollaboratorError>) {
        self.intents.lock().unwrap().push_back(result);
    }
}

#[async_trait]
impl IntentClassifier for ScriptedClassifier {
    async fn classify_service(
        &self,
        _message: &str,
        _available: &[ServiceBlueprint],
        _conversation: &Conversation,
    ) -> Result<ServiceSelection, CollaboratorError> {
        self.selections
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(ServiceSelection::Unclear))
    }

    async fn classify_intent(
        &self,
        _message: &str,
        _pending_field: &FieldDefinition,
        _policy: Option<&LanguagePolicy>,
        _conversation: &Conversation,
    ) -> Result<IntentClassification, CollaboratorError> {
        self.intents
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(IntentClassification::answer()))
    }
}

/// Extractor replaying scripted extractions.
#[derive(Default)]
pub struct ScriptedExtractor {
    extractions: Mutex<VecDeque<Result<Extraction, CollaboratorError>>>,
}

impl ScriptedExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the next `extract` result.
    pub fn push_extraction(&self, result: Result<Extraction, CollaboratorError>) {
        self.extractions.lock().unwrap().push_back(result);
    }
}

#[async_trait]
impl DataExtractor for ScriptedExtractor {
    async fn extract(
        &self,
        _message: &str,
        _fields: &[FieldDefinition],
        _pending_field: &FieldDefinition,
        _policy: Option<&LanguagePolicy>,
        _conversation: &Conversation,
    ) -> Result<Extraction, CollaboratorError> {
        self.extractions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Extraction::empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::blueprint::FieldType;

    #[tokio::test]
    async fn scripted_results_replay_in_order_then_default() {
        let classifier = ScriptedClassifier::new();
        classifier.push_selection(Ok(ServiceSelection::ListServices));

        let conversation = Conversation::new();
        let first = classifier
            .classify_service("m", &[], &conversation)
            .await
            .unwrap();
        assert_eq!(first, ServiceSelection::ListServices);

        let second = classifier
            .classify_service("m", &[], &conversation)
            .await
            .unwrap();
        assert_eq!(second, ServiceSelection::Unclear);
    }

    #[tokio::test]
    async fn extractor_defaults_to_empty() {
        let extractor = ScriptedExtractor::new();
        let field = FieldDefinition::new("a", "A?", FieldType::Text);
        let conversation = Conversation::new();
        let extraction = extractor
            .extract("m", &[], &field, None, &conversation)
            .await
            .unwrap();
        assert!(extraction.data.is_empty());
    }
}
