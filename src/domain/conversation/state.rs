//! Conversation phase state machine.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Phases a conversation moves through, strictly forward.
///
/// `ServiceSelection` holds until the user picks a service, then
/// `DataCollection` runs the field loop, and `Completion` is terminal:
/// no transition leaves it and no user input changes a completed
/// conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationPhase {
    ServiceSelection,
    DataCollection,
    Completion,
}

impl StateMachine for ConversationPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ConversationPhase::*;
        matches!(
            (self, target),
            (ServiceSelection, DataCollection) | (DataCollection, Completion)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ConversationPhase::*;
        match self {
            ServiceSelection => vec![DataCollection],
            DataCollection => vec![Completion],
            Completion => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_advance_forward_only() {
        use ConversationPhase::*;
        assert!(ServiceSelection.can_transition_to(&DataCollection));
        assert!(DataCollection.can_transition_to(&Completion));

        assert!(!DataCollection.can_transition_to(&ServiceSelection));
        assert!(!Completion.can_transition_to(&DataCollection));
        assert!(!ServiceSelection.can_transition_to(&Completion));
    }

    #[test]
    fn completion_is_terminal() {
        assert!(ConversationPhase::Completion.is_terminal());
        assert!(!ConversationPhase::ServiceSelection.is_terminal());
        assert!(!ConversationPhase::DataCollection.is_terminal());
    }

    #[test]
    fn phase_serializes_snake_case() {
        let json = serde_json::to_string(&ConversationPhase::ServiceSelection).unwrap();
        assert_eq!(json, "\"service_selection\"");
    }
}
