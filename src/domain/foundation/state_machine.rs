//! State machine trait for status enums.
//!
//! Provides a consistent interface for validating and performing state
//! transitions across lifecycle statuses (conversation phase, slot status).

use super::ValidationError;

/// Trait for status enums that represent state machines.
///
/// Implementors define valid state transitions and get validated
/// transition methods for free.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for ConversationPhase {
///     fn can_transition_to(&self, target: &Self) -> bool {
///         matches!(
///             (self, target),
///             (ServiceSelection, DataCollection) | (DataCollection, Completion)
///         )
///     }
///
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             ServiceSelection => vec![DataCollection],
///             DataCollection => vec![Completion],
///             Completion => vec![],
///         }
///     }
/// }
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestPhase {
        Open,
        Active,
        Closed,
    }

    impl StateMachine for TestPhase {
        fn can_transition_to(&self, target: &Self) -> bool {
            use TestPhase::*;
            matches!((self, target), (Open, Active) | (Active, Closed))
        }

        fn valid_transitions(&self) -> Vec<Self> {
            use TestPhase::*;
            match self {
                Open => vec![Active],
                Active => vec![Closed],
                Closed => vec![],
            }
        }
    }

    #[test]
    fn transition_to_succeeds_for_valid_transition() {
        assert_eq!(
            TestPhase::Open.transition_to(TestPhase::Active),
            Ok(TestPhase::Active)
        );
    }

    #[test]
    fn transition_to_fails_for_skipped_state() {
        assert!(TestPhase::Open.transition_to(TestPhase::Closed).is_err());
    }

    #[test]
    fn transition_to_fails_for_backward_move() {
        assert!(TestPhase::Active.transition_to(TestPhase::Open).is_err());
    }

    #[test]
    fn is_terminal_only_for_closed() {
        assert!(TestPhase::Closed.is_terminal());
        assert!(!TestPhase::Open.is_terminal());
        assert!(!TestPhase::Active.is_terminal());
    }
}
