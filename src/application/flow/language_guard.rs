//! Language-violation short circuit.
//!
//! Classifier and extractor calls can signal that the user wrote outside
//! a strict language policy. That signal is not a failure: it becomes a
//! terminal, non-advancing turn carrying the violation notice. Every
//! other collaborator error passes through untouched. Funneling all
//! collaborator results through [`check`] keeps this recovery in one
//! place instead of a try/catch at every call site.

use crate::domain::blueprint::LanguageViolation;
use crate::ports::CollaboratorError;

/// Either the collaborator's value or an absorbed violation.
///
/// The halt payload starts as the raw [`LanguageViolation`] and the
/// controller maps it to the finished terminal turn.
#[derive(Debug)]
pub enum GuardFlow<T, H = LanguageViolation> {
    /// Continue the handler with the value.
    Proceed(T),
    /// Stop the handler; the payload is this turn's response.
    Halt(H),
}

/// Separates the language-violation signal from real failures.
pub fn check<T>(result: Result<T, CollaboratorError>) -> Result<GuardFlow<T>, CollaboratorError> {
    match result {
        Ok(value) => Ok(GuardFlow::Proceed(value)),
        Err(CollaboratorError::LanguageViolation(violation)) => Ok(GuardFlow::Halt(violation)),
        Err(other) => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_values_proceed() {
        let flow = check(Ok::<_, CollaboratorError>(42)).unwrap();
        assert!(matches!(flow, GuardFlow::Proceed(42)));
    }

    #[test]
    fn violations_halt_with_the_signal() {
        let violation = LanguageViolation::new("Bitte auf Deutsch.", "en", "de");
        let flow = check::<()>(Err(violation.clone().into())).unwrap();
        match flow {
            GuardFlow::Halt(v) => assert_eq!(v, violation),
            GuardFlow::Proceed(_) => panic!("violation must halt"),
        }
    }

    #[test]
    fn other_errors_propagate_unchanged() {
        let result = check::<()>(Err(CollaboratorError::provider("down")));
        assert!(matches!(result, Err(CollaboratorError::Provider(_))));
    }
}
