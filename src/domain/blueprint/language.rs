//! Language policy for a service.

use serde::{Deserialize, Serialize};

/// How strictly a service holds users to its language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguageMode {
    /// Follow the user's language once detected.
    #[default]
    Adaptive,
    /// Require the configured default language; other languages trigger
    /// a language violation.
    Strict,
}

/// Language policy attached to a blueprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguagePolicy {
    #[serde(default)]
    pub mode: LanguageMode,
    /// ISO 639-1 code, e.g. `"en"`, `"de"`.
    pub default_language: String,
}

impl LanguagePolicy {
    /// Adaptive policy with the given default language.
    pub fn adaptive(default_language: impl Into<String>) -> Self {
        Self {
            mode: LanguageMode::Adaptive,
            default_language: default_language.into(),
        }
    }

    /// Strict policy requiring the given language.
    pub fn strict(default_language: impl Into<String>) -> Self {
        Self {
            mode: LanguageMode::Strict,
            default_language: default_language.into(),
        }
    }

    /// Returns true when the policy rejects the detected language.
    pub fn rejects(&self, detected: &str) -> bool {
        self.mode == LanguageMode::Strict && detected != self.default_language
    }
}

/// Signal raised by a collaborator when the user communicated outside the
/// policy-mandated language in strict mode.
///
/// Carries everything the flow needs to produce the terminal turn: the
/// user-facing notice, the detected language, and the expected one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageViolation {
    /// User-facing notice text, already in the expected language.
    pub message: String,
    pub detected_language: String,
    pub expected_language: String,
}

impl LanguageViolation {
    /// Creates a violation signal.
    pub fn new(
        message: impl Into<String>,
        detected_language: impl Into<String>,
        expected_language: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            detected_language: detected_language.into(),
            expected_language: expected_language.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adaptive_policy_never_rejects() {
        let policy = LanguagePolicy::adaptive("en");
        assert!(!policy.rejects("de"));
        assert!(!policy.rejects("en"));
    }

    #[test]
    fn strict_policy_rejects_other_languages() {
        let policy = LanguagePolicy::strict("en");
        assert!(policy.rejects("de"));
        assert!(!policy.rejects("en"));
    }

    #[test]
    fn mode_defaults_to_adaptive() {
        let policy: LanguagePolicy =
            serde_yaml::from_str("default_language: en").unwrap();
        assert_eq!(policy.mode, LanguageMode::Adaptive);
    }

    #[test]
    fn strict_mode_parses_from_yaml() {
        let policy: LanguagePolicy =
            serde_yaml::from_str("mode: strict\ndefault_language: de").unwrap();
        assert_eq!(policy.mode, LanguageMode::Strict);
        assert_eq!(policy.default_language, "de");
    }
}
