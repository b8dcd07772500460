//! Keyword-based NLU adapters.
//!
//! Deterministic stand-ins for model-backed classification and
//! extraction: exact-ish service name matching, a question-mark intent
//! heuristic, typed value parsing from the message text, and a small
//! marker-word language heuristic for strict policies. Good enough for
//! the default binary and for exercising the flow; LLM adapters plug in
//! behind the same ports.

use async_trait::async_trait;

use crate::domain::blueprint::{
    FieldDefinition, FieldType, LanguagePolicy, LanguageViolation, ServiceBlueprint,
};
use crate::domain::conversation::Conversation;
use crate::ports::{
    CollaboratorError, DataExtractor, Extraction, IntentClassification, IntentClassifier,
    ServiceSelection,
};

const LIST_MARKERS: &[&str] = &["list", "services", "options", "what can you"];
const QUESTION_STARTERS: &[&str] = &["what", "why", "how", "who", "when", "where", "which"];
const GERMAN_MARKERS: &[&str] = &[
    "der", "die", "das", "und", "ich", "nicht", "bitte", "mein", "ist", "ja", "nein",
];

/// Best-effort language detection from marker words.
///
/// Recognizes only the languages the default deployment cares about;
/// anything else stays undetected rather than guessed.
fn detect_language(message: &str) -> Option<&'static str> {
    let lowered = message.to_lowercase();
    let mut tokens = lowered
        .split(|c: char| !c.is_alphabetic())
        .filter(|t| !t.is_empty());
    if tokens.any(|t| GERMAN_MARKERS.contains(&t)) {
        return Some("de");
    }
    if message.is_ascii() {
        return Some("en");
    }
    None
}

/// Raises a violation when a strict policy rejects the detected language.
fn enforce_policy(
    message: &str,
    policy: Option<&LanguagePolicy>,
) -> Result<Option<&'static str>, CollaboratorError> {
    let detected = detect_language(message);
    if let (Some(policy), Some(language)) = (policy, detected) {
        if policy.rejects(language) {
            let notice = match policy.default_language.as_str() {
                "de" => "Bitte fahren Sie auf Deutsch fort.".to_string(),
                "en" => "Please continue in English.".to_string(),
                other => format!("Please continue in '{}'.", other),
            };
            return Err(LanguageViolation::new(notice, language, &policy.default_language).into());
        }
    }
    Ok(detected)
}

/// Matches messages against service names and list keywords.
#[derive(Default)]
pub struct KeywordIntentClassifier;

impl KeywordIntentClassifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl IntentClassifier for KeywordIntentClassifier {
    async fn classify_service(
        &self,
        message: &str,
        available: &[ServiceBlueprint],
        _conversation: &Conversation,
    ) -> Result<ServiceSelection, CollaboratorError> {
        let lowered = message.to_lowercase();

        for blueprint in available {
            let name = blueprint.name.to_lowercase();
            let slug = blueprint.id.as_str().replace('-', " ");
            if lowered.contains(&name) || lowered.contains(&slug) {
                return Ok(ServiceSelection::Service(blueprint.id.clone()));
            }
        }

        if LIST_MARKERS.iter().any(|marker| lowered.contains(marker)) {
            return Ok(ServiceSelection::ListServices);
        }

        Ok(ServiceSelection::Unclear)
    }

    async fn classify_intent(
        &self,
        message: &str,
        _pending_field: &FieldDefinition,
        policy: Option<&LanguagePolicy>,
        _conversation: &Conversation,
    ) -> Result<IntentClassification, CollaboratorError> {
        enforce_policy(message, policy)?;

        let trimmed = message.trim().to_lowercase();
        let asks = trimmed.ends_with('?')
            || QUESTION_STARTERS
                .iter()
                .any(|starter| trimmed.starts_with(starter));
        if asks {
            return Ok(IntentClassification::question().with_reason("question heuristic"));
        }
        // Ambiguity resolves to Answer: attempting extraction beats
        // stalling the form.
        Ok(IntentClassification::answer())
    }
}

/// Parses the pending field's value straight out of the message text.
#[derive(Default)]
pub struct KeywordDataExtractor;

impl KeywordDataExtractor {
    pub fn new() -> Self {
        Self
    }

    fn parse_value(field: &FieldDefinition, message: &str) -> Option<serde_json::Value> {
        let trimmed = message.trim();
        if trimmed.is_empty() {
            return None;
        }
        if field.verbatim {
            return Some(serde_json::Value::String(trimmed.to_string()));
        }

        match field.field_type {
            FieldType::Text => Some(serde_json::Value::String(trimmed.to_string())),
            FieldType::Number => trimmed
                .split_whitespace()
                .find_map(|token| token.trim_matches(|c: char| !c.is_ascii_digit() && c != '.' && c != '-').parse::<f64>().ok())
                .and_then(serde_json::Number::from_f64)
                .map(serde_json::Value::Number),
            FieldType::Boolean => {
                let lowered = trimmed.to_lowercase();
                // Split like detect_language so "yes," still matches.
                let tokens: Vec<&str> = lowered
                    .split(|c: char| !c.is_alphabetic())
                    .filter(|t| !t.is_empty())
                    .collect();
                if tokens.iter().any(|t| ["yes", "true", "ja"].contains(t)) {
                    Some(serde_json::Value::Bool(true))
                } else if tokens.iter().any(|t| ["no", "false", "nein"].contains(t)) {
                    Some(serde_json::Value::Bool(false))
                } else {
                    None
                }
            }
            FieldType::Date => trimmed
                .split_whitespace()
                .find(|token| token.parse::<chrono::NaiveDate>().is_ok())
                .map(|token| serde_json::Value::String(token.to_string())),
        }
    }
}

#[async_trait]
impl DataExtractor for KeywordDataExtractor {
    async fn extract(
        &self,
        message: &str,
        _fields: &[FieldDefinition],
        pending_field: &FieldDefinition,
        policy: Option<&LanguagePolicy>,
        _conversation: &Conversation,
    ) -> Result<Extraction, CollaboratorError> {
        let detected = enforce_policy(message, policy)?;

        let mut extraction = Extraction::empty();
        if let Some(language) = detected {
            extraction = extraction.with_language(language);
        }
        if let Some(value) = Self::parse_value(pending_field, message) {
            extraction = extraction.with_value(pending_field.id.clone(), value);
        }
        Ok(extraction)
    }
}
