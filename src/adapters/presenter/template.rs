//! Template-based response presenter.
//!
//! Deterministic wording assembled from blueprint names and field
//! prompts. Generation quality is a non-goal; this adapter gives the
//! binary and the tests a stable default while generative presenters
//! stay swappable behind the port.

use std::fmt::Write;

use crate::domain::blueprint::{FieldDefinition, ServiceBlueprint};
use crate::domain::conversation::Conversation;
use crate::domain::foundation::{SlotMap, ValidationError};
use crate::ports::ResponsePresenter;

/// Fills fixed templates with blueprint and field text.
#[derive(Default)]
pub struct TemplatePresenter;

impl TemplatePresenter {
    pub fn new() -> Self {
        Self
    }

    fn list_lines(blueprints: &[ServiceBlueprint]) -> String {
        let mut lines = String::new();
        for blueprint in blueprints {
            match &blueprint.description {
                Some(description) => {
                    let _ = writeln!(lines, "- {}: {}", blueprint.name, description);
                }
                None => {
                    let _ = writeln!(lines, "- {}", blueprint.name);
                }
            }
        }
        lines
    }
}

impl ResponsePresenter for TemplatePresenter {
    fn greeting(&self) -> String {
        "Hello! I can help you with city services.".to_string()
    }

    fn welcome(&self, blueprint: &ServiceBlueprint) -> String {
        format!(
            "Welcome! I'll help you with: {}. I'll ask a few questions, one at a time.",
            blueprint.name
        )
    }

    fn question(&self, field: &FieldDefinition, _conversation: &Conversation) -> String {
        // The prompt is already the question; verbatim fields just pin
        // generative presenters to the same behavior.
        field.prompt.clone()
    }

    fn validation_failure(&self, field: &FieldDefinition, error: &ValidationError) -> String {
        format!("That doesn't look right: {}. {}", error, field.prompt)
    }

    fn contextual_answer(
        &self,
        _user_question: &str,
        pending_field: &FieldDefinition,
        blueprint: &ServiceBlueprint,
    ) -> String {
        let about = blueprint
            .description
            .as_deref()
            .unwrap_or("I can only help with the current request.");
        format!(
            "This conversation is about: {}. {} Back to the form: {}",
            blueprint.name, about, pending_field.prompt
        )
    }

    fn completion(&self, blueprint: &ServiceBlueprint, data: &SlotMap) -> String {
        let mut summary = String::new();
        for field in &blueprint.fields {
            if let Some(value) = data.get(&field.id) {
                let _ = writeln!(summary, "- {}: {}", field.id, value);
            }
        }
        format!(
            "All done! Your {} request is complete.\n{}Thank you.",
            blueprint.name, summary
        )
    }

    fn service_list(&self, blueprints: &[ServiceBlueprint]) -> String {
        format!(
            "I can help you with these services:\n{}Which one would you like?",
            Self::list_lines(blueprints)
        )
    }

    fn clarification(&self, blueprints: &[ServiceBlueprint]) -> String {
        format!(
            "Sorry, I didn't catch which service you need. I know these:\n{}Please pick one.",
            Self::list_lines(blueprints)
        )
    }

    fn already_completed(&self, blueprint: &ServiceBlueprint) -> String {
        format!(
            "Your {} request is already complete. Start a new conversation for anything else.",
            blueprint.name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::blueprint::FieldType;
    use crate::domain::foundation::SlotValue;

    fn blueprint() -> ServiceBlueprint {
        ServiceBlueprint::new(
            "parking-permit",
            "Parking Permit",
            vec![
                FieldDefinition::new("name", "What's your name?", FieldType::Text),
                FieldDefinition::new("age", "How old are you?", FieldType::Number),
            ],
        )
    }

    #[test]
    fn question_uses_the_field_prompt() {
        let presenter = TemplatePresenter::new();
        let conversation = Conversation::new();
        let field = FieldDefinition::new("age", "How old are you?", FieldType::Number);
        assert_eq!(
            presenter.question(&field, &conversation),
            "How old are you?"
        );
    }

    #[test]
    fn validation_failure_explains_and_re_asks() {
        let presenter = TemplatePresenter::new();
        let field = FieldDefinition::new("age", "How old are you?", FieldType::Number);
        let error = ValidationError::out_of_range("age", 0.0, 120.0, 150.0);

        let text = presenter.validation_failure(&field, &error);
        assert!(text.contains("between 0 and 120"));
        assert!(text.ends_with("How old are you?"));
    }

    #[test]
    fn completion_summarizes_in_field_order() {
        let presenter = TemplatePresenter::new();
        let mut data = SlotMap::new();
        data.insert("age".into(), SlotValue::Number(30.0));
        data.insert("name".into(), SlotValue::from("Ada"));

        let text = presenter.completion(&blueprint(), &data);
        let name_pos = text.find("name: Ada").unwrap();
        let age_pos = text.find("age: 30").unwrap();
        assert!(name_pos < age_pos);
    }

    #[test]
    fn service_list_names_every_service() {
        let presenter = TemplatePresenter::new();
        let other = ServiceBlueprint::new(
            "dog-license",
            "Dog License",
            vec![FieldDefinition::new("breed", "Breed?", FieldType::Text)],
        );
        let text = presenter.service_list(&[blueprint(), other]);
        assert!(text.contains("Parking Permit"));
        assert!(text.contains("Dog License"));
    }
}
