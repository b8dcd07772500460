//! Field definitions: the unit of data a blueprint collects.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::condition::Visibility;
use crate::domain::foundation::{FieldId, SlotMap, SlotValue, ValidationError};

/// Scalar type of a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Number,
    Boolean,
    Date,
}

/// Declarative validation rule applied after type coercion.
///
/// The empty rule accepts any well-typed value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationRule {
    /// Minimum numeric value (numbers only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Maximum numeric value (numbers only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Minimum text length in characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    /// Maximum text length in characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Closed set of accepted values, compared against the display form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<String>>,
}

impl ValidationRule {
    /// Checks a coerced value against the rule.
    pub fn check(&self, field: &FieldId, value: &SlotValue) -> Result<(), ValidationError> {
        if let SlotValue::Number(n) = value {
            let min = self.min.unwrap_or(f64::NEG_INFINITY);
            let max = self.max.unwrap_or(f64::INFINITY);
            if *n < min || *n > max {
                return Err(ValidationError::out_of_range(field.as_str(), min, max, *n));
            }
        }

        if let SlotValue::Text(s) = value {
            let len = s.chars().count();
            if let Some(min_length) = self.min_length {
                if len < min_length {
                    return Err(ValidationError::invalid_format(
                        field.as_str(),
                        format!("must be at least {} characters", min_length),
                    ));
                }
            }
            if let Some(max_length) = self.max_length {
                if len > max_length {
                    return Err(ValidationError::invalid_format(
                        field.as_str(),
                        format!("must be at most {} characters", max_length),
                    ));
                }
            }
        }

        if let Some(allowed) = &self.allowed_values {
            let display = value.to_string();
            if !allowed.iter().any(|a| a == &display) {
                return Err(ValidationError::invalid_format(
                    field.as_str(),
                    format!("must be one of: {}", allowed.join(", ")),
                ));
            }
        }

        Ok(())
    }
}

/// One unit of data to collect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub id: FieldId,
    /// Question text shown to the user when this field is asked.
    pub prompt: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "rule_is_empty")]
    pub validation: ValidationRule,
    /// Visibility condition. Absent key: always visible; explicit `null`:
    /// never visible; otherwise a condition tree over prior answers.
    #[serde(default, skip_serializing_if = "Visibility::is_always")]
    pub condition: Visibility,
    /// Capture the user's wording verbatim instead of a paraphrase.
    #[serde(default)]
    pub verbatim: bool,
}

fn rule_is_empty(rule: &ValidationRule) -> bool {
    rule == &ValidationRule::default()
}

impl FieldDefinition {
    /// Creates a field with no validation rule and default visibility.
    pub fn new(id: impl Into<FieldId>, prompt: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            field_type,
            validation: ValidationRule::default(),
            condition: Visibility::Always,
            verbatim: false,
        }
    }

    /// Sets the validation rule.
    pub fn with_validation(mut self, validation: ValidationRule) -> Self {
        self.validation = validation;
        self
    }

    /// Sets the visibility condition.
    pub fn with_condition(mut self, condition: Visibility) -> Self {
        self.condition = condition;
        self
    }

    /// Marks the field as verbatim capture.
    pub fn verbatim(mut self) -> Self {
        self.verbatim = true;
        self
    }

    /// Returns true if the field may currently be asked.
    pub fn is_visible(&self, data: &SlotMap) -> bool {
        self.condition.is_visible(data)
    }

    /// Converts a raw extracted value into this field's typed variant and
    /// checks it against the validation rule.
    ///
    /// This is the single gate through which values enter the slot map,
    /// whether they come from extraction or from plugin hook updates.
    pub fn coerce_and_validate(&self, raw: &Value) -> Result<SlotValue, ValidationError> {
        let value = self.coerce(raw)?;
        self.validation.check(&self.id, &value)?;
        Ok(value)
    }

    fn coerce(&self, raw: &Value) -> Result<SlotValue, ValidationError> {
        match (self.field_type, raw) {
            (FieldType::Text, Value::String(s)) => {
                if s.is_empty() {
                    // Empty extraction means "no answer found", never a
                    // legitimate empty slot.
                    Err(ValidationError::empty_field(self.id.as_str()))
                } else {
                    Ok(SlotValue::Text(s.clone()))
                }
            }
            (FieldType::Number, Value::Number(n)) => n
                .as_f64()
                .map(SlotValue::Number)
                .ok_or_else(|| self.type_error(raw)),
            (FieldType::Number, Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .map(SlotValue::Number)
                .map_err(|_| self.type_error(raw)),
            (FieldType::Boolean, Value::Bool(b)) => Ok(SlotValue::Bool(*b)),
            (FieldType::Boolean, Value::String(s)) => {
                match s.trim().to_lowercase().as_str() {
                    "true" | "yes" => Ok(SlotValue::Bool(true)),
                    "false" | "no" => Ok(SlotValue::Bool(false)),
                    _ => Err(self.type_error(raw)),
                }
            }
            (FieldType::Date, Value::String(s)) => s
                .trim()
                .parse::<chrono::NaiveDate>()
                .map(SlotValue::Date)
                .map_err(|_| self.type_error(raw)),
            _ => Err(self.type_error(raw)),
        }
    }

    fn type_error(&self, raw: &Value) -> ValidationError {
        ValidationError::invalid_format(
            self.id.as_str(),
            format!("expected a {:?} value, got {}", self.field_type, raw),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    mod coercion {
        use super::*;

        #[test]
        fn text_field_accepts_strings() {
            let field = FieldDefinition::new("name", "Your name?", FieldType::Text);
            let value = field.coerce_and_validate(&json!("Ada")).unwrap();
            assert_eq!(value, SlotValue::from("Ada"));
        }

        #[test]
        fn text_field_rejects_empty_string() {
            let field = FieldDefinition::new("name", "Your name?", FieldType::Text);
            assert!(field.coerce_and_validate(&json!("")).is_err());
        }

        #[test]
        fn text_field_rejects_numbers() {
            let field = FieldDefinition::new("name", "Your name?", FieldType::Text);
            assert!(field.coerce_and_validate(&json!(42)).is_err());
        }

        #[test]
        fn number_field_accepts_numbers_and_numeric_strings() {
            let field = FieldDefinition::new("age", "Your age?", FieldType::Number);
            assert_eq!(
                field.coerce_and_validate(&json!(15)).unwrap(),
                SlotValue::Number(15.0)
            );
            assert_eq!(
                field.coerce_and_validate(&json!(" 15 ")).unwrap(),
                SlotValue::Number(15.0)
            );
        }

        #[test]
        fn number_field_rejects_non_numeric_text() {
            let field = FieldDefinition::new("age", "Your age?", FieldType::Number);
            assert!(field.coerce_and_validate(&json!("fifteen")).is_err());
        }

        #[test]
        fn boolean_field_accepts_bool_and_yes_no() {
            let field = FieldDefinition::new("member", "Member?", FieldType::Boolean);
            assert_eq!(
                field.coerce_and_validate(&json!(true)).unwrap(),
                SlotValue::Bool(true)
            );
            assert_eq!(
                field.coerce_and_validate(&json!("no")).unwrap(),
                SlotValue::Bool(false)
            );
        }

        #[test]
        fn date_field_parses_iso_dates() {
            let field = FieldDefinition::new("start", "When?", FieldType::Date);
            let value = field.coerce_and_validate(&json!("2024-05-01")).unwrap();
            assert_eq!(
                value,
                SlotValue::Date(chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
            );
        }

        #[test]
        fn date_field_rejects_invalid_dates() {
            let field = FieldDefinition::new("start", "When?", FieldType::Date);
            assert!(field.coerce_and_validate(&json!("next week")).is_err());
        }

        #[test]
        fn null_is_never_a_valid_value() {
            let field = FieldDefinition::new("age", "Your age?", FieldType::Number);
            assert!(field.coerce_and_validate(&json!(null)).is_err());
        }
    }

    mod rules {
        use super::*;

        #[test]
        fn number_range_is_enforced() {
            let field = FieldDefinition::new("age", "Your age?", FieldType::Number)
                .with_validation(ValidationRule {
                    min: Some(0.0),
                    max: Some(120.0),
                    ..Default::default()
                });
            assert!(field.coerce_and_validate(&json!(42)).is_ok());
            assert!(field.coerce_and_validate(&json!(150)).is_err());
            assert!(field.coerce_and_validate(&json!(-1)).is_err());
        }

        #[test]
        fn text_length_is_enforced() {
            let field = FieldDefinition::new("plate", "Plate?", FieldType::Text)
                .with_validation(ValidationRule {
                    min_length: Some(2),
                    max_length: Some(10),
                    ..Default::default()
                });
            assert!(field.coerce_and_validate(&json!("AB-123")).is_ok());
            assert!(field.coerce_and_validate(&json!("A")).is_err());
            assert!(field.coerce_and_validate(&json!("ABCDEFGHIJK")).is_err());
        }

        #[test]
        fn allowed_values_are_enforced() {
            let field = FieldDefinition::new("kind", "Kind?", FieldType::Text)
                .with_validation(ValidationRule {
                    allowed_values: Some(vec!["resident".into(), "visitor".into()]),
                    ..Default::default()
                });
            assert!(field.coerce_and_validate(&json!("resident")).is_ok());
            let err = field.coerce_and_validate(&json!("alien")).unwrap_err();
            assert!(err.to_string().contains("must be one of"));
        }

        #[test]
        fn empty_rule_accepts_any_well_typed_value() {
            let field = FieldDefinition::new("note", "Note?", FieldType::Text);
            assert!(field.coerce_and_validate(&json!("anything at all")).is_ok());
        }
    }

    mod serde_shape {
        use super::*;

        #[test]
        fn field_parses_from_yaml_without_condition() {
            let yaml = r#"
id: age
prompt: "How old are you?"
type: number
validation:
  min: 0
  max: 120
"#;
            let field: FieldDefinition = serde_yaml::from_str(yaml).unwrap();
            assert_eq!(field.id.as_str(), "age");
            assert_eq!(field.condition, Visibility::Always);
            assert!(!field.verbatim);
        }

        #[test]
        fn field_with_null_condition_is_hidden() {
            let yaml = r#"
id: internal
prompt: "unused"
type: text
condition: null
"#;
            let field: FieldDefinition = serde_yaml::from_str(yaml).unwrap();
            assert_eq!(field.condition, Visibility::Hidden);
        }

        #[test]
        fn field_with_condition_tree_is_conditional() {
            let yaml = r#"
id: license
prompt: "License number?"
type: text
condition:
  op: gt
  var: age
  value: 10
"#;
            let field: FieldDefinition = serde_yaml::from_str(yaml).unwrap();
            assert!(matches!(field.condition, Visibility::When(_)));
        }

        #[test]
        fn verbatim_flag_parses() {
            let yaml = r#"
id: complaint
prompt: "Describe the issue"
type: text
verbatim: true
"#;
            let field: FieldDefinition = serde_yaml::from_str(yaml).unwrap();
            assert!(field.verbatim);
        }
    }
}
