//! Typed slot values collected during a conversation.
//!
//! Each field in a blueprint declares a scalar type; the value stored for
//! it is the matching `SlotValue` variant. Raw extracted text is converted
//! into a variant by the field's validation step before it is merged.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::FieldId;

/// Map from field id to its collected value.
pub type SlotMap = HashMap<FieldId, SlotValue>;

/// A single collected value.
///
/// Untagged on the wire: clients see plain JSON scalars. Variant order
/// matters for deserialization — dates are tried before free text so ISO
/// date strings come back as dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlotValue {
    Bool(bool),
    Number(f64),
    Date(NaiveDate),
    Text(String),
}

impl SlotValue {
    /// Truthiness used by condition evaluation: `0`, `false` and the
    /// empty string are falsy, everything else (including any date) is
    /// truthy. Presence alone does not make a value truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            SlotValue::Bool(b) => *b,
            SlotValue::Number(n) => *n != 0.0,
            SlotValue::Text(s) => !s.is_empty(),
            SlotValue::Date(_) => true,
        }
    }

    /// Returns the value as a plain JSON scalar.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            SlotValue::Bool(b) => serde_json::Value::Bool(*b),
            SlotValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            SlotValue::Text(s) => serde_json::Value::String(s.clone()),
            SlotValue::Date(d) => serde_json::Value::String(d.format("%Y-%m-%d").to_string()),
        }
    }

    /// Returns the numeric value, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            SlotValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the text value, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SlotValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for SlotValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotValue::Bool(b) => write!(f, "{}", b),
            SlotValue::Number(n) => write!(f, "{}", n),
            SlotValue::Text(s) => write!(f, "{}", s),
            SlotValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<bool> for SlotValue {
    fn from(b: bool) -> Self {
        SlotValue::Bool(b)
    }
}

impl From<f64> for SlotValue {
    fn from(n: f64) -> Self {
        SlotValue::Number(n)
    }
}

impl From<&str> for SlotValue {
    fn from(s: &str) -> Self {
        SlotValue::Text(s.to_string())
    }
}

impl From<String> for SlotValue {
    fn from(s: String) -> Self {
        SlotValue::Text(s)
    }
}

impl From<NaiveDate> for SlotValue {
    fn from(d: NaiveDate) -> Self {
        SlotValue::Date(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_false_and_empty_string_are_falsy() {
        assert!(!SlotValue::Number(0.0).is_truthy());
        assert!(!SlotValue::Bool(false).is_truthy());
        assert!(!SlotValue::Text(String::new()).is_truthy());
    }

    #[test]
    fn non_zero_values_are_truthy() {
        assert!(SlotValue::Number(-1.5).is_truthy());
        assert!(SlotValue::Bool(true).is_truthy());
        assert!(SlotValue::from("yes").is_truthy());
        assert!(SlotValue::Date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()).is_truthy());
    }

    #[test]
    fn values_serialize_as_plain_scalars() {
        assert_eq!(serde_json::to_string(&SlotValue::Bool(true)).unwrap(), "true");
        assert_eq!(serde_json::to_string(&SlotValue::Number(3.0)).unwrap(), "3.0");
        assert_eq!(
            serde_json::to_string(&SlotValue::from("hi")).unwrap(),
            "\"hi\""
        );
    }

    #[test]
    fn date_serializes_as_iso_string() {
        let date = SlotValue::Date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(serde_json::to_string(&date).unwrap(), "\"2024-05-01\"");
    }

    #[test]
    fn iso_string_deserializes_as_date() {
        let value: SlotValue = serde_json::from_str("\"2024-05-01\"").unwrap();
        assert!(matches!(value, SlotValue::Date(_)));
    }

    #[test]
    fn free_text_deserializes_as_text() {
        let value: SlotValue = serde_json::from_str("\"hello there\"").unwrap();
        assert_eq!(value, SlotValue::from("hello there"));
    }

    #[test]
    fn to_json_produces_scalars() {
        assert_eq!(SlotValue::Bool(false).to_json(), serde_json::json!(false));
        assert_eq!(SlotValue::Number(2.0).to_json(), serde_json::json!(2.0));
        assert_eq!(SlotValue::from("x").to_json(), serde_json::json!("x"));
    }
}
