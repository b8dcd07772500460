//! Field visibility conditions.
//!
//! A condition is a small boolean expression tree over the conversation's
//! slot values: variable lookups, comparisons, and `and`/`or` combinators.
//! Evaluation is a plain recursive interpreter over this closed set of
//! node kinds — no dynamic code execution.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::{FieldId, SlotMap, SlotValue};

/// Boolean expression tree evaluated against the slot map.
///
/// Comparisons reference a slot by field id and compare against a literal
/// JSON scalar. A missing slot evaluates as a null-like value: falsy on
/// lookup, unequal to everything except an explicit `null` literal, and
/// unordered (all range comparisons fail).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Condition {
    /// True when every sub-condition is true. Empty list is true.
    And { all: Vec<Condition> },
    /// True when any sub-condition is true. Empty list is false.
    Or { any: Vec<Condition> },
    /// Truthiness of the named slot (`0`, `false`, `""`, missing: falsy).
    Var { var: FieldId },
    Eq { var: FieldId, value: Value },
    Ne { var: FieldId, value: Value },
    Gt { var: FieldId, value: Value },
    Gte { var: FieldId, value: Value },
    Lt { var: FieldId, value: Value },
    Lte { var: FieldId, value: Value },
}

impl Condition {
    /// Evaluates the condition against the current slot values.
    pub fn evaluate(&self, data: &SlotMap) -> bool {
        match self {
            Condition::And { all } => all.iter().all(|c| c.evaluate(data)),
            Condition::Or { any } => any.iter().any(|c| c.evaluate(data)),
            Condition::Var { var } => data.get(var).map(SlotValue::is_truthy).unwrap_or(false),
            Condition::Eq { var, value } => compare_eq(data.get(var), value),
            Condition::Ne { var, value } => !compare_eq(data.get(var), value),
            Condition::Gt { var, value } => compare_ord(data.get(var), value)
                .map(|o| o == std::cmp::Ordering::Greater)
                .unwrap_or(false),
            Condition::Gte { var, value } => compare_ord(data.get(var), value)
                .map(|o| o != std::cmp::Ordering::Less)
                .unwrap_or(false),
            Condition::Lt { var, value } => compare_ord(data.get(var), value)
                .map(|o| o == std::cmp::Ordering::Less)
                .unwrap_or(false),
            Condition::Lte { var, value } => compare_ord(data.get(var), value)
                .map(|o| o != std::cmp::Ordering::Greater)
                .unwrap_or(false),
        }
    }
}

/// Equality between a slot value and a literal.
///
/// A missing slot equals only an explicit `null` literal.
fn compare_eq(slot: Option<&SlotValue>, literal: &Value) -> bool {
    let Some(slot) = slot else {
        return literal.is_null();
    };

    match (slot, literal) {
        (SlotValue::Bool(a), Value::Bool(b)) => a == b,
        (SlotValue::Number(a), Value::Number(b)) => b.as_f64().map(|b| *a == b).unwrap_or(false),
        (SlotValue::Text(a), Value::String(b)) => a == b,
        (SlotValue::Date(a), Value::String(b)) => b
            .parse::<chrono::NaiveDate>()
            .map(|b| *a == b)
            .unwrap_or(false),
        _ => false,
    }
}

/// Ordering between a slot value and a literal, when both sides are
/// comparable: numbers numerically, dates chronologically, text
/// lexicographically. Missing slots and type mismatches are unordered.
fn compare_ord(slot: Option<&SlotValue>, literal: &Value) -> Option<std::cmp::Ordering> {
    let slot = slot?;

    match (slot, literal) {
        (SlotValue::Number(a), Value::Number(b)) => a.partial_cmp(&b.as_f64()?),
        (SlotValue::Text(a), Value::String(b)) => Some(a.as_str().cmp(b.as_str())),
        (SlotValue::Date(a), Value::String(b)) => {
            let b = b.parse::<chrono::NaiveDate>().ok()?;
            Some(a.cmp(&b))
        }
        _ => None,
    }
}

/// Field visibility, distinguishing an absent condition from an explicit
/// `null` one.
///
/// In blueprint documents, omitting the `condition` key means the field is
/// always visible; writing `condition: null` hides the field outright.
/// Both forms occur in real blueprints and must not be conflated.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Visibility {
    /// Condition key absent: always visible.
    #[default]
    Always,
    /// Condition key explicitly null: never visible.
    Hidden,
    /// Visible when the condition evaluates truthy.
    When(Condition),
}

impl Visibility {
    /// Evaluates visibility against the current slot values.
    pub fn is_visible(&self, data: &SlotMap) -> bool {
        match self {
            Visibility::Always => true,
            Visibility::Hidden => false,
            Visibility::When(condition) => condition.evaluate(data),
        }
    }

    /// Returns true for the unconditional default.
    pub fn is_always(&self) -> bool {
        matches!(self, Visibility::Always)
    }
}

impl Serialize for Visibility {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // Always is skipped at the field level; serializing it anyway
            // degrades to null rather than inventing a marker value.
            Visibility::Always | Visibility::Hidden => serializer.serialize_none(),
            Visibility::When(condition) => serializer.serialize_some(condition),
        }
    }
}

impl<'de> Deserialize<'de> for Visibility {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let condition = Option::<Condition>::deserialize(deserializer)?;
        Ok(match condition {
            None => Visibility::Hidden,
            Some(c) => Visibility::When(c),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(entries: &[(&str, SlotValue)]) -> SlotMap {
        entries
            .iter()
            .map(|(id, v)| (FieldId::new(*id), v.clone()))
            .collect()
    }

    mod truthiness {
        use super::*;

        #[test]
        fn var_on_missing_slot_is_falsy() {
            let cond = Condition::Var { var: "toggle".into() };
            assert!(!cond.evaluate(&SlotMap::new()));
        }

        #[test]
        fn var_on_zero_is_falsy() {
            let cond = Condition::Var { var: "count".into() };
            assert!(!cond.evaluate(&data(&[("count", SlotValue::Number(0.0))])));
        }

        #[test]
        fn var_on_nonempty_text_is_truthy() {
            let cond = Condition::Var { var: "name".into() };
            assert!(cond.evaluate(&data(&[("name", "Ada".into())])));
        }
    }

    mod comparisons {
        use super::*;

        #[test]
        fn gt_on_numbers() {
            let cond = Condition::Gt {
                var: "age".into(),
                value: json!(10),
            };
            assert!(cond.evaluate(&data(&[("age", SlotValue::Number(15.0))])));
            assert!(!cond.evaluate(&data(&[("age", SlotValue::Number(5.0))])));
            assert!(!cond.evaluate(&data(&[("age", SlotValue::Number(10.0))])));
        }

        #[test]
        fn gte_and_lte_include_the_bound() {
            let gte = Condition::Gte {
                var: "age".into(),
                value: json!(10),
            };
            let lte = Condition::Lte {
                var: "age".into(),
                value: json!(10),
            };
            let ten = data(&[("age", SlotValue::Number(10.0))]);
            assert!(gte.evaluate(&ten));
            assert!(lte.evaluate(&ten));
        }

        #[test]
        fn range_comparison_on_missing_slot_is_false() {
            let cond = Condition::Gt {
                var: "age".into(),
                value: json!(10),
            };
            assert!(!cond.evaluate(&SlotMap::new()));
        }

        #[test]
        fn range_comparison_on_type_mismatch_is_false() {
            let cond = Condition::Lt {
                var: "age".into(),
                value: json!(10),
            };
            assert!(!cond.evaluate(&data(&[("age", "young".into())])));
        }

        #[test]
        fn eq_on_text_and_bool() {
            let text = Condition::Eq {
                var: "kind".into(),
                value: json!("resident"),
            };
            assert!(text.evaluate(&data(&[("kind", "resident".into())])));
            assert!(!text.evaluate(&data(&[("kind", "visitor".into())])));

            let flag = Condition::Eq {
                var: "member".into(),
                value: json!(true),
            };
            assert!(flag.evaluate(&data(&[("member", SlotValue::Bool(true))])));
        }

        #[test]
        fn eq_null_matches_only_missing_slots() {
            let cond = Condition::Eq {
                var: "extra".into(),
                value: json!(null),
            };
            assert!(cond.evaluate(&SlotMap::new()));
            assert!(!cond.evaluate(&data(&[("extra", "x".into())])));
        }

        #[test]
        fn ne_is_negation_of_eq() {
            let cond = Condition::Ne {
                var: "kind".into(),
                value: json!("resident"),
            };
            assert!(cond.evaluate(&data(&[("kind", "visitor".into())])));
            assert!(cond.evaluate(&SlotMap::new()));
        }

        #[test]
        fn dates_compare_chronologically() {
            let cond = Condition::Lt {
                var: "start".into(),
                value: json!("2024-06-01"),
            };
            let date = chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
            assert!(cond.evaluate(&data(&[("start", SlotValue::Date(date))])));
        }
    }

    mod combinators {
        use super::*;

        #[test]
        fn and_requires_all_branches() {
            let cond = Condition::And {
                all: vec![
                    Condition::Var { var: "a".into() },
                    Condition::Var { var: "b".into() },
                ],
            };
            let both = data(&[("a", SlotValue::Bool(true)), ("b", SlotValue::Bool(true))]);
            let one = data(&[("a", SlotValue::Bool(true))]);
            assert!(cond.evaluate(&both));
            assert!(!cond.evaluate(&one));
        }

        #[test]
        fn or_requires_any_branch() {
            let cond = Condition::Or {
                any: vec![
                    Condition::Var { var: "a".into() },
                    Condition::Var { var: "b".into() },
                ],
            };
            assert!(cond.evaluate(&data(&[("b", SlotValue::Bool(true))])));
            assert!(!cond.evaluate(&SlotMap::new()));
        }

        #[test]
        fn empty_and_is_true_empty_or_is_false() {
            assert!(Condition::And { all: vec![] }.evaluate(&SlotMap::new()));
            assert!(!Condition::Or { any: vec![] }.evaluate(&SlotMap::new()));
        }

        #[test]
        fn nested_trees_evaluate_recursively() {
            // (age > 10 and kind == "resident") or vip
            let cond = Condition::Or {
                any: vec![
                    Condition::And {
                        all: vec![
                            Condition::Gt {
                                var: "age".into(),
                                value: json!(10),
                            },
                            Condition::Eq {
                                var: "kind".into(),
                                value: json!("resident"),
                            },
                        ],
                    },
                    Condition::Var { var: "vip".into() },
                ],
            };
            assert!(cond.evaluate(&data(&[
                ("age", SlotValue::Number(15.0)),
                ("kind", "resident".into()),
            ])));
            assert!(cond.evaluate(&data(&[("vip", SlotValue::Bool(true))])));
            assert!(!cond.evaluate(&data(&[("age", SlotValue::Number(15.0))])));
        }
    }

    mod visibility {
        use super::*;

        #[test]
        fn always_is_visible_regardless_of_data() {
            assert!(Visibility::Always.is_visible(&SlotMap::new()));
        }

        #[test]
        fn hidden_is_never_visible() {
            let full = data(&[("a", SlotValue::Bool(true))]);
            assert!(!Visibility::Hidden.is_visible(&SlotMap::new()));
            assert!(!Visibility::Hidden.is_visible(&full));
        }

        #[test]
        fn when_follows_the_condition() {
            let vis = Visibility::When(Condition::Var { var: "flag".into() });
            assert!(vis.is_visible(&data(&[("flag", SlotValue::Bool(true))])));
            assert!(!vis.is_visible(&SlotMap::new()));
        }

        #[test]
        fn explicit_null_deserializes_as_hidden() {
            let vis: Visibility = serde_json::from_str("null").unwrap();
            assert_eq!(vis, Visibility::Hidden);
        }

        #[test]
        fn condition_object_deserializes_as_when() {
            let vis: Visibility =
                serde_json::from_str(r#"{"op":"gt","var":"age","value":10}"#).unwrap();
            assert!(matches!(vis, Visibility::When(Condition::Gt { .. })));
        }

        #[test]
        fn default_is_always() {
            assert_eq!(Visibility::default(), Visibility::Always);
        }
    }

    mod yaml {
        use super::*;

        #[test]
        fn condition_parses_from_yaml() {
            let yaml = r#"
op: and
all:
  - op: gt
    var: age
    value: 10
  - op: eq
    var: kind
    value: resident
"#;
            let cond: Condition = serde_yaml::from_str(yaml).unwrap();
            assert!(matches!(cond, Condition::And { ref all } if all.len() == 2));
        }
    }
}
