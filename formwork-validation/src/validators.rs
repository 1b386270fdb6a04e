// Built-in rules

use crate::{FieldValue, FormView, ValidationRule};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$")
        .expect("email pattern compiles")
});

static URL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").expect("url pattern compiles"));

static NUMERIC_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").expect("numeric pattern compiles"));

/// Whether a value counts as "filled in"
pub fn is_present(value: &FieldValue) -> bool {
    match value {
        FieldValue::Null => false,
        FieldValue::String(s) => !s.trim().is_empty(),
        FieldValue::Array(items) => !items.is_empty(),
        FieldValue::Object(map) => !map.is_empty(),
        FieldValue::Bool(_) | FieldValue::Number(_) => true,
    }
}

/// Length in characters for strings, element count for arrays
fn length_of(value: &FieldValue) -> Option<usize> {
    match value {
        FieldValue::String(s) => Some(s.chars().count()),
        FieldValue::Array(items) => Some(items.len()),
        _ => None,
    }
}

fn number_of(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Number(n) => n.as_f64(),
        FieldValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Matches string values only; anything else passes
fn text_matches(value: &FieldValue, regex: &Regex) -> bool {
    match value {
        FieldValue::String(s) => regex.is_match(s),
        _ => true,
    }
}

/// Declarative rule kinds, for rules that have to be written down (schemas, fixtures)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleKind {
    Required,
    MinLength { min: usize },
    MaxLength { max: usize },
    Email,
    Url,
    Numeric,
    Pattern { pattern: String },
    Min { min: f64 },
    Max { max: f64 },
    OneOf { values: Vec<FieldValue> },
}

impl RuleKind {
    /// Descriptive identifier carried by the built rule
    pub fn kind(&self) -> &'static str {
        match self {
            RuleKind::Required => "REQUIRED",
            RuleKind::MinLength { .. } => "MIN_LENGTH",
            RuleKind::MaxLength { .. } => "MAX_LENGTH",
            RuleKind::Email => "EMAIL",
            RuleKind::Url => "URL",
            RuleKind::Numeric => "NUMERIC",
            RuleKind::Pattern { .. } => "PATTERN",
            RuleKind::Min { .. } => "MIN",
            RuleKind::Max { .. } => "MAX",
            RuleKind::OneOf { .. } => "ONE_OF",
        }
    }

    /// Build the rule. Only `Pattern` can fail, on an invalid regular expression.
    pub fn into_rule(self) -> Result<ValidationRule, regex::Error> {
        let rule = match self {
            RuleKind::Required => required(),
            RuleKind::MinLength { min } => min_length(min),
            RuleKind::MaxLength { max } => max_length(max),
            RuleKind::Email => email(),
            RuleKind::Url => url(),
            RuleKind::Numeric => numeric(),
            RuleKind::Pattern { pattern } => matches(Regex::new(&pattern)?),
            RuleKind::Min { min: bound } => min(bound),
            RuleKind::Max { max: bound } => max(bound),
            RuleKind::OneOf { values } => one_of(values),
        };
        Ok(rule)
    }
}

/// Fails on null, blank strings and empty collections
pub fn required() -> ValidationRule {
    ValidationRule::new(
        "REQUIRED",
        "This field is required",
        |value: &FieldValue, _form: &dyn FormView| is_present(value),
    )
}

pub fn min_length(min: usize) -> ValidationRule {
    ValidationRule::new(
        "MIN_LENGTH",
        format!("Must be at least {} characters", min),
        move |value: &FieldValue, _form: &dyn FormView| length_of(value).is_none_or(|len| len >= min),
    )
}

pub fn max_length(max: usize) -> ValidationRule {
    ValidationRule::new(
        "MAX_LENGTH",
        format!("Must be at most {} characters", max),
        move |value: &FieldValue, _form: &dyn FormView| length_of(value).is_none_or(|len| len <= max),
    )
}

pub fn email() -> ValidationRule {
    ValidationRule::new(
        "EMAIL",
        "Must be a valid email",
        |value: &FieldValue, _form: &dyn FormView| text_matches(value, &EMAIL_REGEX),
    )
}

pub fn url() -> ValidationRule {
    ValidationRule::new(
        "URL",
        "Must be a valid URL",
        |value: &FieldValue, _form: &dyn FormView| text_matches(value, &URL_REGEX),
    )
}

/// Numbers, or strings that spell one
pub fn numeric() -> ValidationRule {
    ValidationRule::new(
        "NUMERIC",
        "Must be a number",
        |value: &FieldValue, _form: &dyn FormView| match value {
            FieldValue::Number(_) => true,
            FieldValue::String(s) => NUMERIC_REGEX.is_match(s.trim()),
            _ => false,
        },
    )
}

pub fn matches(regex: Regex) -> ValidationRule {
    ValidationRule::new(
        "PATTERN",
        format!("Must match pattern {}", regex.as_str()),
        move |value: &FieldValue, _form: &dyn FormView| text_matches(value, &regex),
    )
}

/// Numeric lower bound; non-numeric values fail
pub fn min(bound: f64) -> ValidationRule {
    ValidationRule::new(
        "MIN",
        format!("Must be at least {}", bound),
        move |value: &FieldValue, _form: &dyn FormView| number_of(value).is_some_and(|n| n >= bound),
    )
}

/// Numeric upper bound; non-numeric values fail
pub fn max(bound: f64) -> ValidationRule {
    ValidationRule::new(
        "MAX",
        format!("Must be at most {}", bound),
        move |value: &FieldValue, _form: &dyn FormView| number_of(value).is_some_and(|n| n <= bound),
    )
}

pub fn one_of(values: Vec<FieldValue>) -> ValidationRule {
    ValidationRule::new(
        "ONE_OF",
        "Must be one of the allowed values",
        move |value: &FieldValue, _form: &dyn FormView| values.contains(value),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn check(rule: &ValidationRule, value: FieldValue) -> bool {
        let form: HashMap<String, FieldValue> = HashMap::new();
        rule.evaluate(&value, &form)
    }

    #[test]
    fn test_required() {
        let rule = required();
        assert!(check(&rule, json!("hello")));
        assert!(check(&rule, json!(0)));
        assert!(check(&rule, json!(false)));
        assert!(!check(&rule, json!("")));
        assert!(!check(&rule, json!("   ")));
        assert!(!check(&rule, json!(null)));
        assert!(!check(&rule, json!([])));
    }

    #[test]
    fn test_length_counts_characters() {
        assert!(check(&min_length(3), json!("äöü")));
        assert!(!check(&min_length(3), json!("ab")));
        assert!(check(&max_length(2), json!(["a", "b"])));
        assert!(!check(&max_length(2), json!(["a", "b", "c"])));
        assert!(check(&min_length(3), json!(42)));
    }

    #[test]
    fn test_formats() {
        assert!(check(&email(), json!("user@example.com")));
        assert!(!check(&email(), json!("@example.com")));
        assert!(check(&url(), json!("https://example.com/path")));
        assert!(!check(&url(), json!("not-a-url")));
        assert!(check(&numeric(), json!("-12.5")));
        assert!(check(&numeric(), json!(7)));
        assert!(!check(&numeric(), json!("12a")));
    }

    #[test]
    fn test_bounds() {
        assert!(check(&min(18.0), json!(21)));
        assert!(check(&min(18.0), json!("18")));
        assert!(!check(&min(18.0), json!(17)));
        assert!(!check(&min(18.0), json!("abc")));
        assert!(check(&max(10.0), json!(10)));
        assert!(!check(&max(10.0), json!(10.5)));
    }

    #[test]
    fn test_one_of() {
        let rule = one_of(vec![json!("US"), json!("CA")]);
        assert!(check(&rule, json!("CA")));
        assert!(!check(&rule, json!("MX")));
    }

    #[test]
    fn test_rule_kind_builds() {
        let rule = RuleKind::MinLength { min: 2 }.into_rule().unwrap();
        assert_eq!(rule.kind(), "MIN_LENGTH");
        assert!(!check(&rule, json!("a")));

        let rule = RuleKind::Pattern {
            pattern: r"^\d{5}$".to_string(),
        }
        .into_rule()
        .unwrap();
        assert!(check(&rule, json!("12345")));
        assert!(!check(&rule, json!("1234")));

        assert!(RuleKind::Pattern {
            pattern: "(".to_string()
        }
        .into_rule()
        .is_err());
    }

    #[test]
    fn test_rule_kind_serde() {
        let kind: RuleKind = serde_json::from_value(json!({"type": "min_length", "min": 3})).unwrap();
        assert_eq!(kind, RuleKind::MinLength { min: 3 });

        let kind: RuleKind = serde_json::from_value(json!({"type": "required"})).unwrap();
        assert_eq!(kind.kind(), "REQUIRED");
    }
}
