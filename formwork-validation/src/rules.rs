// Validation rules and ordered rule lists

use crate::{Evaluate, FieldValue, FormView, ValidationError};
use std::fmt;
use std::sync::Arc;

/// Immutable named predicate with an attached error message.
///
/// Cloning is cheap and shares the evaluator, so one rule can be attached to
/// any number of fields.
#[derive(Clone)]
pub struct ValidationRule {
    kind: String,
    error_message: String,
    evaluator: Arc<dyn Evaluate>,
}

impl ValidationRule {
    /// Create a rule from a kind, an error message and a predicate
    pub fn new<F>(kind: impl Into<String>, error_message: impl Into<String>, evaluate: F) -> Self
    where
        F: Fn(&FieldValue, &dyn FormView) -> bool + Send + Sync + 'static,
    {
        Self::from_evaluator(kind, error_message, Arc::new(evaluate))
    }

    /// Create a rule around an existing evaluator
    pub fn from_evaluator(
        kind: impl Into<String>,
        error_message: impl Into<String>,
        evaluator: Arc<dyn Evaluate>,
    ) -> Self {
        Self {
            kind: kind.into(),
            error_message: error_message.into(),
            evaluator,
        }
    }

    /// Same predicate, different message
    pub fn with_message(mut self, error_message: impl Into<String>) -> Self {
        self.error_message = error_message.into();
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    pub fn evaluate(&self, value: &FieldValue, form: &dyn FormView) -> bool {
        self.evaluator.evaluate(value, form)
    }
}

impl fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationRule")
            .field("kind", &self.kind)
            .field("error_message", &self.error_message)
            .finish_non_exhaustive()
    }
}

/// Result of running a field's rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub is_valid: bool,
    /// Empty when valid, otherwise the message of the first failing rule
    pub error_message: String,
    /// Kind of the first failing rule
    pub failed_kind: Option<String>,
}

impl ValidationOutcome {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error_message: String::new(),
            failed_kind: None,
        }
    }

    /// Outcome for a failed rule
    pub fn failed(rule: &ValidationRule) -> Self {
        Self {
            is_valid: false,
            error_message: rule.error_message().to_string(),
            failed_kind: Some(rule.kind().to_string()),
        }
    }
}

/// Ordered list of rules attached to one field
#[derive(Debug, Clone, Default)]
pub struct ValidationRules {
    rules: Vec<ValidationRule>,
}

impl ValidationRules {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule (builder style)
    #[allow(clippy::should_implement_trait)]
    pub fn add(mut self, rule: ValidationRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn push(&mut self, rule: ValidationRule) {
        self.rules.push(rule);
    }

    pub fn clear(&mut self) {
        self.rules.clear();
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationRule> {
        self.rules.iter()
    }

    /// First rule, in declaration order, that rejects `value`
    pub fn first_failure(&self, value: &FieldValue, form: &dyn FormView) -> Option<&ValidationRule> {
        self.rules.iter().find(|rule| !rule.evaluate(value, form))
    }

    /// Evaluate the rules in order and stop at the first failure.
    ///
    /// An empty list always yields a valid outcome.
    pub fn evaluate(&self, value: &FieldValue, form: &dyn FormView) -> ValidationOutcome {
        match self.first_failure(value, form) {
            Some(rule) => {
                tracing::trace!(kind = %rule.kind(), "validation rule failed");
                ValidationOutcome::failed(rule)
            }
            None => ValidationOutcome::valid(),
        }
    }

    /// Evaluate and report the failure as a [`ValidationError`] for `field`
    pub fn check(
        &self,
        field: &str,
        value: &FieldValue,
        form: &dyn FormView,
    ) -> Result<(), ValidationError> {
        match self.first_failure(value, form) {
            Some(rule) => Err(ValidationError::new(field, rule.error_message())
                .with_kind(rule.kind())
                .with_value(value.clone())),
            None => Ok(()),
        }
    }
}

impl From<Vec<ValidationRule>> for ValidationRules {
    fn from(rules: Vec<ValidationRule>) -> Self {
        Self { rules }
    }
}

impl FromIterator<ValidationRule> for ValidationRules {
    fn from_iter<I: IntoIterator<Item = ValidationRule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::*;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn empty_form() -> HashMap<String, FieldValue> {
        HashMap::new()
    }

    #[test]
    fn test_first_failure_wins() {
        let rules = ValidationRules::new().add(required()).add(min_length(3));
        let form = empty_form();

        let outcome = rules.evaluate(&json!(""), &form);
        assert!(!outcome.is_valid);
        assert_eq!(outcome.error_message, "This field is required");
        assert_eq!(outcome.failed_kind.as_deref(), Some("REQUIRED"));

        let outcome = rules.evaluate(&json!("ab"), &form);
        assert_eq!(outcome.error_message, "Must be at least 3 characters");

        assert_eq!(rules.evaluate(&json!("abc"), &form), ValidationOutcome::valid());
    }

    #[test]
    fn test_empty_rules_are_valid() {
        let outcome = ValidationRules::new().evaluate(&json!(null), &empty_form());
        assert!(outcome.is_valid);
        assert!(outcome.error_message.is_empty());
    }

    #[test]
    fn test_later_rules_not_run_after_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let rules = ValidationRules::new().add(required()).add(ValidationRule::new(
            "COUNTED",
            "never",
            move |_value: &FieldValue, _form: &dyn FormView| {
                counter.fetch_add(1, Ordering::SeqCst);
                true
            },
        ));

        rules.evaluate(&json!(""), &empty_form());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        rules.evaluate(&json!("x"), &empty_form());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_rule_reads_other_fields() {
        let mut form = empty_form();
        form.insert("password".to_string(), json!("hunter2"));

        let matches = ValidationRule::new(
            "MATCHES",
            "Passwords do not match",
            |value: &FieldValue, form: &dyn FormView| form.value("password") == Some(value),
        );

        assert!(matches.evaluate(&json!("hunter2"), &form));
        assert!(!matches.evaluate(&json!("hunter3"), &form));
    }

    #[test]
    fn test_check_reports_error() {
        let rules: ValidationRules = vec![required().with_message("Name is required")].into();
        let err = rules.check("name", &json!(" "), &empty_form()).unwrap_err();

        assert_eq!(err.field, "name");
        assert_eq!(err.kind, "REQUIRED");
        assert_eq!(err.message, "Name is required");
        assert_eq!(err.value, Some(json!(" ")));
    }

    #[test]
    fn test_shared_rule_clone() {
        let rule = min_length(2);
        let copy = rule.clone();
        assert_eq!(copy.kind(), rule.kind());
        assert!(copy.evaluate(&json!("ok"), &empty_form()));
    }
}
