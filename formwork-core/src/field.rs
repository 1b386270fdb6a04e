//! Field records

use crate::ConditionalVisibility;
use formwork_validation::{FieldValue, FormView, ValidationOutcome, ValidationRule, ValidationRules};
use std::collections::HashMap;

/// A named, validatable, conditionally visible unit of form state.
///
/// Value, validity and the touched flag are only changed by the owning
/// [`FormManager`](crate::FormManager); callers configure rules, the visibility
/// predicate and free-form context.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    value: FieldValue,
    is_valid: bool,
    is_touched: bool,
    is_visible: bool,
    error_message: String,
    error_kind: Option<String>,
    rules: ValidationRules,
    conditional: ConditionalVisibility,
    context: HashMap<String, FieldValue>,
}

impl Field {
    pub(crate) fn new(name: impl Into<String>, value: FieldValue) -> Self {
        Self {
            name: name.into(),
            value,
            is_valid: false,
            is_touched: false,
            is_visible: true,
            error_message: String::new(),
            error_kind: None,
            rules: ValidationRules::new(),
            conditional: ConditionalVisibility::always(),
            context: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    /// Result of the last validation run. `false` until the first run.
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn is_touched(&self) -> bool {
        self.is_touched
    }

    /// Bookkeeping copy of the field's visibility.
    ///
    /// [`FormManager::visibility`](crate::FormManager::visibility) is authoritative.
    pub fn is_visible(&self) -> bool {
        self.is_visible
    }

    /// Message of the first failing rule, empty when valid
    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    /// Kind of the rule that failed the last validation run
    pub fn error_kind(&self) -> Option<&str> {
        self.error_kind.as_deref()
    }

    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    pub fn conditional(&self) -> &ConditionalVisibility {
        &self.conditional
    }

    pub fn context(&self) -> &HashMap<String, FieldValue> {
        &self.context
    }

    /// Caller-owned metadata; the engine never reads it
    pub fn context_mut(&mut self) -> &mut HashMap<String, FieldValue> {
        &mut self.context
    }

    pub fn set_rules(&mut self, rules: impl Into<ValidationRules>) -> &mut Self {
        self.rules = rules.into();
        self
    }

    pub fn add_rule(&mut self, rule: ValidationRule) -> &mut Self {
        self.rules.push(rule);
        self
    }

    pub fn set_conditional(&mut self, conditional: ConditionalVisibility) -> &mut Self {
        self.conditional = conditional;
        self
    }

    /// Run the rules against the current value without touching the field
    pub fn validate(&self, form: &dyn FormView) -> ValidationOutcome {
        self.rules.evaluate(&self.value, form)
    }

    pub(crate) fn set_value(&mut self, value: FieldValue) {
        self.value = value;
    }

    pub(crate) fn touch(&mut self) {
        self.is_touched = true;
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.is_visible = visible;
    }

    pub(crate) fn apply(&mut self, outcome: ValidationOutcome) {
        self.is_valid = outcome.is_valid;
        self.error_message = outcome.error_message;
        self.error_kind = outcome.failed_kind;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwork_validation::{min_length, required};
    use serde_json::json;

    fn no_form() -> HashMap<String, FieldValue> {
        HashMap::new()
    }

    #[test]
    fn test_new_field_defaults() {
        let field = Field::new("name", json!(""));

        assert_eq!(field.name(), "name");
        assert!(!field.is_valid());
        assert!(!field.is_touched());
        assert!(field.is_visible());
        assert!(field.error_message().is_empty());
        assert!(field.rules().is_empty());
        assert!(field.conditional().dependencies().is_empty());
    }

    #[test]
    fn test_validate_is_read_only() {
        let mut field = Field::new("name", json!(""));
        field.add_rule(required()).add_rule(min_length(3));

        let outcome = field.validate(&no_form());
        assert!(!outcome.is_valid);
        assert_eq!(outcome.error_message, "This field is required");
        assert!(field.error_message().is_empty());

        field.apply(outcome);
        assert_eq!(field.error_message(), "This field is required");
        assert_eq!(field.error_kind(), Some("REQUIRED"));
    }

    #[test]
    fn test_context_is_caller_owned() {
        let mut field = Field::new("name", json!(""));
        field.context_mut().insert("label".to_string(), json!("Full name"));

        assert_eq!(field.context().get("label"), Some(&json!("Full name")));
    }
}
