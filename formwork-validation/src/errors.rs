// Validation error reports

use crate::FieldValue;
use std::fmt;

/// Failed rule for a single field
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Field name that failed validation
    pub field: String,

    /// Error message of the failing rule
    pub message: String,

    /// Kind of the rule that failed (e.g. `REQUIRED`)
    pub kind: String,

    /// Value that failed validation (optional)
    pub value: Option<FieldValue>,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            kind: "CUSTOM".to_string(),
            value: None,
        }
    }

    /// Set the rule kind
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Set the invalid value
    pub fn with_value(mut self, value: FieldValue) -> Self {
        self.value = Some(value);
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors, one per failing field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    pub errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Error reported for a specific field, if any
    pub fn get(&self, field: &str) -> Option<&ValidationError> {
        self.errors.iter().find(|e| e.field == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }

    /// Convert to JSON representation
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "errors": self.errors.iter().map(|e| {
                serde_json::json!({
                    "field": e.field,
                    "message": e.message,
                    "kind": e.kind,
                    "value": e.value,
                })
            }).collect::<Vec<_>>()
        })
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in &self.errors {
            writeln!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<Vec<ValidationError>> for ValidationErrors {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::new(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_errors_to_json() {
        let mut errors = ValidationErrors::default();
        errors.add(
            ValidationError::new("email", "must be a valid email")
                .with_kind("EMAIL")
                .with_value(json!("nope")),
        );

        let rendered = errors.to_json();
        assert_eq!(rendered["errors"][0]["field"], "email");
        assert_eq!(rendered["errors"][0]["kind"], "EMAIL");
        assert_eq!(rendered["errors"][0]["value"], "nope");
        assert_eq!(errors.get("email").map(|e| e.message.as_str()), Some("must be a valid email"));
        assert!(errors.get("name").is_none());
    }
}
