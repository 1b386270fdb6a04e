//! Conditional visibility
//!
//! Every field carries a [`ConditionalVisibility`]: the names of the fields it
//! depends on plus a predicate deciding whether it should currently be shown.
//! The predicate only runs when one of the dependencies changes (or when a
//! caller asks for it explicitly).

use crate::{Field, FormManager};
use formwork_validation::{is_present, FieldValue, FormView};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Input handed to a visibility predicate
#[derive(Clone, Copy)]
pub struct ConditionalEvent<'a> {
    /// Field being evaluated
    pub field: &'a Field,
    /// Form that owns the field
    pub form: &'a FormManager,
    /// Name of the field whose change triggered the evaluation
    pub reason: &'a str,
}

impl fmt::Debug for ConditionalEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionalEvent")
            .field("field", &self.field.name())
            .field("reason", &self.reason)
            .finish_non_exhaustive()
    }
}

/// Decides whether a field is visible.
///
/// Must be deterministic and must not mutate form state; nothing enforces this.
pub trait VisibilityPredicate: Send + Sync {
    fn is_visible(&self, event: &ConditionalEvent<'_>) -> bool;
}

impl<F> VisibilityPredicate for F
where
    F: Fn(&ConditionalEvent<'_>) -> bool + Send + Sync,
{
    fn is_visible(&self, event: &ConditionalEvent<'_>) -> bool {
        self(event)
    }
}

/// Dependency list plus visibility predicate. Immutable; clones share the predicate.
#[derive(Clone)]
pub struct ConditionalVisibility {
    dependencies: Vec<String>,
    predicate: Arc<dyn VisibilityPredicate>,
}

impl ConditionalVisibility {
    /// No dependencies, always visible
    pub fn always() -> Self {
        Self {
            dependencies: Vec::new(),
            predicate: Arc::new(Condition::Always),
        }
    }

    /// Closure predicate re-evaluated whenever one of `dependencies` changes
    pub fn new<I, S, F>(dependencies: I, predicate: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&ConditionalEvent<'_>) -> bool + Send + Sync + 'static,
    {
        Self::from_predicate(dependencies, Arc::new(predicate))
    }

    pub fn from_predicate<I, S>(dependencies: I, predicate: Arc<dyn VisibilityPredicate>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut deps: Vec<String> = Vec::new();
        for dep in dependencies {
            let dep = dep.into();
            if !deps.contains(&dep) {
                deps.push(dep);
            }
        }

        Self {
            dependencies: deps,
            predicate,
        }
    }

    /// Declarative predicate; dependencies are the fields the condition reads
    pub fn when(condition: Condition) -> Self {
        let dependencies = condition.referenced_fields();
        Self::from_predicate(dependencies, Arc::new(condition))
    }

    /// Dependency names in insertion order, without duplicates
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub fn depends_on(&self, name: &str) -> bool {
        self.dependencies.iter().any(|dep| dep == name)
    }

    pub fn is_visible(&self, event: &ConditionalEvent<'_>) -> bool {
        self.predicate.is_visible(event)
    }
}

impl Default for ConditionalVisibility {
    fn default() -> Self {
        Self::always()
    }
}

impl fmt::Debug for ConditionalVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionalVisibility")
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

/// Serializable visibility predicate over the values of other fields.
///
/// Lookups go through [`FormView`], so a hidden field reads as missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Condition {
    Always,
    Never,
    Equals { field: String, value: FieldValue },
    NotEquals { field: String, value: FieldValue },
    In { field: String, values: Vec<FieldValue> },
    NotEmpty { field: String },
    Truthy { field: String },
    All { conditions: Vec<Condition> },
    Any { conditions: Vec<Condition> },
    Not { condition: Box<Condition> },
}

impl Condition {
    pub fn equals(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Condition::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn not_empty(field: impl Into<String>) -> Self {
        Condition::NotEmpty {
            field: field.into(),
        }
    }

    pub fn evaluate(&self, form: &dyn FormView) -> bool {
        match self {
            Condition::Always => true,
            Condition::Never => false,
            Condition::Equals { field, value } => form.value(field) == Some(value),
            Condition::NotEquals { field, value } => form.value(field) != Some(value),
            Condition::In { field, values } => form.value(field).is_some_and(|v| values.contains(v)),
            Condition::NotEmpty { field } => form.value(field).is_some_and(is_present),
            Condition::Truthy { field } => form.value(field).is_some_and(is_truthy),
            Condition::All { conditions } => conditions.iter().all(|c| c.evaluate(form)),
            Condition::Any { conditions } => conditions.iter().any(|c| c.evaluate(form)),
            Condition::Not { condition } => !condition.evaluate(form),
        }
    }

    /// Every field name the condition reads, first occurrence order
    pub fn referenced_fields(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.collect_fields(&mut names);
        names
    }

    fn collect_fields(&self, names: &mut Vec<String>) {
        match self {
            Condition::Always | Condition::Never => {}
            Condition::Equals { field, .. }
            | Condition::NotEquals { field, .. }
            | Condition::In { field, .. }
            | Condition::NotEmpty { field }
            | Condition::Truthy { field } => {
                if !names.contains(field) {
                    names.push(field.clone());
                }
            }
            Condition::All { conditions } | Condition::Any { conditions } => {
                for condition in conditions {
                    condition.collect_fields(names);
                }
            }
            Condition::Not { condition } => condition.collect_fields(names),
        }
    }
}

impl VisibilityPredicate for Condition {
    fn is_visible(&self, event: &ConditionalEvent<'_>) -> bool {
        self.evaluate(event.form)
    }
}

fn is_truthy(value: &FieldValue) -> bool {
    match value {
        FieldValue::Bool(b) => *b,
        FieldValue::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        other => is_present(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn form(pairs: &[(&str, FieldValue)]) -> HashMap<String, FieldValue> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_default_has_no_dependencies() {
        let conditional = ConditionalVisibility::default();
        assert!(conditional.dependencies().is_empty());
        assert!(!conditional.depends_on("anything"));
    }

    #[test]
    fn test_dependencies_deduplicated_in_order() {
        let conditional = ConditionalVisibility::new(["b", "a", "b"], |_: &ConditionalEvent<'_>| true);
        assert_eq!(conditional.dependencies(), ["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_condition_evaluation() {
        let values = form(&[("country", json!("US")), ("subscribe", json!(true)), ("notes", json!(""))]);

        assert!(Condition::equals("country", "US").evaluate(&values));
        assert!(!Condition::equals("country", "CA").evaluate(&values));
        assert!(!Condition::equals("missing", "US").evaluate(&values));
        assert!(Condition::Truthy { field: "subscribe".into() }.evaluate(&values));
        assert!(!Condition::not_empty("notes").evaluate(&values));
        assert!(Condition::In {
            field: "country".into(),
            values: vec![json!("CA"), json!("US")],
        }
        .evaluate(&values));
        assert!(Condition::Not {
            condition: Box::new(Condition::Never)
        }
        .evaluate(&values));
    }

    #[test]
    fn test_when_derives_dependencies() {
        let condition = Condition::All {
            conditions: vec![
                Condition::equals("country", "US"),
                Condition::Any {
                    conditions: vec![Condition::not_empty("zip"), Condition::equals("country", "CA")],
                },
            ],
        };

        let conditional = ConditionalVisibility::when(condition);
        assert_eq!(conditional.dependencies(), ["country".to_string(), "zip".to_string()]);
    }

    #[test]
    fn test_condition_serde() {
        let condition: Condition = serde_json::from_value(json!({
            "op": "equals",
            "field": "country",
            "value": "US"
        }))
        .unwrap();
        assert_eq!(condition, Condition::equals("country", "US"));

        let nested: Condition = serde_json::from_value(json!({
            "op": "not",
            "condition": {"op": "truthy", "field": "opt_out"}
        }))
        .unwrap();
        assert_eq!(nested.referenced_fields(), vec!["opt_out".to_string()]);
    }
}
