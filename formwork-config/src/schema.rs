//! Declarative form schemas

use crate::{ConfigError, Result};
use formwork_core::{Condition, ConditionalVisibility, FieldValue, FormManager};
use formwork_validation::{RuleKind, ValidationRule};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Fields of a form, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSchema {
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,

    #[serde(default)]
    pub initial: FieldValue,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleSchema>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_when: Option<VisibilitySchema>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, FieldValue>,
}

/// A built-in rule with an optional message override
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSchema {
    #[serde(flatten)]
    pub rule: RuleKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RuleSchema {
    fn build(&self, field: &str) -> Result<ValidationRule> {
        let rule = self
            .rule
            .clone()
            .into_rule()
            .map_err(|e| ConfigError::InvalidPattern {
                field: field.to_string(),
                message: e.to_string(),
            })?;

        Ok(match &self.message {
            Some(message) => rule.with_message(message.clone()),
            None => rule,
        })
    }
}

/// Visibility condition; `depends_on` adds dependencies beyond the fields the
/// condition itself reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibilitySchema {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,

    pub condition: Condition,
}

impl VisibilitySchema {
    fn build(&self) -> ConditionalVisibility {
        let dependencies = self
            .condition
            .referenced_fields()
            .into_iter()
            .chain(self.depends_on.iter().cloned());
        ConditionalVisibility::from_predicate(dependencies, Arc::new(self.condition.clone()))
    }
}

impl FormSchema {
    /// Build a configured form.
    ///
    /// Fields are added in declaration order. Afterwards every field with a
    /// visibility condition is evaluated once, also in declaration order, so the
    /// form starts out with the visibility the schema describes.
    pub fn build(&self) -> Result<FormManager> {
        let mut form = FormManager::new();

        for schema in &self.fields {
            let rules = schema
                .rules
                .iter()
                .map(|rule| rule.build(&schema.name))
                .collect::<Result<Vec<_>>>()?;

            let field = form.add_field(schema.name.clone(), schema.initial.clone())?;
            field.set_rules(rules);
            if let Some(visibility) = &schema.visible_when {
                field.set_conditional(visibility.build());
            }
            field.context_mut().extend(schema.context.clone());
        }

        for schema in self.fields.iter().filter(|f| f.visible_when.is_some()) {
            form.run_conditional(&schema.name, &schema.name)?;
        }

        tracing::debug!(fields = form.len(), "Built form from schema");
        Ok(form)
    }
}
