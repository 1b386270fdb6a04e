//! Serializable view of a form for rendering layers

use crate::{FormManager, Visibility};
use formwork_validation::FieldValue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSnapshot {
    pub name: String,
    pub value: FieldValue,
    pub visibility: Visibility,
    pub is_valid: bool,
    pub is_touched: bool,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub error_message: String,
}

/// Every field of a form, in insertion order, plus overall validity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSnapshot {
    pub is_valid: bool,
    pub fields: Vec<FieldSnapshot>,
}

impl FormSnapshot {
    pub fn field(&self, name: &str) -> Option<&FieldSnapshot> {
        self.fields.iter().find(|field| field.name == name)
    }
}

impl FormManager {
    /// Capture the state of every field, hidden ones included
    pub fn snapshot(&self) -> FormSnapshot {
        let fields = self
            .entries()
            .map(|(visibility, field)| FieldSnapshot {
                name: field.name().to_string(),
                value: field.value().clone(),
                visibility,
                is_valid: field.is_valid(),
                is_touched: field.is_touched(),
                error_message: field.error_message().to_string(),
            })
            .collect();

        FormSnapshot {
            is_valid: self.is_form_valid(),
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Condition, ConditionalVisibility, FormManager, Visibility};
    use formwork_validation::required;
    use serde_json::json;

    #[test]
    fn test_snapshot_includes_hidden_fields() {
        let mut form = FormManager::new();
        form.add_field("country", "CA").unwrap().add_rule(required());
        form.add_field("state", "")
            .unwrap()
            .set_conditional(ConditionalVisibility::when(Condition::equals("country", "US")));
        form.run_validations("country").unwrap();
        form.run_conditional("state", "country").unwrap();

        let snapshot = form.snapshot();
        assert!(snapshot.is_valid);
        assert_eq!(snapshot.fields.len(), 2);
        assert_eq!(
            snapshot.field("state").map(|f| f.visibility),
            Some(Visibility::Removed)
        );

        let rendered = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(rendered["fields"][0]["name"], "country");
        assert_eq!(rendered["fields"][1]["visibility"], json!("removed"));
        assert!(rendered["fields"][0].get("error_message").is_none());
    }
}
