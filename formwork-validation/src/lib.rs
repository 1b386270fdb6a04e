//! Validation rules for Formwork fields
//!
//! A [`ValidationRule`] is an immutable named predicate with an error message.
//! Rules are attached to a field as an ordered [`ValidationRules`] list; running
//! the list reports the first failing rule only.
//!
//! # Examples
//!
//! ## Built-in rules
//!
//! ```
//! use formwork_validation::{min_length, required, FieldValue, ValidationRules};
//! use serde_json::json;
//! use std::collections::HashMap;
//!
//! let rules = ValidationRules::new().add(required()).add(min_length(3));
//! let form: HashMap<String, FieldValue> = HashMap::new();
//!
//! let outcome = rules.evaluate(&json!(""), &form);
//! assert!(!outcome.is_valid);
//! assert_eq!(outcome.error_message, "This field is required");
//!
//! assert!(rules.evaluate(&json!("john"), &form).is_valid);
//! ```
//!
//! ## Custom rules
//!
//! Rules may look at other fields through the [`FormView`] they are handed.
//!
//! ```
//! use formwork_validation::{FieldValue, FormView, ValidationRule};
//! use serde_json::json;
//! use std::collections::HashMap;
//!
//! let confirm = ValidationRule::new(
//!     "MATCHES",
//!     "Passwords do not match",
//!     |value: &FieldValue, form: &dyn FormView| form.value("password") == Some(value),
//! );
//!
//! let mut form = HashMap::new();
//! form.insert("password".to_string(), json!("s3cret"));
//! assert!(confirm.evaluate(&json!("s3cret"), &form));
//! ```

mod errors;
mod rules;
mod traits;
mod validators;

pub use errors::*;
pub use rules::*;
pub use traits::*;
pub use validators::*;

/// Value held by a form field
pub type FieldValue = serde_json::Value;
