//! Reactive form state engine
//!
//! A [`FormManager`] tracks named [`Field`]s, validates each field's value against
//! its ordered rules and keeps every field either active or hidden according to
//! its [`ConditionalVisibility`]. Changing a value re-validates that field and
//! re-evaluates the visibility of every field that depends on it.
//!
//! The engine is synchronous. User-supplied rules and predicates run unguarded:
//! a panicking predicate propagates to the caller.
//!
//! # Example
//!
//! ```
//! use formwork_core::{Condition, ConditionalVisibility, FormManager, Visibility};
//! use formwork_validation::required;
//!
//! let mut form = FormManager::new();
//! form.add_field("country", "")?.add_rule(required());
//! form.add_field("state", "")?
//!     .set_conditional(ConditionalVisibility::when(Condition::equals("country", "US")));
//!
//! form.update_field_value_and_propagate("country", "CA")?;
//! assert_eq!(form.visibility("state"), Some(Visibility::Removed));
//! assert!(!form.values().contains_key("state"));
//!
//! form.update_field_value_and_propagate("country", "US")?;
//! assert_eq!(form.visibility("state"), Some(Visibility::Active));
//! # Ok::<(), formwork_core::FormError>(())
//! ```

pub mod conditional;
pub mod error;
pub mod field;
pub mod manager;
pub mod snapshot;

pub use conditional::*;
pub use error::*;
pub use field::*;
pub use manager::*;
pub use snapshot::*;

pub use formwork_validation::{FieldValue, FormView};
