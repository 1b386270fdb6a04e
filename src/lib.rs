// Formwork - a reactive form-state engine
//
// Tracks named fields, validates their values against ordered rules and keeps
// each field active or hidden according to its conditional-visibility predicate.

// Re-export core functionality
pub use formwork_core::*;

// Re-export optional crates
#[cfg(feature = "validation")]
pub use formwork_validation;

#[cfg(feature = "config")]
pub use formwork_config;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Condition, ConditionalEvent, ConditionalVisibility, Field, FieldValue, FormError,
        FormManager, FormView, Propagation, Visibility,
    };

    #[cfg(feature = "validation")]
    pub use formwork_validation::{
        ValidationRule, ValidationRules, email, max_length, min_length, required,
    };

    #[cfg(feature = "config")]
    pub use formwork_config::{FormSchema, load_form};
}
