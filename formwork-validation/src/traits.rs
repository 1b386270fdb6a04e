// Validation traits

use crate::FieldValue;
use std::collections::HashMap;

/// Read-only window onto the form a rule or condition is evaluated in.
///
/// Only fields that are currently active are reachable through [`FormView::value`];
/// a conditionally hidden field answers `None` just like an unknown one.
pub trait FormView {
    /// Current value of an active field
    fn value(&self, name: &str) -> Option<&FieldValue>;

    /// Whether the named field is currently active
    fn is_active(&self, name: &str) -> bool {
        self.value(name).is_some()
    }
}

impl FormView for HashMap<String, FieldValue> {
    fn value(&self, name: &str) -> Option<&FieldValue> {
        self.get(name)
    }
}

/// A pass/fail predicate over a field value.
///
/// Implementations must be deterministic and must not mutate the form. Failure is
/// signalled by returning `false`; a panicking predicate is not caught.
pub trait Evaluate: Send + Sync {
    fn evaluate(&self, value: &FieldValue, form: &dyn FormView) -> bool;
}

impl<F> Evaluate for F
where
    F: Fn(&FieldValue, &dyn FormView) -> bool + Send + Sync,
{
    fn evaluate(&self, value: &FieldValue, form: &dyn FormView) -> bool {
        self(value, form)
    }
}
