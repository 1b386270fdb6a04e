//! Form manager and the visibility propagation algorithm
//!
//! Fields live in a single registry keyed by name. Each entry carries a
//! [`Visibility`] tag, so a field is always in exactly one of the two states and
//! moving it between them never copies the record.
//!
//! A value change re-validates the changed field and then re-evaluates the
//! visibility of every field that declares a dependency on it. Propagation is
//! one level deep: the dependents are collected before any of them move, and a
//! field whose visibility flips is not itself scanned for dependents in the same
//! call. [`FormManager::settle_visibility`] walks the whole chain on request.

use crate::{ConditionalEvent, Field, FormError, Result};
use formwork_validation::{FieldValue, FormView, ValidationError, ValidationErrors};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use tracing::{debug, trace};

/// Which of the two mutually exclusive states a field is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Shown; takes part in values and form validity
    Active,
    /// Hidden by its visibility predicate
    Removed,
}

#[derive(Debug, Clone)]
struct FieldEntry {
    visibility: Visibility,
    field: Field,
}

/// What a propagating operation did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Propagation {
    /// False when the value was unchanged and nothing ran
    pub changed: bool,
    /// Fields whose visibility predicate was evaluated, in evaluation order
    pub evaluated: Vec<String>,
    /// Fields that switched state, with the state they ended up in
    pub transitions: Vec<(String, Visibility)>,
}

/// Owns the fields of one form and drives validation and visibility.
///
/// Single-threaded; wrap the whole manager in one lock if it has to be shared.
#[derive(Debug, Clone, Default)]
pub struct FormManager {
    fields: IndexMap<String, FieldEntry>,
}

impl FormManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an active field with default state and return it for configuration.
    ///
    /// Names are unique; adding an existing name (active or hidden) fails.
    pub fn add_field(
        &mut self,
        name: impl Into<String>,
        initial: impl Into<FieldValue>,
    ) -> Result<&mut Field> {
        let name = name.into();
        if self.fields.contains_key(&name) {
            return Err(FormError::DuplicateField(name));
        }

        debug!(field = %name, "Adding field");
        let entry = FieldEntry {
            visibility: Visibility::Active,
            field: Field::new(name.clone(), initial.into()),
        };
        let (index, _) = self.fields.insert_full(name, entry);
        Ok(&mut self.fields[index].field)
    }

    /// Permanently delete a field from whichever state holds it
    pub fn remove_field(&mut self, name: &str) -> Result<Field> {
        let entry = self
            .fields
            .shift_remove(name)
            .ok_or_else(|| FormError::FieldNotFound(name.to_string()))?;

        debug!(field = %name, visibility = ?entry.visibility, "Removed field");
        Ok(entry.field)
    }

    /// Active field by name. Hidden fields are not returned.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields
            .get(name)
            .filter(|entry| entry.visibility == Visibility::Active)
            .map(|entry| &entry.field)
    }

    /// Field by name in either state, for configuring rules and predicates
    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.get_mut(name).map(|entry| &mut entry.field)
    }

    pub fn visibility(&self, name: &str) -> Option<Visibility> {
        self.fields.get(name).map(|entry| entry.visibility)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn visible_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields_in(Visibility::Active)
    }

    pub fn removed_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields_in(Visibility::Removed)
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (Visibility, &Field)> {
        self.fields
            .values()
            .map(|entry| (entry.visibility, &entry.field))
    }

    fn fields_in(&self, visibility: Visibility) -> impl Iterator<Item = &Field> {
        self.fields
            .values()
            .filter(move |entry| entry.visibility == visibility)
            .map(|entry| &entry.field)
    }

    /// Values of the active fields, in insertion order
    pub fn values(&self) -> IndexMap<String, FieldValue> {
        self.visible_fields()
            .map(|field| (field.name().to_string(), field.value().clone()))
            .collect()
    }

    /// True when every active field passed its last validation run
    pub fn is_form_valid(&self) -> bool {
        self.visible_fields().all(Field::is_valid)
    }

    /// First-failure errors of the active fields that failed their last run.
    ///
    /// Fields that have never been validated are not reported.
    pub fn errors(&self) -> ValidationErrors {
        self.visible_fields()
            .filter_map(|field| {
                let kind = field.error_kind()?;
                Some(
                    ValidationError::new(field.name(), field.error_message())
                        .with_kind(kind)
                        .with_value(field.value().clone()),
                )
            })
            .collect::<Vec<_>>()
            .into()
    }

    fn active_index(&self, name: &str) -> Result<usize> {
        match self.fields.get_full(name) {
            Some((index, _, entry)) if entry.visibility == Visibility::Active => Ok(index),
            _ => Err(FormError::FieldNotFound(name.to_string())),
        }
    }

    fn index_of(&self, name: &str) -> Result<usize> {
        self.fields
            .get_index_of(name)
            .ok_or_else(|| FormError::FieldNotFound(name.to_string()))
    }

    /// Validate an active field and store the outcome on it
    pub fn run_validations(&mut self, name: &str) -> Result<()> {
        let index = self.active_index(name)?;
        self.validate_at(index);
        Ok(())
    }

    fn validate_at(&mut self, index: usize) {
        let outcome = self.fields[index].field.validate(&*self);
        trace!(
            field = %self.fields[index].field.name(),
            valid = outcome.is_valid,
            "Validated field"
        );
        self.fields[index].field.apply(outcome);
    }

    /// Evaluate a field's visibility predicate and move it to the matching state.
    ///
    /// Works on active and hidden fields alike. Idempotent for a stable predicate.
    pub fn run_conditional(&mut self, name: &str, reason: &str) -> Result<Visibility> {
        let index = self.index_of(name)?;
        Ok(self.conditional_at(index, reason).0)
    }

    /// Returns the resulting state and whether the field moved
    fn conditional_at(&mut self, index: usize, reason: &str) -> (Visibility, bool) {
        let visible = {
            let field = &self.fields[index].field;
            let event = ConditionalEvent {
                field,
                form: &*self,
                reason,
            };
            field.conditional().is_visible(&event)
        };

        let target = if visible {
            Visibility::Active
        } else {
            Visibility::Removed
        };

        let entry = &mut self.fields[index];
        let moved = entry.visibility != target;
        if moved {
            debug!(
                field = %entry.field.name(),
                reason = %reason,
                to = ?target,
                "Field visibility changed"
            );
            entry.visibility = target;
        }
        entry.field.set_visible(visible);
        (target, moved)
    }

    /// Registry indices of the fields in `visibility` that depend on `name`
    fn dependents_of(&self, name: &str, visibility: Visibility) -> Vec<usize> {
        self.fields
            .values()
            .enumerate()
            .filter(|(_, entry)| {
                entry.visibility == visibility && entry.field.conditional().depends_on(name)
            })
            .map(|(index, _)| index)
            .collect()
    }

    /// Set a new value on an active field, validate it and re-evaluate its dependents.
    ///
    /// The field is marked touched even when the value is unchanged; an unchanged
    /// value stops there without validating or propagating.
    pub fn update_field_value_and_propagate(
        &mut self,
        name: &str,
        value: impl Into<FieldValue>,
    ) -> Result<Propagation> {
        let index = self.active_index(name)?;
        let value = value.into();

        let field = &mut self.fields[index].field;
        field.touch();
        if *field.value() == value {
            trace!(field = %name, "Value unchanged, skipping validation and propagation");
            return Ok(Propagation::default());
        }
        field.set_value(value);
        self.validate_at(index);

        // Both lists are fixed before anything moves.
        let active = self.dependents_of(name, Visibility::Active);
        let removed = self.dependents_of(name, Visibility::Removed);

        let mut propagation = Propagation {
            changed: true,
            ..Propagation::default()
        };
        for dependent in active.into_iter().chain(removed) {
            self.record_conditional(dependent, name, &mut propagation);
        }

        Ok(propagation)
    }

    fn record_conditional(&mut self, index: usize, reason: &str, propagation: &mut Propagation) {
        let (visibility, moved) = self.conditional_at(index, reason);
        let dependent = self.fields[index].field.name().to_string();
        if moved {
            propagation.transitions.push((dependent.clone(), visibility));
        }
        propagation.evaluated.push(dependent);
    }

    /// Mark an active field touched and validate it. No propagation.
    pub fn update_field_state_on_blur(&mut self, name: &str) -> Result<()> {
        let index = self.active_index(name)?;
        self.fields[index].field.touch();
        self.validate_at(index);
        Ok(())
    }

    /// Validate every active field and report overall validity
    pub fn validate_all(&mut self) -> bool {
        let active: Vec<usize> = (0..self.fields.len())
            .filter(|&index| self.fields[index].visibility == Visibility::Active)
            .collect();
        for index in active {
            self.validate_at(index);
        }
        self.is_form_valid()
    }

    /// Mark every active field touched, e.g. on a submit attempt
    pub fn touch_all(&mut self) {
        for entry in self.fields.values_mut() {
            if entry.visibility == Visibility::Active {
                entry.field.touch();
            }
        }
    }

    /// Propagate visibility transitively from `name`.
    ///
    /// Dependents of `name` are evaluated, then the dependents of those, and so on
    /// through the whole dependency graph. Each field is evaluated at most once per
    /// call, which bounds cycles. Never run implicitly by value changes.
    pub fn settle_visibility(&mut self, name: &str) -> Result<Propagation> {
        self.index_of(name)?;

        let mut propagation = Propagation {
            changed: true,
            ..Propagation::default()
        };
        let mut evaluated = HashSet::new();
        let mut queue = VecDeque::from([name.to_string()]);

        while let Some(reason) = queue.pop_front() {
            let mut dependents = self.dependents_of(&reason, Visibility::Active);
            dependents.extend(self.dependents_of(&reason, Visibility::Removed));

            for index in dependents {
                if !evaluated.insert(index) {
                    continue;
                }
                self.record_conditional(index, &reason, &mut propagation);
                queue.push_back(self.fields[index].field.name().to_string());
            }
        }

        Ok(propagation)
    }
}

impl FormView for FormManager {
    fn value(&self, name: &str) -> Option<&FieldValue> {
        self.field(name).map(Field::value)
    }

    fn is_active(&self, name: &str) -> bool {
        self.visibility(name) == Some(Visibility::Active)
    }
}
