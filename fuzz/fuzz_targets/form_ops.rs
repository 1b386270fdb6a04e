//! Fuzz target for form mutations.
//!
//! Drives a small chained form with arbitrary operations and checks that every
//! field stays in exactly one visibility state.

#![no_main]

use arbitrary::Arbitrary;
use formwork_core::{Condition, ConditionalVisibility, Field, FormManager};
use libfuzzer_sys::fuzz_target;

const NAMES: [&str; 5] = ["a", "b", "c", "d", "e"];

#[derive(Debug, Arbitrary)]
enum FuzzOp {
    Set { field: u8, value: u8 },
    Blur { field: u8 },
    Conditional { field: u8, reason: u8 },
    Settle { field: u8 },
    Remove { field: u8 },
    Add { field: u8 },
}

fn name(index: u8) -> &'static str {
    NAMES[index as usize % NAMES.len()]
}

fn add(form: &mut FormManager, index: usize) {
    let conditional = match index {
        0 => ConditionalVisibility::always(),
        _ => ConditionalVisibility::when(Condition::NotEquals {
            field: NAMES[index - 1].to_string(),
            value: serde_json::json!(0),
        }),
    };
    if let Ok(field) = form.add_field(NAMES[index], 1) {
        field.set_conditional(conditional);
    }
}

fuzz_target!(|ops: Vec<FuzzOp>| {
    let mut form = FormManager::new();
    for index in 0..NAMES.len() {
        add(&mut form, index);
    }

    for op in ops {
        let _ = match op {
            FuzzOp::Set { field, value } => form
                .update_field_value_and_propagate(name(field), value % 3)
                .map(|_| ()),
            FuzzOp::Blur { field } => form.update_field_state_on_blur(name(field)),
            FuzzOp::Conditional { field, reason } => form
                .run_conditional(name(field), name(reason))
                .map(|_| ()),
            FuzzOp::Settle { field } => form.settle_visibility(name(field)).map(|_| ()),
            FuzzOp::Remove { field } => form.remove_field(name(field)).map(|_| ()),
            FuzzOp::Add { field } => {
                add(&mut form, field as usize % NAMES.len());
                Ok(())
            }
        };

        let visible = form.visible_fields().count();
        let removed = form.removed_fields().count();
        assert_eq!(visible + removed, form.len());
        assert_eq!(form.values().len(), visible);
        assert!(form.visible_fields().map(Field::name).all(|n| form.field(n).is_some()));
    }
});
