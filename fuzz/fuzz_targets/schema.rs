//! Fuzz target for form schema parsing.
//!
//! Arbitrary bytes are parsed as a JSON schema; anything that parses must build
//! or fail with an error, never panic.

#![no_main]

use formwork_config::{FileFormat, SchemaLoader};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(schema) = SchemaLoader::new(FileFormat::Json).parse(content) {
        if let Ok(mut form) = schema.build() {
            form.validate_all();
            let _ = form.snapshot();
        }
    }
});
