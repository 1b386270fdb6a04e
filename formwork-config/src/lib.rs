//! Declarative form schemas for Formwork
//!
//! A [`FormSchema`] lists fields with their initial values, built-in rules and
//! visibility conditions. Schemas are plain serde data and load from JSON or TOML:
//!
//! ```toml
//! [[fields]]
//! name = "country"
//! initial = ""
//!
//! [[fields.rules]]
//! type = "required"
//!
//! [[fields]]
//! name = "state"
//! initial = ""
//!
//! [fields.visible_when.condition]
//! op = "equals"
//! field = "country"
//! value = "US"
//! ```

pub mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, Result};
pub use loader::{FileFormat, SchemaLoader};
pub use schema::{FieldSchema, FormSchema, RuleSchema, VisibilitySchema};

use formwork_core::FormManager;
use std::path::Path;

/// Load a schema file, detecting the format from its extension, and build the form
pub fn load_form(path: impl AsRef<Path>) -> Result<FormManager> {
    let path = path.as_ref();
    SchemaLoader::auto(path)?.load_file(path)?.build()
}
