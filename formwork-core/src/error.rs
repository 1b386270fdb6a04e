// Error types for the form engine

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Field not found: {0}")]
    FieldNotFound(String),

    #[error("Duplicate field: {0}")]
    DuplicateField(String),
}

pub type Result<T> = std::result::Result<T, FormError>;
