// Error types for form schemas

use formwork_core::FormError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load schema: {0}")]
    LoadError(String),

    #[error("Failed to parse schema: {0}")]
    ParseError(String),

    #[error("Unsupported schema format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid pattern for field {field}: {message}")]
    InvalidPattern { field: String, message: String },

    #[error("Form error: {0}")]
    Form(#[from] FormError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
