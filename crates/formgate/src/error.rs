//! Error types for formgate

use thiserror::Error;

/// Result type alias for schema and serialization operations
pub type Result<T> = std::result::Result<T, FormError>;

/// Errors raised while registering or loading form schemas.
///
/// Validation failures are never reported through this type: they are
/// written onto the offending field and clear the form's `valid` flag.
#[derive(Error, Debug, Clone)]
pub enum FormError {
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl From<serde_json::Error> for FormError {
    fn from(err: serde_json::Error) -> Self {
        FormError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for FormError {
    fn from(err: std::io::Error) -> Self {
        FormError::Io(err.to_string())
    }
}

/// Why a submission could not be lined up with its schema.
///
/// The engine answers all of these with an empty, invalid form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeMismatch {
    #[error("Unknown form: {0:?}")]
    UnknownForm(String),

    #[error("Field count mismatch: schema has {expected}, submission has {actual}")]
    FieldCount { expected: usize, actual: usize },

    #[error("Field {index} kind mismatch: schema has {expected}, submission has {actual}")]
    FieldKind {
        index: usize,
        expected: &'static str,
        actual: &'static str,
    },
}
