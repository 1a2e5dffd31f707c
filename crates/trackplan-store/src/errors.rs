//! Error handling for trackplan-store
//!
//! Wraps trackplan-core ExError with store-specific helpers

use std::path::Path;

use trackplan_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a document validation error
pub fn invalid_document(reason: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidDocument)
        .with_op("parse_document")
        .with_message(reason.to_string())
}

/// Create a document validation error naming the offending file
pub fn invalid_document_at(path: &Path, reason: &str) -> ExError {
    invalid_document(reason).with_entity_id(path.display().to_string())
}

/// Create a configuration error
pub fn invalid_config(path: &Path, reason: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidConfig)
        .with_op("load_options")
        .with_entity_id(path.display().to_string())
        .with_message(reason.to_string())
}

/// Create an IO error
pub fn io_error(operation: &str, path: &Path, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_entity_id(path.display().to_string())
        .with_message(err.to_string())
}

/// Create a serialization error
pub fn serialization_error(operation: &str, err: serde_json::Error) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}
