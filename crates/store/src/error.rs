//! Error types for the Digimon store

use thiserror::Error;

use crate::validation::FieldError;

/// Error type for store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// One or more fields failed validation; nothing was written
    #[error("Validation failed: {}", summarize(.0))]
    ValidationFailed(Vec<FieldError>),

    /// Another record already uses this name
    #[error("A digimon named '{0}' already exists")]
    DuplicateName(String),

    #[error("Digimon not found: {0}")]
    NotFound(i32),

    /// Malformed identifier or a value the schema cannot hold
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Database connection or operation error
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] sea_orm::DbErr),
}

impl StoreError {
    /// Field errors carried by a validation failure
    pub fn field_errors(&self) -> Option<&[FieldError]> {
        match self {
            StoreError::ValidationFailed(errors) => Some(errors),
            _ => None,
        }
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
