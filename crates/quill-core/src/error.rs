use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Field name → first failing message, as rendered inline next to a form field.
pub type FieldErrors = BTreeMap<String, String>;

/// Standard error type for Quill.
#[derive(Debug, Error)]
pub enum QuillError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation errors")]
    Validation(FieldErrors),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl QuillError {
    /// Get the error code string for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            QuillError::NotFound(_) => "NOT_FOUND",
            QuillError::Unauthorized(_) => "UNAUTHORIZED",
            QuillError::Forbidden(_) => "FORBIDDEN",
            QuillError::Conflict(_) => "CONFLICT",
            QuillError::InvalidInput(_) => "INVALID_INPUT",
            QuillError::Validation(_) => "VALIDATION_ERROR",
            QuillError::Storage(_) => "STORAGE_ERROR",
            QuillError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message suitable for a toast description.
    ///
    /// Validation errors are flattened into `field: message` pairs.
    pub fn user_message(&self) -> String {
        match self {
            QuillError::NotFound(msg)
            | QuillError::Unauthorized(msg)
            | QuillError::Forbidden(msg)
            | QuillError::Conflict(msg)
            | QuillError::InvalidInput(msg) => msg.clone(),
            QuillError::Validation(fields) => fields
                .iter()
                .map(|(field, message)| format!("{}: {}", field, message))
                .collect::<Vec<_>>()
                .join("; "),
            QuillError::Storage(_) | QuillError::Internal(_) => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }

    /// Field errors carried by a validation failure, if any.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            QuillError::Validation(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn detail(&self) -> ErrorDetail {
        ErrorDetail {
            code: self.error_code().to_string(),
            message: self.user_message(),
            fields: self.field_errors().cloned(),
        }
    }
}

impl From<serde_json::Error> for QuillError {
    fn from(e: serde_json::Error) -> Self {
        QuillError::Internal(format!("JSON error: {}", e))
    }
}

/// Serializable error detail, embedded in rendered screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}
