//! Error types for formdesk

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Logical key of the field
    pub key: String,
    /// Human readable message shown next to the control
    pub message: String,
}

impl FieldError {
    /// Create a field error
    pub fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// JSON body the API sends with a 404
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// What went wrong
    pub error: String,
}

/// formdesk error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormdeskError {
    /// One or more fields failed client-side validation. Never sent over the wire.
    #[error("form has {} invalid field(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// The backend does not know the record id
    #[error("record not found: {0}")]
    NotFound(String),

    /// Network, HTTP status or decode failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Schema failed structural checks
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

impl FormdeskError {
    /// True for errors the server reported for an unknown id
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type for formdesk
pub type FormdeskResult<T> = Result<T, FormdeskError>;
