//! API error envelope

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Machine-readable error codes carried in [`ErrorDetail::code`]
pub mod error_codes {
    /// The request body failed validation
    pub const VALIDATION_FAILED: &str = "validation_failed";
    /// No valid credential was supplied
    pub const AUTHENTICATION_REQUIRED: &str = "authentication_required";
    /// The resource does not exist or is not visible to the caller
    pub const NOT_FOUND: &str = "not_found";
    /// Anything the server could not handle
    pub const INTERNAL_ERROR: &str = "internal_error";
}

/// Per-field validation messages, keyed by field name
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Body of every error response: `{"error": {...}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// One of [`error_codes`]
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Field-level messages, present only for validation failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

impl ErrorBody {
    /// Creates an error body without field details
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.to_string(),
                message: message.into(),
                fields: None,
            },
        }
    }

    /// Creates a validation error body with field details
    pub fn with_fields(message: impl Into<String>, fields: FieldErrors) -> Self {
        let mut body = Self::new(error_codes::VALIDATION_FAILED, message);
        if !fields.is_empty() {
            body.error.fields = Some(fields);
        }
        body
    }
}
