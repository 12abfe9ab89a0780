//! Typed error handling for biztime
//!
//! Two layers:
//!
//! - [`StoreError`]: what a record accessor can fail with. Constraint
//!   violations are classified; everything else is an opaque backend fault.
//! - [`ApiError`]: what an HTTP handler can fail with. Every variant maps to
//!   a status code and the JSON error envelope
//!   `{"error": {"code", "message", "status"}}`.
//!
//! # Example
//!
//! ```rust,ignore
//! async fn get_company(code: &str) -> Result<Company, ApiError> {
//!     service
//!         .get_company(code)
//!         .await?
//!         .ok_or_else(|| ApiError::not_found("company", code))
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

// =============================================================================
// Store Errors
// =============================================================================

/// Errors raised by record accessors
///
/// Absence is not an error: accessors return `Ok(None)` / `Ok(false)` for a
/// missing row.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write
    #[error("{entity_type} '{key}' already exists")]
    DuplicateKey { entity_type: String, key: String },

    /// A foreign key named a row that does not exist
    #[error("{entity_type} '{key}' does not exist")]
    ReferenceViolation { entity_type: String, key: String },

    /// Any other backend failure
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl StoreError {
    pub fn duplicate(entity_type: &str, key: impl Into<String>) -> Self {
        StoreError::DuplicateKey {
            entity_type: entity_type.to_string(),
            key: key.into(),
        }
    }

    pub fn missing_reference(entity_type: &str, key: impl Into<String>) -> Self {
        StoreError::ReferenceViolation {
            entity_type: entity_type.to_string(),
            key: key.into(),
        }
    }
}

// =============================================================================
// API Errors
// =============================================================================

/// Errors surfaced to HTTP clients
#[derive(Debug)]
pub enum ApiError {
    /// Missing or malformed required input
    BadRequest { message: String },

    /// No row matches the requested key
    NotFound { entity_type: String, key: String },

    /// The route exists but does not accept this method
    MethodNotAllowed { method: String, path: String },

    /// The request referenced a row that does not exist
    ReferenceViolation { entity_type: String, key: String },

    /// The request would duplicate a unique key
    DuplicateKey { entity_type: String, key: String },

    /// Unclassified fault
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest { message } => write!(f, "{}", message),
            ApiError::NotFound { entity_type, key } => {
                write!(f, "{} '{}' not found", entity_type, key)
            }
            ApiError::MethodNotAllowed { method, path } => {
                write!(f, "Method {} not allowed on {}", method, path)
            }
            ApiError::ReferenceViolation { entity_type, key } => {
                write!(f, "{} '{}' does not exist", entity_type, key)
            }
            ApiError::DuplicateKey { entity_type, key } => {
                write!(f, "{} '{}' already exists", entity_type, key)
            }
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// Body of the JSON error envelope
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// HTTP status, repeated for clients that only see the body
    pub status: u16,
}

/// JSON error envelope: `{"error": {...}}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
        }
    }

    pub fn not_found(entity_type: &str, key: impl ToString) -> Self {
        ApiError::NotFound {
            entity_type: entity_type.to_string(),
            key: key.to_string(),
        }
    }

    pub fn method_not_allowed(method: impl ToString, path: impl ToString) -> Self {
        ApiError::MethodNotAllowed {
            method: method.to_string(),
            path: path.to_string(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::ReferenceViolation { .. } => StatusCode::BAD_REQUEST,
            ApiError::DuplicateKey { .. } => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest { .. } => "BAD_REQUEST",
            ApiError::NotFound { .. } => "NOT_FOUND",
            ApiError::MethodNotAllowed { .. } => "METHOD_NOT_ALLOWED",
            ApiError::ReferenceViolation { .. } => "REFERENCE_VIOLATION",
            ApiError::DuplicateKey { .. } => "DUPLICATE_KEY",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorBody {
                code: self.error_code().to_string(),
                message: self.to_string(),
                status: self.status_code().as_u16(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }
        (status, Json(self.to_response())).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey { entity_type, key } => {
                ApiError::DuplicateKey { entity_type, key }
            }
            StoreError::ReferenceViolation { entity_type, key } => {
                ApiError::ReferenceViolation { entity_type, key }
            }
            StoreError::Backend(e) => ApiError::Internal(format!("{:#}", e)),
        }
    }
}
