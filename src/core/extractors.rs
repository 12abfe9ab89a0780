//! Axum extractors for request bodies and path keys
//!
//! Bodies are taken as loose JSON and checked field by field, so a missing
//! field and a malformed document both surface as `BadRequest` in the
//! standard error envelope rather than axum's plain-text rejections.

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde_json::Value;

use crate::core::error::ApiError;

/// JSON request body with presence checks
#[derive(Debug, Clone)]
pub struct JsonBody(pub Value);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        Ok(JsonBody(value))
    }
}

impl JsonBody {
    /// Look up a field, treating `null` as absent
    fn present(&self, field: &str) -> Result<&Value, ApiError> {
        match self.0.get(field) {
            None | Some(Value::Null) => Err(missing(field)),
            Some(value) => Ok(value),
        }
    }

    /// A required, non-empty string field
    pub fn required_str(&self, field: &str) -> Result<&str, ApiError> {
        match self.present(field)? {
            Value::String(s) if s.is_empty() => Err(missing(field)),
            Value::String(s) => Ok(s),
            _ => Err(wrong_type(field, "a string")),
        }
    }

    /// A required numeric field
    pub fn required_f64(&self, field: &str) -> Result<f64, ApiError> {
        self.present(field)?
            .as_f64()
            .ok_or_else(|| wrong_type(field, "a number"))
    }

    /// A required boolean field
    pub fn required_bool(&self, field: &str) -> Result<bool, ApiError> {
        self.present(field)?
            .as_bool()
            .ok_or_else(|| wrong_type(field, "a boolean"))
    }
}

fn missing(field: &str) -> ApiError {
    ApiError::bad_request(format!("Missing required field: {}", field))
}

fn wrong_type(field: &str, expected: &str) -> ApiError {
    ApiError::bad_request(format!("Field '{}' must be {}", field, expected))
}

/// Parse an invoice id taken from the path
///
/// Non-numeric input is a `BadRequest`. An integer outside the id column's
/// range cannot match a row, so it is `NotFound`.
pub fn parse_invoice_id(raw: &str) -> Result<i32, ApiError> {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::bad_request(format!("Invalid invoice id: {}", raw)));
    }
    raw.parse::<i32>()
        .map_err(|_| ApiError::not_found("invoice", raw))
}
