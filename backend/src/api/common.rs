//! Response shapes shared by every endpoint.
//!
//! Two families of responses exist:
//! - `Envelope<T>`: the `{success, data}` wrapper around a handler's outcome.
//!   It is always sent with HTTP 200, whether the operation succeeded or not;
//!   callers inspect `success`.
//! - `ApiError`: rejections produced by the gates before a handler runs
//!   (invalid input, missing credentials). These carry a real HTTP status
//!   and a structured body:
//!
//! ```json
//! {"success": false, "message": "Validation failed",
//!  "error": {"error_type": "validation_error", "details": [{"field": "email", "message": "..."}]},
//!  "timestamp": "2025-01-01T00:00:00+00:00"}
//! ```

use crate::errors::ServiceResult;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize, Serializer, ser::SerializeStruct};

/// Outcome of a handler, serialized as `{"success": bool, "data": ...}`.
///
/// On failure `data` holds the error message.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    Success(T),
    Failure(String),
}

impl<T> From<ServiceResult<T>> for Envelope<T> {
    fn from(result: ServiceResult<T>) -> Self {
        match result {
            Ok(data) => Envelope::Success(data),
            Err(error) => Envelope::Failure(error.to_string()),
        }
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Envelope", 2)?;
        match self {
            Envelope::Success(data) => {
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
            }
            Envelope::Failure(message) => {
                state.serialize_field("success", &false)?;
                state.serialize_field("data", message)?;
            }
        }
        state.end()
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Body of a gate rejection
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// Human-readable message
    pub message: String,
    pub error: ErrorDetails,
    /// Response timestamp
    pub timestamp: String,
}

/// Error details for rejected requests
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Machine-readable error type identifier
    pub error_type: String,
    /// Field-specific validation errors when applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Field-specific validation error details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the field with validation error
    pub field: String,
    /// Description of the validation failure
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Rejection raised by the validation and authentication gates.
#[derive(Debug)]
pub enum ApiError {
    /// One or more field rules failed.
    Validation(Vec<FieldError>),
    /// The body could not be read as a JSON object.
    InvalidBody(String),
    /// Missing, malformed or expired bearer credential.
    Unauthorized(String),
}

impl ApiError {
    pub fn invalid_body(message: impl Into<String>) -> Self {
        Self::InvalidBody(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }

    fn into_body(self) -> ErrorResponse {
        let (message, error_type, details) = match self {
            ApiError::Validation(details) => {
                ("Validation failed".to_string(), "validation_error", Some(details))
            }
            ApiError::InvalidBody(message) => (message, "invalid_body", None),
            ApiError::Unauthorized(message) => (message, "unauthorized", None),
        };

        ErrorResponse {
            success: false,
            message,
            error: ErrorDetails {
                error_type: error_type.to_string(),
                details,
            },
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(self.into_body())).into_response()
    }
}

/// Formats validator::ValidationErrors into field-specific error details
pub fn validation_errors_to_field_errors(
    errors: &validator::ValidationErrors,
) -> Vec<FieldError> {
    errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: field.to_string(),
                message: error
                    .message
                    .as_deref()
                    .unwrap_or("Invalid value")
                    .to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ServiceError;
    use serde_json::json;

    #[test]
    fn test_success_envelope_shape() {
        let envelope = Envelope::Success(json!({"id": "u1"}));
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"success": true, "data": {"id": "u1"}})
        );
    }

    #[test]
    fn test_failure_envelope_carries_error_message() {
        let result: ServiceResult<()> = Err(ServiceError::already_exists("User", "a@b.co"));
        let envelope = Envelope::from(result);
        assert!(matches!(envelope, Envelope::Failure(_)));
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"success": false, "data": "User already exists: a@b.co"})
        );
    }

    #[test]
    fn test_envelope_is_always_http_ok() {
        let envelope: Envelope<()> = Envelope::Failure("nope".to_string());
        assert_eq!(envelope.into_response().status(), StatusCode::OK);
    }

    #[test]
    fn test_gate_rejection_statuses() {
        assert_eq!(
            ApiError::Validation(vec![]).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::invalid_body("bad").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::unauthorized("no").status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_validation_body_lists_failures() {
        let body = ApiError::Validation(vec![FieldError::new("email", "Must be a valid Email")])
            .into_body();
        assert!(!body.success);
        assert_eq!(body.error.error_type, "validation_error");
        assert_eq!(
            body.error.details.unwrap(),
            vec![FieldError::new("email", "Must be a valid Email")]
        );
    }
}
