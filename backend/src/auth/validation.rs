//! Request validation chain and the gate that enforces it.
//!
//! A request DTO implements [`RequestSchema`]: `validator` attributes declare
//! the per-field rules, `FIELDS` lists the fields in the order failures are
//! reported and which of them must be JSON strings, and `sanitize` normalizes
//! values (trim, escape) before the rules run. Every rule runs; failures are
//! accumulated and reported together.
//!
//! [`ValidatedJson`] is the gate: handlers taking it as an argument are only
//! invoked when the chain produced no failures.

use crate::api::common::{ApiError, FieldError, validation_errors_to_field_errors};
use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::Validate;

/// One input field of a request body.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Key in the JSON body
    pub name: &'static str,
    /// Rust field name, as reported by `validator`
    pub ident: &'static str,
    /// Failure message when a present, non-null value is not a string.
    /// `None` accepts any JSON type.
    pub not_string: Option<&'static str>,
}

impl FieldSpec {
    pub const fn string(name: &'static str, ident: &'static str, message: &'static str) -> Self {
        Self {
            name,
            ident,
            not_string: Some(message),
        }
    }

    pub const fn any(name: &'static str, ident: &'static str) -> Self {
        Self {
            name,
            ident,
            not_string: None,
        }
    }
}

/// Declarative validation chain for a request body.
pub trait RequestSchema: DeserializeOwned + Validate {
    /// Input handed to the handler once every rule passed.
    type Validated;

    /// Fields in reporting order.
    const FIELDS: &'static [FieldSpec];

    /// Normalizes fields in place before the rules are evaluated.
    fn sanitize(&mut self) {}

    /// `None` only if a required field is missing, which the rules rule out.
    fn into_validated(self) -> Option<Self::Validated>;
}

/// Runs the validation chain of `T` over a JSON body.
pub fn validate_payload<T: RequestSchema>(body: Value) -> Result<T::Validated, ApiError> {
    let Value::Object(mut fields) = body else {
        return Err(ApiError::invalid_body("Request body must be a JSON object"));
    };

    let mut failures = Vec::new();
    for spec in T::FIELDS {
        let Some(message) = spec.not_string else {
            continue;
        };
        if fields
            .get(spec.name)
            .is_some_and(|value| !value.is_string() && !value.is_null())
        {
            fields.remove(spec.name);
            failures.push(FieldError::new(spec.name, message));
        }
    }

    let mut payload: T = serde_json::from_value(Value::Object(fields))
        .map_err(|e| ApiError::invalid_body(format!("Invalid request body: {}", e)))?;
    payload.sanitize();

    if let Err(errors) = payload.validate() {
        for mut failure in validation_errors_to_field_errors(&errors) {
            failure.field = json_name::<T>(&failure.field).to_string();
            // A type failure already covers this field.
            if !failures.iter().any(|f| f.field == failure.field) {
                failures.push(failure);
            }
        }
    }

    if !failures.is_empty() {
        failures.sort_by_key(|failure| field_position::<T>(&failure.field));
        return Err(ApiError::Validation(failures));
    }

    payload
        .into_validated()
        .ok_or_else(|| ApiError::invalid_body("Request body is missing required fields"))
}

fn json_name<T: RequestSchema>(field: &str) -> &str {
    T::FIELDS
        .iter()
        .find(|spec| spec.name == field || spec.ident == field)
        .map_or(field, |spec| spec.name)
}

fn field_position<T: RequestSchema>(field: &str) -> usize {
    T::FIELDS
        .iter()
        .position(|spec| spec.name == field)
        .unwrap_or(usize::MAX)
}

/// Escapes characters that are significant in HTML.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '/' => escaped.push_str("&#x2F;"),
            '\\' => escaped.push_str("&#x5C;"),
            '`' => escaped.push_str("&#96;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// JSON body extractor that only succeeds when the validation chain passes.
pub struct ValidatedJson<T: RequestSchema>(pub T::Validated);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: RequestSchema,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::invalid_body(rejection.body_text()))?;

        match validate_payload::<T>(body) {
            Ok(validated) => Ok(ValidatedJson(validated)),
            Err(rejection) => {
                tracing::debug!(?rejection, "Request rejected by validation gate");
                Err(rejection)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::{LoginRequest, RegisterRequest, UpdateUserRequest};
    use serde_json::json;

    fn rejected<T: RequestSchema>(body: Value) -> Vec<FieldError> {
        match validate_payload::<T>(body) {
            Err(ApiError::Validation(failures)) => failures,
            Err(other) => panic!("expected validation failure, got {:?}", other),
            Ok(_) => panic!("expected validation failure, got success"),
        }
    }

    fn fields(failures: &[FieldError]) -> Vec<&str> {
        failures.iter().map(|f| f.field.as_str()).collect()
    }

    #[test]
    fn test_all_failures_are_reported_in_field_order() {
        let failures = rejected::<RegisterRequest>(json!({}));
        assert_eq!(fields(&failures), vec!["name", "email", "password"]);
        assert_eq!(failures[0].message, "Name field is required");
        assert_eq!(failures[1].message, "Email is required");
    }

    #[test]
    fn test_register_rules_reject_whitespace_only_name() {
        let failures = rejected::<RegisterRequest>(json!({
            "name": "   ",
            "email": "not-an-email",
            "password": "12345"
        }));
        assert_eq!(
            failures,
            vec![
                FieldError::new("name", "Name field is required"),
                FieldError::new("email", "Must be a valid Email"),
                FieldError::new(
                    "password",
                    "Password is required and must be at least 6 characters long"
                ),
            ]
        );
    }

    #[test]
    fn test_non_string_name_reports_type_failure_only() {
        let failures = rejected::<RegisterRequest>(json!({
            "name": 42,
            "email": "ada@example.com",
            "password": "secret1"
        }));
        assert_eq!(failures, vec![FieldError::new("name", "Name must be a string")]);
    }

    #[test]
    fn test_register_trims_name() {
        let account = validate_payload::<RegisterRequest>(json!({
            "name": "  Ada Lovelace ",
            "email": "ada@example.com",
            "password": "secret1"
        }))
        .unwrap();
        assert_eq!(account.name, "Ada Lovelace");
        assert_eq!(account.email, "ada@example.com");
    }

    #[test]
    fn test_login_accepts_any_password_string() {
        let credentials = validate_payload::<LoginRequest>(json!({
            "email": "ada@example.com",
            "password": "x"
        }))
        .unwrap();
        assert_eq!(credentials.password, "x");

        let failures = rejected::<LoginRequest>(json!({"email": "ada@example.com"}));
        assert_eq!(failures, vec![FieldError::new("password", "Password is required")]);
    }

    #[test]
    fn test_update_reports_json_field_names() {
        let failures = rejected::<UpdateUserRequest>(json!({"name": "Ada"}));
        assert_eq!(
            failures,
            vec![FieldError::new("oldPassword", "Old password must be a string")]
        );

        let failures = rejected::<UpdateUserRequest>(json!({"name": "Ada", "oldPassword": 7}));
        assert_eq!(
            failures,
            vec![FieldError::new("oldPassword", "Old password must be a string")]
        );
    }

    #[test]
    fn test_update_escapes_name() {
        let update = validate_payload::<UpdateUserRequest>(json!({
            "name": " <b>Ada</b> ",
            "oldPassword": "secret1",
            "newPassword": {"any": "value"}
        }))
        .unwrap();
        assert_eq!(update.name, "&lt;b&gt;Ada&lt;&#x2F;b&gt;");
        assert_eq!(update.new_password, None);
    }

    #[test]
    fn test_non_object_body_is_rejected() {
        assert!(matches!(
            validate_payload::<LoginRequest>(json!(["ada@example.com", "pw"])),
            Err(ApiError::InvalidBody(_))
        ));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("Tom & \"Jerry\""), "Tom &amp; &quot;Jerry&quot;");
        assert_eq!(escape_html("it's `x`"), "it&#x27;s &#96;x&#96;");
        assert_eq!(escape_html("a\\b"), "a&#x5C;b");
        assert_eq!(escape_html("plain"), "plain");
    }
}
