//! Data structures for the account endpoints.
//!
//! Request DTOs declare their validation chain with `validator` attributes and
//! a `FieldSpec` table; once a DTO passes the gate it is converted into the
//! matching validated input (`NewAccount`, `Credentials`, `ProfileUpdate`).
//! Passwords never show up in `Debug` output.

use crate::auth::validation::{FieldSpec, RequestSchema, escape_html};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use validator::Validate;

const REDACTED: &str = "[REDACTED]";

/// Registration request payload
#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        required(message = "Name field is required"),
        length(min = 1, message = "Name field is required")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "Email is required"),
        email(message = "Must be a valid Email")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "Password is required and must be at least 6 characters long"),
        length(
            min = 6,
            message = "Password is required and must be at least 6 characters long"
        )
    )]
    pub password: Option<String>,
}

/// Login request payload
#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(
        required(message = "Email is required"),
        email(message = "Must be a valid Email")
    )]
    pub email: Option<String>,

    #[validate(required(message = "Password is required"))]
    pub password: Option<String>,
}

/// Profile update payload. The caller's identity comes from the bearer token,
/// so a `userId` in the body is ignored.
#[derive(Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(
        required(message = "Name field is required"),
        length(min = 1, message = "Name field is required")
    )]
    pub name: Option<String>,

    #[serde(rename = "oldPassword")]
    #[validate(required(message = "Old password must be a string"))]
    pub old_password: Option<String>,

    /// Any value is accepted here; see `ProfileUpdate::new_password`.
    #[serde(rename = "newPassword")]
    pub new_password: Option<Value>,
}

/// Validated registration input
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Validated login input
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Validated profile update input
pub struct ProfileUpdate {
    pub name: String,
    pub old_password: String,
    /// `None` keeps the current password.
    pub new_password: Option<String>,
}

impl RequestSchema for RegisterRequest {
    type Validated = NewAccount;

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::string("name", "name", "Name must be a string"),
        FieldSpec::string("email", "email", "Must be a valid Email"),
        FieldSpec::string(
            "password",
            "password",
            "Password is required and must be at least 6 characters long",
        ),
    ];

    // Trimming before the emptiness check rejects whitespace-only names.
    fn sanitize(&mut self) {
        trim_in_place(&mut self.name);
    }

    fn into_validated(self) -> Option<NewAccount> {
        Some(NewAccount {
            name: self.name?,
            email: self.email?,
            password: self.password?,
        })
    }
}

impl RequestSchema for LoginRequest {
    type Validated = Credentials;

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::string("email", "email", "Must be a valid Email"),
        FieldSpec::string("password", "password", "Password is required"),
    ];

    fn into_validated(self) -> Option<Credentials> {
        Some(Credentials {
            email: self.email?,
            password: self.password?,
        })
    }
}

impl RequestSchema for UpdateUserRequest {
    type Validated = ProfileUpdate;

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::string("name", "name", "Name must be a string"),
        FieldSpec::string("oldPassword", "old_password", "Old password must be a string"),
        FieldSpec::any("newPassword", "new_password"),
    ];

    fn sanitize(&mut self) {
        trim_in_place(&mut self.name);
        if let Some(name) = self.name.as_mut() {
            *name = escape_html(name);
        }
    }

    fn into_validated(self) -> Option<ProfileUpdate> {
        // Only a non-empty string requests a password change.
        let new_password = match self.new_password {
            Some(Value::String(password)) if !password.is_empty() => Some(password),
            _ => None,
        };

        Some(ProfileUpdate {
            name: self.name?,
            old_password: self.old_password?,
            new_password,
        })
    }
}

fn trim_in_place(field: &mut Option<String>) {
    if let Some(value) = field.as_mut() {
        let trimmed = value.trim();
        if trimmed.len() != value.len() {
            *value = trimmed.to_string();
        }
    }
}

impl fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccount")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &REDACTED)
            .finish()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &REDACTED)
            .finish()
    }
}

impl fmt::Debug for ProfileUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileUpdate")
            .field("name", &self.name)
            .field("old_password", &REDACTED)
            .field("new_password", &self.new_password.as_ref().map(|_| REDACTED))
            .finish()
    }
}

/// Stored user record
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data needed to insert a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Public view of a user returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Register/login response containing the access token and user info
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Token expiration in seconds
    pub expires_in: u64,
    pub user: UserInfo,
}
