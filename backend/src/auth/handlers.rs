//! Handler functions for the account endpoints.
//!
//! Each handler receives input that already passed the validation gate, makes
//! one call to the account service and wraps the outcome in an [`Envelope`].
//! Failures from the service end up in the envelope with HTTP 200.

use crate::api::common::Envelope;
use crate::auth::models::{
    AuthResponse, LoginRequest, RegisterRequest, UpdateUserRequest, UserInfo,
};
use crate::auth::routes::AuthState;
use crate::auth::validation::ValidatedJson;
use crate::utils::jwt::Claims;
use axum::extract::{Extension, State};

/// Handle user registration request
#[axum::debug_handler]
pub async fn register(
    State(state): State<AuthState>,
    ValidatedJson(account): ValidatedJson<RegisterRequest>,
) -> Envelope<AuthResponse> {
    tracing::info!("Registering new user");

    state
        .accounts
        .register(account.name, account.email, account.password)
        .await
        .inspect_err(|error| tracing::warn!(%error, "Registration failed"))
        .into()
}

/// Handle user login request
#[axum::debug_handler]
pub async fn login(
    State(state): State<AuthState>,
    ValidatedJson(credentials): ValidatedJson<LoginRequest>,
) -> Envelope<AuthResponse> {
    state
        .accounts
        .login(credentials.email, credentials.password)
        .await
        .inspect_err(|error| tracing::warn!(%error, "Login failed"))
        .into()
}

/// Handle profile update for the authenticated user
#[axum::debug_handler]
pub async fn update_user(
    State(state): State<AuthState>,
    Extension(claims): Extension<Claims>,
    ValidatedJson(update): ValidatedJson<UpdateUserRequest>,
) -> Envelope<UserInfo> {
    tracing::info!(
        user_id = %claims.sub,
        password_change = update.new_password.is_some(),
        "Updating user profile"
    );

    state
        .accounts
        .update_user(
            claims.sub,
            update.name,
            update.old_password,
            update.new_password,
        )
        .await
        .inspect_err(|error| tracing::warn!(%error, "Profile update failed"))
        .into()
}
