//! Defines the HTTP routes for registration, login and profile update.
//!
//! | Method | Path | Chain |
//! |---|---|---|
//! | POST | /register | validate → handler |
//! | POST | /login | validate → handler |
//! | PUT | /updateUser | jwt_auth → validate → handler |
//!
//! The returned router is meant to be nested under a base path by the
//! application.

use crate::auth::handlers::{login, register, update_user};
use crate::auth::middleware::jwt_auth;
use crate::auth::service::AccountService;
use crate::utils::jwt::JwtUtils;
use axum::{
    Router, middleware,
    routing::{post, put},
};
use std::sync::Arc;

/// Shared state for the account routes
#[derive(Clone)]
pub struct AuthState {
    pub accounts: Arc<dyn AccountService>,
    pub jwt_utils: Arc<JwtUtils>,
}

impl AuthState {
    pub fn new(accounts: Arc<dyn AccountService>, jwt_utils: Arc<JwtUtils>) -> Self {
        Self {
            accounts,
            jwt_utils,
        }
    }
}

/// Creates the account router
pub fn auth_router(state: AuthState) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route(
            "/updateUser",
            put(update_user).layer(middleware::from_fn_with_state(state.clone(), jwt_auth)),
        )
        .with_state(state)
}
