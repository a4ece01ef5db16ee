//! Main entry point for the accounts backend.
//!
//! Loads configuration, wires the account service into the router and serves
//! it with Axum.

mod api;
mod auth;
mod config;
mod errors;
mod repositories;
mod utils;

use crate::api::common::Envelope;
use crate::auth::routes::{AuthState, auth_router};
use crate::auth::service::AuthService;
use crate::repositories::user_repository::UserRepository;
use crate::utils::jwt::JwtUtils;
use anyhow::Context;
use axum::{Router, routing::get};
use config::Config;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::init;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init();

    let config = Config::from_env()?;
    let jwt_utils = Arc::new(JwtUtils::from_config(&config));
    let accounts = AuthService::new(UserRepository::new(), jwt_utils.clone(), config.bcrypt_cost);
    let state = AuthState::new(Arc::new(accounts), jwt_utils);

    let app = Router::new().route("/", get(root_handler));
    // Axum cannot nest at the root path.
    let app = if config.auth_base_path == "/" {
        app.merge(auth_router(state))
    } else {
        app.nest(&config.auth_base_path, auth_router(state))
    };

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {}", bind_address))?;

    info!(
        "Starting accounts server on port {} (routes under {})",
        config.server_port, config.auth_base_path
    );
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

async fn root_handler() -> Envelope<serde_json::Value> {
    Envelope::Success(serde_json::json!({
        "service": "accounts-backend",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
