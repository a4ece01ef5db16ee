//! Account module: registration, login and profile update.
//!
//! This module provides the request models and their validation chains, the
//! JWT authentication middleware, the handlers and the router that binds them
//! together, plus the account service the handlers delegate to.

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;
pub mod validation;
