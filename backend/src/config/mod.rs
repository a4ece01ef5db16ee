//! Central module for application-wide configuration settings.
//!
//! Values come from the process environment (optionally seeded from a `.env`
//! file): the JWT secret and lifetime, the bcrypt work factor, the listening
//! port and the path the account routes are mounted under.

use anyhow::{Context, Result, bail};
use std::env;

/// Longest accepted access token lifetime (ten years).
pub const MAX_JWT_EXPIRES_IN_SECONDS: u64 = 10 * 365 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub jwt_expires_in_seconds: u64,
    pub bcrypt_cost: u32,
    pub server_port: u16,
    pub auth_base_path: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let jwt_secret = lookup("JWT_SECRET").context("JWT_SECRET not set")?;
        if jwt_secret.trim().is_empty() {
            bail!("JWT_SECRET must not be empty");
        }

        let jwt_expires_in_seconds = lookup("JWT_EXPIRES_IN_SECONDS")
            .unwrap_or_else(|| "86400".to_string())
            .parse::<u64>()
            .context("JWT_EXPIRES_IN_SECONDS must be a valid number")?;
        if !(1..=MAX_JWT_EXPIRES_IN_SECONDS).contains(&jwt_expires_in_seconds) {
            bail!(
                "JWT_EXPIRES_IN_SECONDS must be between 1 and {}",
                MAX_JWT_EXPIRES_IN_SECONDS
            );
        }

        let bcrypt_cost = match lookup("BCRYPT_COST") {
            Some(raw) => raw
                .parse::<u32>()
                .context("BCRYPT_COST must be a valid number")?,
            None => bcrypt::DEFAULT_COST,
        };
        if !(4..=31).contains(&bcrypt_cost) {
            bail!("BCRYPT_COST must be between 4 and 31");
        }

        let server_port = lookup("SERVER_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .context("SERVER_PORT must be a valid number")?;

        let auth_base_path = lookup("AUTH_BASE_PATH").unwrap_or_else(|| "/api/auth".to_string());
        if !auth_base_path.starts_with('/') {
            bail!("AUTH_BASE_PATH must start with '/'");
        }
        let auth_base_path = match auth_base_path.trim_end_matches('/') {
            "" => "/".to_string(),
            trimmed => trimmed.to_string(),
        };

        Ok(Config {
            jwt_secret,
            jwt_expires_in_seconds,
            bcrypt_cost,
            server_port,
            auth_base_path,
        })
    }
}
