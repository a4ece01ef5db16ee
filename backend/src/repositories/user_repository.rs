//! Repository for user records.
//!
//! Users live in process memory behind a `tokio::sync::RwLock`; emails are
//! unique (case-insensitive) and ids are UUID v7.

use crate::auth::models::{CreateUser, User};
use crate::errors::{ServiceError, ServiceResult};
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Repository for user operations.
#[derive(Debug, Default)]
pub struct UserRepository {
    /// Users keyed by id
    users: RwLock<HashMap<String, User>>,
}

impl UserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new user.
    ///
    /// # Errors
    /// `ServiceError::AlreadyExists` if the email is taken.
    pub async fn create_user(&self, user: CreateUser) -> ServiceResult<User> {
        let email = normalize_email(&user.email);
        let mut users = self.users.write().await;

        if users.values().any(|existing| existing.email == email) {
            return Err(ServiceError::already_exists("User", email));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7().to_string(),
            name: user.name,
            email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id.clone(), user.clone());

        Ok(user)
    }

    /// Retrieves a user by their unique identifier.
    pub async fn get_user_by_id(&self, id: &str) -> Option<User> {
        self.users.read().await.get(id).cloned()
    }

    /// Retrieves a user by their email.
    pub async fn get_user_by_email(&self, email: &str) -> Option<User> {
        let email = normalize_email(email);
        self.users
            .read()
            .await
            .values()
            .find(|user| user.email == email)
            .cloned()
    }

    /// Checks if an email already exists.
    pub async fn email_exists(&self, email: &str) -> bool {
        self.get_user_by_email(email).await.is_some()
    }

    /// Updates a user's name and, when given, password hash.
    ///
    /// # Returns
    /// The updated user, or `None` if no user has this id
    pub async fn update_user(
        &self,
        id: &str,
        name: String,
        password_hash: Option<String>,
    ) -> Option<User> {
        let mut users = self.users.write().await;
        let user = users.get_mut(id)?;

        user.name = name;
        if let Some(password_hash) = password_hash {
            user.password_hash = password_hash;
        }
        user.updated_at = Utc::now();

        Some(user.clone())
    }
}

/// Lower-cases and trims an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
