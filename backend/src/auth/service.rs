//! Core business logic for the account endpoints.
//!
//! Handlers talk to an [`AccountService`]; [`AuthService`] is the
//! implementation the binary runs with. It hashes passwords with bcrypt and
//! issues JWT access tokens.

use crate::auth::models::{AuthResponse, CreateUser, User, UserInfo};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::user_repository::UserRepository;
use crate::utils::jwt::JwtUtils;
use async_trait::async_trait;
use bcrypt::{hash, verify};
use std::sync::Arc;

const INVALID_LOGIN: &str = "Invalid email or password";

/// Account operations behind the register, login and update routes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Creates an account and signs the new user in.
    async fn register(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> ServiceResult<AuthResponse>;

    /// Checks credentials and issues an access token.
    async fn login(&self, email: String, password: String) -> ServiceResult<AuthResponse>;

    /// Renames the user and optionally changes the password. `old_password`
    /// must match before anything is changed; `new_password = None` keeps the
    /// current one.
    async fn update_user(
        &self,
        user_id: String,
        name: String,
        old_password: String,
        new_password: Option<String>,
    ) -> ServiceResult<UserInfo>;
}

/// Authentication service for registration, login and profile updates
pub struct AuthService {
    users: UserRepository,
    jwt_utils: Arc<JwtUtils>,
    bcrypt_cost: u32,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(users: UserRepository, jwt_utils: Arc<JwtUtils>, bcrypt_cost: u32) -> Self {
        Self {
            users,
            jwt_utils,
            bcrypt_cost,
        }
    }

    fn issue_token(&self, user: &User) -> ServiceResult<AuthResponse> {
        let access_token = self.jwt_utils.generate_token(&user.id, &user.email)?;

        Ok(AuthResponse {
            access_token,
            expires_in: self.jwt_utils.expires_in(),
            user: UserInfo::from(user),
        })
    }

    /// Hashes a password on the blocking pool
    async fn hash_password(&self, password: String) -> ServiceResult<String> {
        let cost = self.bcrypt_cost;
        tokio::task::spawn_blocking(move || hash(password, cost))
            .await
            .map_err(|e| ServiceError::internal_error(format!("Password hashing task failed: {}", e)))?
            .map_err(|e| ServiceError::internal_error(format!("Password hashing failed: {}", e)))
    }

    /// Verifies a password against the stored hash on the blocking pool
    async fn verify_password(&self, password: String, password_hash: String) -> ServiceResult<bool> {
        tokio::task::spawn_blocking(move || verify(password, &password_hash))
            .await
            .map_err(|e| {
                ServiceError::internal_error(format!("Password verification task failed: {}", e))
            })?
            .map_err(|e| {
                ServiceError::internal_error(format!("Password verification failed: {}", e))
            })
    }
}

#[async_trait]
impl AccountService for AuthService {
    async fn register(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> ServiceResult<AuthResponse> {
        if self.users.email_exists(&email).await {
            return Err(ServiceError::already_exists("User", email));
        }

        let password_hash = self.hash_password(password).await?;
        let user = self
            .users
            .create_user(CreateUser {
                name,
                email,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");
        self.issue_token(&user)
    }

    async fn login(&self, email: String, password: String) -> ServiceResult<AuthResponse> {
        let user = self
            .users
            .get_user_by_email(&email)
            .await
            .ok_or_else(|| ServiceError::invalid_credentials(INVALID_LOGIN))?;

        if !self
            .verify_password(password, user.password_hash.clone())
            .await?
        {
            return Err(ServiceError::invalid_credentials(INVALID_LOGIN));
        }

        tracing::info!(user_id = %user.id, "User logged in");
        self.issue_token(&user)
    }

    async fn update_user(
        &self,
        user_id: String,
        name: String,
        old_password: String,
        new_password: Option<String>,
    ) -> ServiceResult<UserInfo> {
        let user = self
            .users
            .get_user_by_id(&user_id)
            .await
            .ok_or_else(|| ServiceError::not_found("User", &user_id))?;

        if !self
            .verify_password(old_password, user.password_hash.clone())
            .await?
        {
            return Err(ServiceError::invalid_credentials("Old password is incorrect"));
        }

        let password_hash = match new_password {
            Some(password) => Some(self.hash_password(password).await?),
            None => None,
        };

        let user = self
            .users
            .update_user(&user_id, name, password_hash)
            .await
            .ok_or_else(|| ServiceError::not_found("User", &user_id))?;

        Ok(UserInfo::from(&user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService::new(
            UserRepository::new(),
            Arc::new(JwtUtils::new("test-secret", 3600)),
            4,
        )
    }

    async fn registered(service: &AuthService) -> AuthResponse {
        service
            .register(
                "Ada".to_string(),
                "ada@example.com".to_string(),
                "secret1".to_string(),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_register_issues_token_for_new_user() {
        let service = service();
        let response = registered(&service).await;

        assert_eq!(response.user.name, "Ada");
        assert_eq!(response.expires_in, 3600);
        let claims = service
            .jwt_utils
            .validate_token(&response.access_token)
            .unwrap();
        assert_eq!(claims.sub, response.user.id);
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let service = service();
        registered(&service).await;

        let err = service
            .register(
                "Imposter".to_string(),
                "ADA@example.com".to_string(),
                "secret2".to_string(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_login_checks_password() {
        let service = service();
        let registered = registered(&service).await;

        let response = service
            .login("ada@example.com".to_string(), "secret1".to_string())
            .await
            .unwrap();
        assert_eq!(response.user.id, registered.user.id);

        let err = service
            .login("ada@example.com".to_string(), "wrong-pass".to_string())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), INVALID_LOGIN);

        let err = service
            .login("nobody@example.com".to_string(), "secret1".to_string())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), INVALID_LOGIN);
    }

    #[tokio::test]
    async fn test_update_requires_old_password() {
        let service = service();
        let user_id = registered(&service).await.user.id;

        let err = service
            .update_user(
                user_id.clone(),
                "Ada L.".to_string(),
                "wrong-pass".to_string(),
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidCredentials { .. }));

        let unchanged = service.users.get_user_by_id(&user_id).await.unwrap();
        assert_eq!(unchanged.name, "Ada");
    }

    #[tokio::test]
    async fn test_update_without_new_password_keeps_it() {
        let service = service();
        let user_id = registered(&service).await.user.id;

        let info = service
            .update_user(user_id, "Ada L.".to_string(), "secret1".to_string(), None)
            .await
            .unwrap();
        assert_eq!(info.name, "Ada L.");

        assert!(
            service
                .login("ada@example.com".to_string(), "secret1".to_string())
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_update_changes_password() {
        let service = service();
        let user_id = registered(&service).await.user.id;

        service
            .update_user(
                user_id,
                "Ada".to_string(),
                "secret1".to_string(),
                Some("secret2".to_string()),
            )
            .await
            .unwrap();

        assert!(
            service
                .login("ada@example.com".to_string(), "secret1".to_string())
                .await
                .is_err()
        );
        assert!(
            service
                .login("ada@example.com".to_string(), "secret2".to_string())
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_update_unknown_user() {
        let service = service();
        let err = service
            .update_user(
                "missing".to_string(),
                "Ada".to_string(),
                "secret1".to_string(),
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }
}
