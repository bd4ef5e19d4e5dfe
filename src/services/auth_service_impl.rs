//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use tokio::task;

use crate::config::SecurityConfig;
use crate::db::{self, Store, hash_password, verify_password};
use crate::models::user::{Registration, User, UserRole, is_valid_email};
use crate::services::auth_service::{AuthError, AuthService};

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }
}

fn database(err: &anyhow::Error) -> AuthError {
    AuthError::Database(format!("{err:#}"))
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(&self, registration: Registration) -> Result<User, AuthError> {
        let Registration {
            email,
            password,
            password_confirm,
            username,
        } = registration;

        if !is_valid_email(&email) {
            return Err(AuthError::InvalidEmail);
        }
        if password != password_confirm {
            return Err(AuthError::PasswordMismatch);
        }
        if username.trim().is_empty() {
            return Err(AuthError::MissingField("username"));
        }
        if password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }

        if self
            .store
            .get_user_by_email(&email)
            .await
            .map_err(|e| database(&e))?
            .is_some()
        {
            return Err(AuthError::EmailTaken);
        }

        if self
            .store
            .get_user_by_username(&username)
            .await
            .map_err(|e| database(&e))?
            .is_some()
        {
            return Err(AuthError::UsernameTaken);
        }

        let config = self.security.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, &config))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
            .map_err(|e| AuthError::Hashing(e.to_string()))?;

        // The lookups above only pick the message; the UNIQUE constraints
        // decide when two registrations race.
        let user = self
            .store
            .create_user(&username, &email, &password_hash, UserRole::User)
            .await
            .map_err(|e| match db::unique_violation(&e) {
                Some(detail) if detail.contains("email") => AuthError::EmailTaken,
                Some(_) => AuthError::UsernameTaken,
                None => database(&e),
            })?;

        tracing::info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user)
    }

    async fn login(&self, identifier: &str, password: &str) -> Result<User, AuthError> {
        let (user, password_hash) = self
            .store
            .get_user_for_login(identifier)
            .await
            .map_err(|e| database(&e))?
            .ok_or(AuthError::UserNotFound)?;

        let password = password.to_string();
        let is_valid = task::spawn_blocking(move || verify_password(&password, &password_hash))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
            .map_err(|e| AuthError::Hashing(e.to_string()))?;

        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }
}
