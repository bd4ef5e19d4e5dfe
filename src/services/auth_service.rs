//! Domain service for registration and login.

use thiserror::Error;

use crate::models::user::{Registration, User};

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Enter a valid email address")]
    InvalidEmail,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Field '{0}' is required")]
    MissingField(&'static str),

    #[error("A user with this email already exists")]
    EmailTaken,

    #[error("A user with this username already exists")]
    UsernameTaken,

    #[error("No user with this email or username")]
    UserNotFound,

    #[error("Wrong password")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Validates and stores a new account with the `user` role.
    ///
    /// Checks run in a fixed order and stop at the first failure: email
    /// syntax, password confirmation, required fields, email uniqueness,
    /// username uniqueness.
    async fn register(&self, registration: Registration) -> Result<User, AuthError>;

    /// Resolves `identifier` as email or username and verifies the password.
    ///
    /// # Errors
    ///
    /// [`AuthError::UserNotFound`] when nothing matches, [`AuthError::InvalidCredentials`]
    /// when the password is wrong.
    async fn login(&self, identifier: &str, password: &str) -> Result<User, AuthError>;
}
