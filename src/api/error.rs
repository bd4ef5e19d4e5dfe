use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

use super::views;
use crate::services::{AuthError, CommunityError, HeroError};
use crate::uploads::UploadError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,

    Unauthorized,

    Forbidden,

    NotFound,

    Conflict,

    Database,

    Internal,
}

/// Error of an HTML route. Rendered as the error view with a status that
/// matches the outcome and a link back to where the user came from.
#[derive(Debug)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
    link: String,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::Validation => write!(f, "Validation error: {}", self.message),
            ErrorKind::Unauthorized => write!(f, "Unauthorized: {}", self.message),
            ErrorKind::Forbidden => write!(f, "Forbidden: {}", self.message),
            ErrorKind::NotFound => write!(f, "Not found: {}", self.message),
            ErrorKind::Conflict => write!(f, "Conflict: {}", self.message),
            ErrorKind::Database => write!(f, "Database error: {}", self.message),
            ErrorKind::Internal => write!(f, "Internal error: {}", self.message),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            link: "/".to_string(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, msg)
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, msg)
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, msg)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, msg)
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, msg)
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, msg)
    }

    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self.kind {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Database | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// What the client gets to see. Server-side failures are logged here and
    /// replaced by a generic message.
    fn public_message(&self) -> String {
        match self.kind {
            ErrorKind::Database => {
                tracing::error!("Database error: {}", self.message);
                "A database error occurred".to_string()
            }
            ErrorKind::Internal => {
                tracing::error!("Internal error: {}", self.message);
                "An internal error occurred".to_string()
            }
            _ => self.message.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.public_message();
        (status, views::message(&message, &self.link, None)).into_response()
    }
}

/// Attaches the error view's back link to a failing result.
pub trait WithLink<T> {
    fn link(self, link: impl Into<String>) -> Result<T, AppError>;
}

impl<T, E: Into<AppError>> WithLink<T> for Result<T, E> {
    fn link(self, link: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| e.into().with_link(link))
    }
}

/// Error of a JSON route: `{"errorMessage": "..."}` with the matching status.
#[derive(Debug)]
pub struct JsonError(pub AppError);

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error_message: String,
}

impl IntoResponse for JsonError {
    fn into_response(self) -> Response {
        let status = self.0.status();
        let body = ErrorBody {
            error_message: self.0.public_message(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<AppError> for JsonError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<HeroError> for JsonError {
    fn from(err: HeroError) -> Self {
        Self(err.into())
    }
}

impl From<CommunityError> for JsonError {
    fn from(err: CommunityError) -> Self {
        Self(err.into())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(format!("{err:#}"))
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(err: tower_sessions::session::Error) -> Self {
        Self::internal(format!("Session error: {err}"))
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidEmail | AuthError::PasswordMismatch | AuthError::MissingField(_) => {
                Self::validation(err.to_string())
            }
            AuthError::EmailTaken | AuthError::UsernameTaken => Self::conflict(err.to_string()),
            AuthError::UserNotFound => Self::not_found(err.to_string()),
            AuthError::InvalidCredentials => Self::unauthorized(err.to_string()),
            AuthError::Hashing(msg) => Self::internal(format!("Password hashing failed: {msg}")),
            AuthError::Database(msg) => Self::database(msg),
        }
    }
}

impl From<HeroError> for AppError {
    fn from(err: HeroError) -> Self {
        match err {
            HeroError::HeroNotFound | HeroError::AbilityNotFound => Self::not_found(err.to_string()),
            HeroError::DuplicateName(_) => Self::conflict(err.to_string()),
            HeroError::InvalidData(_) | HeroError::InvalidSpecification => {
                Self::validation(err.to_string())
            }
            HeroError::Database(msg) => Self::database(msg),
        }
    }
}

impl From<CommunityError> for AppError {
    fn from(err: CommunityError) -> Self {
        match err {
            CommunityError::EmptyComment | CommunityError::IncompleteFeedback => {
                Self::validation(err.to_string())
            }
            CommunityError::HeroNotFound => Self::not_found(err.to_string()),
            CommunityError::Database(msg) => Self::database(msg),
        }
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Io(e) => Self::internal(format!("Failed to store upload: {e}")),
            other => Self::validation(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_map_to_status() {
        assert_eq!(
            AppError::from(AuthError::EmailTaken).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(AuthError::UserNotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(AuthError::InvalidCredentials).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::from(HeroError::InvalidSpecification).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(HeroError::DuplicateName("Axe".into())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(CommunityError::HeroNotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(UploadError::InvalidFileType("text/plain".into())).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_database_details_are_hidden() {
        let err = AppError::database("no such table: heroes");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "A database error occurred");
    }

    #[test]
    fn test_with_link() {
        let result: Result<(), HeroError> = Err(HeroError::HeroNotFound);
        let err = result.link("/admin").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.link, "/admin");
    }
}
