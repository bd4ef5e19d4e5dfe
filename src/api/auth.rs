use axum::{
    Form,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::session::SessionUser;
use super::{AppError, AppState, WithLink, views};
use crate::models::user::{Registration, UserRole};

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegistrationForm {
    #[serde(rename = "User_email", default)]
    pub email: String,

    #[serde(rename = "User_password", default)]
    pub password: String,

    #[serde(rename = "User_password_confirm", default)]
    pub password_confirm: String,

    #[serde(rename = "User_name", default)]
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    /// Email or username.
    #[serde(rename = "User_name", default)]
    pub identifier: String,

    #[serde(rename = "User_password", default)]
    pub password: String,
}

// ============================================================================
// Middleware
// ============================================================================

/// Route-layer guard: the session user must hold exactly `role`.
///
/// Runs before the handler's extractors, so a rejected upload never reads
/// its body.
pub async fn require_role(
    State(role): State<UserRole>,
    session: Session,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(user) = SessionUser::get(&session).await? else {
        return Err(AppError::unauthorized("You are not signed in").with_link("/auth"));
    };

    tracing::Span::current().record("user_id", user.id);

    if user.role != role {
        tracing::warn!(
            username = %user.username,
            required = %role,
            actual = %user.role,
            "Rejected request without sufficient role"
        );
        return Err(AppError::forbidden("You do not have sufficient rights"));
    }

    Ok(next.run(request).await)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /registration
pub async fn register(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RegistrationForm>,
) -> Result<(StatusCode, Html<String>), AppError> {
    state
        .auth
        .register(Registration {
            email: form.email.trim().to_string(),
            password: form.password,
            password_confirm: form.password_confirm,
            username: form.username.trim().to_string(),
        })
        .await
        .link("/auth")?;

    Ok((
        StatusCode::CREATED,
        views::message("User registered successfully!", "/", None),
    ))
}

/// POST /login
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Redirect, AppError> {
    let user = state
        .auth
        .login(form.identifier.trim(), &form.password)
        .await
        .link("/auth")?;

    SessionUser::insert(&session, &user).await?;
    tracing::info!(username = %user.username, role = %user.role, "User signed in");

    Ok(Redirect::to("/"))
}

/// GET /logout
pub async fn logout(session: Session) -> Result<impl IntoResponse, AppError> {
    SessionUser::clear(&session).await?;
    Ok(Redirect::to("/"))
}
