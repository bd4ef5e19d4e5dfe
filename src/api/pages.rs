use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
};
use std::sync::Arc;
use tower_sessions::Session;

use super::session::SessionUser;
use super::{AppError, AppState, views};

/// GET /
pub async fn index(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let user = SessionUser::current(&session).await;
    let heroes = state.heroes.list_heroes().await?;
    Ok(views::index(&heroes, user.as_ref()))
}

/// GET /auth
pub async fn auth_page(session: Session) -> Html<String> {
    let user = SessionUser::current(&session).await;
    views::auth(user.as_ref())
}

/// GET /feedback
pub async fn feedback_page(session: Session) -> Html<String> {
    let user = SessionUser::current(&session).await;
    views::feedback(user.as_ref())
}

/// GET /admin
pub async fn admin_page(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let user = SessionUser::current(&session).await;
    let heroes = state.heroes.list_heroes().await?;
    Ok(views::admin(&heroes, user.as_ref()))
}

/// GET /hero/{name}
pub async fn hero_page(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(name): Path<String>,
) -> Result<Html<String>, AppError> {
    let user = SessionUser::current(&session).await;
    let detail = state.heroes.hero_detail(&name).await?;
    Ok(views::hero(&detail, user.as_ref()))
}

pub async fn not_found() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, views::not_found())
}
