use axum::{
    Form, Json,
    extract::State,
    http::StatusCode,
    response::Html,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_sessions::Session;

use super::session::SessionUser;
use super::validation::form_id;
use super::{AppError, AppState, JsonError, WithLink, views};
use crate::models::community::{Feedback, NewFeedback};

#[derive(Debug, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub comment: String,

    pub hero_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackForm {
    #[serde(rename = "Username", default)]
    pub user_name: String,

    #[serde(rename = "Useremail", default)]
    pub user_email: String,

    #[serde(rename = "Theme", default)]
    pub theme: String,

    #[serde(rename = "Message", default)]
    pub message: String,
}

#[derive(Serialize)]
pub struct FeedbackList {
    pub feedback: Vec<Feedback>,
}

/// POST /add_comment
pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<CommentForm>,
) -> Result<Html<String>, AppError> {
    let Some(user) = SessionUser::get(&session).await? else {
        return Err(AppError::unauthorized("You are not signed in").with_link("/auth"));
    };

    let hero_id = form_id(form.hero_id.as_deref(), "hero_id")?;

    state
        .community
        .add_comment(&user.username, hero_id, form.comment.trim())
        .await
        .link("/")?;

    Ok(views::message("Comment added", "/", Some(&user)))
}

/// POST /feedback_answer
pub async fn feedback_answer(
    State(state): State<Arc<AppState>>,
    Form(form): Form<FeedbackForm>,
) -> Result<(StatusCode, Html<String>), AppError> {
    let feedback = state
        .community
        .submit_feedback(NewFeedback {
            user_name: form.user_name.trim().to_string(),
            user_email: form.user_email.trim().to_string(),
            theme: form.theme.trim().to_string(),
            message: form.message.trim().to_string(),
        })
        .await
        .link("/feedback")?;

    tracing::info!(feedback_id = feedback.id, "Feedback received");

    Ok((
        StatusCode::CREATED,
        views::message("Thank you for your feedback!", "/", None),
    ))
}

/// GET /get_feedback
pub async fn get_feedback(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FeedbackList>, JsonError> {
    let feedback = state.community.list_feedback().await?;
    Ok(Json(FeedbackList { feedback }))
}
