use axum::{
    Form,
    extract::{Multipart, Path, State, multipart::MultipartRejection},
    http::StatusCode,
    response::{Html, Redirect},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::session::SessionUser;
use super::validation::{form_id, path_id};
use super::{AppError, AppState, WithLink, views};
use crate::models::hero::{Hero, HeroChanges, HeroFields, NewHero};
use crate::uploads::{HERO_MEDIA, UploadForm};

#[derive(Debug, Deserialize)]
pub struct DeleteHeroForm {
    pub hero_id: Option<String>,
}

fn hero_fields(form: &UploadForm) -> HeroFields {
    let text = |name: &str| form.text(name).unwrap_or_default().to_string();
    let optional = |name: &str| form.text(name).map(str::to_string);

    HeroFields {
        name: text("name"),
        primary_attribute: text("primary_attribute"),
        attack_type: text("attack_type"),
        complexity: text("complexity"),
        short_description: optional("short_description"),
        full_story_url: optional("full_story_url"),
        background_color: optional("background_color"),
        text_color: optional("text_color"),
        highlight_color: optional("highlight_color"),
        secondary_color: optional("secondary_color"),
    }
}

pub(super) fn multipart_body(
    multipart: Result<Multipart, MultipartRejection>,
    link: &str,
) -> Result<Multipart, AppError> {
    multipart.map_err(|e| AppError::validation(e.body_text()).with_link(link))
}

async fn create_hero(state: &AppState, form: &UploadForm) -> Result<Hero, AppError> {
    let (Some(image_url), Some(background_image_url)) = (
        form.file_url("image_url"),
        form.file_url("background_image_url"),
    ) else {
        return Err(AppError::validation(
            "Both the portrait and the background image are required",
        ));
    };

    let hero = state
        .heroes
        .create_hero(NewHero {
            fields: hero_fields(form),
            image_url,
            background_image_url,
        })
        .await?;
    Ok(hero)
}

/// POST /Add_card
pub async fn add_card(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Html<String>), AppError> {
    let multipart = multipart_body(multipart, "/admin")?;
    let form = state
        .uploads
        .ingest(multipart, &HERO_MEDIA)
        .await
        .link("/admin")?;

    match create_hero(&state, &form).await {
        Ok(hero) => {
            tracing::info!(hero_id = hero.hero_id, name = %hero.name, "Hero created");
            Ok((
                StatusCode::CREATED,
                views::message("Hero added", "/admin", None),
            ))
        }
        Err(e) => {
            form.discard().await;
            Err(e.with_link("/admin"))
        }
    }
}

/// DELETE /Delete_card
pub async fn delete_card(
    State(state): State<Arc<AppState>>,
    Form(form): Form<DeleteHeroForm>,
) -> Result<Redirect, AppError> {
    let hero_id = form_id(form.hero_id.as_deref(), "hero_id").link("/admin")?;

    if state.heroes.delete_hero(hero_id).await.link("/admin")? {
        tracing::info!(hero_id, "Hero deleted with its abilities and comments");
    } else {
        tracing::debug!(hero_id, "Delete requested for unknown hero");
    }

    Ok(Redirect::to("/admin"))
}

/// GET /edit_hero/{hero_id}
pub async fn edit_hero_page(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(raw_id): Path<String>,
) -> Result<Html<String>, AppError> {
    let hero_id = path_id(&raw_id, "Hero").link("/admin")?;
    let user = SessionUser::current(&session).await;

    let data = state.heroes.hero_for_edit(hero_id).await.link("/admin")?;
    Ok(views::edit_hero(&data, user.as_ref()))
}

/// PUT /hero_edit/{hero_id}
///
/// Uploaded files replace the stored media and the replaced files are
/// deleted; without a file the stored path stays as it is.
pub async fn hero_edit(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Html<String>, AppError> {
    let hero_id = path_id(&raw_id, "Hero").link("/admin")?;
    let back = format!("/edit_hero/{hero_id}");

    let multipart = multipart_body(multipart, &back)?;
    let form = state
        .uploads
        .ingest(multipart, &HERO_MEDIA)
        .await
        .link(back.as_str())?;

    let changes = HeroChanges {
        fields: hero_fields(&form),
        image_url: form.file_url("image_url"),
        background_image_url: form.file_url("background_image_url"),
    };

    match state.heroes.update_hero(hero_id, changes).await {
        Ok(updated) => {
            state.uploads.remove_superseded(&updated.superseded).await;
            tracing::info!(hero_id, name = %updated.record.name, "Hero updated");
            Ok(views::message("Hero updated", &back, None))
        }
        Err(e) => {
            form.discard().await;
            Err(AppError::from(e).with_link(back))
        }
    }
}
