use axum::{
    Json,
    extract::{Multipart, Path, State, multipart::MultipartRejection},
    http::StatusCode,
    response::Html,
};
use serde::Serialize;
use std::sync::Arc;

use super::heroes::multipart_body;
use super::validation::{form_id, path_id, required};
use super::{AppError, AppState, JsonError, WithLink, views};
use crate::models::Updated;
use crate::models::ability::{Ability, AbilityChanges, NewAbility};
use crate::uploads::{ABILITY_MEDIA, UploadForm};

#[derive(Serialize)]
pub struct AbilityList {
    pub abilities: Vec<Ability>,
}

/// Text part shared by create and update.
struct AbilityText {
    hero_id: i32,
    name: String,
    description: String,
    specification: String,
}

fn ability_text(form: &UploadForm) -> Result<AbilityText, AppError> {
    Ok(AbilityText {
        hero_id: form_id(form.text("hero_id"), "hero_id")?,
        name: required(form.text("name"), "name")?.to_string(),
        description: required(form.text("description"), "description")?.to_string(),
        specification: required(form.text("specification"), "specification")?.to_string(),
    })
}

async fn create_ability(state: &AppState, form: &UploadForm) -> Result<Ability, AppError> {
    let text = ability_text(form)?;
    let image_url = form
        .file_url("image_url")
        .ok_or_else(|| AppError::validation("An ability image is required"))?;

    let ability = state
        .heroes
        .create_ability(NewAbility {
            hero_id: text.hero_id,
            name: text.name,
            description: text.description,
            specification: text.specification,
            image_url,
            video_url: form.file_url("video_url"),
        })
        .await?;
    Ok(ability)
}

async fn update_ability(
    state: &AppState,
    ability_id: i32,
    form: &UploadForm,
) -> Result<Updated<Ability>, AppError> {
    let text = ability_text(form)?;

    let updated = state
        .heroes
        .update_ability(
            ability_id,
            AbilityChanges {
                hero_id: text.hero_id,
                name: text.name,
                description: text.description,
                specification: text.specification,
                image_url: form.file_url("image_url"),
                video_url: form.file_url("video_url"),
            },
        )
        .await?;
    Ok(updated)
}

/// GET /get_abilities/{hero_id}
pub async fn get_abilities(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<AbilityList>, JsonError> {
    let hero_id = path_id(&raw_id, "Hero")?;
    let abilities = state.heroes.list_abilities(hero_id).await?;
    Ok(Json(AbilityList { abilities }))
}

/// POST /Add_ability
pub async fn add_ability(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Html<String>), AppError> {
    let multipart = multipart_body(multipart, "/admin")?;
    let form = state
        .uploads
        .ingest(multipart, &ABILITY_MEDIA)
        .await
        .link("/admin")?;

    match create_ability(&state, &form).await {
        Ok(ability) => {
            tracing::info!(
                ability_id = ability.ability_id,
                hero_id = ability.hero_id,
                "Ability created"
            );
            Ok((
                StatusCode::CREATED,
                views::message("Ability added", "/admin", None),
            ))
        }
        Err(e) => {
            form.discard().await;
            Err(e.with_link("/admin"))
        }
    }
}

/// PUT /edit_ability/{ability_id}
pub async fn edit_ability(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Html<String>, AppError> {
    let ability_id = path_id(&raw_id, "Ability").link("/admin")?;

    let multipart = multipart_body(multipart, "/admin")?;
    let form = state
        .uploads
        .ingest(multipart, &ABILITY_MEDIA)
        .await
        .link("/admin")?;

    match update_ability(&state, ability_id, &form).await {
        Ok(updated) => {
            state.uploads.remove_superseded(&updated.superseded).await;
            tracing::info!(
                ability_id,
                hero_id = updated.record.hero_id,
                "Ability updated"
            );
            Ok(views::message("Ability updated", "/admin", None))
        }
        Err(e) => {
            form.discard().await;
            Err(e.with_link("/admin"))
        }
    }
}

/// DELETE /delete_ability/{ability_id}
///
/// Answers with a bare 200, whether or not the ability existed.
pub async fn delete_ability(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let ability_id = path_id(&raw_id, "Ability").link("/admin")?;

    if state.heroes.delete_ability(ability_id).await.link("/admin")? {
        tracing::info!(ability_id, "Ability deleted");
    }

    Ok(StatusCode::OK)
}
