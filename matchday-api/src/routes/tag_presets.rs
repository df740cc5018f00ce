/// Tag preset endpoints
///
/// Plain CRUD over named tag lists.
///
/// # Endpoints
///
/// - `GET    /v1/tag-presets`
/// - `POST   /v1/tag-presets`
/// - `GET    /v1/tag-presets/:id`
/// - `PUT    /v1/tag-presets/:id`
/// - `DELETE /v1/tag-presets/:id`

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{Path, State},
    Json,
};
use matchday_shared::models::tag_preset::{CreateTagPreset, TagPreset, UpdateTagPreset};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create tag preset request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTagPresetRequest {
    /// Preset name
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    /// Tags the preset applies
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Lists presets
pub async fn list_tag_presets(State(state): State<AppState>) -> ApiResult<Json<Vec<TagPreset>>> {
    Ok(Json(TagPreset::list(&state.db).await?))
}

/// Creates a preset
pub async fn create_tag_preset(
    State(state): State<AppState>,
    Json(request): Json<CreateTagPresetRequest>,
) -> ApiResult<Json<TagPreset>> {
    request.validate()?;

    let preset = TagPreset::create(
        &state.db,
        CreateTagPreset {
            name: request.name,
            tags: request.tags,
        },
    )
    .await?;

    Ok(Json(preset))
}

/// Fetches a preset by ID
pub async fn get_tag_preset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TagPreset>> {
    let preset = TagPreset::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tag preset not found".to_string()))?;

    Ok(Json(preset))
}

/// Updates a preset
pub async fn update_tag_preset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateTagPreset>,
) -> ApiResult<Json<TagPreset>> {
    let preset = TagPreset::update(&state.db, id, data)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tag preset not found".to_string()))?;

    Ok(Json(preset))
}

/// Deletes a preset
pub async fn delete_tag_preset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let deleted = TagPreset::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Tag preset not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "deleted": true })))
}
