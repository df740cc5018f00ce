/// Roster endpoints
///
/// CRUD over the player roster. Deleting a player cascades to their dues
/// and match-fee records, so the UI warns before calling delete.
///
/// # Endpoints
///
/// - `GET    /v1/players` (filters: `active`, `guest`, `tag`)
/// - `POST   /v1/players`
/// - `GET    /v1/players/:id`
/// - `PUT    /v1/players/:id`
/// - `DELETE /v1/players/:id`

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use matchday_shared::models::membership::Membership;
use matchday_shared::models::player::{CreatePlayer, Player, UpdatePlayer};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// List filter query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPlayersQuery {
    /// Only (in)active players
    pub active: Option<bool>,

    /// Only guests / only members
    pub guest: Option<bool>,

    /// Only players carrying this tag
    pub tag: Option<String>,
}

/// Create player request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePlayerRequest {
    /// Full name
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    /// Optional nickname
    #[validate(length(max = 100))]
    pub nickname: Option<String>,

    /// Membership plan to enroll in
    pub membership_id: Option<Uuid>,

    /// Guest flag
    #[serde(default)]
    pub is_guest: bool,

    /// Initial tags
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Lists players
pub async fn list_players(
    State(state): State<AppState>,
    Query(query): Query<ListPlayersQuery>,
) -> ApiResult<Json<Vec<Player>>> {
    let players = Player::list(
        &state.db,
        query.active,
        query.guest,
        query.tag.as_deref(),
    )
    .await?;

    Ok(Json(players))
}

/// Creates a player
///
/// The referenced membership plan must exist and be active.
pub async fn create_player(
    State(state): State<AppState>,
    Json(request): Json<CreatePlayerRequest>,
) -> ApiResult<Json<Player>> {
    request.validate()?;

    if let Some(membership_id) = request.membership_id {
        let membership = Membership::find_by_id(&state.db, membership_id)
            .await?
            .ok_or_else(|| ApiError::BadRequest("Membership plan does not exist".to_string()))?;

        if !membership.active {
            return Err(ApiError::BadRequest(
                "Membership plan is no longer active".to_string(),
            ));
        }
    }

    let player = Player::create(
        &state.db,
        CreatePlayer {
            name: request.name,
            nickname: request.nickname,
            membership_id: request.membership_id,
            is_guest: request.is_guest,
            tags: request.tags,
        },
    )
    .await?;

    tracing::info!(player_id = %player.id, name = %player.name, "Player created");

    Ok(Json(player))
}

/// Fetches a player by ID
pub async fn get_player(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Player>> {
    let player = Player::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Player not found".to_string()))?;

    Ok(Json(player))
}

/// Updates a player
pub async fn update_player(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdatePlayer>,
) -> ApiResult<Json<Player>> {
    if let Some(name) = &data.name {
        if name.is_empty() || name.len() > 255 {
            return Err(ApiError::BadRequest(
                "Name must be between 1 and 255 characters".to_string(),
            ));
        }
    }

    if let Some(Some(membership_id)) = data.membership_id {
        if Membership::find_by_id(&state.db, membership_id).await?.is_none() {
            return Err(ApiError::BadRequest("Membership plan does not exist".to_string()));
        }
    }

    let player = Player::update(&state.db, id, data)
        .await?
        .ok_or_else(|| ApiError::NotFound("Player not found".to_string()))?;

    tracing::info!(player_id = %player.id, "Player updated");

    Ok(Json(player))
}

/// Deletes a player
pub async fn delete_player(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let deleted = Player::delete(&state.db, id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Player not found".to_string()));
    }

    tracing::info!(player_id = %id, "Player deleted");

    Ok(Json(serde_json::json!({ "deleted": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_player_request_validation() {
        let valid = CreatePlayerRequest {
            name: "Mia Okafor".to_string(),
            nickname: None,
            membership_id: None,
            is_guest: false,
            tags: vec![],
        };
        assert!(valid.validate().is_ok());

        let empty_name = CreatePlayerRequest {
            name: "".to_string(),
            nickname: None,
            membership_id: None,
            is_guest: false,
            tags: vec![],
        };
        assert!(empty_name.validate().is_err());

        let long_nickname = CreatePlayerRequest {
            name: "Mia".to_string(),
            nickname: Some("x".repeat(101)),
            membership_id: None,
            is_guest: false,
            tags: vec![],
        };
        assert!(long_nickname.validate().is_err());
    }
}
