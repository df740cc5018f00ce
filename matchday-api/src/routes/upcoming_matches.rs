/// Upcoming match endpoints
///
/// Schedule CRUD plus conversion: once a scheduled match has been played,
/// `convert` creates the real match row (carrying over venue, opponent,
/// and the RSVP list as initial attendance) and stamps the schedule entry
/// with the created match's ID. An entry can only be converted once.
///
/// # Endpoints
///
/// - `GET    /v1/upcoming-matches`
/// - `POST   /v1/upcoming-matches`
/// - `GET    /v1/upcoming-matches/:id`
/// - `PUT    /v1/upcoming-matches/:id`
/// - `DELETE /v1/upcoming-matches/:id`
/// - `POST   /v1/upcoming-matches/:id/convert`

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use matchday_shared::models::matches::{CreateMatch, Match};
use matchday_shared::models::upcoming_match::{
    CreateUpcomingMatch, UpcomingMatch, UpdateUpcomingMatch,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Conversion request
///
/// All fields are optional; values stored on the schedule entry are used
/// where nothing is supplied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConvertRequest {
    /// Actual kick-off time (defaults to the scheduled time)
    pub played_at: Option<DateTime<Utc>>,

    /// Venue cost, if already known
    pub total_cost: Option<f64>,

    /// Final attendance (defaults to the RSVP list)
    pub player_ids: Option<Vec<Uuid>>,
}

/// Conversion response
#[derive(Debug, Clone, Serialize)]
pub struct ConvertResponse {
    /// Updated schedule entry
    pub upcoming: UpcomingMatch,

    /// Created match
    #[serde(rename = "match")]
    pub created_match: Match,
}

/// Lists schedule entries, soonest first
pub async fn list_upcoming(State(state): State<AppState>) -> ApiResult<Json<Vec<UpcomingMatch>>> {
    Ok(Json(UpcomingMatch::list(&state.db).await?))
}

/// Schedules a match
pub async fn create_upcoming(
    State(state): State<AppState>,
    Json(data): Json<CreateUpcomingMatch>,
) -> ApiResult<Json<UpcomingMatch>> {
    let upcoming = UpcomingMatch::create(&state.db, data).await?;

    tracing::info!(upcoming_id = %upcoming.id, scheduled_at = %upcoming.scheduled_at, "Match scheduled");

    Ok(Json(upcoming))
}

/// Fetches a schedule entry by ID
pub async fn get_upcoming(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UpcomingMatch>> {
    let upcoming = UpcomingMatch::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Upcoming match not found".to_string()))?;

    Ok(Json(upcoming))
}

/// Updates a schedule entry
pub async fn update_upcoming(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateUpcomingMatch>,
) -> ApiResult<Json<UpcomingMatch>> {
    let upcoming = UpcomingMatch::update(&state.db, id, data)
        .await?
        .ok_or_else(|| ApiError::NotFound("Upcoming match not found".to_string()))?;

    Ok(Json(upcoming))
}

/// Deletes a schedule entry
pub async fn delete_upcoming(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let deleted = UpcomingMatch::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Upcoming match not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// Converts a schedule entry into a played match
///
/// Conflicts when the entry was already converted.
pub async fn convert_upcoming(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ConvertRequest>,
) -> ApiResult<Json<ConvertResponse>> {
    let upcoming = UpcomingMatch::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Upcoming match not found".to_string()))?;

    if upcoming.converted_match_id.is_some() {
        return Err(ApiError::Conflict(
            "Upcoming match was already converted".to_string(),
        ));
    }

    let created_match = Match::create(
        &state.db,
        CreateMatch {
            played_at: request.played_at.unwrap_or(upcoming.scheduled_at),
            location: upcoming.location.clone(),
            opponent: upcoming.opponent.clone(),
            total_cost: request.total_cost,
            member_fee: None,
            guest_surcharge: None,
            player_ids: request.player_ids.unwrap_or_else(|| upcoming.player_ids.clone()),
            note: upcoming.note.clone(),
        },
    )
    .await?;

    // The guard re-checks converted_match_id; a concurrent conversion
    // loses here and we surface the conflict without undoing the winner.
    let upcoming = UpcomingMatch::mark_converted(&state.db, id, created_match.id)
        .await?
        .ok_or_else(|| ApiError::Conflict("Upcoming match was already converted".to_string()))?;

    tracing::info!(
        upcoming_id = %upcoming.id,
        match_id = %created_match.id,
        "Upcoming match converted"
    );

    Ok(Json(ConvertResponse {
        upcoming,
        created_match,
    }))
}
