/// Match endpoints
///
/// CRUD over played matches plus the financial operations attached to
/// them: VOID/restore bookkeeping, fee-split computation, and fee
/// collection (generating match-payment records for the attendance).
///
/// # Endpoints
///
/// - `GET    /v1/matches` (filter: `include_voided`)
/// - `POST   /v1/matches`
/// - `GET    /v1/matches/:id`
/// - `PUT    /v1/matches/:id`
/// - `DELETE /v1/matches/:id`
/// - `POST   /v1/matches/:id/void`
/// - `POST   /v1/matches/:id/restore`
/// - `GET    /v1/matches/:id/fees` (query overrides: `total`, `member_fee`, `guest_surcharge`)
/// - `POST   /v1/matches/:id/collect`

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use matchday_shared::fees::{
    calculate_match_fees, calculate_player_match_fee, FeeBreakdown, FeeInputs, FeeOverrides,
};
use matchday_shared::models::dues_settings::DuesSettings;
use matchday_shared::models::match_payment::MatchPayment;
use matchday_shared::models::matches::{CreateMatch, Match, UpdateMatch};
use matchday_shared::models::player::Player;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// List filter query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListMatchesQuery {
    /// Include voided matches (default: false)
    #[serde(default)]
    pub include_voided: bool,
}

/// Computed fee response
#[derive(Debug, Clone, Serialize)]
pub struct MatchFeesResponse {
    /// Match the breakdown belongs to
    pub match_id: Uuid,

    /// Attending members
    pub member_count: u32,

    /// Attending guests
    pub guest_count: u32,

    /// The computed split
    pub fees: FeeBreakdown,
}

/// Fee collection response
#[derive(Debug, Clone, Serialize)]
pub struct CollectFeesResponse {
    /// Match the records belong to
    pub match_id: Uuid,

    /// Newly created fee records
    pub created: Vec<MatchPayment>,

    /// Players skipped because they already had a record
    pub skipped: Vec<Uuid>,
}

/// Lists matches, most recent first
pub async fn list_matches(
    State(state): State<AppState>,
    Query(query): Query<ListMatchesQuery>,
) -> ApiResult<Json<Vec<Match>>> {
    Ok(Json(Match::list(&state.db, query.include_voided).await?))
}

/// Creates a match
pub async fn create_match(
    State(state): State<AppState>,
    Json(data): Json<CreateMatch>,
) -> ApiResult<Json<Match>> {
    validate_fee_fields(data.total_cost, data.member_fee, data.guest_surcharge)?;
    validate_attendance(&state, &data.player_ids).await?;

    let m = Match::create(&state.db, data).await?;

    tracing::info!(match_id = %m.id, played_at = %m.played_at, "Match created");

    Ok(Json(m))
}

/// Fetches a match by ID
pub async fn get_match(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Match>> {
    let m = Match::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Match not found".to_string()))?;

    Ok(Json(m))
}

/// Updates a match
pub async fn update_match(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateMatch>,
) -> ApiResult<Json<Match>> {
    validate_fee_fields(data.total_cost, data.member_fee, data.guest_surcharge)?;
    if let Some(player_ids) = &data.player_ids {
        validate_attendance(&state, player_ids).await?;
    }

    let m = Match::update(&state.db, id, data)
        .await?
        .ok_or_else(|| ApiError::NotFound("Match not found".to_string()))?;

    tracing::info!(match_id = %m.id, "Match updated");

    Ok(Json(m))
}

/// Deletes a match
pub async fn delete_match(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let deleted = Match::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Match not found".to_string()));
    }

    tracing::info!(match_id = %id, "Match deleted");

    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// Voids a match, excluding it from financial aggregation
///
/// Conflicts when the match is already voided.
pub async fn void_match(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Match>> {
    match Match::void(&state.db, id).await? {
        Some(m) => {
            tracing::info!(match_id = %m.id, "Match voided");
            Ok(Json(m))
        }
        None => {
            // Distinguish missing from already voided for a clean error
            match Match::find_by_id(&state.db, id).await? {
                Some(_) => Err(ApiError::Conflict("Match is already voided".to_string())),
                None => Err(ApiError::NotFound("Match not found".to_string())),
            }
        }
    }
}

/// Restores a voided match into financial aggregation
///
/// Conflicts when the match is not voided.
pub async fn restore_match(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Match>> {
    match Match::restore(&state.db, id).await? {
        Some(m) => {
            tracing::info!(match_id = %m.id, "Match restored");
            Ok(Json(m))
        }
        None => match Match::find_by_id(&state.db, id).await? {
            Some(_) => Err(ApiError::Conflict("Match is not voided".to_string())),
            None => Err(ApiError::NotFound("Match not found".to_string())),
        },
    }
}

/// Computes the fee split for a match
///
/// Query parameters act as explicit overrides: `total` wins over
/// everything, `member_fee`/`guest_surcharge` win over the fees stored on
/// the match.
pub async fn match_fees(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(overrides): Query<FeeOverrides>,
) -> ApiResult<Json<MatchFeesResponse>> {
    let m = Match::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Match not found".to_string()))?;

    let (breakdown, member_count, guest_count, _) =
        compute_breakdown(&state, &m, overrides).await?;

    Ok(Json(MatchFeesResponse {
        match_id: m.id,
        member_count,
        guest_count,
        fees: breakdown,
    }))
}

/// Generates match-payment records for a match's attendance
///
/// Each attendee gets a pending record over their computed fee. Players
/// who already have a record for the match are skipped, so collecting
/// twice is harmless. Voided matches cannot be collected.
pub async fn collect_match_fees(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(overrides): Query<FeeOverrides>,
) -> ApiResult<Json<CollectFeesResponse>> {
    let m = Match::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Match not found".to_string()))?;

    if m.is_voided {
        return Err(ApiError::Conflict(
            "Cannot collect fees for a voided match".to_string(),
        ));
    }

    let (breakdown, _, _, attendees) = compute_breakdown(&state, &m, overrides).await?;

    let existing = MatchPayment::list(&state.db, Some(m.id), None, None).await?;

    let mut created = Vec::new();
    let mut skipped = Vec::new();

    for player in attendees {
        if existing.iter().any(|mp| mp.player_id == player.id) {
            skipped.push(player.id);
            continue;
        }

        let amount = calculate_player_match_fee(player.is_guest, &breakdown);
        let record = MatchPayment::create(&state.db, m.id, player.id, amount).await?;
        created.push(record);
    }

    tracing::info!(
        match_id = %m.id,
        created = created.len(),
        skipped = skipped.len(),
        "Match fees collected"
    );

    Ok(Json(CollectFeesResponse {
        match_id: m.id,
        created,
        skipped,
    }))
}

/// Resolves a match's attendance and computes its fee breakdown
///
/// Shared by the fees and collect endpoints and the accounting report.
pub(crate) async fn compute_breakdown(
    state: &AppState,
    m: &Match,
    overrides: FeeOverrides,
) -> ApiResult<(FeeBreakdown, u32, u32, Vec<Player>)> {
    let attendees = Player::find_by_ids(&state.db, &m.player_ids).await?;
    let settings = DuesSettings::get(&state.db).await?;

    let guest_count = attendees.iter().filter(|p| p.is_guest).count() as u32;
    let member_count = attendees.len() as u32 - guest_count;

    let breakdown = calculate_match_fees(FeeInputs {
        member_count,
        guest_count,
        stored_total_cost: m.total_cost,
        stored_member_fee: m.member_fee,
        stored_guest_surcharge: m.guest_surcharge,
        default_guest_surcharge: settings.guest_surcharge,
        overrides,
    });

    Ok((breakdown, member_count, guest_count, attendees))
}

/// Rejects negative money fields
fn validate_fee_fields(
    total_cost: Option<f64>,
    member_fee: Option<f64>,
    guest_surcharge: Option<f64>,
) -> ApiResult<()> {
    for (label, value) in [
        ("total_cost", total_cost),
        ("member_fee", member_fee),
        ("guest_surcharge", guest_surcharge),
    ] {
        if let Some(v) = value {
            if v < 0.0 {
                return Err(ApiError::BadRequest(format!("{} must be non-negative", label)));
            }
        }
    }

    Ok(())
}

/// Checks that every attendance entry is a real player
async fn validate_attendance(state: &AppState, player_ids: &[Uuid]) -> ApiResult<()> {
    if player_ids.is_empty() {
        return Ok(());
    }

    let mut unique = player_ids.to_vec();
    unique.sort_unstable();
    unique.dedup();

    let found = Player::find_by_ids(&state.db, &unique).await?;
    if found.len() != unique.len() {
        return Err(ApiError::BadRequest(
            "Attendance list references unknown players".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_fee_fields() {
        assert!(validate_fee_fields(Some(50.0), None, Some(2.5)).is_ok());
        assert!(validate_fee_fields(None, None, None).is_ok());
        assert!(validate_fee_fields(Some(-1.0), None, None).is_err());
        assert!(validate_fee_fields(None, Some(-0.5), None).is_err());
    }
}
