/// Membership plan endpoints
///
/// CRUD over membership plans. A plan cannot be deleted while players are
/// enrolled in it: the handler checks the roster first and answers 409,
/// mirroring what the schema's `ON DELETE RESTRICT` would enforce anyway.
///
/// # Endpoints
///
/// - `GET    /v1/memberships`
/// - `POST   /v1/memberships`
/// - `GET    /v1/memberships/:id`
/// - `PUT    /v1/memberships/:id`
/// - `DELETE /v1/memberships/:id`

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{Path, State},
    Json,
};
use matchday_shared::models::membership::{
    BillingPeriod, CreateMembership, Membership, UpdateMembership,
};
use matchday_shared::models::player::Player;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create membership request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMembershipRequest {
    /// Plan name
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    /// Dues cadence (defaults to monthly)
    pub billing: Option<BillingPeriod>,

    /// Fee per billing period
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub fee: f64,
}

/// Lists membership plans
pub async fn list_memberships(State(state): State<AppState>) -> ApiResult<Json<Vec<Membership>>> {
    Ok(Json(Membership::list(&state.db).await?))
}

/// Creates a membership plan
pub async fn create_membership(
    State(state): State<AppState>,
    Json(request): Json<CreateMembershipRequest>,
) -> ApiResult<Json<Membership>> {
    request.validate()?;

    let membership = Membership::create(
        &state.db,
        CreateMembership {
            name: request.name,
            billing: request.billing.unwrap_or(BillingPeriod::Monthly),
            fee: request.fee,
        },
    )
    .await?;

    tracing::info!(membership_id = %membership.id, name = %membership.name, "Membership plan created");

    Ok(Json(membership))
}

/// Fetches a plan by ID
pub async fn get_membership(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Membership>> {
    let membership = Membership::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Membership plan not found".to_string()))?;

    Ok(Json(membership))
}

/// Updates a plan
pub async fn update_membership(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateMembership>,
) -> ApiResult<Json<Membership>> {
    if let Some(fee) = data.fee {
        if fee < 0.0 {
            return Err(ApiError::BadRequest("Fee must be non-negative".to_string()));
        }
    }

    let membership = Membership::update(&state.db, id, data)
        .await?
        .ok_or_else(|| ApiError::NotFound("Membership plan not found".to_string()))?;

    tracing::info!(membership_id = %membership.id, "Membership plan updated");

    Ok(Json(membership))
}

/// Deletes a plan
///
/// Refused with 409 while players reference the plan.
pub async fn delete_membership(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let enrolled = Player::count_by_membership(&state.db, id).await?;
    if enrolled > 0 {
        return Err(ApiError::Conflict(format!(
            "Membership plan is referenced by {} player(s)",
            enrolled
        )));
    }

    let deleted = Membership::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Membership plan not found".to_string()));
    }

    tracing::info!(membership_id = %id, "Membership plan deleted");

    Ok(Json(serde_json::json!({ "deleted": true })))
}
