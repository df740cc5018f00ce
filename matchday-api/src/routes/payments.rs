/// Dues payment endpoints
///
/// Records monthly/annual dues payments per player. The period is the
/// first day of the covered month; the renewal report recomputes coverage
/// from these rows on every request.
///
/// # Endpoints
///
/// - `GET    /v1/payments` (filters: `player_id`, `kind`)
/// - `POST   /v1/payments`
/// - `GET    /v1/payments/:id`
/// - `DELETE /v1/payments/:id`

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use matchday_shared::models::payment::{CreatePayment, Payment, PaymentKind};
use matchday_shared::models::player::Player;
use serde::Deserialize;
use uuid::Uuid;

/// List filter query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPaymentsQuery {
    /// Only payments by this player
    pub player_id: Option<Uuid>,

    /// Only monthly or only annual payments
    pub kind: Option<PaymentKind>,
}

/// Lists payments
pub async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<ListPaymentsQuery>,
) -> ApiResult<Json<Vec<Payment>>> {
    let payments = Payment::list(&state.db, query.player_id, query.kind).await?;
    Ok(Json(payments))
}

/// Records a payment
pub async fn create_payment(
    State(state): State<AppState>,
    Json(data): Json<CreatePayment>,
) -> ApiResult<Json<Payment>> {
    if data.amount < 0.0 {
        return Err(ApiError::BadRequest("Amount must be non-negative".to_string()));
    }

    let player = Player::find_by_id(&state.db, data.player_id)
        .await?
        .ok_or_else(|| ApiError::BadRequest("Player does not exist".to_string()))?;

    if player.is_guest {
        return Err(ApiError::BadRequest(
            "Guests do not pay dues; record a match fee instead".to_string(),
        ));
    }

    let payment = Payment::create(&state.db, data).await?;

    tracing::info!(
        payment_id = %payment.id,
        player_id = %payment.player_id,
        kind = payment.kind.as_str(),
        period = %payment.period,
        "Dues payment recorded"
    );

    Ok(Json(payment))
}

/// Fetches a payment by ID
pub async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Payment>> {
    let payment = Payment::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Payment not found".to_string()))?;

    Ok(Json(payment))
}

/// Deletes a payment (mis-entry correction)
pub async fn delete_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let deleted = Payment::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Payment not found".to_string()));
    }

    tracing::info!(payment_id = %id, "Dues payment deleted");

    Ok(Json(serde_json::json!({ "deleted": true })))
}
