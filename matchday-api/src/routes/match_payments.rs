/// Match-fee payment endpoints
///
/// Listing, individual status changes, and bulk confirmation of
/// match-fee records. Bulk confirmation applies per record with no
/// transaction: every record is attempted, and the response reports
/// which confirmed and which failed, leaving any mixed state as-is.
///
/// # Endpoints
///
/// - `GET   /v1/match-payments` (filters: `match_id`, `player_id`, `status`)
/// - `PATCH /v1/match-payments/:id`
/// - `POST  /v1/match-payments/confirm`

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use matchday_shared::models::match_payment::{MatchPayment, PaymentStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// List filter query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListMatchPaymentsQuery {
    /// Only records for this match
    pub match_id: Option<Uuid>,

    /// Only records for this player
    pub player_id: Option<Uuid>,

    /// Only records in this status
    pub status: Option<PaymentStatus>,
}

/// Patch request for a single record
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMatchPaymentRequest {
    /// New status
    pub status: PaymentStatus,

    /// Corrected amount, if the split was adjusted by hand
    pub amount: Option<f64>,
}

/// Bulk confirmation request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ConfirmRequest {
    /// Records to mark paid
    #[validate(length(min = 1, max = 200))]
    pub ids: Vec<Uuid>,
}

/// One failed item in a bulk confirmation
#[derive(Debug, Clone, Serialize)]
pub struct ConfirmFailure {
    /// Record that failed
    pub id: Uuid,

    /// Why it failed
    pub reason: String,
}

/// Bulk confirmation response
///
/// Partial failure is reported, not rolled back: records in `confirmed`
/// stay paid even when others fail.
#[derive(Debug, Clone, Serialize)]
pub struct ConfirmResponse {
    /// Records marked paid
    pub confirmed: Vec<Uuid>,

    /// Records that could not be confirmed
    pub failed: Vec<ConfirmFailure>,
}

/// Lists match-fee records
pub async fn list_match_payments(
    State(state): State<AppState>,
    Query(query): Query<ListMatchPaymentsQuery>,
) -> ApiResult<Json<Vec<MatchPayment>>> {
    let records =
        MatchPayment::list(&state.db, query.match_id, query.player_id, query.status).await?;

    Ok(Json(records))
}

/// Updates a single record's status (and optionally its amount)
pub async fn update_match_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateMatchPaymentRequest>,
) -> ApiResult<Json<MatchPayment>> {
    if let Some(amount) = request.amount {
        if amount < 0.0 {
            return Err(ApiError::BadRequest("Amount must be non-negative".to_string()));
        }
    }

    let record = MatchPayment::set_status(&state.db, id, request.status, request.amount)
        .await?
        .ok_or_else(|| ApiError::NotFound("Match payment not found".to_string()))?;

    tracing::info!(
        match_payment_id = %record.id,
        status = record.status.as_str(),
        "Match payment updated"
    );

    Ok(Json(record))
}

/// Confirms a batch of pending records as paid
///
/// Each record is confirmed independently; a failure (missing record,
/// already paid, waived, database error) lands in `failed` with its
/// reason while the rest proceed.
pub async fn confirm_match_payments(
    State(state): State<AppState>,
    Json(request): Json<ConfirmRequest>,
) -> ApiResult<Json<ConfirmResponse>> {
    request.validate()?;

    let mut confirmed = Vec::new();
    let mut failed = Vec::new();

    for id in request.ids {
        match MatchPayment::confirm(&state.db, id).await {
            Ok(Some(record)) => confirmed.push(record.id),
            Ok(None) => {
                let reason = match MatchPayment::find_by_id(&state.db, id).await {
                    Ok(Some(record)) => format!("not pending (status: {})", record.status.as_str()),
                    Ok(None) => "not found".to_string(),
                    Err(e) => e.to_string(),
                };
                failed.push(ConfirmFailure { id, reason });
            }
            Err(e) => {
                tracing::warn!(match_payment_id = %id, error = %e, "Bulk confirm item failed");
                failed.push(ConfirmFailure {
                    id,
                    reason: "database error".to_string(),
                });
            }
        }
    }

    tracing::info!(
        confirmed = confirmed.len(),
        failed = failed.len(),
        "Bulk match-payment confirmation finished"
    );

    Ok(Json(ConfirmResponse { confirmed, failed }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_request_validation() {
        let empty = ConfirmRequest { ids: vec![] };
        assert!(empty.validate().is_err());

        let valid = ConfirmRequest {
            ids: vec![Uuid::new_v4()],
        };
        assert!(valid.validate().is_ok());

        let too_many = ConfirmRequest {
            ids: (0..201).map(|_| Uuid::new_v4()).collect(),
        };
        assert!(too_many.validate().is_err());
    }

    #[test]
    fn test_confirm_response_serialization() {
        let response = ConfirmResponse {
            confirmed: vec![Uuid::nil()],
            failed: vec![ConfirmFailure {
                id: Uuid::nil(),
                reason: "not found".to_string(),
            }],
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("confirmed"));
        assert!(json.contains("not found"));
    }
}
