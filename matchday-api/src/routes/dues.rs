/// Club accounting settings endpoints
///
/// The settings row (dues amounts, guest surcharge, due-soon window) is a
/// singleton seeded by the initial migration.
///
/// # Endpoints
///
/// - `GET /v1/dues/settings`
/// - `PUT /v1/dues/settings`

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{extract::State, Json};
use matchday_shared::models::dues_settings::{DuesSettings, UpdateDuesSettings};

/// Fetches the club accounting settings
pub async fn get_settings(State(state): State<AppState>) -> ApiResult<Json<DuesSettings>> {
    Ok(Json(DuesSettings::get(&state.db).await?))
}

/// Patches the club accounting settings
pub async fn update_settings(
    State(state): State<AppState>,
    Json(data): Json<UpdateDuesSettings>,
) -> ApiResult<Json<DuesSettings>> {
    for (label, value) in [
        ("monthly_amount", data.monthly_amount),
        ("annual_amount", data.annual_amount),
        ("guest_surcharge", data.guest_surcharge),
    ] {
        if let Some(v) = value {
            if v < 0.0 {
                return Err(ApiError::BadRequest(format!("{} must be non-negative", label)));
            }
        }
    }

    if let Some(days) = data.due_soon_days {
        if days < 0 {
            return Err(ApiError::BadRequest("due_soon_days must be non-negative".to_string()));
        }
    }

    let settings = DuesSettings::update(&state.db, data).await?;

    tracing::info!("Dues settings updated");

    Ok(Json(settings))
}
