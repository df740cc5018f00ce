/// Accounting endpoints
///
/// Reporting views over the club's finances, recomputed from scratch on
/// every request:
///
/// - **summary**: per-member renewal status, missed monthly dues, dues
///   totals, and outstanding match fees
/// - **matches**: per-match fee breakdown and collection state, voided
///   matches excluded
/// - **export**: the summary as CSV (GET), optionally pushed to the
///   configured spreadsheet webhook (POST)
///
/// # Endpoints
///
/// - `GET  /v1/accounting/summary` (optional `months` window override)
/// - `GET  /v1/accounting/matches`
/// - `GET  /v1/accounting/export`
/// - `POST /v1/accounting/export`

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use crate::routes::matches::compute_breakdown;
use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{NaiveDate, Utc};
use matchday_shared::fees::{FeeBreakdown, FeeOverrides};
use matchday_shared::models::dues_settings::DuesSettings;
use matchday_shared::models::match_payment::{MatchPayment, PaymentStatus};
use matchday_shared::models::matches::Match;
use matchday_shared::models::membership::{BillingPeriod, Membership};
use matchday_shared::models::payment::{Payment, PaymentKind};
use matchday_shared::models::player::Player;
use matchday_shared::renewal::{
    classify_renewal, count_missed_months, RenewalStatus, DEFAULT_MISSED_MONTH_WINDOW,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Summary query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryQuery {
    /// Missed-month window override (default: 12)
    pub months: Option<u32>,
}

/// One member's standing in the summary
#[derive(Debug, Clone, Serialize)]
pub struct PlayerSummary {
    /// Player ID
    pub player_id: Uuid,

    /// Player name
    pub name: String,

    /// Membership plan name, if enrolled
    pub membership: Option<String>,

    /// Renewal status (overdue / due_soon / ok / no_plan)
    pub renewal_status: RenewalStatus,

    /// Missed monthly dues within the window (monthly plans only)
    pub missed_months: u32,

    /// Dues paid across the full history
    pub dues_paid_total: f64,

    /// Outstanding match fees (pending records, voided matches excluded)
    pub outstanding_match_fees: f64,
}

/// Accounting summary response
#[derive(Debug, Clone, Serialize)]
pub struct SummaryResponse {
    /// Per-member standings
    pub players: Vec<PlayerSummary>,

    /// Members currently overdue
    pub overdue_count: usize,

    /// Sum of all outstanding match fees
    pub total_outstanding: f64,

    /// Missed-month window the report used
    pub window_months: u32,
}

/// One match's financial state in the report
#[derive(Debug, Clone, Serialize)]
pub struct MatchReportEntry {
    /// Match ID
    pub match_id: Uuid,

    /// When the match was played
    pub played_at: chrono::DateTime<Utc>,

    /// Venue
    pub location: Option<String>,

    /// Computed fee split
    pub fees: FeeBreakdown,

    /// Fees already collected
    pub collected: f64,

    /// Fees still pending
    pub pending: f64,
}

/// Match report response (voided matches excluded)
#[derive(Debug, Clone, Serialize)]
pub struct MatchReportResponse {
    /// Per-match entries, most recent first
    pub matches: Vec<MatchReportEntry>,

    /// Collected across all listed matches
    pub total_collected: f64,

    /// Pending across all listed matches
    pub total_pending: f64,
}

/// Failure modes of the spreadsheet export push
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// EXPORT_WEBHOOK_URL is not set
    #[error("export webhook is not configured")]
    NotConfigured,

    /// The webhook could not be reached
    #[error("export webhook request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The webhook answered with a non-success status
    #[error("export webhook answered {0}")]
    Status(reqwest::StatusCode),
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::NotConfigured => ApiError::ServiceUnavailable(err.to_string()),
            ExportError::Request(_) | ExportError::Status(_) => {
                ApiError::ServiceUnavailable(err.to_string())
            }
        }
    }
}

/// Builds the accounting summary
///
/// Active non-guest players only: guests carry no dues plan and inactive
/// players are kept out of the report (their match fees still show in the
/// match report).
pub async fn summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> ApiResult<Json<SummaryResponse>> {
    let window_months = query.months.unwrap_or(DEFAULT_MISSED_MONTH_WINDOW);
    let response = build_summary(&state, window_months).await?;
    Ok(Json(response))
}

async fn build_summary(state: &AppState, window_months: u32) -> ApiResult<SummaryResponse> {
    let now = Utc::now();

    let players = Player::list(&state.db, Some(true), Some(false), None).await?;
    let settings = DuesSettings::get(&state.db).await?;

    let plans: HashMap<Uuid, Membership> = Membership::list(&state.db)
        .await?
        .into_iter()
        .map(|m| (m.id, m))
        .collect();

    let player_ids: Vec<Uuid> = players.iter().map(|p| p.id).collect();
    let payments = Payment::list_by_players(&state.db, &player_ids).await?;
    let outstanding: HashMap<Uuid, f64> = MatchPayment::outstanding_by_player(&state.db)
        .await?
        .into_iter()
        .collect();

    let mut by_player: HashMap<Uuid, Vec<&Payment>> = HashMap::new();
    for payment in &payments {
        by_player.entry(payment.player_id).or_default().push(payment);
    }

    let mut summaries = Vec::with_capacity(players.len());
    for player in &players {
        let plan = player.membership_id.and_then(|id| plans.get(&id));
        let billing = plan.map(|p| p.billing);
        let history = by_player.get(&player.id).map(Vec::as_slice).unwrap_or(&[]);

        let relevant_kind = match billing {
            Some(BillingPeriod::Annual) => PaymentKind::Annual,
            _ => PaymentKind::Monthly,
        };
        let last_period = history
            .iter()
            .filter(|p| p.kind == relevant_kind)
            .map(|p| p.period)
            .max();

        let renewal_status =
            classify_renewal(now, billing, last_period, settings.due_soon_days);

        let missed_months = if billing == Some(BillingPeriod::Monthly) {
            let monthly_periods: Vec<NaiveDate> = history
                .iter()
                .filter(|p| p.kind == PaymentKind::Monthly)
                .map(|p| p.period)
                .collect();

            count_missed_months(
                now,
                window_months,
                &monthly_periods,
                player.joined_at,
                player.dues_reset_at,
            )
        } else {
            0
        };

        summaries.push(PlayerSummary {
            player_id: player.id,
            name: player.name.clone(),
            membership: plan.map(|p| p.name.clone()),
            renewal_status,
            missed_months,
            dues_paid_total: history.iter().map(|p| p.amount).sum(),
            outstanding_match_fees: outstanding.get(&player.id).copied().unwrap_or(0.0),
        });
    }

    let overdue_count = summaries
        .iter()
        .filter(|s| s.renewal_status == RenewalStatus::Overdue)
        .count();
    let total_outstanding = summaries.iter().map(|s| s.outstanding_match_fees).sum();

    Ok(SummaryResponse {
        players: summaries,
        overdue_count,
        total_outstanding,
        window_months,
    })
}

/// Builds the per-match financial report
///
/// Voided matches are excluded from the listing and from every total.
pub async fn match_report(State(state): State<AppState>) -> ApiResult<Json<MatchReportResponse>> {
    let matches = Match::list(&state.db, false).await?;
    let all_records = MatchPayment::list(&state.db, None, None, None).await?;

    let mut entries = Vec::with_capacity(matches.len());
    let mut total_collected = 0.0;
    let mut total_pending = 0.0;

    for m in &matches {
        let (fees, _, _, _) = compute_breakdown(&state, m, FeeOverrides::default()).await?;

        let records: Vec<&MatchPayment> =
            all_records.iter().filter(|r| r.match_id == m.id).collect();
        let collected: f64 = records
            .iter()
            .filter(|r| r.status == PaymentStatus::Paid)
            .map(|r| r.amount)
            .sum();
        let pending: f64 = records
            .iter()
            .filter(|r| r.status == PaymentStatus::Pending)
            .map(|r| r.amount)
            .sum();

        total_collected += collected;
        total_pending += pending;

        entries.push(MatchReportEntry {
            match_id: m.id,
            played_at: m.played_at,
            location: m.location.clone(),
            fees,
            collected,
            pending,
        });
    }

    Ok(Json(MatchReportResponse {
        matches: entries,
        total_collected,
        total_pending,
    }))
}

/// Serves the accounting summary as CSV
pub async fn export_csv(State(state): State<AppState>) -> ApiResult<Response> {
    let summary = build_summary(&state, DEFAULT_MISSED_MONTH_WINDOW).await?;
    let csv = summary_to_csv(&summary);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"accounting-summary.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}

/// Pushes the accounting summary to the configured spreadsheet webhook
///
/// Answers 503 when `EXPORT_WEBHOOK_URL` is unset or the webhook rejects
/// the payload.
pub async fn export_push(State(state): State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    let summary = build_summary(&state, DEFAULT_MISSED_MONTH_WINDOW).await?;
    let rows = summary.players.len();

    push_to_webhook(&state, &summary).await?;

    tracing::info!(rows, "Accounting summary pushed to export webhook");

    Ok(Json(serde_json::json!({ "pushed": true, "rows": rows })))
}

async fn push_to_webhook(state: &AppState, summary: &SummaryResponse) -> Result<(), ExportError> {
    let url = state
        .config
        .export
        .webhook_url
        .as_deref()
        .ok_or(ExportError::NotConfigured)?;

    let response = state.http.post(url).json(summary).send().await?;

    if !response.status().is_success() {
        return Err(ExportError::Status(response.status()));
    }

    Ok(())
}

/// Renders the summary as CSV
fn summary_to_csv(summary: &SummaryResponse) -> String {
    let mut csv = String::from(
        "player,membership,renewal_status,missed_months,dues_paid_total,outstanding_match_fees\n",
    );

    for player in &summary.players {
        csv.push_str(&format!(
            "{},{},{},{},{:.2},{:.2}\n",
            csv_field(&player.name),
            csv_field(player.membership.as_deref().unwrap_or("")),
            player.renewal_status.as_str(),
            player.missed_months,
            player.dues_paid_total,
            player.outstanding_match_fees,
        ));
    }

    csv
}

/// Quotes a CSV field when it contains separators or quotes
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_summary_to_csv() {
        let summary = SummaryResponse {
            players: vec![PlayerSummary {
                player_id: Uuid::nil(),
                name: "Okafor, Mia".to_string(),
                membership: Some("Regular".to_string()),
                renewal_status: RenewalStatus::Ok,
                missed_months: 1,
                dues_paid_total: 120.0,
                outstanding_match_fees: 7.5,
            }],
            overdue_count: 0,
            total_outstanding: 7.5,
            window_months: 12,
        };

        let csv = summary_to_csv(&summary);
        let mut lines = csv.lines();
        assert!(lines.next().unwrap().starts_with("player,membership"));
        assert_eq!(lines.next().unwrap(), "\"Okafor, Mia\",Regular,ok,1,120.00,7.50");
    }

    #[test]
    fn test_export_error_maps_to_service_unavailable() {
        let err: ApiError = ExportError::NotConfigured.into();
        assert!(matches!(err, ApiError::ServiceUnavailable(_)));
    }
}
