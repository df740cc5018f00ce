/// Integration tests for the matchday API
///
/// These verify the full system end-to-end against a real PostgreSQL
/// database (set `TEST_DATABASE_URL`; tests skip with a notice
/// otherwise):
/// - Roster and membership CRUD with the delete guard
/// - Match VOID/restore bookkeeping and its effect on accounting
/// - Fee computation, collection, and bulk confirmation
/// - Renewal status and missed-month reporting
/// - Upcoming-match conversion
/// - Referee session event log

mod common;

use axum::http::StatusCode;
use chrono::Datelike;
use common::{seed_membership, seed_player, TestContext};
use matchday_shared::models::membership::BillingPeriod;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_health_check() {
    let Some(ctx) = TestContext::new().await.unwrap() else {
        return;
    };

    let (status, body) = ctx.request("GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_player_crud() {
    let Some(ctx) = TestContext::new().await.unwrap() else {
        return;
    };

    let plan = seed_membership(&ctx, "Regular", BillingPeriod::Monthly, 10.0).await;

    // Create via the API
    let (status, created) = ctx
        .request(
            "POST",
            "/v1/players",
            Some(json!({
                "name": "Mia Okafor",
                "membership_id": plan.id,
                "tags": ["midfield"]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let player_id = created["id"].as_str().unwrap().to_string();

    // Tag filter finds the player
    let (status, listed) = ctx.request("GET", "/v1/players?tag=midfield", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // Explicit null removes the plan
    let (status, updated) = ctx
        .request(
            "PUT",
            &format!("/v1/players/{}", player_id),
            Some(json!({ "membership_id": null, "active": false })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(updated["membership_id"].is_null());
    assert_eq!(updated["active"], false);

    // Delete, then 404
    let (status, _) = ctx
        .request("DELETE", &format!("/v1/players/{}", player_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx
        .request("GET", &format!("/v1/players/{}", player_id), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_membership_delete_guard() {
    let Some(ctx) = TestContext::new().await.unwrap() else {
        return;
    };

    let plan = seed_membership(&ctx, "Guarded", BillingPeriod::Monthly, 10.0).await;
    let player = seed_player(&ctx, "Jonas Weber", Some(plan.id), false).await;

    // Referenced plan cannot be deleted
    let (status, body) = ctx
        .request("DELETE", &format!("/v1/memberships/{}", plan.id), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    // Unenroll the player, then deletion goes through
    let (status, _) = ctx
        .request(
            "PUT",
            &format!("/v1/players/{}", player.id),
            Some(json!({ "membership_id": null })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx
        .request("DELETE", &format!("/v1/memberships/{}", plan.id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_match_void_restore_bookkeeping() {
    let Some(ctx) = TestContext::new().await.unwrap() else {
        return;
    };

    let (status, created) = ctx
        .request(
            "POST",
            "/v1/matches",
            Some(json!({
                "played_at": "2025-03-08T14:00:00Z",
                "location": "Stadtpark",
                "total_cost": 60.0
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let match_id = created["id"].as_str().unwrap().to_string();

    // Visible in the accounting report while active
    let (_, report) = ctx.request("GET", "/v1/accounting/matches", None).await;
    assert_eq!(report["matches"].as_array().unwrap().len(), 1);

    // Void excludes it
    let (status, voided) = ctx
        .request("POST", &format!("/v1/matches/{}/void", match_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(voided["is_voided"], true);
    assert!(!voided["voided_at"].is_null());

    let (_, report) = ctx.request("GET", "/v1/accounting/matches", None).await;
    assert!(report["matches"].as_array().unwrap().is_empty());

    // Voiding twice conflicts
    let (status, _) = ctx
        .request("POST", &format!("/v1/matches/{}/void", match_id), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Default match listing hides it, include_voided shows it
    let (_, listed) = ctx.request("GET", "/v1/matches", None).await;
    assert!(listed.as_array().unwrap().is_empty());
    let (_, listed) = ctx
        .request("GET", "/v1/matches?include_voided=true", None)
        .await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // Restore brings it back; restoring again conflicts
    let (status, restored) = ctx
        .request("POST", &format!("/v1/matches/{}/restore", match_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(restored["is_voided"], false);

    let (status, _) = ctx
        .request("POST", &format!("/v1/matches/{}/restore", match_id), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, report) = ctx.request("GET", "/v1/accounting/matches", None).await;
    assert_eq!(report["matches"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_fee_computation_and_collection() {
    let Some(ctx) = TestContext::new().await.unwrap() else {
        return;
    };

    let (status, _) = ctx
        .request(
            "PUT",
            "/v1/dues/settings",
            Some(json!({ "guest_surcharge": 2.5 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let mut player_ids = Vec::new();
    for name in ["Ana", "Ben", "Cem"] {
        player_ids.push(seed_player(&ctx, name, None, false).await.id);
    }
    let guest = seed_player(&ctx, "Guest Gus", None, true).await;
    player_ids.push(guest.id);

    let (status, created) = ctx
        .request(
            "POST",
            "/v1/matches",
            Some(json!({
                "played_at": "2025-03-08T14:00:00Z",
                "total_cost": 22.5,
                "player_ids": player_ids
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let match_id = created["id"].as_str().unwrap().to_string();

    // (22.5 - 2.5) / 4 = 5.0 member fee, 7.5 guest fee
    let (status, fees) = ctx
        .request("GET", &format!("/v1/matches/{}/fees", match_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fees["member_count"], 3);
    assert_eq!(fees["guest_count"], 1);
    assert_eq!(fees["fees"]["member_fee"], 5.0);
    assert_eq!(fees["fees"]["guest_fee"], 7.5);
    assert_eq!(fees["fees"]["collected_total"], 22.5);

    // A total override recomputes on the fly
    let (_, fees) = ctx
        .request(
            "GET",
            &format!("/v1/matches/{}/fees?total=42.5", match_id),
            None,
        )
        .await;
    assert_eq!(fees["fees"]["member_fee"], 10.0);

    // Collection creates one pending record per attendee
    let (status, collected) = ctx
        .request("POST", &format!("/v1/matches/{}/collect", match_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(collected["created"].as_array().unwrap().len(), 4);
    assert!(collected["skipped"].as_array().unwrap().is_empty());

    let guest_record = collected["created"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["player_id"] == json!(guest.id))
        .unwrap();
    assert_eq!(guest_record["amount"], 7.5);

    // Collecting again skips everyone
    let (status, recollected) = ctx
        .request("POST", &format!("/v1/matches/{}/collect", match_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(recollected["created"].as_array().unwrap().is_empty());
    assert_eq!(recollected["skipped"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_bulk_confirmation_partial_failure() {
    let Some(ctx) = TestContext::new().await.unwrap() else {
        return;
    };

    let a = seed_player(&ctx, "Ana", None, false).await;
    let b = seed_player(&ctx, "Ben", None, false).await;

    let (_, created) = ctx
        .request(
            "POST",
            "/v1/matches",
            Some(json!({
                "played_at": "2025-03-08T14:00:00Z",
                "member_fee": 5.0,
                "player_ids": [a.id, b.id]
            })),
        )
        .await;
    let match_id = created["id"].as_str().unwrap().to_string();

    let (_, collected) = ctx
        .request("POST", &format!("/v1/matches/{}/collect", match_id), None)
        .await;
    let ids: Vec<String> = collected["created"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect();

    // Two real records and one unknown ID: the real ones confirm, the
    // unknown one is reported, nothing is rolled back.
    let bogus = Uuid::new_v4().to_string();
    let (status, result) = ctx
        .request(
            "POST",
            "/v1/match-payments/confirm",
            Some(json!({ "ids": [ids[0], ids[1], bogus] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["confirmed"].as_array().unwrap().len(), 2);
    let failed = result["failed"].as_array().unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0]["id"], json!(bogus));
    assert_eq!(failed[0]["reason"], "not found");

    // Confirming an already-paid record fails with its status
    let (status, result) = ctx
        .request(
            "POST",
            "/v1/match-payments/confirm",
            Some(json!({ "ids": [ids[0]] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(result["confirmed"].as_array().unwrap().is_empty());
    assert_eq!(
        result["failed"][0]["reason"],
        "not pending (status: paid)"
    );
}

#[tokio::test]
async fn test_accounting_summary_renewals() {
    let Some(ctx) = TestContext::new().await.unwrap() else {
        return;
    };

    // due_soon_days = 0 keeps the current-month case deterministic
    let (status, _) = ctx
        .request(
            "PUT",
            "/v1/dues/settings",
            Some(json!({ "due_soon_days": 0 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let monthly = seed_membership(&ctx, "Monthly", BillingPeriod::Monthly, 10.0).await;
    let paid_up = seed_player(&ctx, "Paid Up", Some(monthly.id), false).await;
    let lapsed = seed_player(&ctx, "Lapsed", Some(monthly.id), false).await;
    let unaffiliated = seed_player(&ctx, "No Plan", None, false).await;

    // Paid-up member covers the current month
    let current_period = chrono::Utc::now().date_naive().with_day(1).unwrap();
    let (status, _) = ctx
        .request(
            "POST",
            "/v1/payments",
            Some(json!({
                "player_id": paid_up.id,
                "kind": "monthly",
                "period": current_period,
                "amount": 10.0
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // The lapsed member has four months of history and no payments
    sqlx::query("UPDATE players SET joined_at = NOW() - INTERVAL '4 months' WHERE id = $1")
        .bind(lapsed.id)
        .execute(&ctx.db)
        .await
        .unwrap();

    let (status, summary) = ctx.request("GET", "/v1/accounting/summary", None).await;
    assert_eq!(status, StatusCode::OK);

    let players = summary["players"].as_array().unwrap();
    let entry = |id: Uuid| {
        players
            .iter()
            .find(|p| p["player_id"] == json!(id))
            .unwrap()
            .clone()
    };

    assert_eq!(entry(paid_up.id)["renewal_status"], "ok");
    assert_eq!(entry(paid_up.id)["missed_months"], 0);
    assert_eq!(entry(paid_up.id)["dues_paid_total"], 10.0);

    assert_eq!(entry(lapsed.id)["renewal_status"], "overdue");
    assert_eq!(entry(lapsed.id)["missed_months"], 4);

    assert_eq!(entry(unaffiliated.id)["renewal_status"], "no_plan");
    assert_eq!(entry(unaffiliated.id)["missed_months"], 0);

    assert_eq!(summary["overdue_count"], 1);

    // An administrator reset excludes months before it
    sqlx::query("UPDATE players SET dues_reset_at = NOW() - INTERVAL '1 month' WHERE id = $1")
        .bind(lapsed.id)
        .execute(&ctx.db)
        .await
        .unwrap();

    let (_, summary) = ctx.request("GET", "/v1/accounting/summary", None).await;
    let players = summary["players"].as_array().unwrap();
    let lapsed_entry = players
        .iter()
        .find(|p| p["player_id"] == json!(lapsed.id))
        .unwrap();
    assert_eq!(lapsed_entry["missed_months"], 1);
}

#[tokio::test]
async fn test_upcoming_match_conversion() {
    let Some(ctx) = TestContext::new().await.unwrap() else {
        return;
    };

    let a = seed_player(&ctx, "Ana", None, false).await;
    let b = seed_player(&ctx, "Ben", None, false).await;

    let (status, upcoming) = ctx
        .request(
            "POST",
            "/v1/upcoming-matches",
            Some(json!({
                "scheduled_at": "2025-04-12T10:30:00Z",
                "location": "Stadtpark",
                "player_ids": [a.id, b.id]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let upcoming_id = upcoming["id"].as_str().unwrap().to_string();

    let (status, converted) = ctx
        .request(
            "POST",
            &format!("/v1/upcoming-matches/{}/convert", upcoming_id),
            Some(json!({ "total_cost": 40.0 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(converted["match"]["location"], "Stadtpark");
    assert_eq!(converted["match"]["total_cost"], 40.0);
    assert_eq!(converted["match"]["player_ids"].as_array().unwrap().len(), 2);
    assert_eq!(
        converted["upcoming"]["converted_match_id"],
        converted["match"]["id"]
    );

    // A second conversion conflicts
    let (status, _) = ctx
        .request(
            "POST",
            &format!("/v1/upcoming-matches/{}/convert", upcoming_id),
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_ref_session_event_log() {
    let Some(ctx) = TestContext::new().await.unwrap() else {
        return;
    };

    let (status, session) = ctx
        .request(
            "POST",
            "/v1/ref-sessions",
            Some(json!({ "label": "Sunday friendly" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let session_id = session["id"].as_str().unwrap().to_string();

    // Events get sequential seqs
    let (status, kickoff) = ctx
        .request(
            "POST",
            &format!("/v1/ref-sessions/{}/events", session_id),
            Some(json!({ "kind": "kickoff" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(kickoff["seq"], 1);

    let (_, goal) = ctx
        .request(
            "POST",
            &format!("/v1/ref-sessions/{}/events", session_id),
            Some(json!({ "kind": "goal", "team": "home", "detail": "header from the corner" })),
        )
        .await;
    assert_eq!(goal["seq"], 2);

    // Cursor-based listing returns only the tail
    let (_, events) = ctx
        .request(
            "GET",
            &format!("/v1/ref-sessions/{}/events?after_seq=1", session_id),
            None,
        )
        .await;
    let events = events.as_array().unwrap().clone();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["kind"], "goal");

    // Ending closes the log
    let (status, ended) = ctx
        .request("POST", &format!("/v1/ref-sessions/{}/end", session_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!ended["ended_at"].is_null());

    let (status, _) = ctx
        .request(
            "POST",
            &format!("/v1/ref-sessions/{}/events", session_id),
            Some(json!({ "kind": "note" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = ctx
        .request("POST", &format!("/v1/ref-sessions/{}/end", session_id), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}
