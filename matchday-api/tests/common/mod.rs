/// Common test utilities for integration tests
///
/// Provides shared infrastructure:
/// - Test database setup (migrations + truncation between tests)
/// - Router construction with a test configuration
/// - Seed helpers for plans, players, and matches
///
/// Integration tests need a PostgreSQL instance; they skip with a notice
/// when `TEST_DATABASE_URL` is unset so the suite stays green on machines
/// without one.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use matchday_api::app::{build_router, AppState};
use matchday_api::config::{ApiConfig, Config, DatabaseConfig, ExportConfig};
use matchday_shared::models::membership::{BillingPeriod, CreateMembership, Membership};
use matchday_shared::models::player::{CreatePlayer, Player};
use sqlx::PgPool;
use std::sync::{Arc, OnceLock};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tower::Service as _;
use uuid::Uuid;

/// Serializes tests: they share one database and truncate it on setup
static DB_LOCK: OnceLock<Arc<Mutex<()>>> = OnceLock::new();

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    _guard: OwnedMutexGuard<()>,
}

impl TestContext {
    /// Creates a new test context against `TEST_DATABASE_URL`
    ///
    /// Returns None (after printing a notice) when the variable is unset,
    /// so tests can skip cleanly. Holds a process-wide lock for the
    /// lifetime of the context so tests do not truncate under each other.
    pub async fn new() -> anyhow::Result<Option<Self>> {
        let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
            eprintln!("TEST_DATABASE_URL not set; skipping integration test");
            return Ok(None);
        };

        let guard = DB_LOCK
            .get_or_init(|| Arc::new(Mutex::new(())))
            .clone()
            .lock_owned()
            .await;

        let db = PgPool::connect(&url).await?;

        // Path relative to this crate's Cargo.toml
        sqlx::migrate!("../migrations").run(&db).await?;

        // Start from a clean slate; dues_settings keeps its seeded row
        sqlx::query(
            "TRUNCATE players, memberships, matches, payments, match_payments,
             tag_presets, upcoming_matches, ref_sessions, ref_events CASCADE",
        )
        .execute(&db)
        .await?;
        sqlx::query(
            "UPDATE dues_settings
             SET monthly_amount = 0, annual_amount = 0, guest_surcharge = 0, due_soon_days = 14
             WHERE id = 1",
        )
        .execute(&db)
        .await?;

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                production: false,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url,
                max_connections: 5,
            },
            export: ExportConfig { webhook_url: None },
        };

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        Ok(Some(TestContext {
            db,
            app,
            _guard: guard,
        }))
    }

    /// Sends a JSON request through the router and returns (status, body)
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .call(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };

        (status, json)
    }
}

/// Creates a membership plan directly in the database
pub async fn seed_membership(
    ctx: &TestContext,
    name: &str,
    billing: BillingPeriod,
    fee: f64,
) -> Membership {
    Membership::create(
        &ctx.db,
        CreateMembership {
            name: name.to_string(),
            billing,
            fee,
        },
    )
    .await
    .unwrap()
}

/// Creates a player directly in the database
pub async fn seed_player(
    ctx: &TestContext,
    name: &str,
    membership_id: Option<Uuid>,
    is_guest: bool,
) -> Player {
    Player::create(
        &ctx.db,
        CreatePlayer {
            name: name.to_string(),
            nickname: None,
            membership_id,
            is_guest,
            tags: vec![],
        },
    )
    .await
    .unwrap()
}
