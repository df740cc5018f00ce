/// Application state and router builder
///
/// This module defines the shared application state and provides a
/// function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use matchday_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, patch, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// HTTP client for the accounting export push
    pub http: reqwest::Client,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
            http: reqwest::Client::new(),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                        # Health check (public)
/// └── /v1/                           # API v1 (versioned)
///     ├── /players                   # Roster CRUD
///     ├── /memberships               # Membership plans
///     ├── /dues/settings             # Club accounting settings
///     ├── /payments                  # Dues payments
///     ├── /matches                   # Matches, VOID/restore, fee collection
///     ├── /match-payments            # Match-fee records, bulk confirm
///     ├── /tag-presets               # Roster tag presets
///     ├── /upcoming-matches          # Schedule, conversion into matches
///     ├── /ref-sessions              # Referee sessions, event log, SSE tail
///     └── /accounting                # Summary, per-match report, export
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Security headers
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let player_routes = Router::new()
        .route("/", get(routes::players::list_players).post(routes::players::create_player))
        .route(
            "/:id",
            get(routes::players::get_player)
                .put(routes::players::update_player)
                .delete(routes::players::delete_player),
        );

    let membership_routes = Router::new()
        .route(
            "/",
            get(routes::memberships::list_memberships).post(routes::memberships::create_membership),
        )
        .route(
            "/:id",
            get(routes::memberships::get_membership)
                .put(routes::memberships::update_membership)
                .delete(routes::memberships::delete_membership),
        );

    let dues_routes = Router::new().route(
        "/settings",
        get(routes::dues::get_settings).put(routes::dues::update_settings),
    );

    let payment_routes = Router::new()
        .route(
            "/",
            get(routes::payments::list_payments).post(routes::payments::create_payment),
        )
        .route(
            "/:id",
            get(routes::payments::get_payment).delete(routes::payments::delete_payment),
        );

    let match_routes = Router::new()
        .route(
            "/",
            get(routes::matches::list_matches).post(routes::matches::create_match),
        )
        .route(
            "/:id",
            get(routes::matches::get_match)
                .put(routes::matches::update_match)
                .delete(routes::matches::delete_match),
        )
        .route("/:id/void", post(routes::matches::void_match))
        .route("/:id/restore", post(routes::matches::restore_match))
        .route("/:id/fees", get(routes::matches::match_fees))
        .route("/:id/collect", post(routes::matches::collect_match_fees));

    let match_payment_routes = Router::new()
        .route("/", get(routes::match_payments::list_match_payments))
        .route("/:id", patch(routes::match_payments::update_match_payment))
        .route("/confirm", post(routes::match_payments::confirm_match_payments));

    let tag_preset_routes = Router::new()
        .route(
            "/",
            get(routes::tag_presets::list_tag_presets).post(routes::tag_presets::create_tag_preset),
        )
        .route(
            "/:id",
            get(routes::tag_presets::get_tag_preset)
                .put(routes::tag_presets::update_tag_preset)
                .delete(routes::tag_presets::delete_tag_preset),
        );

    let upcoming_routes = Router::new()
        .route(
            "/",
            get(routes::upcoming_matches::list_upcoming)
                .post(routes::upcoming_matches::create_upcoming),
        )
        .route(
            "/:id",
            get(routes::upcoming_matches::get_upcoming)
                .put(routes::upcoming_matches::update_upcoming)
                .delete(routes::upcoming_matches::delete_upcoming),
        )
        .route("/:id/convert", post(routes::upcoming_matches::convert_upcoming));

    let ref_session_routes = Router::new()
        .route(
            "/",
            get(routes::ref_sessions::list_sessions).post(routes::ref_sessions::create_session),
        )
        .route("/:id", get(routes::ref_sessions::get_session))
        .route("/:id/end", post(routes::ref_sessions::end_session))
        .route(
            "/:id/events",
            get(routes::ref_sessions::list_events).post(routes::ref_sessions::append_event),
        )
        .route("/:id/stream", get(routes::ref_sessions::stream_events));

    let accounting_routes = Router::new()
        .route("/summary", get(routes::accounting::summary))
        .route("/matches", get(routes::accounting::match_report))
        .route(
            "/export",
            get(routes::accounting::export_csv).post(routes::accounting::export_push),
        );

    let v1_routes = Router::new()
        .nest("/players", player_routes)
        .nest("/memberships", membership_routes)
        .nest("/dues", dues_routes)
        .nest("/payments", payment_routes)
        .nest("/matches", match_routes)
        .nest("/match-payments", match_payment_routes)
        .nest("/tag-presets", tag_preset_routes)
        .nest("/upcoming-matches", upcoming_routes)
        .nest("/ref-sessions", ref_session_routes)
        .nest("/accounting", accounting_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}
